//! Game settings and preferences
//!
//! Pre-session defaults (range, operation), the runner speed curve and an
//! optional fixed seed. Stored as pretty JSON.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;
use crate::sim::{NumberRange, OperationMode, SessionIntent};

/// How fast the runner approaches checkpoints (progress units per second)
///
/// A checkpoint is reached at progress 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedCurve {
    pub base_play: f32,
    pub base_training: f32,
    /// Added per correct answer in the current run
    pub boost_per_correct: f32,
    pub boost_cap_play: f32,
    pub boost_cap_training: f32,
    /// Hard ceiling after boosts
    pub max_speed: f32,
}

impl Default for SpeedCurve {
    fn default() -> Self {
        Self {
            base_play: BASE_SPEED_PLAY,
            base_training: BASE_SPEED_TRAINING,
            boost_per_correct: SPEED_BOOST_PER_CORRECT,
            boost_cap_play: SPEED_BOOST_CAP_PLAY,
            boost_cap_training: SPEED_BOOST_CAP_TRAINING,
            max_speed: MAX_SPEED,
        }
    }
}

impl SpeedCurve {
    /// Speed for a run of `intent` with `correct` answers so far
    pub fn speed(&self, intent: SessionIntent, correct: u32) -> f32 {
        let (base, cap) = match intent {
            SessionIntent::Play => (self.base_play, self.boost_cap_play),
            SessionIntent::Training => (self.base_training, self.boost_cap_training),
        };
        let boost = (correct as f32 * self.boost_per_correct).min(cap);
        (base + boost).min(self.max_speed)
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Range preselected on the setup screen
    pub range: NumberRange,
    /// Operation preselected on the setup screen
    pub operation: OperationMode,
    pub speed: SpeedCurve,
    /// Fixed seed for reproducible runs (random when absent)
    pub seed: Option<u64>,
}

impl Settings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = serde_json::from_slice(&bytes).map_err(|source| SettingsError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load, falling back to defaults on a missing or unreadable file
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let io_err = |source: std::io::Error| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_vec_pretty(self).map_err(|source| SettingsError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(io_err)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.range, NumberRange::Twenty);
        assert_eq!(settings.operation, OperationMode::Mixed);
        assert_eq!(settings.seed, None);
        assert_eq!(settings.speed.base_play, 0.26);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            range: NumberRange::Hundred,
            operation: OperationMode::Subtraction,
            seed: Some(42),
            ..Default::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"range": "10", "speed": {"max_speed": 0.4}}"#).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.range, NumberRange::Ten);
        assert_eq!(settings.operation, OperationMode::Mixed);
        assert_eq!(settings.speed.max_speed, 0.4);
        assert_eq!(settings.speed.base_training, BASE_SPEED_TRAINING);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(Settings::load(&missing), Err(SettingsError::Io { .. })));

        let corrupt = dir.path().join("corrupt.json");
        fs::write(&corrupt, "{ not json").unwrap();
        assert!(matches!(Settings::load(&corrupt), Err(SettingsError::Json { .. })));
        assert_eq!(Settings::load_or_default(&corrupt), Settings::default());
    }

    #[test]
    fn test_speed_curve() {
        let curve = SpeedCurve::default();
        assert_eq!(curve.speed(SessionIntent::Play, 0), 0.26);
        assert_eq!(curve.speed(SessionIntent::Training, 0), 0.14);
        // Boost caps at 0.15 for play and 0.05 for training
        assert!((curve.speed(SessionIntent::Play, 100) - 0.41).abs() < 1e-6);
        assert!((curve.speed(SessionIntent::Training, 100) - 0.19).abs() < 1e-6);

        let fast = SpeedCurve {
            base_play: 0.5,
            ..Default::default()
        };
        assert_eq!(fast.speed(SessionIntent::Play, 100), MAX_SPEED);
    }
}
