//! Error types

use std::path::PathBuf;

use thiserror::Error;

/// Task generation failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    /// The range is too narrow to hold three distinct answers
    #[error("could not find three distinct answers in 0..={max} after {attempts} attempts")]
    CandidateExhausted { max: i32, attempts: u32 },
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
