//! Math Dash entry point
//!
//! The native build runs a headless autoplay session and logs the result.
//! Usage: `math-dash [seed] [play|training]`

use std::env;
use std::error::Error;

use math_dash::sim::{GameEvent, SessionIntent};
use math_dash::{Runner, Settings};

/// Environment variable pointing at a settings JSON file
const SETTINGS_ENV: &str = "MATH_DASH_SETTINGS";
/// Simulated frame length (60 Hz display)
const FRAME_DT: f32 = 1.0 / 60.0;
/// Training never ends on its own; stop after this much simulated time
const MAX_DEMO_SECS: f32 = 300.0;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Math Dash (native) starting...");

    let settings = match env::var_os(SETTINGS_ENV) {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };

    let args: Vec<String> = env::args().skip(1).collect();
    let seed = args
        .first()
        .and_then(|s| s.parse::<u64>().ok())
        .or(settings.seed)
        .unwrap_or_else(rand::random);
    let intent = match args.get(1).map(|s| s.to_lowercase()).as_deref() {
        Some("training") => SessionIntent::Training,
        _ => SessionIntent::Play,
    };

    let mut runner = Runner::new(&settings, seed);
    runner.set_idle_mode(true);
    runner.session_mut().select_intent(intent);
    runner.session_mut().start_session()?;

    let mut elapsed = 0.0;
    while runner.session().is_active() && elapsed < MAX_DEMO_SECS {
        runner.update(FRAME_DT)?;
        elapsed += FRAME_DT;

        for event in runner.session_mut().drain_events() {
            match event {
                GameEvent::SolutionRevealed(text) => log::info!("{}", text),
                GameEvent::SessionEnded(result) => log::info!("Game over: {:?}", result),
                other => log::debug!("{:?}", other),
            }
        }
    }

    let session = runner.session();
    let stats = session.stats();
    log::info!(
        "Finished after {:.1}s ({} ticks): phase {:?}, score {}, {} correct, {} wrong",
        elapsed,
        runner.time_ticks(),
        session.phase(),
        session.score(),
        stats.correct,
        stats.wrong
    );
    Ok(())
}
