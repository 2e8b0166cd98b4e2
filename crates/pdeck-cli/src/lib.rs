#![forbid(unsafe_code)]

//! Host application for ProofDeck.
//!
//! Mounts the proof view over [`demo_engine::DemoEngine`], replays a gesture
//! script through the real gesture recognizer and prints each frame.

pub mod cli;
pub mod demo_engine;
pub mod error;
pub mod prop;
pub mod run;
pub mod script;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "PDECK_LOG";

/// Install the stderr subscriber. Frames go to stdout, so logs never mix
/// with them. Does nothing if a subscriber is already set.
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
