//! Logging setup
//!
//! With `QUOTEBOX_LOG=<level>` set, logs from both crates go to the
//! configured log file. Otherwise only warnings are written to stderr.

use std::fs::OpenOptions;

use tracing::info;
use tracing_subscriber::EnvFilter;

use quotebox_core::Config;

pub fn init(config: &Config) {
    let Ok(log_level) = std::env::var("QUOTEBOX_LOG") else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("quotebox_core=warn,quotebox_cli=warn"))
            .with_target(false)
            .without_time()
            .with_writer(std::io::stderr)
            .try_init();
        return;
    };

    let log_path = config.log_path();
    let log_file = match OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!(
        "quotebox_core={},quotebox_cli={}",
        log_level, log_level
    ));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("Logging initialized to {:?}", log_path);
}
