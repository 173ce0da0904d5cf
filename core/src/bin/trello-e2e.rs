use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use trello_core::{BoardScenario, Config, ConfigError};

const DEFAULT_CONFIG: &str = "trello.toml";

fn load_config() -> Result<Config, ConfigError> {
    let explicit = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("TRELLO_CONFIG").ok())
        .map(PathBuf::from);
    match explicit {
        Some(path) => Config::load(path),
        None if Path::new(DEFAULT_CONFIG).exists() => Config::load(DEFAULT_CONFIG),
        None => Config::from_env(),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "configuration failed");
            return ExitCode::FAILURE;
        }
    };
    info!(base_url = config.base_url(), "starting board lifecycle");

    let mut scenario = BoardScenario::new(&config);
    match scenario.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "board lifecycle failed");
            ExitCode::FAILURE
        }
    }
}
