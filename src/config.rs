use std::env;
use std::path::PathBuf;

use crate::error::{CatalogError, Result};

pub const DEFAULT_PORT: u16 = 5001;
pub const DEFAULT_SERVE_DIR: &str = "files";

/// Runtime configuration, read from the environment. A `.env` file is loaded
/// at startup, so both real env vars and dotenv entries work. Defaults match
/// the legacy deployment: port 5001, a `files/` directory next to the
/// working directory.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub serve_dir: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|e| {
                CatalogError::Config(format!("Invalid PORT value '{raw}': {e}"))
            })?,
            Err(_) => DEFAULT_PORT,
        };
        let serve_dir = env::var("SERVE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SERVE_DIR));

        Ok(Config { port, serve_dir })
    }
}
