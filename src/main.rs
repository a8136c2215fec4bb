use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use msx_catalog::catalog::{self, NO_FILTER};
use msx_catalog::config::Config;
use msx_catalog::kind::MediaKind;
use msx_catalog::logging;
use msx_catalog::server;

#[derive(Parser)]
#[command(name = "msx_catalog")]
#[command(about = "MSX game catalog server emulating the legacy PHP endpoint")]
#[command(version = "0.1.0")]
struct Cli {
    /// Port to listen on (overrides PORT from the environment)
    #[arg(long)]
    port: Option<u16>,

    /// Directory of ROM/DSK images to serve (overrides SERVE_DIR)
    #[arg(long)]
    dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    // Initialize logging
    logging::init_logging();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(dir) = cli.dir {
        config.serve_dir = dir;
    }

    info!(port = config.port, dir = %config.serve_dir.display(), "starting catalog server");
    println!("Serving directory: {}", config.serve_dir.display());

    // Startup pre-scan: report what the catalog will see, and warn early
    // when the directory is missing rather than failing the first request.
    if config.serve_dir.is_dir() {
        for kind in [MediaKind::Rom, MediaKind::Dsk] {
            match catalog::build_catalog(&config.serve_dir, kind, NO_FILTER) {
                Ok(entries) => {
                    println!("Found {} {} files in {}", entries.len(), kind, config.serve_dir.display());
                }
                Err(e) => {
                    warn!(%kind, error = %e, "startup scan failed");
                    println!("⚠️  Error scanning directory for {kind} files: {e}");
                }
            }
        }
    } else {
        warn!(dir = %config.serve_dir.display(), "serve directory not found");
        println!("⚠️  WARNING: {} directory not found!", config.serve_dir.display());
    }

    server::start_server(Arc::new(config)).await
}
