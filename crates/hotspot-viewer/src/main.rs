//! Hotspot Viewer - native launcher
//!
//! Opens the viewer in a desktop window. Assets are resolved relative to the
//! working directory.

#[cfg(not(target_arch = "wasm32"))]
use anyhow::Result;
#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;
#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;
#[cfg(not(target_arch = "wasm32"))]
use tracing::{info, Level};
#[cfg(not(target_arch = "wasm32"))]
use tracing_subscriber::FmtSubscriber;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
#[command(name = "hotspot-viewer")]
#[command(about = "Orbit a glTF model with an occlusion-aware hotspot")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "hotspot-viewer.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Write the default configuration to the config path and exit
    #[arg(long)]
    write_default_config: bool,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Hotspot Viewer v{}", env!("CARGO_PKG_VERSION"));

    if args.write_default_config {
        hotspot_core::save_default_config(&args.config)?;
        info!(path = %args.config.display(), "Default configuration written");
        return Ok(());
    }

    let config = hotspot_core::load_config(&args.config)?;

    info!(
        model = %config.model.path,
        environment = %config.environment.path,
        "Configuration loaded"
    );

    hotspot_viewer::app::run(config);
    Ok(())
}

// The web build starts from the library's wasm entry point instead
#[cfg(target_arch = "wasm32")]
fn main() {}
