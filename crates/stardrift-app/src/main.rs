//! Stardrift: an animated deep-space backdrop.
//!
//! Run with: `cargo run -p stardrift-app`, or `-- --headless 600` for an
//! offscreen simulation run.

use clap::Parser;
use stardrift_app::{PlatformDirs, run_headless, window};
use stardrift_config::{CliArgs, Config};
use tracing::{error, info, warn};

fn main() {
    let args = CliArgs::parse();

    let dirs = match &args.config {
        Some(root) => Some(PlatformDirs::resolve_with_root(root)),
        None => PlatformDirs::resolve().ok(),
    };
    let dir_error = dirs.as_ref().and_then(|d| d.create_dirs().err());

    let loaded = match &dirs {
        Some(d) => Config::load_or_create(&d.config_dir),
        None => Ok(Config::default()),
    };
    let (mut config, config_error) = match loaded {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    config.apply_cli_overrides(&args);

    stardrift_log::init_logging(
        dirs.as_ref().map(|d| d.log_dir.as_path()),
        cfg!(debug_assertions),
        Some(&config),
    );

    if let Some(e) = dir_error {
        warn!("Could not create app directories: {e}");
    }
    if let Some(e) = config_error {
        warn!("Using default config: {e}");
    }
    if let Some(d) = &dirs {
        info!("Config dir: {}", d.config_dir.display());
    }

    if let Some(frames) = args.headless {
        let report = run_headless(&config, frames);
        info!(
            "Headless: {} frames, {} spawned, {} expired, peak {} active, group z {:.1} (seed {})",
            report.frames,
            report.spawns,
            report.expirations,
            report.peak_active,
            report.final_group_z,
            report.seed
        );
        return;
    }

    info!(
        "Window: {}x{} | Title: {}",
        config.window.width, config.window.height, config.window.title
    );
    if let Err(e) = window::run_with_config(config) {
        error!("Event loop failed: {e}");
    }
}
