//! Application entry point for the 2D particle fluid viewer.
//!
//! This binary sets up logging and eframe/egui and delegates all
//! interactive logic and rendering to [`Viewer`] from the `viewer` module.
//!
//! Usage: `particle_fluid [config.json]`. The optional JSON file holds a
//! [`Config`]; missing fields take their defaults.

mod viewer;

use sim_core::config::Config;
use viewer::Viewer;

/// Reads a [`Config`] from a JSON file.
fn read_config(path: &str) -> Result<Config, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)?;
    let cfg: Config = serde_json::from_str(&text)?;
    cfg.validate()?;
    Ok(cfg)
}

/// Starts the native eframe application.
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if eframe fails to create the native window or event loop.
fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = match std::env::args().nth(1) {
        Some(path) => read_config(&path).unwrap_or_else(|e| {
            log::warn!("could not load config from {path}: {e}; using defaults");
            Config::default()
        }),
        None => Config::default(),
    };
    log::info!("starting particle fluid viewer with {cfg:?}");

    let options = eframe::NativeOptions::default();

    eframe::run_native(
        "2D Particle Fluid",
        options,
        Box::new(
            move |_cc| -> Result<Box<dyn eframe::App>, Box<dyn std::error::Error + Send + Sync>> {
                Ok(Box::new(Viewer::new(cfg)?))
            },
        ),
    )
}
