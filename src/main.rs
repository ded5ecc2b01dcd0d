mod audio;
mod cli;
mod config;
mod models;
mod notify;
mod prayer_times;
mod tui;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;

use cli::args::{Cli, Commands};
use cli::handlers;
use config::{AppConfig, SettingsStore};
use prayer_times::{AladhanClient, Clock, SystemClock, TimingsSource};

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = AppConfig::load().context("Loading config")?;

    AppConfig::ensure_data_dir()?;
    let mut store = SettingsStore::open(AppConfig::settings_path()?);

    match cli.command {
        Some(Commands::Setup) => {
            handlers::handle_setup(&mut config)?;
        }

        Some(cmd) => {
            ensure_setup(&mut config)?;
            match cmd {
                Commands::Times => {
                    let source = open_source(&config)?;
                    handlers::handle_times(&config, &store, source, SystemClock.now())?;
                }
                Commands::Next => {
                    let source = open_source(&config)?;
                    handlers::handle_next(&config, &store, source, SystemClock.now())?;
                }
                Commands::Settings { action } => {
                    handlers::handle_settings(&mut store, action.as_ref())?;
                }
                Commands::Preview { voice } => {
                    handlers::handle_preview(&config, &voice)?;
                }
                Commands::Setup => unreachable!(),
            }
        }

        // No subcommand → launch TUI
        None => {
            ensure_setup(&mut config)?;
            let source = open_source(&config)?;
            let audio = audio::open_session(config.audio.volume);
            let armed = cli.arm || config.audio.auto_arm;
            tui::app::run(config, store, source, audio, armed)?;
        }
    }

    Ok(())
}

fn open_source(config: &AppConfig) -> Result<Arc<dyn TimingsSource>> {
    let client = AladhanClient::new(&config.api).context("Building HTTP client")?;
    Ok(Arc::new(client))
}

/// Run the wizard once if no config file has been written yet.
fn ensure_setup(config: &mut AppConfig) -> Result<()> {
    if !AppConfig::config_path()?.exists() {
        eprintln!("No configuration found. Running setup...");
        eprintln!();
        handlers::handle_setup(config)?;
    }
    Ok(())
}
