//! BreakBuddy - Eye-break reminder
//!
//! Lives in the system tray and, on a fixed schedule, covers the primary
//! display with a blurred full-screen break overlay and a countdown.

mod capture;
mod commands;
mod config;
mod dashboard;
mod error;
mod hotkey;
mod notifier;
mod overlay;
mod scheduler;
mod tray;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::AppConfig;
use crate::dashboard::StartupOptions;

/// BreakBuddy - Eye-break reminder
#[derive(Parser, Debug)]
#[command(name = "break-buddy")]
#[command(about = "Reminds you to rest your eyes with a timed full-screen break")]
struct Args {
    /// Minutes between breaks (overrides the config file)
    #[arg(short, long, value_name = "MIN")]
    interval: Option<i64>,

    /// Break length in seconds (overrides the config file)
    #[arg(short, long, value_name = "SEC")]
    duration: Option<i64>,

    /// Start protection immediately
    #[arg(long)]
    start: bool,

    /// Start with the window minimized
    #[arg(long)]
    minimized: bool,

    /// Use this configuration file instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write the default configuration to the config path and exit
    #[arg(long)]
    write_default_config: bool,
}

impl Args {
    /// Fold command-line overrides into the loaded configuration
    fn apply_to(&self, config: &mut AppConfig) {
        if let Some(interval) = self.interval {
            config.schedule.interval_minutes = interval;
        }
        if let Some(duration) = self.duration {
            config.schedule.break_duration_secs = duration;
        }
    }

    fn startup_options(&self, config: &AppConfig) -> StartupOptions {
        StartupOptions {
            start_protection: self.start || config.schedule.autostart,
            start_minimized: self.minimized || config.general.start_minimized,
        }
    }
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => config::default_config_path()?,
    };

    if args.write_default_config {
        config::save_config(&AppConfig::default(), &config_path)?;
        println!("Wrote default configuration to {}", config_path.display());
        return Ok(());
    }

    info!("BreakBuddy starting...");

    let mut config = config::load_or_default(&config_path);
    args.apply_to(&mut config);
    let startup = args.startup_options(&config);

    if let Err(e) = dashboard::run_dashboard(config, config_path, startup) {
        tracing::error!("Dashboard error: {}", e);
        return Err(anyhow::anyhow!("Failed to run BreakBuddy: {}", e));
    }

    info!("BreakBuddy shutdown complete");

    Ok(())
}
