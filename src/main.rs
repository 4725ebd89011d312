use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use clap::Parser;

use cellbroadcast::{init_logging, run_script, App, AppConfig, BUILD_DATE, VERSION};

#[derive(Debug, Parser)]
#[command(name = "cellbroadcast")]
#[command(about = "Replay device events and settings edits through the cell broadcast subsystem")]
struct Args {
    /// Config file (.toml or .json); defaults to the platform config directory
    #[arg(long)]
    config: Option<PathBuf>,

    /// Preference file, overriding the config
    #[arg(long)]
    preferences: Option<PathBuf>,

    /// Enable developer options
    #[arg(long)]
    developer: bool,

    /// Script of JSON steps, one per line; reads stdin when absent
    #[arg(long)]
    script: Option<PathBuf>,
}

// Multi-threaded so the log tasks run while the script blocks on stdin
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;
    let args = Args::parse();
    tracing::info!("cellbroadcast {} ({})", VERSION, BUILD_DATE);

    let config_path = match args.config {
        Some(path) => path,
        None => AppConfig::default_path()?,
    };
    let mut config = AppConfig::load_or_default(&config_path)?;
    if let Some(path) = args.preferences {
        config.preferences_path = Some(path);
    }
    if args.developer {
        config.developer_settings_enabled = true;
    }

    let (mut app, outbound) = App::open(&config)?;
    let log = outbound.spawn_log();

    let stdout = io::stdout();
    let summary = match args.script {
        Some(path) => run_script(&mut app, BufReader::new(File::open(path)?), stdout.lock())?,
        None => run_script(&mut app, io::stdin().lock(), stdout.lock())?,
    };

    // Closes the outbound channels so the tasks drain and finish
    drop(app);
    let configured = log.radio.await?;
    let forwarded = log.alerts.await?;

    tracing::info!(
        "{} steps, {} errors, {} commands, {} alerts",
        summary.steps,
        summary.errors,
        configured,
        forwarded
    );
    Ok(())
}
