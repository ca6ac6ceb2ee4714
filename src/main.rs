//! nids-insight entrypoint: `serve` runs the upload/query service,
//! `predict` classifies the records of one CSV file and exits.

use clap::{Parser, Subcommand};
use nids_insight::{
    config::AppConfig,
    logging::{PredictionLine, StructuredLogger},
    model::run_prediction,
    records::RecordSet,
    server::{self, AppState},
};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "nids-insight", version, about)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true, env = "NIDS_CONFIG_PATH", default_value = "config.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP upload/query service
    Serve {
        /// Listen address, overrides `server.bind`
        #[arg(long)]
        bind: Option<String>,
    },
    /// Classify every record of a CSV file with the configured model
    Predict {
        /// CSV file to classify
        csv: PathBuf,
    },
}

fn serve(mut config: AppConfig, bind: Option<String>) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if let Some(bind) = bind {
        config.server.bind = bind;
    }

    let (stop_tx, mut stop_rx) = tokio::sync::watch::channel(false);
    ctrlc::set_handler(move || {
        let _ = stop_tx.send(true);
    })?;
    let shutdown = async move {
        let _ = stop_rx.wait_for(|stop| *stop).await;
        info!("shutdown requested");
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(server::serve(&config.server, AppState::default(), shutdown))?;
    Ok(())
}

fn predict(config: &AppConfig, csv: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!(path = %csv.display(), model = %config.model.path.display(), "predict");
    let records = RecordSet::from_path(csv)?;
    let labels = run_prediction(config, records)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for (row, label) in labels.iter().enumerate() {
        StructuredLogger::emit_json(&PredictionLine { row, label: label.as_str() }, &mut out)?;
    }
    out.flush()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config)?;

    StructuredLogger::init(config.log.json, &config.log.level);
    info!(config = %cli.config.display(), "nids-insight starting");

    match cli.command {
        Command::Serve { bind } => serve(config, bind),
        Command::Predict { csv } => predict(&config, &csv),
    }
}
