mod types;
mod error;
mod ml;
mod history;
mod config;
mod engine;
mod web;

use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use config::Settings;
use engine::PredictionEngine;
use history::CsvHistorySource;
use ml::ModelRegistry;
use types::Instrument;
use web::{start_server, AppState, PredictionResponse};

#[derive(Parser)]
#[command(name = "stock-signal-api")]
#[command(author = "Stock Signal API")]
#[command(version = "0.1.0")]
#[command(about = "Prediction serving API for daily stock trading signals", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the prediction API server
    Serve {
        /// Listen port (overrides the config file and PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Predict one stock and print the response JSON
    Predict {
        /// Stock name or alias, e.g. RELIANCE or "ADANI POWER"
        stock: String,
    },
    /// Query a running server and print a signal table for every stock
    Verify {
        /// Base URL of the server to query
        #[arg(short, long, default_value = "http://127.0.0.1:8000")]
        base_url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Stock Prediction API v0.1.0");

    match cli.command {
        Commands::Serve { port } => {
            let settings = load_settings(&cli.config)?;
            run_serve(settings, port).await?;
        }
        Commands::Predict { stock } => {
            let settings = load_settings(&cli.config)?;
            run_predict(settings, &stock).await?;
        }
        Commands::Verify { base_url } => {
            run_verify(&base_url).await?;
        }
    }

    Ok(())
}

fn load_settings(path: &str) -> Result<Settings> {
    let settings = Settings::load(path)?;
    if let Err(errors) = settings.validate() {
        return Err(anyhow!("Invalid configuration: {}", errors.join(", ")));
    }
    Ok(settings)
}

/// Builds the shared engine. The registry is loaded eagerly so a missing or
/// broken weight file fails startup instead of the first request.
fn build_engine(settings: &Settings) -> Result<Arc<PredictionEngine>> {
    let registry = ModelRegistry::load(Path::new(&settings.data.models_dir))?;
    info!(
        "Loaded {} models from {}",
        registry.len(),
        settings.data.models_dir
    );

    let history = CsvHistorySource::new(settings.data.data_dir.clone());

    Ok(Arc::new(PredictionEngine::new(
        Arc::new(registry),
        Arc::new(history),
        settings.signals,
    )))
}

/// Listen port precedence: --port flag, then the PORT variable hosting
/// platforms inject, then the config file.
fn resolve_port(cli_port: Option<u16>, settings: &Settings) -> u16 {
    if let Some(port) = cli_port {
        return port;
    }
    if let Ok(raw) = std::env::var("PORT") {
        match raw.parse() {
            Ok(port) => return port,
            Err(_) => warn!("Ignoring unparseable PORT value '{}'", raw),
        }
    }
    settings.server.port
}

async fn run_serve(settings: Settings, port_override: Option<u16>) -> Result<()> {
    let port = resolve_port(port_override, &settings);
    let engine = build_engine(&settings)?;
    let state = AppState::new(engine);

    start_server(state, &settings.server.host, port).await
}

async fn run_predict(settings: Settings, stock: &str) -> Result<()> {
    let engine = build_engine(&settings)?;

    let prediction = engine.predict(stock).await?;
    let response = PredictionResponse::from(prediction);
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}

async fn run_verify(base_url: &str) -> Result<()> {
    let client = reqwest::Client::builder().build()?;

    println!(
        "{:<10} | {:<10} | {:<10} | {:<10}",
        "Stock", "Price", "Return %", "Signal"
    );
    println!("{}", "-".repeat(50));

    for instrument in Instrument::all() {
        let url = format!("{}/predict?stock={}", base_url, instrument.symbol());
        match fetch_prediction(&client, &url).await {
            Ok(p) => {
                println!(
                    "{:<10} | {:<10} | {:>8.2}% | {:<10}",
                    p.stock,
                    p.current_price,
                    p.predicted_return * 100.0,
                    p.signal
                );
            }
            Err(e) => {
                println!("{:<10} | Error: {}", instrument.symbol(), e);
            }
        }
    }

    Ok(())
}

async fn fetch_prediction(client: &reqwest::Client, url: &str) -> Result<PredictionResponse> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        let body: serde_json::Value = response.json().await.unwrap_or_default();
        let detail = body["detail"].as_str().unwrap_or("unknown error");
        return Err(anyhow!("{} ({})", detail, status));
    }
    Ok(response.json::<PredictionResponse>().await?)
}
