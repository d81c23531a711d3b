//! Obesity Level Predictor CLI
//!
//! A command-line client for requesting weight-status predictions and
//! inspecting the prediction service's model and health state.

mod client;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use commands::{health, model, predict};

/// Obesity Level Predictor CLI
#[derive(Parser)]
#[command(name = "olp")]
#[command(author, version, about = "CLI for the Obesity Level Predictor", long_about = None)]
pub struct Cli {
    /// API endpoint URL (can also be set via OLP_API_URL env var or the
    /// config file; defaults to http://localhost:8080)
    #[arg(long, env = "OLP_API_URL")]
    pub api_url: Option<String>,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Request a weight-status prediction
    Predict(PredictArgs),

    /// Show the loaded model artifact (version, features, classes)
    Model,

    /// Show service health and readiness
    Health,
}

/// Form fields for a prediction request.
///
/// Categorical options take the localized values the form presents
/// ("Feminino", "Sim", "Às vezes", ...); the service owns the translation
/// into the model vocabulary.
#[derive(Args)]
pub struct PredictArgs {
    /// Gender: Feminino | Masculino
    #[arg(long)]
    pub gender: String,

    /// Age in years (14-61)
    #[arg(long)]
    pub age: u32,

    /// Height in meters (1.40-2.00)
    #[arg(long)]
    pub height: f32,

    /// Weight in kilograms (30-200)
    #[arg(long)]
    pub weight: f32,

    /// Family history of overweight: Sim | Não
    #[arg(long, default_value = "Não")]
    pub family_history: String,

    /// Frequent high-calorie food consumption: Sim | Não
    #[arg(long, default_value = "Não")]
    pub high_calorie_food: String,

    /// Vegetable consumption scale (1-3)
    #[arg(long, default_value_t = 2)]
    pub vegetables: u8,

    /// Main meals per day (1-4)
    #[arg(long, default_value_t = 3)]
    pub meals: u8,

    /// Snacking between meals: Nunca | Às vezes | Frequentemente | Sempre
    #[arg(long, default_value = "Às vezes")]
    pub snacking: String,

    /// Smokes: Sim | Não
    #[arg(long, default_value = "Não")]
    pub smokes: String,

    /// Daily water intake scale (1-3)
    #[arg(long, default_value_t = 2)]
    pub water: u8,

    /// Monitors calorie intake: Sim | Não
    #[arg(long, default_value = "Não")]
    pub calorie_monitoring: String,

    /// Physical activity days per week (0-3)
    #[arg(long, default_value_t = 1)]
    pub activity: u8,

    /// Daily screen time scale (0-2)
    #[arg(long, default_value_t = 1)]
    pub screen_time: u8,

    /// Alcohol consumption: Nunca | Às vezes | Frequentemente | Sempre
    #[arg(long, default_value = "Nunca")]
    pub alcohol: String,

    /// Usual transport: Carro | Moto | Bicicleta | Transporte público | A pé
    #[arg(long, default_value = "Transporte público")]
    pub transport: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let api_url = config::resolve_api_url(cli.api_url.clone())?;
    let client = client::ApiClient::new(&api_url)?;

    match cli.command {
        Commands::Predict(args) => predict::run(&client, &args, cli.format).await?,
        Commands::Model => model::run(&client, cli.format).await?,
        Commands::Health => health::run(&client, cli.format).await?,
    }

    Ok(())
}
