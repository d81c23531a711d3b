//! Model inspection command

use anyhow::Result;
use tabled::{settings::Style, Table, Tabled};

use crate::client::{ApiClient, ModelInfo};
use crate::output::OutputFormat;

/// Row for the required-features table
#[derive(Tabled)]
struct FeatureRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "Feature")]
    feature: String,
}

/// Show the loaded model artifact
pub async fn run(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let info: ModelInfo = client.get("api/v1/model").await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        OutputFormat::Table => {
            println!("Model version: {}", info.version);
            println!("Classes:       {}", info.classes.join(", "));
            println!();

            let rows: Vec<FeatureRow> = info
                .features
                .iter()
                .enumerate()
                .map(|(index, feature)| FeatureRow {
                    position: index + 1,
                    feature: feature.clone(),
                })
                .collect();

            let table = Table::new(rows).with(Style::rounded()).to_string();
            println!("{}", table);
            println!("\nTotal: {} required features", info.features.len());
        }
    }

    Ok(())
}
