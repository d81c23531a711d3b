//! Prediction command

use anyhow::Result;

use crate::client::{ApiClient, PredictRequest, Prediction};
use crate::output::{color_category, format_timestamp, OutputFormat};
use crate::PredictArgs;

/// Request a prediction and print the result
pub async fn run(client: &ApiClient, args: &PredictArgs, format: OutputFormat) -> Result<()> {
    let request = PredictRequest {
        gender: args.gender.clone(),
        age: args.age,
        height_m: args.height,
        weight_kg: args.weight,
        family_history: args.family_history.clone(),
        high_calorie_food: args.high_calorie_food.clone(),
        vegetable_consumption: args.vegetables,
        main_meals: args.meals,
        snacking: args.snacking.clone(),
        smokes: args.smokes.clone(),
        water_intake: args.water,
        calorie_monitoring: args.calorie_monitoring.clone(),
        physical_activity: args.activity,
        screen_time: args.screen_time,
        alcohol: args.alcohol.clone(),
        transport: args.transport.clone(),
    };

    let prediction: Prediction = client.post("api/v1/predict", &request).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&prediction)?);
        }
        OutputFormat::Table => {
            println!(
                "Category:      {}",
                color_category(&prediction.predicted_label, &prediction.category)
            );
            println!("Class label:   {}", prediction.predicted_label);
            println!("Model version: {}", prediction.model_version);
            println!(
                "Generated at:  {}",
                format_timestamp(prediction.generated_at)
            );
        }
    }

    Ok(())
}
