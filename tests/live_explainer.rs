#![cfg(feature = "live_explainer")]

//! Calls the real completion endpoint. Needs OPENAI_API_KEY; run with
//! `--features live_explainer`.

use std::sync::Arc;

use market_lens::config::Config;
use market_lens::session::ScreenState;
use market_lens::{Dataset, OpenAiExplainer, ScreenController};

const DATASET: &str = "Category_Main,Demand_Index,Supply_Index,Cost_Index,Attractiveness,Category_Level\n\
                       Pet Supplies,0.812,0.64,0.53,0.701,Attractive\n";

#[tokio::test]
async fn test_live_explanation_for_pet_supplies() {
    let config = Config::load().expect("Failed to load config");
    if config.explainer.api_key.is_none() {
        eprintln!("OPENAI_API_KEY not set, skipping live explainer test");
        return;
    }

    let dataset = Arc::new(Dataset::from_reader(DATASET.as_bytes()).unwrap());
    let explainer = OpenAiExplainer::new(&config.explainer).expect("Failed to build client");
    let mut controller = ScreenController::new(dataset, explainer);
    controller.select("Pet Supplies").unwrap();

    assert!(controller.request_explanation().await);
    match controller.state() {
        ScreenState::ExplanationShown { text, .. } => assert!(!text.trim().is_empty()),
        other => panic!("expected an explanation, got {other:?}"),
    }
}
