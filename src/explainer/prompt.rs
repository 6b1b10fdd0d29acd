//! Prompt template for category explanations

use crate::dataset::{CategoryLevel, CategoryRecord};

/// Build the explanation prompt. All four indicators are written with three
/// decimals so the model sees exactly what the screen shows.
pub fn build_prompt(
    category_name: &str,
    demand: f64,
    supply: f64,
    cost: f64,
    score: f64,
    level: &CategoryLevel,
) -> String {
    format!(
        "You are a market analyst advising new e-commerce sellers.\n\
         \n\
         Product category: \"{category_name}\"\n\
         Classification: {level}\n\
         \n\
         Indicators (normalized, 0 to 1):\n\
         - Demand Index: {demand:.3} (buyer interest)\n\
         - Supply Index: {supply:.3} (supplier ecosystem health)\n\
         - Cost Index: {cost:.3} (entry affordability)\n\
         - Attractiveness Score: {score:.3} (40% demand, 30% supply, 30% cost)\n\
         \n\
         In a few short paragraphs, explain what these values mean for someone \
         considering this category, why it received this classification, and one \
         practical next step.",
        level = level.display_name(),
    )
}

pub fn build_prompt_for(record: &CategoryRecord) -> String {
    build_prompt(
        &record.category_name,
        record.demand_index,
        record.supply_index,
        record.cost_index,
        record.attractiveness_score,
        &record.category_level,
    )
}
