//! Structured screen model handed to the presentation layer

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::classification::{Metric, metric_help, recommendation_for, symbol_for};
use crate::dataset::{CategoryRecord, Dataset};
use crate::explainer::FailureKind;
use crate::session::{ScreenState, SessionState};

pub const TITLE: &str = "Market Attractiveness Evaluation";
pub const SUBTITLE: &str = "A data-driven evaluation of market category attractiveness based on demand, supply, and cost indicators";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorView {
    pub label: &'static str,
    pub value: String,
    pub help: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BannerView {
    pub symbol: &'static str,
    pub level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedView {
    pub category: String,
    pub indicators: Vec<IndicatorView>,
    pub banner: BannerView,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExplanationArea {
    Idle,
    Loading,
    Result {
        text: String,
        received_at: DateTime<Utc>,
    },
    Error {
        kind: FailureKind,
        message: &'static str,
        detail: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenView {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub categories: Vec<String>,
    pub selected: Option<SelectedView>,
    pub explanation: ExplanationArea,
    pub warning: Option<String>,
}

impl SelectedView {
    pub fn from_record(record: &CategoryRecord) -> Self {
        let indicators = Metric::ALL
            .iter()
            .map(|&metric| {
                let value = match metric {
                    Metric::Demand => record.demand_index,
                    Metric::Supply => record.supply_index,
                    Metric::Cost => record.cost_index,
                    Metric::Attractiveness => record.attractiveness_score,
                };
                IndicatorView {
                    label: metric.label(),
                    value: format!("{:.3}", value),
                    help: metric_help(metric),
                }
            })
            .collect();

        Self {
            category: record.category_name.clone(),
            indicators,
            banner: BannerView {
                symbol: symbol_for(&record.category_level),
                level: record.category_level.display_name().to_string(),
            },
            recommendation: recommendation_for(&record.category_level).render(),
        }
    }

    pub fn indicator(&self, label: &str) -> Option<&str> {
        self.indicators
            .iter()
            .find(|i| i.label == label)
            .map(|i| i.value.as_str())
    }
}

impl ExplanationArea {
    fn from_state(state: &ScreenState) -> Self {
        match state {
            ScreenState::NoSelection | ScreenState::Selected { .. } => ExplanationArea::Idle,
            ScreenState::ExplanationPending { .. } => ExplanationArea::Loading,
            ScreenState::ExplanationShown {
                text, received_at, ..
            } => ExplanationArea::Result {
                text: text.clone(),
                received_at: *received_at,
            },
            ScreenState::ExplanationFailed { kind, message, .. } => ExplanationArea::Error {
                kind: *kind,
                message: kind.user_message(),
                detail: message.clone(),
            },
        }
    }
}

impl ScreenView {
    /// Recompute the whole screen from the dataset and session
    pub fn build(dataset: &Dataset, session: &SessionState) -> Self {
        let selected = session
            .state
            .category()
            .and_then(|c| dataset.get_record(c))
            .map(SelectedView::from_record);

        let explanation = if selected.is_some() {
            ExplanationArea::from_state(&session.state)
        } else {
            ExplanationArea::Idle
        };

        Self {
            title: TITLE,
            subtitle: SUBTITLE,
            categories: dataset.list_categories(),
            selected,
            explanation,
            warning: session.warning.clone(),
        }
    }

    /// Plain-text rendering for non-interactive output
    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ScreenView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", self.subtitle)?;
        writeln!(f)?;

        match &self.selected {
            None => writeln!(f, "No category selected.")?,
            Some(sel) => {
                writeln!(f, "Category Results: {}", sel.category)?;
                for ind in &sel.indicators {
                    writeln!(f, "  {:<22} {}", ind.label, ind.value)?;
                }
                writeln!(
                    f,
                    "\nFinal Classification: {} {}",
                    sel.banner.symbol, sel.banner.level
                )?;
                writeln!(f, "\nStrategic Recommendations\n{}", sel.recommendation)?;
            }
        }

        match &self.explanation {
            ExplanationArea::Idle => {}
            ExplanationArea::Loading => writeln!(f, "\nExplanation: loading…")?,
            ExplanationArea::Result { text, .. } => writeln!(f, "\nExplanation\n{}", text)?,
            ExplanationArea::Error {
                message, detail, ..
            } => writeln!(f, "\nExplanation failed: {}\n  ({})", message, detail)?,
        }

        if let Some(warning) = &self.warning {
            writeln!(f, "\n⚠ {}", warning)?;
        }
        Ok(())
    }
}
