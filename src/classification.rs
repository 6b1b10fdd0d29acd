//! Level → symbol and recommendation lookup
//!
//! Everything here is a pure table lookup keyed by [`CategoryLevel`]; unknown
//! levels resolve to a neutral fallback entry instead of failing.

use serde::Serialize;

use crate::dataset::CategoryLevel;

pub const SYMBOL_HIGHLY_ATTRACTIVE: &str = "🟢";
pub const SYMBOL_ATTRACTIVE: &str = "🟡";
pub const SYMBOL_MODERATE: &str = "🟠";
pub const SYMBOL_NOT_ATTRACTIVE: &str = "🔴";
pub const SYMBOL_NEUTRAL: &str = "⚪";

/// Canned recommendation block for one level
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub symbol: &'static str,
    pub headline: &'static str,
    pub points: &'static [&'static str],
    pub verdict: &'static str,
}

impl Recommendation {
    /// Render as the fixed multi-line markdown block shown on screen
    pub fn render(&self) -> String {
        let mut out = format!("**{} {}**\n", self.symbol, self.headline);
        for point in self.points {
            out.push_str("- ");
            out.push_str(point);
            out.push('\n');
        }
        out.push_str("**");
        out.push_str(self.verdict);
        out.push_str("**");
        out
    }
}

static HIGHLY_ATTRACTIVE: Recommendation = Recommendation {
    symbol: SYMBOL_HIGHLY_ATTRACTIVE,
    headline: "Excellent Market Opportunity",
    points: &["High demand", "Stable supply chain", "Low entry cost"],
    verdict: "A strong category for beginners—especially with high-quality, well-reviewed products.",
};

static ATTRACTIVE: Recommendation = Recommendation {
    symbol: SYMBOL_ATTRACTIVE,
    headline: "Good Market Potential",
    points: &["Demand is solid", "Entry costs are reasonable"],
    verdict: "Suitable for entry, but requires careful product selection due to competition.",
};

static MODERATE: Recommendation = Recommendation {
    symbol: SYMBOL_MODERATE,
    headline: "Moderate Market Potential",
    points: &["Demand is not weak", "Supply is moderate"],
    verdict: "Fits more experienced sellers—not ideal for new beginners.",
};

static NOT_ATTRACTIVE: Recommendation = Recommendation {
    symbol: SYMBOL_NOT_ATTRACTIVE,
    headline: "Low Market Potential",
    points: &["Low demand", "Fewer suppliers", "Higher entry cost"],
    verdict: "Better to avoid this category until a clearer strategy exists.",
};

static UNCLASSIFIED: Recommendation = Recommendation {
    symbol: SYMBOL_NEUTRAL,
    headline: "Classification Unavailable",
    points: &["The dataset does not assign a recognised level to this category"],
    verdict: "Review the indicator values directly before making a decision.",
};

/// Display glyph for a level
pub fn symbol_for(level: &CategoryLevel) -> &'static str {
    recommendation_for(level).symbol
}

/// Fixed recommendation for a level, with a neutral fallback
pub fn recommendation_for(level: &CategoryLevel) -> &'static Recommendation {
    match level {
        CategoryLevel::HighlyAttractive => &HIGHLY_ATTRACTIVE,
        CategoryLevel::Attractive => &ATTRACTIVE,
        CategoryLevel::Moderate => &MODERATE,
        CategoryLevel::NotAttractive => &NOT_ATTRACTIVE,
        CategoryLevel::Unknown(_) => &UNCLASSIFIED,
    }
}

/// The four indicators shown for a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Metric {
    Demand,
    Supply,
    Cost,
    Attractiveness,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Demand,
        Metric::Supply,
        Metric::Cost,
        Metric::Attractiveness,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Metric::Demand => "Demand Index",
            Metric::Supply => "Supply Index",
            Metric::Cost => "Cost Index",
            Metric::Attractiveness => "Attractiveness Score",
        }
    }
}

/// Tooltip text for an indicator
pub fn metric_help(metric: Metric) -> &'static str {
    match metric {
        Metric::Demand => {
            "Normalized buyer interest in the category (0–1). Higher means stronger demand."
        }
        Metric::Supply => {
            "Normalized health of the supplier ecosystem (0–1). Higher means more available suppliers."
        }
        Metric::Cost => {
            "Normalized entry affordability (0–1). Higher means cheaper to enter."
        }
        Metric::Attractiveness => {
            "Weighted combination: 40% demand, 30% supply, 30% cost."
        }
    }
}
