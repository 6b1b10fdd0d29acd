//! Category dataset loading and lookup
//!
//! The dataset is a CSV export with one row per top-level product category.
//! Indicator values are consumed verbatim; nothing here recomputes them.

use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{MarketError, Result};

pub const COL_CATEGORY: &str = "Category_Main";
pub const COL_DEMAND: &str = "Demand_Index";
pub const COL_SUPPLY: &str = "Supply_Index";
pub const COL_COST: &str = "Cost_Index";
pub const COL_SCORE: &str = "Attractiveness";
pub const COL_LEVEL: &str = "Category_Level";

/// Columns that must be present in the header row
pub const REQUIRED_COLUMNS: [&str; 6] = [
    COL_CATEGORY,
    COL_DEMAND,
    COL_SUPPLY,
    COL_COST,
    COL_SCORE,
    COL_LEVEL,
];

/// Minimum Jaro-Winkler similarity for a "did you mean" suggestion
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Classification derived upstream from the attractiveness score.
///
/// Unrecognised labels are kept as `Unknown` with the raw text so the screen
/// can still show what the dataset said.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum CategoryLevel {
    HighlyAttractive,
    Attractive,
    Moderate,
    NotAttractive,
    Unknown(String),
}

impl CategoryLevel {
    /// Parse a raw dataset label. Never fails.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "Highly Attractive" | "HighlyAttractive" => CategoryLevel::HighlyAttractive,
            "Attractive" => CategoryLevel::Attractive,
            "Moderate" => CategoryLevel::Moderate,
            "Not Attractive" | "NotAttractive" => CategoryLevel::NotAttractive,
            other => CategoryLevel::Unknown(other.to_string()),
        }
    }

    /// Human-readable label as it appears in the dataset
    pub fn display_name(&self) -> &str {
        match self {
            CategoryLevel::HighlyAttractive => "Highly Attractive",
            CategoryLevel::Attractive => "Attractive",
            CategoryLevel::Moderate => "Moderate",
            CategoryLevel::NotAttractive => "Not Attractive",
            CategoryLevel::Unknown(raw) if raw.is_empty() => "Unknown",
            CategoryLevel::Unknown(raw) => raw.as_str(),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, CategoryLevel::Unknown(_))
    }
}

impl fmt::Display for CategoryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl From<String> for CategoryLevel {
    fn from(raw: String) -> Self {
        CategoryLevel::parse(&raw)
    }
}

impl From<CategoryLevel> for String {
    fn from(level: CategoryLevel) -> Self {
        match level {
            CategoryLevel::Unknown(raw) => raw,
            known => known.display_name().to_string(),
        }
    }
}

/// One row of the dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub category_name: String,
    pub demand_index: f64,
    pub supply_index: f64,
    pub cost_index: f64,
    pub attractiveness_score: f64,
    pub category_level: CategoryLevel,
}

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Category_Main")]
    category_main: String,
    #[serde(rename = "Demand_Index")]
    demand_index: f64,
    #[serde(rename = "Supply_Index")]
    supply_index: f64,
    #[serde(rename = "Cost_Index")]
    cost_index: f64,
    #[serde(rename = "Attractiveness")]
    attractiveness: f64,
    #[serde(rename = "Category_Level", default)]
    category_level: Option<String>,
}

impl From<RawRow> for CategoryRecord {
    fn from(row: RawRow) -> Self {
        Self {
            category_name: row.category_main,
            demand_index: row.demand_index,
            supply_index: row.supply_index,
            cost_index: row.cost_index,
            attractiveness_score: row.attractiveness,
            category_level: CategoryLevel::parse(row.category_level.as_deref().unwrap_or("")),
        }
    }
}

/// Immutable, in-memory dataset keyed by category name
#[derive(Debug, Clone)]
pub struct Dataset {
    records: BTreeMap<String, CategoryRecord>,
}

impl Dataset {
    /// Load and index a CSV file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let label = path.display().to_string();
        let file = std::fs::File::open(path)
            .map_err(|e| MarketError::data_load(&label, format!("cannot open file: {}", e)))?;
        let dataset = Self::parse(file, &label)?;
        info!("Loaded {} categories from {}", dataset.len(), label);
        Ok(dataset)
    }

    /// Parse CSV content from any reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::parse(reader, "<reader>")
    }

    fn parse<R: Read>(reader: R, label: &str) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr
            .headers()
            .map_err(|e| MarketError::data_load(label, format!("unreadable header: {}", e)))?
            .clone();

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|col| !headers.iter().any(|h| h == *col))
            .collect();
        if !missing.is_empty() {
            return Err(MarketError::data_load(
                label,
                format!("missing required columns: {}", missing.join(", ")),
            ));
        }

        let mut records = BTreeMap::new();
        for result in rdr.records() {
            let record = result
                .map_err(|e| MarketError::data_load(label, format!("malformed row: {}", e)))?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            let row: RawRow = record
                .deserialize(Some(&headers))
                .map_err(|e| MarketError::data_load(label, format!("line {}: {}", line, e)))?;

            if row.category_main.is_empty() {
                return Err(MarketError::data_load(
                    label,
                    format!("line {}: empty {}", line, COL_CATEGORY),
                ));
            }

            let record = CategoryRecord::from(row);
            if !record.category_level.is_known() {
                debug!(
                    "Category '{}' has unrecognised level '{}'",
                    record.category_name, record.category_level
                );
            }
            if records.contains_key(&record.category_name) {
                return Err(MarketError::data_load(
                    label,
                    format!(
                        "line {}: duplicate {} '{}'",
                        line, COL_CATEGORY, record.category_name
                    ),
                ));
            }
            records.insert(record.category_name.clone(), record);
        }

        Ok(Self { records })
    }

    /// Distinct category names, ascending
    pub fn list_categories(&self) -> Vec<String> {
        self.records.keys().cloned().collect()
    }

    /// Exact-key lookup; `None` means the category is not in the dataset
    pub fn get_record(&self, category_name: &str) -> Option<&CategoryRecord> {
        self.records.get(category_name)
    }

    pub fn records(&self) -> impl Iterator<Item = &CategoryRecord> {
        self.records.values()
    }

    /// Closest category name to a missed lookup, if any is reasonably close
    pub fn suggest(&self, input: &str) -> Option<&str> {
        let needle = input.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.records
            .keys()
            .map(|name| (name, strsim::jaro_winkler(&needle, &name.to_lowercase())))
            .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

static SHARED: OnceCell<Arc<Dataset>> = OnceCell::new();

/// Load the dataset once per process and hand out the shared handle.
///
/// Only the first successful call reads `path`; later calls get the cached
/// handle regardless of the path they pass.
pub fn load_shared(path: impl AsRef<Path>) -> Result<Arc<Dataset>> {
    SHARED
        .get_or_try_init(|| Dataset::load(path).map(Arc::new))
        .cloned()
}
