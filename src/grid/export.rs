use chrono::{
    DateTime,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};

use crate::core::{
    GridConfig,
    KanjiGridError,
    UnitMap,
};

/// Machine-readable snapshot of an aggregation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Export {
    pub generated_at: DateTime<Utc>,
    pub config: GridConfig,
    pub units: UnitMap,
}

impl Export {
    pub fn new(units: &UnitMap, config: &GridConfig) -> Self {
        Self { generated_at: Utc::now(), config: config.clone(), units: units.clone() }
    }

    pub fn to_json(&self) -> Result<String, KanjiGridError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, KanjiGridError> {
        Ok(serde_json::from_str(json)?)
    }
}
