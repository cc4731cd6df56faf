use serde::{Deserialize, Serialize};

use crate::shared::{DataError, Result};

/// Group-wide settings for one kind of competition.
///
/// Editions inherit these unless their store overrides them per edition.
///
/// Example JSON:
/// ```json
/// {
///   "short_name": "XMO",
///   "long_name": "Example Mathematical Olympiad",
///   "rank_top_n": 3,
///   "honourable_mentions_available": true
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GroupConfig {
    /// Abbreviated name, typically upper case
    pub short_name: String,

    /// Plural of the abbreviated name (default: short name + "s")
    pub short_name_plural: Option<String>,

    pub long_name: String,

    /// Whether official and unofficial countries are told apart
    pub distinguish_official: bool,

    /// Count only this many best contestants per country when ranking
    /// countries; `None` counts everyone
    pub rank_top_n: Option<u32>,

    pub honourable_mentions_available: bool,

    /// Description of the day contestant ages are taken at
    pub age_day_desc: Option<String>,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            short_name: "XMO".to_string(),
            short_name_plural: None,
            long_name: "Mathematical Olympiad".to_string(),
            distinguish_official: false,
            rank_top_n: None,
            honourable_mentions_available: true,
            age_day_desc: None,
        }
    }
}

impl GroupConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: GroupConfig =
            serde_json::from_str(json).map_err(|e| DataError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.short_name.trim().is_empty() {
            return Err(DataError::Config("short_name must not be empty".to_string()));
        }
        if self.rank_top_n == Some(0) {
            return Err(DataError::Config(
                "rank_top_n must be positive when set".to_string(),
            ));
        }
        Ok(())
    }

    pub fn short_name_plural(&self) -> String {
        self.short_name_plural
            .clone()
            .unwrap_or_else(|| format!("{}s", self.short_name))
    }
}
