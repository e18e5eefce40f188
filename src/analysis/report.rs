//! Structured analysis report
//!
//! The report is passed through from the model verbatim, so its two sections
//! are held as JSON values. The typed section structs describe the shape the
//! prompt asks for and are used to build the degraded placeholder.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Sentinel used for text fields of the degraded report
pub const DATA_UNAVAILABLE: &str = "Data unavailable.";

/// Research section of a report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Research {
    pub competitors: Vec<Competitor>,
    pub opportunity: String,
    pub market_trends: Vec<String>,
    pub market_share_insight: String,
}

/// A competitor entry; `market_share` is an advisory 0-100 percentage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Competitor {
    pub name: String,
    pub market_share: f64,
    pub target_audience: String,
    pub marketing_strategy: String,
}

/// Strategy section of a report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Strategy {
    pub viability_score: u8,
    pub risk_analysis: String,
    pub roadmap: Vec<String>,
    pub summary: String,
    pub business_models: Vec<String>,
    pub user_acquisition: Vec<String>,
    pub target_users: String,
    pub financials: Financials,
    pub demographics: Demographics,
    pub swot: Swot,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Financials {
    pub revenue_per_user: String,
    pub min_investment: String,
    pub break_even: String,
    pub user_growth_rate: String,
}

/// Age distribution; percentages are advisory and need not sum to 100
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Demographics {
    pub age_groups: BTreeMap<String, f64>,
    pub demographics_insight: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Swot {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub opportunities: Vec<String>,
    pub threats: Vec<String>,
}

impl Research {
    fn placeholder() -> Self {
        Self {
            competitors: Vec::new(),
            opportunity: "Analysis generated invalid format.".to_string(),
            market_trends: Vec::new(),
            market_share_insight: DATA_UNAVAILABLE.to_string(),
        }
    }
}

impl Strategy {
    fn placeholder() -> Self {
        Self {
            viability_score: 0,
            risk_analysis: DATA_UNAVAILABLE.to_string(),
            summary: "Error parsing results.".to_string(),
            target_users: DATA_UNAVAILABLE.to_string(),
            demographics: Demographics {
                age_groups: BTreeMap::new(),
                demographics_insight: DATA_UNAVAILABLE.to_string(),
            },
            ..Self::default()
        }
    }
}

/// Research and strategy sections as produced by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredReport {
    pub research: Value,
    pub strategy: Value,
}

impl StructuredReport {
    pub fn new(research: Value, strategy: Value) -> Self {
        Self { research, strategy }
    }

    /// The fixed placeholder returned when model output cannot be parsed
    pub fn degraded() -> Self {
        Self {
            research: to_object(&Research::placeholder()),
            strategy: to_object(&Strategy::placeholder()),
        }
    }

    /// Viability score reported by the model, if it is an integer
    pub fn viability_score(&self) -> Option<i64> {
        self.strategy.get("viability_score")?.as_i64()
    }
}

fn to_object<T: Serialize>(section: &T) -> Value {
    serde_json::to_value(section).unwrap_or_else(|_| Value::Object(Default::default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degraded_report_shape() {
        let report = StructuredReport::degraded();

        assert_eq!(report.viability_score(), Some(0));
        assert_eq!(report.research["competitors"], serde_json::json!([]));
        assert_eq!(report.research["market_trends"], serde_json::json!([]));
        assert_eq!(
            report.research["opportunity"],
            "Analysis generated invalid format."
        );
        assert_eq!(report.strategy["summary"], "Error parsing results.");
        assert_eq!(
            report.strategy["demographics"]["age_groups"],
            serde_json::json!({})
        );
        assert_eq!(
            report.strategy["demographics"]["demographics_insight"],
            DATA_UNAVAILABLE
        );
        assert_eq!(report.strategy["swot"]["threats"], serde_json::json!([]));
    }

    #[test]
    fn test_degraded_report_is_stable() {
        assert_eq!(StructuredReport::degraded(), StructuredReport::degraded());
    }

    #[test]
    fn test_typed_sections_accept_partial_model_output() {
        let strategy: Strategy = serde_json::from_value(serde_json::json!({
            "viability_score": 72,
            "demographics": { "age_groups": { "18-24": 30, "25-34": 45.5 } }
        }))
        .unwrap();

        assert_eq!(strategy.viability_score, 72);
        assert_eq!(strategy.demographics.age_groups["25-34"], 45.5);
        assert!(strategy.roadmap.is_empty());
    }

    #[test]
    fn test_viability_score_missing_or_non_integer() {
        let report = StructuredReport::new(
            serde_json::json!({}),
            serde_json::json!({ "viability_score": "high" }),
        );
        assert_eq!(report.viability_score(), None);

        let report = StructuredReport::new(serde_json::json!({}), serde_json::json!({}));
        assert_eq!(report.viability_score(), None);
    }
}
