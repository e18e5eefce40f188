//! Report assembler
//!
//! Builds the outbound analysis prompt and shapes the response envelope,
//! substituting the degraded placeholder when extraction failed.

use crate::analysis::extractor::ParseError;
use crate::analysis::report::StructuredReport;
use serde::{Deserialize, Serialize};

/// Version tag of [`SYSTEM_INSTRUCTION`] and [`ANALYSIS_INSTRUCTIONS`]
pub const PROMPT_VERSION: &str = "master-analyst-v1";

/// Role instruction sent with every analysis request
pub const SYSTEM_INSTRUCTION: &str = "\
Role: Senior Startup Analyst.

You are an all-in-one branding, market research, and strategy expert.
Your goal is to analyze a startup idea and output a comprehensive JSON report.

Process:
1. Understand the idea context.
2. Use your knowledge (and Search if absolutely necessary) to identify Competitors and Opportunities.
3. Formulate a Business Strategy (Model, Acquisition, Risks).
4. Output EVERYTHING in a single valid JSON structure.

Constraint: Output ONLY JSON. No preamble.";

/// Task list and the exact JSON shape the model must produce
pub const ANALYSIS_INSTRUCTIONS: &str = r#"
Perform a complete business deep-dive:
1. Research 3 Competitors (Name, Market Share %, Audience, Strategy).
2. Identify the Whitespace Opportunity.
3. Calculate Viability Score (0-100).
4. Define Risk, Roadmap, Business Models (3), Acquisition Channels (3), Target Persona, and SWOT.
5. Financial Projections (Revenue per user, Min Investment, Break-even, Growth Rate).
6. Market Trends (4 Key trends).
7. Demographics Data (Age group distribution percentages).

Output strictly VALID JSON with this structure:
{
  "research": {
      "competitors": [ { "name": "...", "market_share": 30, "target_audience": "...", "marketing_strategy": "..." } ],
      "opportunity": "...",
      "market_trends": ["Trend 1...", "Trend 2...", "Trend 3...", "Trend 4..."],
      "market_share_insight": "Brief insight on competitor dominance..."
  },
  "strategy": {
      "viability_score": 85,
      "risk_analysis": "...",
      "roadmap": ["Step 1...", "Step 2...", "Step 3..."],
      "summary": "...",
      "business_models": ["Model: Why..."],
      "user_acquisition": ["Channel: How..."],
      "target_users": "...",
      "financials": {
          "revenue_per_user": "$...",
          "min_investment": "$...",
          "break_even": "... months",
          "user_growth_rate": "...%"
      },
      "demographics": {
          "age_groups": { "18-24": 20, "25-34": 40, "35-44": 25, "45+": 15 },
          "demographics_insight": "Brief insight on target age group..."
      },
      "swot": { "strengths": [], "weaknesses": [], "opportunities": [], "threats": [] }
  }
}
"#;

/// Build the analysis prompt for one idea
pub fn build_prompt(idea: &str, industry: &str, extra_context: &str) -> String {
    format!(
        "Analyze the startup idea: '{}' in the '{}' industry. {}\n{}",
        idea, industry, extra_context, ANALYSIS_INSTRUCTIONS
    )
}

/// Response body of a completed analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisEnvelope {
    pub idea: String,
    pub industry: String,
    #[serde(flatten)]
    pub report: StructuredReport,
    /// Set only by [`assemble`] when extraction failed
    #[serde(skip)]
    degraded: bool,
}

impl AnalysisEnvelope {
    /// Whether the envelope carries the degraded placeholder
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }
}

/// Shape the final envelope from an extraction outcome
///
/// A parse failure never propagates: it is logged and replaced by
/// [`StructuredReport::degraded`].
pub fn assemble(
    idea: &str,
    industry: &str,
    outcome: Result<StructuredReport, ParseError>,
) -> AnalysisEnvelope {
    let (report, degraded) = match outcome {
        Ok(report) => (report, false),
        Err(e) => {
            tracing::warn!(
                error = %e,
                idea = %idea,
                industry = %industry,
                "JSON parsing failed, returning degraded report"
            );
            (StructuredReport::degraded(), true)
        }
    };

    AnalysisEnvelope {
        idea: idea.to_string(),
        industry: industry.to_string(),
        report,
        degraded,
    }
}
