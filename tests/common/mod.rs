//! Shared fixtures for integration tests
//!
//! `ScriptedBackend` replays a fixed sequence of backend results and records
//! every call it receives, so tests can assert which identities were tried.

#![allow(dead_code)]

use async_trait::async_trait;
use founderslens::config::Config;
use founderslens::handlers::AppState;
use founderslens::models::{BackendError, Credential, ModelBackend};
use std::collections::VecDeque;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

pub const PRIMARY_MODEL: &str = "primary-model";
pub const FALLBACK_MODEL: &str = "fallback-model";
pub const DEFAULT_KEY: &str = "default-key-12345";

/// One recorded backend call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub model: String,
    pub credential: String,
}

/// Backend that answers from a script, in order
pub struct ScriptedBackend {
    script: Mutex<VecDeque<Result<String, BackendError>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedBackend {
    pub fn new(script: Vec<Result<String, BackendError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn models_called(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.model).collect()
    }
}

#[async_trait]
impl ModelBackend for ScriptedBackend {
    async fn generate(
        &self,
        model: &str,
        credential: &Credential,
        _prompt: &str,
    ) -> Result<String, BackendError> {
        self.calls.lock().unwrap().push(Call {
            model: model.to_string(),
            credential: credential.expose().to_string(),
        });
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::Other("script exhausted".to_string())))
    }
}

pub fn quota() -> BackendError {
    BackendError::QuotaExhausted {
        status: 429,
        message: "Resource has been exhausted (e.g. check quota).".to_string(),
    }
}

pub fn test_config() -> Config {
    Config::from_str(&format!(
        r#"
[server]
host = "127.0.0.1"
port = 8000
request_timeout_seconds = 5

[models]
primary = "{}"
fallback = "{}"
"#,
        PRIMARY_MODEL, FALLBACK_MODEL
    ))
    .expect("test config should parse")
}

pub fn default_credential() -> Credential {
    Credential::new(DEFAULT_KEY).expect("non-blank key")
}

pub fn test_state(backend: Arc<ScriptedBackend>) -> AppState {
    AppState::new(Arc::new(test_config()), backend, default_credential())
        .expect("state should build")
}

/// A realistic model answer: prose around a JSON payload
pub fn report_text(viability_score: u8) -> String {
    format!(
        r#"Here is my analysis of the idea.

```json
{{
  "research": {{
    "competitors": [
      {{"name": "Khanmigo", "market_share": 35, "target_audience": "K-12", "marketing_strategy": "School partnerships"}}
    ],
    "opportunity": "Personalized tutoring at a fraction of the cost.",
    "market_trends": ["AI adoption", "Remote learning", "Cost pressure", "Mobile first"],
    "market_share_insight": "Fragmented market."
  }},
  "strategy": {{
    "viability_score": {},
    "risk_analysis": "Incumbents may copy the feature.",
    "roadmap": "MVP in three months.",
    "summary": "Promising niche.",
    "business_models": ["Subscription", "Freemium", "B2B licensing"],
    "user_acquisition": ["SEO", "School referrals", "TikTok"],
    "target_users": "Parents of high schoolers",
    "financials": {{"revenue_per_user": "$12/mo", "min_investment": "$150k", "break_even": "18 months", "user_growth_rate": "8% MoM"}},
    "demographics": {{"age_groups": {{"13-17": 60, "35-50": 40}}, "demographics_insight": "Parents pay."}},
    "swot": {{"strengths": ["Cheap"], "weaknesses": ["Trust"], "opportunities": ["Exams"], "threats": ["Regulation"]}}
  }}
}}
```

Let me know if you need more detail."#,
        viability_score
    )
}
