//! HTTP implementation of the plan generator.
//!
//! Talks to the external plan service: a single POST with the participant
//! list and an optional steering instruction, returning a plan document.
//! The response body is parsed as loose JSON first so a structurally broken
//! plan surfaces as `PlanError::BadShape` rather than a transport error.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::domain::{PlanError, PlanGenerator, WorkoutPlan};

const GENERATE_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Serialize)]
struct GenerateRequest<'a> {
    participants: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    instruction: Option<&'a str>,
}

pub struct HttpPlanGenerator {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpPlanGenerator {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }
}

#[async_trait]
impl PlanGenerator for HttpPlanGenerator {
    async fn generate(
        &self,
        participants: &[String],
        instruction: Option<&str>,
    ) -> Result<WorkoutPlan, PlanError> {
        let response = self
            .client
            .post(&self.endpoint)
            .timeout(GENERATE_TIMEOUT)
            .json(&GenerateRequest {
                participants,
                instruction,
            })
            .send()
            .await
            .map_err(|e| PlanError::Unavailable(e.to_string()))?
            .error_for_status()
            .map_err(|e| PlanError::Unavailable(e.to_string()))?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| PlanError::BadShape(e.to_string()))?;
        WorkoutPlan::from_value(body).map_err(|e| PlanError::BadShape(e.to_string()))
    }
}
