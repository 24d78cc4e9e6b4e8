//! Plan generator trait: the interface the core needs from the external
//! workout-plan generation service.

use async_trait::async_trait;
use thiserror::Error;

use super::plan::WorkoutPlan;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("plan generator unavailable: {0}")]
    Unavailable(String),

    #[error("generator response is not plan-shaped: {0}")]
    BadShape(String),
}

/// External plan generation service.
#[async_trait]
pub trait PlanGenerator: Send + Sync {
    /// Ask for a plan for the given participants, optionally steered by a
    /// free-text instruction. The core only checks that the result is
    /// plan-shaped; content is opaque.
    async fn generate(
        &self,
        participants: &[String],
        instruction: Option<&str>,
    ) -> Result<WorkoutPlan, PlanError>;
}
