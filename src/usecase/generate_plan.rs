//! UseCase: generate a workout plan and put it live.
//!
//! Generation failures never leave the room without a workout: the
//! fallback plan is applied through the same path as a real one, so every
//! client sees something render either way.

use std::sync::Arc;

use crate::domain::{Action, PlanGenerator, Snapshot, placeholder_plan};

use super::ApplyActionUseCase;

pub struct GeneratePlanUseCase {
    planner: Arc<dyn PlanGenerator>,
    apply_action: Arc<ApplyActionUseCase>,
}

impl GeneratePlanUseCase {
    pub fn new(planner: Arc<dyn PlanGenerator>, apply_action: Arc<ApplyActionUseCase>) -> Self {
        Self {
            planner,
            apply_action,
        }
    }

    /// Ask the generator for a plan and apply it as a `SetWorkout`, which
    /// persists and broadcasts it in one step.
    pub async fn execute(&self, participants: &[String], instruction: Option<&str>) -> Snapshot {
        let workout = match self.planner.generate(participants, instruction).await {
            Ok(plan) => plan,
            Err(e) => {
                tracing::warn!("Plan generation failed: {}", e);
                placeholder_plan(&format!("Plan generation failed: {}", e))
            }
        };
        self.apply_action.execute(Action::SetWorkout { workout }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::time::ManualClock;
    use crate::domain::{PlanError, SessionState, WorkoutPlan, WorkoutStore};
    use crate::infrastructure::pusher::WebSocketSnapshotPusher;
    use crate::infrastructure::store::InMemoryWorkoutStore;
    use async_trait::async_trait;
    use serde_json::json;
    use tokio::sync::Mutex;

    struct StubPlanner {
        result: Result<WorkoutPlan, PlanError>,
    }

    #[async_trait]
    impl PlanGenerator for StubPlanner {
        async fn generate(
            &self,
            _participants: &[String],
            _instruction: Option<&str>,
        ) -> Result<WorkoutPlan, PlanError> {
            match &self.result {
                Ok(plan) => Ok(plan.clone()),
                Err(PlanError::Unavailable(msg)) => Err(PlanError::Unavailable(msg.clone())),
                Err(PlanError::BadShape(msg)) => Err(PlanError::BadShape(msg.clone())),
            }
        }
    }

    fn create_usecase(
        result: Result<WorkoutPlan, PlanError>,
    ) -> (GeneratePlanUseCase, Arc<InMemoryWorkoutStore>) {
        let session = Arc::new(Mutex::new(SessionState::new(Arc::new(ManualClock::new()))));
        let store = Arc::new(InMemoryWorkoutStore::new());
        let pusher = Arc::new(WebSocketSnapshotPusher::new());
        let apply = Arc::new(ApplyActionUseCase::new(session, store.clone(), pusher));
        let usecase = GeneratePlanUseCase::new(Arc::new(StubPlanner { result }), apply);
        (usecase, store)
    }

    #[tokio::test]
    async fn test_generated_plan_goes_live_and_is_persisted() {
        // given:
        let plan = WorkoutPlan::from_value(json!({
            "focus": "Engine",
            "parts": [{ "type": "WOD", "duration_min": 20 }],
        }))
        .unwrap();
        let (usecase, store) = create_usecase(Ok(plan.clone()));

        // when:
        let snapshot = usecase.execute(&["u_nina".to_string()], None).await;

        // then:
        assert_eq!(snapshot.workout, plan);
        assert_eq!(store.latest_plan().await.unwrap(), Some(plan));
    }

    #[tokio::test]
    async fn test_generator_failure_yields_fallback_plan() {
        // given:
        let (usecase, store) =
            create_usecase(Err(PlanError::Unavailable("connection refused".to_string())));

        // when:
        let snapshot = usecase.execute(&[], Some("make it hard")).await;

        // then: the fallback plan is live and persisted like a real one
        assert_eq!(snapshot.workout.focus, "Error");
        assert!(store.latest_plan().await.unwrap().is_some());
    }
}
