//! UseCase: build the session state at startup.

use std::sync::Arc;

use crate::common::time::Clock;
use crate::domain::{SessionState, WorkoutStore};

/// Fresh session preloaded with the most recently stored plan, so a server
/// restart does not blank the shared display. An unreadable or empty store
/// yields a default session rather than a startup failure.
pub async fn seed_session(clock: Arc<dyn Clock>, store: &dyn WorkoutStore) -> SessionState {
    let mut session = SessionState::new(clock);
    match store.latest_plan().await {
        Ok(Some(plan)) => session.set_workout(plan),
        Ok(None) => {}
        Err(e) => tracing::warn!("Could not seed session from store: {}", e),
    }
    session
}
