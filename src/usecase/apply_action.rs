//! UseCase: apply one session action and broadcast the resulting snapshot.
//!
//! This is the single serialization point of the whole server. The session
//! lock is held from the mutation through the broadcast, so the order in
//! which snapshots enter every connection's channel is the order in which
//! the actions were applied. Channel sends never block, which keeps the
//! critical section short.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{Action, SessionState, Snapshot, SnapshotPusher, WorkoutStore};
use crate::infrastructure::dto::websocket::ServerMessage;

/// Applies actions to the shared session.
pub struct ApplyActionUseCase {
    session: Arc<Mutex<SessionState>>,
    store: Arc<dyn WorkoutStore>,
    pusher: Arc<dyn SnapshotPusher>,
}

impl ApplyActionUseCase {
    pub fn new(
        session: Arc<Mutex<SessionState>>,
        store: Arc<dyn WorkoutStore>,
        pusher: Arc<dyn SnapshotPusher>,
    ) -> Self {
        Self {
            session,
            store,
            pusher,
        }
    }

    /// Apply one action, persist what needs persisting, snapshot and
    /// broadcast. Infallible by design: even an `Ignored` action or a
    /// failed persist produces a broadcast, so clients always converge.
    pub async fn execute(&self, action: Action) -> Snapshot {
        // 1. Mutate (and persist) under the session lock
        let mut session = self.session.lock().await;
        match action {
            Action::ToggleTimer => session.toggle_timer(),
            Action::AddRound { participant } => session.add_round(&participant),
            Action::ResetTimer => session.reset_timer(),
            Action::ResetRounds => session.reset_rounds(),
            Action::ConfigureTimer { config } => session.configure_timer(config),
            Action::SetWorkout { workout } => {
                // The plan still goes live when the store is down; history
                // is the only loss.
                if let Err(e) = self.store.save_plan(&workout).await {
                    tracing::warn!("Failed to persist workout plan: {}", e);
                }
                session.set_workout(workout);
            }
            Action::SetActivePart { index } => session.set_active_part(index),
            Action::Ignored => {}
        }

        // 2. Snapshot at the broadcast instant
        let snapshot = session.snapshot();

        // 3. Broadcast before releasing the lock, so interleaved actions
        //    cannot reorder snapshots in any connection's channel
        let message = ServerMessage::StateUpdate(snapshot.clone()).to_json();
        let removed = self.pusher.broadcast(&message).await;
        if !removed.is_empty() {
            tracing::debug!("Dropped {} dead connection(s) during broadcast", removed.len());
        }

        snapshot
    }
}
