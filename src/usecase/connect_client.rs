//! UseCase: client connection handling.
//!
//! A new connection is registered with the pusher and immediately receives
//! the current snapshot, so a late joiner renders the cumulative state
//! without waiting for the next action.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{ConnectionId, PusherChannel, SessionState, SnapshotPusher};
use crate::infrastructure::dto::websocket::ServerMessage;

use super::error::ConnectError;

pub struct ConnectClientUseCase {
    session: Arc<Mutex<SessionState>>,
    pusher: Arc<dyn SnapshotPusher>,
}

impl ConnectClientUseCase {
    pub fn new(session: Arc<Mutex<SessionState>>, pusher: Arc<dyn SnapshotPusher>) -> Self {
        Self { session, pusher }
    }

    /// Register the connection and push the current snapshot to it.
    ///
    /// The session lock is held across both steps so no broadcast can slip
    /// in between registration and the initial snapshot; the first message
    /// in the channel is therefore never older than a concurrent update.
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        sender: PusherChannel,
    ) -> Result<(), ConnectError> {
        let session = self.session.lock().await;

        // 1. Register with the pusher
        self.pusher.register(connection_id, sender).await;

        // 2. Push the current state as the connection's first message
        let message = ServerMessage::StateUpdate(session.snapshot()).to_json();
        if let Err(e) = self.pusher.send_to(&connection_id, &message).await {
            // Dead on arrival: roll the registration back
            self.pusher.unregister(&connection_id).await;
            return Err(ConnectError::InitialPushFailed(e.to_string()));
        }

        tracing::info!("Connection '{}' joined the session", connection_id);
        Ok(())
    }
}
