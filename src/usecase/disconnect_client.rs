//! UseCase: client disconnection handling.
//!
//! Deliberately thin. Actions already in flight when the socket drops are
//! not touched here; they run to completion on their own tasks, so a final
//! button press still reaches the room.

use std::sync::Arc;

use crate::domain::{ConnectionId, SnapshotPusher};

pub struct DisconnectClientUseCase {
    pusher: Arc<dyn SnapshotPusher>,
}

impl DisconnectClientUseCase {
    pub fn new(pusher: Arc<dyn SnapshotPusher>) -> Self {
        Self { pusher }
    }

    pub async fn execute(&self, connection_id: &ConnectionId) {
        self.pusher.unregister(connection_id).await;
        tracing::info!("Connection '{}' left the session", connection_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::pusher::WebSocketSnapshotPusher;
    use tokio::sync::mpsc;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_disconnect_removes_the_connection() {
        // given:
        let pusher = Arc::new(WebSocketSnapshotPusher::new());
        let id = Uuid::new_v4();
        let (tx, _rx) = mpsc::unbounded_channel();
        pusher.register(id, tx).await;
        let usecase = DisconnectClientUseCase::new(pusher.clone());

        // when:
        usecase.execute(&id).await;

        // then:
        assert_eq!(pusher.connection_count().await, 0);
    }
}
