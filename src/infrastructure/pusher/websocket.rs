//! WebSocket implementation of the snapshot pusher.
//!
//! Owns the map of live connection ids to their `UnboundedSender` channels.
//! The sockets themselves are created in the UI layer
//! (`ui::handler::websocket`); this type only manages the senders, which
//! keeps "accepting a connection" and "delivering to it" separated.
//!
//! A send only fails when the connection's write task is gone, so a failed
//! delivery means the connection is dead: it is unregistered on the spot
//! instead of being silently skipped.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, PushError, PusherChannel, SnapshotPusher};

pub struct WebSocketSnapshotPusher {
    /// Live connections keyed by connection id.
    clients: Mutex<HashMap<ConnectionId, PusherChannel>>,
}

impl WebSocketSnapshotPusher {
    pub fn new() -> Self {
        Self {
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Number of currently registered connections.
    pub async fn connection_count(&self) -> usize {
        self.clients.lock().await.len()
    }
}

impl Default for WebSocketSnapshotPusher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotPusher for WebSocketSnapshotPusher {
    async fn register(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(connection_id, sender);
        tracing::debug!("Connection '{}' registered", connection_id);
    }

    async fn unregister(&self, connection_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(connection_id);
        tracing::debug!("Connection '{}' unregistered", connection_id);
    }

    async fn send_to(&self, connection_id: &ConnectionId, message: &str) -> Result<(), PushError> {
        let clients = self.clients.lock().await;

        let sender = clients
            .get(connection_id)
            .ok_or(PushError::ConnectionNotFound(*connection_id))?;
        sender
            .send(message.to_string())
            .map_err(|e| PushError::PushFailed(e.to_string()))?;
        Ok(())
    }

    async fn broadcast(&self, message: &str) -> Vec<ConnectionId> {
        let mut clients = self.clients.lock().await;

        let mut failed = Vec::new();
        for (id, sender) in clients.iter() {
            if sender.send(message.to_string()).is_err() {
                tracing::warn!("Failed to push to connection '{}', dropping it", id);
                failed.push(*id);
            }
        }
        for id in &failed {
            clients.remove(id);
        }
        failed
    }
}
