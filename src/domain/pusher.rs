//! Snapshot pusher trait: the registry of live connections and the fan-out
//! seam the usecase layer depends on. The concrete websocket implementation
//! lives in the infrastructure layer (dependency inversion).

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Identifier of one attached client connection.
pub type ConnectionId = Uuid;

/// Outbound delivery channel owned by a connection's write task.
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[derive(Debug, Error, PartialEq)]
pub enum PushError {
    #[error("connection '{0}' is not registered")]
    ConnectionNotFound(ConnectionId),

    #[error("failed to push message: {0}")]
    PushFailed(String),
}

/// Registry of live connections plus fan-out.
///
/// Delivery is at-most-once and best-effort: a failed send drops the
/// connection from the registry immediately and never blocks delivery to
/// the others.
#[async_trait]
pub trait SnapshotPusher: Send + Sync {
    /// Add a connection. The caller is responsible for pushing the current
    /// snapshot to it right after, so late joiners never see empty state.
    async fn register(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// Remove a connection. Idempotent.
    async fn unregister(&self, connection_id: &ConnectionId);

    /// Deliver to a single connection.
    async fn send_to(&self, connection_id: &ConnectionId, message: &str) -> Result<(), PushError>;

    /// Deliver to every registered connection independently, unregistering
    /// any connection whose delivery fails. Returns the ids removed.
    async fn broadcast(&self, message: &str) -> Vec<ConnectionId>;
}
