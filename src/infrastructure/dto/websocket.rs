//! Session protocol envelopes.

use serde::{Deserialize, Serialize};

use crate::domain::{LogEntry, Snapshot, TimerConfig};

/// Inbound envelope on the session connection. Only `ACTION` is recognized;
/// anything else fails to parse and is treated as the ignored action.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientMessage {
    Action { payload: ActionPayload },
}

/// The loosely-typed action payload as it appears on the wire. Converted to
/// the closed `Action` enum in `conversion`.
#[derive(Debug, Default, Deserialize)]
pub struct ActionPayload {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub config: Option<TimerConfig>,
    #[serde(default)]
    pub workout: Option<serde_json::Value>,
    #[serde(default)]
    pub index: Option<i64>,
}

/// Outbound envelope on the session connection.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    StateUpdate(Snapshot),
    NewLog(LogEntry),
}

impl ServerMessage {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("server message serializes")
    }
}
