//! Snapshot pusher implementations.
//!
//! - `websocket`: fan-out over per-connection websocket sender channels

pub mod websocket;

pub use websocket::WebSocketSnapshotPusher;
