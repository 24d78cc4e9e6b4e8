//! Speech backend implementations.
//!
//! - `live`: websocket client for the upstream realtime speech service

pub mod live;

pub use live::{LiveSpeechBackend, LiveSpeechConfig};
