//! Data Transfer Objects (DTOs) for the session server.
//!
//! DTOs are organized by protocol:
//! - `websocket`: session protocol envelopes
//! - `http`: HTTP API request DTOs
//! - `conversion`: wire payload -> domain `Action` mapping

pub mod conversion;
pub mod http;
pub mod websocket;
