//! Plan generator implementations.
//!
//! - `http`: JSON-over-HTTP client for the external plan generation service

pub mod http;

pub use http::HttpPlanGenerator;
