//! Shared utilities used by the server binary and the library layers.

pub mod logger;
pub mod time;
