pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
