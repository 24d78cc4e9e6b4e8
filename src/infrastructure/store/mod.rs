//! Workout store implementations.
//!
//! - `inmemory`: process-local store, also the test double. A SQL-backed
//!   implementation would slot in behind the same `WorkoutStore` trait.

pub mod inmemory;

pub use inmemory::InMemoryWorkoutStore;
