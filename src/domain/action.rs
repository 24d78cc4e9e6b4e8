//! The closed set of session commands.
//!
//! Wire payloads are converted into this enum at the DTO boundary
//! (`infrastructure::dto::conversion`); anything unrecognized or malformed
//! becomes `Ignored`, which still flows through the router so every client
//! converges on the next snapshot.

use super::plan::WorkoutPlan;
use super::session::TimerConfig;

/// One command against the shared session. Immutable and transient: applied
/// once by the action router, never stored.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ToggleTimer,
    AddRound { participant: String },
    ResetTimer,
    ResetRounds,
    ConfigureTimer { config: TimerConfig },
    SetWorkout { workout: WorkoutPlan },
    SetActivePart { index: usize },
    /// Unknown kind or unusable payload. Deliberately fail-open: applied as
    /// a no-op that still produces a snapshot and a broadcast.
    Ignored,
}
