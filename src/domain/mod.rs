//! Domain layer: session state, typed plan records, the action vocabulary,
//! and the trait seams the core needs from its collaborators
//! (snapshot pusher, workout store, plan generator, speech backend).

pub mod action;
pub mod plan;
pub mod planner;
pub mod pusher;
pub mod session;
pub mod store;
pub mod voice;

pub use action::Action;
pub use plan::{PartBody, PlanPart, WorkoutPlan, placeholder_plan};
pub use planner::{PlanError, PlanGenerator};
pub use pusher::{ConnectionId, PushError, PusherChannel, SnapshotPusher};
pub use session::{SessionState, Snapshot, TimerConfig, TimerMode};
pub use store::{LogEntry, StoreError, User, WorkoutRecord, WorkoutStore};
pub use voice::{
    AudioBuffer, ClientFrame, END_OF_TURN_SENTINEL, SpeechBackend, SpeechError, SpeechEvent,
    SpeechSink, SpeechStream,
};
