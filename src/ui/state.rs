//! Shared application state handed to every handler.

use std::sync::Arc;

use crate::domain::{SpeechBackend, WorkoutStore};
use crate::usecase::{
    ApplyActionUseCase, ConnectClientUseCase, DisconnectClientUseCase, GeneratePlanUseCase,
    LogResultUseCase,
};

pub struct AppState {
    pub apply_action_usecase: Arc<ApplyActionUseCase>,
    pub connect_client_usecase: ConnectClientUseCase,
    pub disconnect_client_usecase: DisconnectClientUseCase,
    pub log_result_usecase: LogResultUseCase,
    pub generate_plan_usecase: GeneratePlanUseCase,
    pub store: Arc<dyn WorkoutStore>,
    /// `None` when no speech credentials are configured; the voice
    /// endpoint then refuses connections instead of the server failing to
    /// start.
    pub speech_backend: Option<Arc<dyn SpeechBackend>>,
}
