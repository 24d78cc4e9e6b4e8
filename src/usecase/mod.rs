pub mod apply_action;
pub mod connect_client;
pub mod disconnect_client;
pub mod error;
pub mod generate_plan;
pub mod log_result;
pub mod seed_session;
pub mod voice_relay;

pub use apply_action::ApplyActionUseCase;
pub use connect_client::ConnectClientUseCase;
pub use disconnect_client::DisconnectClientUseCase;
pub use error::{ConnectError, LogResultError};
pub use generate_plan::GeneratePlanUseCase;
pub use log_result::LogResultUseCase;
pub use seed_session::seed_session;
pub use voice_relay::{AUDIO_BUFFER_CAPACITY, RelayOutcome, run_voice_relay};
