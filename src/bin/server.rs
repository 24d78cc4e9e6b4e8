//! Shared workout session server binary.

use std::sync::Arc;

use clap::Parser;
use tokio::sync::Mutex;

use gymhub::common::logger::setup_logger;
use gymhub::common::time::SystemClock;
use gymhub::domain::{SpeechBackend, WorkoutStore};
use gymhub::infrastructure::planner::HttpPlanGenerator;
use gymhub::infrastructure::pusher::WebSocketSnapshotPusher;
use gymhub::infrastructure::speech::{LiveSpeechBackend, LiveSpeechConfig};
use gymhub::infrastructure::store::InMemoryWorkoutStore;
use gymhub::ui::{AppState, Server};
use gymhub::usecase::{
    ApplyActionUseCase, ConnectClientUseCase, DisconnectClientUseCase, GeneratePlanUseCase,
    LogResultUseCase, seed_session,
};

const DEFAULT_PLANNER_URL: &str = "http://127.0.0.1:8001/generate";

#[derive(Parser, Debug)]
#[command(name = "gymhub-server")]
#[command(about = "Shared workout session server")]
struct Args {
    /// Address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 8000)]
    port: u16,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let store: Arc<dyn WorkoutStore> = Arc::new(InMemoryWorkoutStore::with_default_roster());

    // Seed the session with the most recently stored plan, if any
    let session = Arc::new(Mutex::new(
        seed_session(Arc::new(SystemClock::new()), store.as_ref()).await,
    ));

    let pusher = Arc::new(WebSocketSnapshotPusher::new());
    let apply_action_usecase = Arc::new(ApplyActionUseCase::new(
        session.clone(),
        store.clone(),
        pusher.clone(),
    ));

    let planner_url =
        std::env::var("PLANNER_URL").unwrap_or_else(|_| DEFAULT_PLANNER_URL.to_string());
    let planner = Arc::new(HttpPlanGenerator::new(planner_url));

    let speech_backend: Option<Arc<dyn SpeechBackend>> = match LiveSpeechConfig::from_env() {
        Some(config) => Some(Arc::new(LiveSpeechBackend::new(config))),
        None => {
            tracing::info!("SPEECH_API_KEY not set, voice endpoint disabled");
            None
        }
    };

    let state = Arc::new(AppState {
        apply_action_usecase: apply_action_usecase.clone(),
        connect_client_usecase: ConnectClientUseCase::new(session.clone(), pusher.clone()),
        disconnect_client_usecase: DisconnectClientUseCase::new(pusher.clone()),
        log_result_usecase: LogResultUseCase::new(store.clone(), pusher.clone()),
        generate_plan_usecase: GeneratePlanUseCase::new(planner, apply_action_usecase),
        store,
        speech_backend,
    });

    let server = Server::new(state);
    if let Err(e) = server.run(&args.host, args.port).await {
        tracing::error!("Server failed: {}", e);
        std::process::exit(1);
    }
}
