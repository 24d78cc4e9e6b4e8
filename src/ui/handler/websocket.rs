//! Session WebSocket connection handler.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::{
    domain::Action,
    infrastructure::dto::websocket::ClientMessage,
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that drains the connection's channel into its socket.
///
/// Every message destined for this client, including its initial snapshot,
/// goes through the channel, so socket writes happen on exactly one task.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = Uuid::new_v4();
    let (sender, mut receiver) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel();

    if let Err(e) = state
        .connect_client_usecase
        .execute(connection_id, tx)
        .await
    {
        tracing::warn!("Connection '{}' failed to join: {}", connection_id, e);
        return;
    }

    let mut send_task = pusher_loop(rx, sender);

    let state_clone = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::debug!("WebSocket error on '{}': {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    // Malformed input degrades to the ignored action, which
                    // still broadcasts; a bad client cannot stall the room
                    let action = match serde_json::from_str::<ClientMessage>(text.as_str()) {
                        Ok(ClientMessage::Action { payload }) => Action::from(payload),
                        Err(e) => {
                            tracing::warn!("Unparseable client message: {}", e);
                            Action::Ignored
                        }
                    };

                    // Applied on its own task: if this socket drops mid-apply,
                    // the action still completes and reaches the room.
                    // Awaiting the handle preserves per-client ordering.
                    let apply = state_clone.apply_action_usecase.clone();
                    let applied = tokio::spawn(async move {
                        apply.execute(action).await;
                    });
                    if applied.await.is_err() {
                        tracing::error!("Action task panicked");
                    }
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id);
                    break;
                }
                Message::Ping(_) => {
                    // Handled by the protocol layer
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    state.disconnect_client_usecase.execute(&connection_id).await;
}
