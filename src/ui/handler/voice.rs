//! Voice WebSocket connection handler.
//!
//! Bridges the browser's audio connection to an upstream speech session:
//! binary frames carry raw PCM both ways, a text sentinel marks the end of
//! the client's utterance. The transport loops only touch the relay
//! buffers; all session semantics live in `usecase::voice_relay`.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade, close_code},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};

use crate::{
    domain::{AudioBuffer, ClientFrame, END_OF_TURN_SENTINEL},
    ui::state::AppState,
    usecase::{AUDIO_BUFFER_CAPACITY, RelayOutcome, run_voice_relay},
};

/// System instruction for the upstream speech session.
const COACH_INSTRUCTION: &str = "You are a friendly gym coach assisting a \
small group workout. Answer questions about exercises, scaling and pacing. \
Keep answers short and spoken-word friendly.";

pub async fn voice_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_voice_socket(socket, state))
}

async fn close_with_error(mut socket: WebSocket, reason: &str) {
    let frame = CloseFrame {
        code: close_code::ERROR,
        reason: reason.to_string().into(),
    };
    if socket.send(Message::Close(Some(frame))).await.is_err() {
        tracing::debug!("Voice client gone before close frame");
    }
}

async fn handle_voice_socket(socket: WebSocket, state: Arc<AppState>) {
    let Some(backend) = state.speech_backend.clone() else {
        tracing::warn!("Voice connection refused: no speech backend configured");
        close_with_error(socket, "voice backend not configured").await;
        return;
    };

    let (sink, stream) = match backend.connect(COACH_INSTRUCTION).await {
        Ok(halves) => halves,
        Err(e) => {
            tracing::warn!("Speech backend connect failed: {}", e);
            close_with_error(socket, "voice backend unavailable").await;
            return;
        }
    };
    tracing::info!("Voice session opened");

    let client_in = Arc::new(AudioBuffer::new(AUDIO_BUFFER_CAPACITY));
    let client_out = Arc::new(AudioBuffer::<Vec<u8>>::new(AUDIO_BUFFER_CAPACITY));
    let (mut ws_sender, mut ws_receiver) = socket.split();

    // Transport read loop: socket frames into the inbound buffer
    let read_buffer = client_in.clone();
    let read_task = tokio::spawn(async move {
        while let Some(msg) = ws_receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::debug!("Voice socket error: {}", e);
                    break;
                }
            };
            let accepted = match msg {
                Message::Binary(bytes) => read_buffer.push(ClientFrame::Audio(bytes.to_vec())),
                Message::Text(text) if text.as_str() == END_OF_TURN_SENTINEL => {
                    read_buffer.push(ClientFrame::EndOfTurn)
                }
                Message::Text(text) => {
                    tracing::debug!("Ignoring unexpected voice text frame: {}", text);
                    true
                }
                Message::Close(_) => break,
                _ => true,
            };
            if !accepted {
                break;
            }
        }
        read_buffer.push(ClientFrame::Closed);
        read_buffer.close();
    });

    // Transport write loop: outbound buffer into socket frames. Hands the
    // sender back once the buffer closes so the close frame below can
    // carry the relay's outcome.
    let write_buffer = client_out.clone();
    let write_task = tokio::spawn(async move {
        while let Some(pcm) = write_buffer.pop().await {
            if ws_sender.send(Message::Binary(pcm.into())).await.is_err() {
                break;
            }
        }
        ws_sender
    });

    let outcome = run_voice_relay(client_in, client_out, sink, stream).await;

    // The relay closed both buffers. The write loop drains and exits on
    // its own; the read loop may still be parked on the socket.
    read_task.abort();
    match write_task.await {
        Ok(mut ws_sender) => {
            // An upstream failure is announced with an explicit code, a
            // clean end with a normal close
            let close = match outcome {
                RelayOutcome::UpstreamFailed => Message::Close(Some(CloseFrame {
                    code: close_code::ERROR,
                    reason: "voice backend failed".into(),
                })),
                RelayOutcome::Closed => Message::Close(None),
            };
            if ws_sender.send(close).await.is_err() {
                tracing::debug!("Voice client gone before close frame");
            }
        }
        Err(_) => tracing::debug!("Voice write task aborted"),
    }
    tracing::info!("Voice session closed");
}
