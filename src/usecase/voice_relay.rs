//! UseCase: duplex audio relay between a voice client and the upstream
//! speech session.
//!
//! Two pumps run concurrently on one task: client frames up to the speech
//! sink, speech events down to the client buffer. Whichever side ends
//! first wins the `select!`, after which both buffers are closed and the
//! upstream session is shut down, so neither half can outlive the other.

use std::sync::Arc;

use crate::domain::{AudioBuffer, ClientFrame, SpeechEvent, SpeechSink, SpeechStream};

/// Capacity of each relay buffer. Small on purpose: under backpressure
/// old audio is dropped, capping latency at a fraction of a second.
pub const AUDIO_BUFFER_CAPACITY: usize = 32;

/// Why the relay stopped. The transport layer closes the client
/// connection with an explicit error code on `UpstreamFailed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    /// The client hung up or the upstream session ended cleanly.
    Closed,
    /// The upstream session failed mid-stream.
    UpstreamFailed,
}

pub async fn run_voice_relay(
    client_in: Arc<AudioBuffer<ClientFrame>>,
    client_out: Arc<AudioBuffer<Vec<u8>>>,
    mut sink: Box<dyn SpeechSink>,
    mut stream: Box<dyn SpeechStream>,
) -> RelayOutcome {
    let upstream_pump = async {
        loop {
            match client_in.pop().await {
                Some(ClientFrame::Audio(pcm)) => {
                    if let Err(e) = sink.send_audio(pcm).await {
                        tracing::warn!("Upstream audio send failed: {}", e);
                        return RelayOutcome::UpstreamFailed;
                    }
                }
                Some(ClientFrame::EndOfTurn) => {
                    if let Err(e) = sink.end_of_audio().await {
                        tracing::warn!("Upstream end-of-turn send failed: {}", e);
                        return RelayOutcome::UpstreamFailed;
                    }
                }
                Some(ClientFrame::Closed) | None => return RelayOutcome::Closed,
            }
        }
    };

    let downstream_pump = async {
        loop {
            match stream.next_event().await {
                Some(Ok(SpeechEvent::Audio(pcm))) => {
                    if !client_out.push(pcm) {
                        return RelayOutcome::Closed;
                    }
                }
                Some(Ok(SpeechEvent::Text(text))) => {
                    tracing::debug!("Assistant text: {}", text);
                }
                Some(Ok(SpeechEvent::TurnComplete)) => {
                    tracing::debug!("Assistant turn complete");
                }
                Some(Err(e)) => {
                    tracing::warn!("Speech stream failed: {}", e);
                    return RelayOutcome::UpstreamFailed;
                }
                None => return RelayOutcome::Closed,
            }
        }
    };

    let outcome = tokio::select! {
        outcome = upstream_pump => outcome,
        outcome = downstream_pump => outcome,
    };

    // Joint teardown: both pump borrows have ended here
    client_in.close();
    client_out.close();
    if let Err(e) = sink.close().await {
        tracing::debug!("Upstream close failed: {}", e);
    }
    let dropped = client_out.dropped();
    if dropped > 0 {
        tracing::debug!("Relay dropped {} stale audio chunk(s)", dropped);
    }
    outcome
}
