//! WebSocket client for the upstream realtime speech service.
//!
//! One session per voice-enabled client connection. The session starts
//! with a setup message naming the model, the response modality and the
//! system instruction, then exchanges JSON frames: outbound base64 PCM
//! chunks, inbound inline audio, text and turn-completion events.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::domain::{SpeechBackend, SpeechError, SpeechEvent, SpeechSink, SpeechStream};

const PCM_MIME_TYPE: &str = "audio/pcm;rate=16000";

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;
type WsStream = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Connection parameters for the live speech service, read from the
/// environment. `None` when no API key is configured, in which case the
/// voice endpoint is disabled rather than failing at startup.
#[derive(Debug, Clone)]
pub struct LiveSpeechConfig {
    pub url: String,
    pub api_key: String,
    pub model: String,
}

impl LiveSpeechConfig {
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("SPEECH_API_KEY").ok()?;
        let url = std::env::var("SPEECH_URL").unwrap_or_else(|_| {
            "wss://generativelanguage.googleapis.com/ws/google.ai.generativelanguage.v1beta.GenerativeService.BidiGenerateContent".to_string()
        });
        let model = std::env::var("SPEECH_MODEL")
            .unwrap_or_else(|_| "models/gemini-2.0-flash-live-001".to_string());
        Some(Self {
            url,
            api_key,
            model,
        })
    }
}

pub struct LiveSpeechBackend {
    config: LiveSpeechConfig,
}

impl LiveSpeechBackend {
    pub fn new(config: LiveSpeechConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SpeechBackend for LiveSpeechBackend {
    async fn connect(
        &self,
        system_instruction: &str,
    ) -> Result<(Box<dyn SpeechSink>, Box<dyn SpeechStream>), SpeechError> {
        let url = format!("{}?key={}", self.config.url, self.config.api_key);
        let (ws, _response) = connect_async(&url)
            .await
            .map_err(|e| SpeechError::Unavailable(e.to_string()))?;
        let (mut sink, stream) = ws.split();

        let setup = json!({
            "setup": {
                "model": self.config.model,
                "generation_config": {
                    "response_modalities": ["AUDIO"],
                },
                "system_instruction": {
                    "parts": [{ "text": system_instruction }],
                },
            }
        });
        send_json(&mut sink, &setup).await?;

        Ok((
            Box::new(LiveSpeechSink { sink }),
            Box::new(LiveSpeechStream { stream }),
        ))
    }
}

async fn send_json(sink: &mut WsSink, value: &Value) -> Result<(), SpeechError> {
    let text = serde_json::to_string(value).map_err(|e| SpeechError::Send(e.to_string()))?;
    sink.send(Message::Text(text.into()))
        .await
        .map_err(|e| SpeechError::Send(e.to_string()))
}

struct LiveSpeechSink {
    sink: WsSink,
}

#[async_trait]
impl SpeechSink for LiveSpeechSink {
    async fn send_audio(&mut self, pcm: Vec<u8>) -> Result<(), SpeechError> {
        let chunk = json!({
            "realtime_input": {
                "media_chunks": [{
                    "mime_type": PCM_MIME_TYPE,
                    "data": BASE64.encode(&pcm),
                }],
            }
        });
        send_json(&mut self.sink, &chunk).await
    }

    async fn end_of_audio(&mut self) -> Result<(), SpeechError> {
        let end = json!({
            "realtime_input": { "audio_stream_end": true }
        });
        send_json(&mut self.sink, &end).await
    }

    async fn close(&mut self) -> Result<(), SpeechError> {
        self.sink
            .close()
            .await
            .map_err(|e| SpeechError::Send(e.to_string()))
    }
}

struct LiveSpeechStream {
    stream: WsStream,
}

#[async_trait]
impl SpeechStream for LiveSpeechStream {
    async fn next_event(&mut self) -> Option<Result<SpeechEvent, SpeechError>> {
        loop {
            let message = match self.stream.next().await? {
                Ok(message) => message,
                Err(e) => return Some(Err(SpeechError::Stream(e.to_string()))),
            };
            let payload: Value = match message {
                // The service sends JSON over both text and binary frames.
                Message::Text(text) => match serde_json::from_str(text.as_str()) {
                    Ok(value) => value,
                    Err(e) => return Some(Err(SpeechError::Stream(e.to_string()))),
                },
                Message::Binary(bytes) => match serde_json::from_slice(&bytes) {
                    Ok(value) => value,
                    Err(e) => return Some(Err(SpeechError::Stream(e.to_string()))),
                },
                Message::Close(_) => return None,
                // Pings and pongs are handled by the transport.
                _ => continue,
            };
            match parse_server_event(&payload) {
                Some(event) => return Some(event),
                // Setup acks and other bookkeeping frames carry no event.
                None => continue,
            }
        }
    }
}

/// Map one server frame to at most one relay event.
///
/// A frame can in principle carry both audio and text parts; audio wins
/// because it is the payload the relay forwards.
fn parse_server_event(payload: &Value) -> Option<Result<SpeechEvent, SpeechError>> {
    let content = payload.get("serverContent")?;

    if content
        .get("turnComplete")
        .and_then(Value::as_bool)
        .unwrap_or(false)
    {
        return Some(Ok(SpeechEvent::TurnComplete));
    }

    let parts = content
        .get("modelTurn")
        .and_then(|turn| turn.get("parts"))
        .and_then(Value::as_array)?;

    let mut audio = Vec::new();
    let mut text = String::new();
    for part in parts {
        if let Some(data) = part
            .get("inlineData")
            .and_then(|inline| inline.get("data"))
            .and_then(Value::as_str)
        {
            match BASE64.decode(data) {
                Ok(mut pcm) => audio.append(&mut pcm),
                Err(e) => return Some(Err(SpeechError::Stream(e.to_string()))),
            }
        } else if let Some(t) = part.get("text").and_then(Value::as_str) {
            text.push_str(t);
        }
    }

    if !audio.is_empty() {
        Some(Ok(SpeechEvent::Audio(audio)))
    } else if !text.is_empty() {
        Some(Ok(SpeechEvent::Text(text)))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_complete_frame_is_recognized() {
        // given:
        let payload = json!({ "serverContent": { "turnComplete": true } });

        // when / then:
        assert_eq!(
            parse_server_event(&payload).unwrap().unwrap(),
            SpeechEvent::TurnComplete
        );
    }

    #[test]
    fn test_inline_audio_parts_are_decoded_and_concatenated() {
        // given: two base64 chunks in one model turn
        let payload = json!({
            "serverContent": {
                "modelTurn": {
                    "parts": [
                        { "inlineData": { "mimeType": "audio/pcm", "data": BASE64.encode([1u8, 2]) } },
                        { "inlineData": { "mimeType": "audio/pcm", "data": BASE64.encode([3u8]) } },
                    ],
                }
            }
        });

        // when / then:
        assert_eq!(
            parse_server_event(&payload).unwrap().unwrap(),
            SpeechEvent::Audio(vec![1, 2, 3])
        );
    }

    #[test]
    fn test_text_only_turn_yields_text_event() {
        // given:
        let payload = json!({
            "serverContent": {
                "modelTurn": { "parts": [{ "text": "hello " }, { "text": "there" }] }
            }
        });

        // when / then:
        assert_eq!(
            parse_server_event(&payload).unwrap().unwrap(),
            SpeechEvent::Text("hello there".to_string())
        );
    }

    #[test]
    fn test_setup_ack_carries_no_event() {
        // given:
        let payload = json!({ "setupComplete": {} });

        // when / then:
        assert!(parse_server_event(&payload).is_none());
    }

    #[test]
    fn test_bad_base64_surfaces_as_stream_error() {
        // given:
        let payload = json!({
            "serverContent": {
                "modelTurn": {
                    "parts": [{ "inlineData": { "mimeType": "audio/pcm", "data": "!!!" } }],
                }
            }
        });

        // when / then:
        assert!(parse_server_event(&payload).unwrap().is_err());
    }
}
