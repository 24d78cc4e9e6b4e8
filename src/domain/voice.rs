//! Voice relay vocabulary: the frames exchanged with a voice client, the
//! events coming back from the upstream speech session, the trait halves of
//! that session, and the bounded drop-oldest buffer both relay pumps use.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Notify;

/// Text sentinel a client sends to mark the end of an utterance.
pub const END_OF_TURN_SENTINEL: &str = "END_OF_TURN";

/// One inbound frame from the voice client's connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientFrame {
    /// Raw PCM audio chunk.
    Audio(Vec<u8>),
    /// The client finished its utterance.
    EndOfTurn,
    /// The client connection is gone; the relay must tear down.
    Closed,
}

/// One event from the upstream speech session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    /// Inline audio payload (raw PCM), forwarded to the client.
    Audio(Vec<u8>),
    /// Text-only content; observed, never forwarded as audio.
    Text(String),
    /// The assistant finished its turn.
    TurnComplete,
}

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("speech backend unavailable: {0}")]
    Unavailable(String),

    #[error("speech session send failed: {0}")]
    Send(String),

    #[error("speech session stream failed: {0}")]
    Stream(String),
}

/// Write half of an upstream speech session.
#[async_trait]
pub trait SpeechSink: Send {
    /// Forward one raw PCM chunk.
    async fn send_audio(&mut self, pcm: Vec<u8>) -> Result<(), SpeechError>;

    /// Signal explicit end of audio input for the current turn.
    async fn end_of_audio(&mut self) -> Result<(), SpeechError>;

    /// Close the upstream session.
    async fn close(&mut self) -> Result<(), SpeechError>;
}

/// Read half of an upstream speech session. `None` means the upstream
/// closed cleanly.
#[async_trait]
pub trait SpeechStream: Send {
    async fn next_event(&mut self) -> Option<Result<SpeechEvent, SpeechError>>;
}

/// Factory for upstream speech sessions, one per voice-enabled connection.
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    async fn connect(
        &self,
        system_instruction: &str,
    ) -> Result<(Box<dyn SpeechSink>, Box<dyn SpeechStream>), SpeechError>;
}

/// Bounded single-consumer buffer between a transport read loop and a
/// transport write loop.
///
/// Audio is latency-sensitive: on overflow the oldest item is dropped so
/// the reader never blocks. Stale audio is worse than a brief gap, and
/// tokio has no drop-oldest channel, hence this small queue.
pub struct AudioBuffer<T> {
    inner: Mutex<BufferInner<T>>,
    notify: Notify,
    capacity: usize,
}

struct BufferInner<T> {
    queue: VecDeque<T>,
    closed: bool,
    dropped: u64,
}

impl<T> AudioBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "buffer capacity must be non-zero");
        Self {
            inner: Mutex::new(BufferInner {
                queue: VecDeque::with_capacity(capacity),
                closed: false,
                dropped: 0,
            }),
            notify: Notify::new(),
            capacity,
        }
    }

    /// Enqueue an item, dropping the oldest one if the buffer is full.
    /// Returns `false` if the buffer is already closed.
    pub fn push(&self, item: T) -> bool {
        {
            let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            if inner.closed {
                return false;
            }
            if inner.queue.len() == self.capacity {
                inner.queue.pop_front();
                inner.dropped += 1;
            }
            inner.queue.push_back(item);
        }
        self.notify.notify_one();
        true
    }

    /// Mark the buffer closed. The consumer drains what is queued and then
    /// receives `None`.
    pub fn close(&self) {
        {
            let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.closed = true;
        }
        self.notify.notify_one();
    }

    /// Dequeue the next item, waiting if the buffer is empty. Returns
    /// `None` once the buffer is closed and drained.
    pub async fn pop(&self) -> Option<T> {
        loop {
            {
                let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
                if let Some(item) = inner.queue.pop_front() {
                    return Some(item);
                }
                if inner.closed {
                    return None;
                }
            }
            self.notify.notified().await;
        }
    }

    /// Number of items dropped to overflow so far.
    pub fn dropped(&self) -> u64 {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_push_pop_in_order() {
        // given:
        let buffer = AudioBuffer::new(4);

        // when:
        buffer.push(1);
        buffer.push(2);
        buffer.push(3);

        // then:
        assert_eq!(buffer.pop().await, Some(1));
        assert_eq!(buffer.pop().await, Some(2));
        assert_eq!(buffer.pop().await, Some(3));
    }

    #[tokio::test]
    async fn test_overflow_drops_oldest() {
        // given:
        let buffer = AudioBuffer::new(2);

        // when: third push overflows
        buffer.push("a");
        buffer.push("b");
        buffer.push("c");

        // then: "a" was dropped, newest data survives
        assert_eq!(buffer.dropped(), 1);
        assert_eq!(buffer.pop().await, Some("b"));
        assert_eq!(buffer.pop().await, Some("c"));
    }

    #[tokio::test]
    async fn test_close_drains_then_returns_none() {
        // given:
        let buffer = AudioBuffer::new(4);
        buffer.push(7);
        buffer.close();

        // when / then: queued item first, then end of stream
        assert_eq!(buffer.pop().await, Some(7));
        assert_eq!(buffer.pop().await, None);
    }

    #[tokio::test]
    async fn test_push_after_close_is_rejected() {
        // given:
        let buffer = AudioBuffer::new(4);
        buffer.close();

        // when / then:
        assert!(!buffer.push(1));
        assert_eq!(buffer.pop().await, None);
    }

    #[tokio::test]
    async fn test_buffer_survives_a_poisoned_lock() {
        // given: a thread panics while holding the buffer lock
        let buffer = std::sync::Arc::new(AudioBuffer::new(4));
        let poisoner = buffer.clone();
        let result = std::thread::spawn(move || {
            let _guard = poisoner.inner.lock().unwrap();
            panic!("poison the lock");
        })
        .join();
        assert!(result.is_err());

        // when / then: the relay side keeps working
        assert!(buffer.push(5));
        assert_eq!(buffer.pop().await, Some(5));
        assert_eq!(buffer.dropped(), 0);
        buffer.close();
        assert_eq!(buffer.pop().await, None);
    }

    #[tokio::test]
    async fn test_pop_wakes_on_push() {
        // given:
        let buffer = std::sync::Arc::new(AudioBuffer::new(4));

        // when: consumer waits before the producer pushes
        let consumer = {
            let buffer = buffer.clone();
            tokio::spawn(async move { buffer.pop().await })
        };
        tokio::task::yield_now().await;
        buffer.push(99);

        // then:
        assert_eq!(consumer.await.unwrap(), Some(99));
    }
}
