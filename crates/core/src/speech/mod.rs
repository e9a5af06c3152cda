mod line;
mod scripted;

use crate::util::{retry_with_backoff, RetryConfig};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;

pub use line::LineRecognizer;
pub use scripted::ScriptedRecognizer;

/// A final (not interim) recognition result, as the recognizer produced it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Transcript {
    pub text: String,
    pub confidence: Option<f32>,
}

impl Transcript {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            confidence: None,
        }
    }
}

/// Messages are written for the person holding the microphone.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SpeechError {
    #[error("No speech detected. Try speaking a little louder.")]
    NoSpeech,

    #[error("Microphone permission denied. Please allow microphone access.")]
    PermissionDenied,

    #[error("Microphone not found. Please check your audio settings.")]
    DeviceMissing,

    #[error("Network error. Please check your connection.")]
    Network,

    #[error("Listening stopped.")]
    Aborted,
}

impl SpeechError {
    /// Whether listening again might succeed without the user doing anything.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SpeechError::NoSpeech | SpeechError::Network)
    }
}

pub trait SpeechRecognizer: Send + Sync {
    /// Listens for one utterance.
    fn listen(&self) -> BoxFuture<'_, Result<Transcript, SpeechError>>;
}

#[derive(Clone, Debug)]
pub struct ListenOptions {
    /// Keep listening after each utterance until stopped.
    pub continuous: bool,
    /// Pause before listening again in continuous mode.
    pub restart_delay: Duration,
    pub retry: RetryConfig,
}

impl Default for ListenOptions {
    fn default() -> Self {
        Self {
            continuous: false,
            restart_delay: Duration::from_secs(1),
            retry: RetryConfig::default(),
        }
    }
}

/// One utterance, retrying transient failures.
pub async fn listen_once<R: SpeechRecognizer>(
    recognizer: &R,
    retry: &RetryConfig,
) -> Result<Transcript, SpeechError> {
    retry_with_backoff(retry, || recognizer.listen(), SpeechError::is_retryable).await
}

/// Runs recognition on its own task and hands every result to the returned
/// receiver. Stops after the first result unless `continuous` is set, after a
/// non-retryable error, or once the receiver is dropped.
pub fn spawn_listener<R>(
    recognizer: R,
    options: ListenOptions,
) -> mpsc::Receiver<Result<Transcript, SpeechError>>
where
    R: SpeechRecognizer + 'static,
{
    let (tx, rx) = mpsc::channel(4);
    tokio::spawn(async move {
        loop {
            let result = listen_once(&recognizer, &options.retry).await;
            let stop = match &result {
                Ok(_) => !options.continuous,
                Err(e) => !options.continuous || !e.is_retryable(),
            };
            if let Err(e) = &result {
                tracing::debug!(error = %e, "recognition ended without a transcript");
            }
            if tx.send(result).await.is_err() || stop {
                break;
            }
            tokio::time::sleep(options.restart_delay).await;
        }
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast(continuous: bool) -> ListenOptions {
        ListenOptions {
            continuous,
            restart_delay: Duration::ZERO,
            retry: RetryConfig::new(3, Duration::ZERO),
        }
    }

    #[test]
    fn listen_once_retries_silence() {
        let recognizer = ScriptedRecognizer::new([
            Err(SpeechError::NoSpeech),
            Ok(Transcript::new("I feel great")),
        ]);
        let rt = tokio::runtime::Runtime::new().unwrap();
        let transcript = rt
            .block_on(listen_once(&recognizer, &RetryConfig::new(3, Duration::ZERO)))
            .unwrap();
        assert_eq!(transcript.text, "I feel great");
    }

    #[test]
    fn permission_errors_are_not_retried() {
        let recognizer = ScriptedRecognizer::new([
            Err(SpeechError::PermissionDenied),
            Ok(Transcript::new("never heard")),
        ]);
        let rt = tokio::runtime::Runtime::new().unwrap();
        let err = rt
            .block_on(listen_once(&recognizer, &RetryConfig::new(3, Duration::ZERO)))
            .unwrap_err();
        assert_eq!(err, SpeechError::PermissionDenied);
    }

    #[tokio::test]
    async fn single_shot_listener_delivers_one_result() {
        let recognizer = ScriptedRecognizer::new([
            Ok(Transcript::new("calm")),
            Ok(Transcript::new("sad")),
        ]);
        let mut rx = spawn_listener(recognizer, fast(false));
        assert_eq!(rx.recv().await, Some(Ok(Transcript::new("calm"))));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn continuous_listener_runs_until_aborted() {
        let recognizer = ScriptedRecognizer::new([
            Ok(Transcript::new("calm")),
            Ok(Transcript::new("sad")),
        ]);
        let mut rx = spawn_listener(recognizer, fast(true));
        assert_eq!(rx.recv().await, Some(Ok(Transcript::new("calm"))));
        assert_eq!(rx.recv().await, Some(Ok(Transcript::new("sad"))));
        // The script is exhausted, which reads as the user stopping.
        assert_eq!(rx.recv().await, Some(Err(SpeechError::Aborted)));
        assert_eq!(rx.recv().await, None);
    }
}
