use crate::speech::{SpeechError, SpeechRecognizer, Transcript};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Replays a fixed list of recognition results, then reports `Aborted`.
#[derive(Clone, Default)]
pub struct ScriptedRecognizer {
    script: Arc<Mutex<VecDeque<Result<Transcript, SpeechError>>>>,
}

impl ScriptedRecognizer {
    pub fn new(results: impl IntoIterator<Item = Result<Transcript, SpeechError>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(results.into_iter().collect())),
        }
    }
}

impl SpeechRecognizer for ScriptedRecognizer {
    fn listen(&self) -> BoxFuture<'_, Result<Transcript, SpeechError>> {
        async move {
            self.script
                .lock()
                .await
                .pop_front()
                .unwrap_or(Err(SpeechError::Aborted))
        }
        .boxed()
    }
}
