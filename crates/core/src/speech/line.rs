use crate::speech::{SpeechError, SpeechRecognizer, Transcript};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

/// Treats each line of text from a reader as one utterance. Stands in for a
/// microphone when transcripts come from another program or a person typing.
pub struct LineRecognizer<R> {
    lines: Arc<Mutex<Lines<R>>>,
}

impl<R> Clone for LineRecognizer<R> {
    fn clone(&self) -> Self {
        Self {
            lines: Arc::clone(&self.lines),
        }
    }
}

impl<R: AsyncBufRead + Unpin> LineRecognizer<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: Arc::new(Mutex::new(reader.lines())),
        }
    }
}

impl LineRecognizer<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R> SpeechRecognizer for LineRecognizer<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    fn listen(&self) -> BoxFuture<'_, Result<Transcript, SpeechError>> {
        async move {
            let mut lines = self.lines.lock().await;
            match lines.next_line().await {
                Ok(Some(line)) if line.trim().is_empty() => Err(SpeechError::NoSpeech),
                Ok(Some(line)) => Ok(Transcript::new(line)),
                Ok(None) => Err(SpeechError::Aborted),
                Err(e) => {
                    tracing::warn!(error = %e, "transcript source unreadable");
                    Err(SpeechError::DeviceMissing)
                }
            }
        }
        .boxed()
    }
}
