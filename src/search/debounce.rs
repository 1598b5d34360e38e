use anyhow::{anyhow, Result};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Debounced query stream
///
/// Collapses a keystroke-rate stream of query strings down to the last value
/// seen once input has stayed quiet for the debounce window. The receiver
/// returned from [`new`](Self::new) sees one query per settled edit burst;
/// feeding each one to [`PlaybackSession::search`](crate::PlaybackSession::search)
/// gives keystroke search without rescanning on every character.
pub struct QueryDebouncer {
    input_tx: mpsc::Sender<String>,
    task: JoinHandle<()>,
}

impl QueryDebouncer {
    pub fn new(window: Duration) -> (Self, mpsc::Receiver<String>) {
        let (input_tx, mut input_rx) = mpsc::channel::<String>(64);
        let (output_tx, output_rx) = mpsc::channel(8);

        let task = tokio::spawn(async move {
            debug!("Query debouncer started ({}ms window)", window.as_millis() as u64);

            let mut pending: Option<String> = None;
            loop {
                match pending.take() {
                    None => match input_rx.recv().await {
                        Some(query) => pending = Some(query),
                        None => break,
                    },
                    Some(query) => {
                        tokio::select! {
                            newer = input_rx.recv() => match newer {
                                // A newer keystroke restarts the quiet window
                                Some(newer) => pending = Some(newer),
                                None => {
                                    let _ = output_tx.send(query).await;
                                    break;
                                }
                            },
                            _ = tokio::time::sleep(window) => {
                                let _ = output_tx.send(query).await;
                            }
                        }
                    }
                }
            }

            debug!("Query debouncer stopped");
        });

        (Self { input_tx, task }, output_rx)
    }

    /// Submit one keystroke-level query value
    pub async fn submit(&self, query: impl Into<String>) -> Result<()> {
        self.input_tx
            .send(query.into())
            .await
            .map_err(|_| anyhow!("Query debouncer stopped"))
    }

    /// Flush any pending query and stop the debouncer
    pub async fn shutdown(self) {
        drop(self.input_tx);
        let _ = self.task.await;
    }
}
