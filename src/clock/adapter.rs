use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::surface::MediaSurface;

/// A playback position notification
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionUpdate {
    /// Position in seconds
    pub time: f64,

    /// Set when this update is the optimistic echo of a seek; carries that
    /// seek's generation counter. Regular ticker updates leave it `None`.
    pub generation: Option<u64>,
}

/// Media clock adapter
///
/// Wraps a [`MediaSurface`] and exposes a rate-limited position-update
/// channel: the underlying player may move every millisecond, but subscribers
/// only ever see one update per tick interval. Seeks are clamped to the known
/// duration and echoed to subscribers immediately so the UI never lags behind
/// a jump while the surface catches up.
pub struct MediaClock {
    surface: Arc<dyn MediaSurface>,
    tick_interval: Duration,
    update_tx: Mutex<Option<mpsc::Sender<PositionUpdate>>>,
    ticker: Mutex<Option<JoinHandle<()>>>,
    running: Arc<AtomicBool>,
}

impl MediaClock {
    pub fn new(surface: Arc<dyn MediaSurface>, tick_interval: Duration) -> Self {
        Self {
            surface,
            tick_interval,
            update_tx: Mutex::new(None),
            ticker: Mutex::new(None),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start forwarding position updates
    ///
    /// Returns the channel receiver that will see one update per tick
    /// interval, plus an immediate echo for every accepted seek.
    pub async fn start(&self) -> Result<mpsc::Receiver<PositionUpdate>> {
        let mut update_tx = self.update_tx.lock().await;
        if update_tx.is_some() {
            anyhow::bail!("Media clock already started");
        }

        let (tx, rx) = mpsc::channel(32);
        *update_tx = Some(tx.clone());
        drop(update_tx);

        self.running.store(true, Ordering::SeqCst);

        let surface = Arc::clone(&self.surface);
        let running = Arc::clone(&self.running);
        let tick_interval = self.tick_interval;

        let ticker_task = tokio::spawn(async move {
            debug!("Position ticker started for surface: {}", surface.name());

            let mut ticker = tokio::time::interval(tick_interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;

                if !running.load(Ordering::SeqCst) {
                    break;
                }

                let update = PositionUpdate {
                    time: surface.position(),
                    generation: None,
                };

                // Receiver gone means the session shut down
                if tx.send(update).await.is_err() {
                    break;
                }
            }

            debug!("Position ticker stopped");
        });

        {
            let mut ticker = self.ticker.lock().await;
            *ticker = Some(ticker_task);
        }

        Ok(rx)
    }

    /// Stop the ticker and close the update channel
    pub async fn stop(&self) -> Result<()> {
        self.running.store(false, Ordering::SeqCst);

        {
            let mut update_tx = self.update_tx.lock().await;
            *update_tx = None;
        }

        let task = {
            let mut ticker = self.ticker.lock().await;
            ticker.take()
        };
        if let Some(task) = task {
            task.abort();
            let _ = task.await;
        }

        Ok(())
    }

    /// Request a seek, clamped to `[0, duration]`
    ///
    /// Subscribers are notified of the intended position immediately (tagged
    /// with the seek's generation) rather than waiting for the surface's own
    /// change notification. Returns `false` when seeking is unavailable
    /// because the duration is still unknown.
    pub async fn seek(&self, time: f64, generation: u64) -> bool {
        let Some(duration) = self.surface.duration() else {
            warn!("Seek ignored: media duration unknown (metadata not loaded)");
            return false;
        };

        let clamped = time.clamp(0.0, duration);

        let tx = self.update_tx.lock().await.clone();
        if let Some(tx) = tx {
            let echo = PositionUpdate {
                time: clamped,
                generation: Some(generation),
            };
            let _ = tx.send(echo).await;
        }

        if let Err(e) = self.surface.set_position(clamped).await {
            // Non-fatal: the jump watchdog reports unconfirmed seeks
            warn!(
                "Surface {} rejected seek to {:.2}s: {}",
                self.surface.name(),
                clamped,
                e
            );
        }

        true
    }

    /// Current playback position in seconds
    pub fn position(&self) -> f64 {
        self.surface.position()
    }

    /// Total duration, if media metadata has loaded
    pub fn duration(&self) -> Option<f64> {
        self.surface.duration()
    }

    /// Whether playback is currently advancing
    pub fn is_playing(&self) -> bool {
        self.surface.is_playing()
    }
}
