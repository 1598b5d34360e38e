use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::clock::MediaClock;
use crate::config::ReplayConfig;
use crate::search::{SearchMatch, SearchResults};
use crate::sync::controller::{SyncController, SyncEvent};
use crate::transcript::{SegmentIndex, TranscriptSegment};

/// A playback session binding one transcript to one media clock
///
/// Owns the pure [`SyncController`] and the async wiring around it: a spawned
/// task consumes the clock's position channel, runs the machine, executes its
/// seek requests against the clock, and forwards the remaining events to the
/// UI consumer on the channel returned from [`start`](Self::start).
pub struct PlaybackSession {
    controller: Arc<Mutex<SyncController>>,
    clock: Arc<MediaClock>,
    results: Mutex<Option<SearchResults>>,
    event_tx: Arc<Mutex<Option<mpsc::Sender<SyncEvent>>>>,
    position_task: Mutex<Option<JoinHandle<()>>>,
    running: Arc<AtomicBool>,
}

impl PlaybackSession {
    pub fn new(index: SegmentIndex, clock: MediaClock, config: &ReplayConfig) -> Self {
        Self {
            controller: Arc::new(Mutex::new(SyncController::new(index, config))),
            clock: Arc::new(clock),
            results: Mutex::new(None),
            event_tx: Arc::new(Mutex::new(None)),
            position_task: Mutex::new(None),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start the session
    ///
    /// Starts the media clock and returns the event channel the UI consumer
    /// should drain. Events flow until [`stop`](Self::stop) is called.
    pub async fn start(&self) -> Result<mpsc::Receiver<SyncEvent>> {
        if self.running.swap(true, Ordering::SeqCst) {
            anyhow::bail!("Playback session already started");
        }

        info!("Starting playback session");

        let mut position_rx = self.clock.start().await?;

        let (event_tx, event_rx) = mpsc::channel(64);
        {
            let mut tx = self.event_tx.lock().await;
            *tx = Some(event_tx.clone());
        }

        // Promote the controller out of Idle now that a clock is attached
        {
            let mut controller = self.controller.lock().await;
            let events = controller.media_ready();
            forward_events(&self.clock, &event_tx, events).await;
        }

        let controller = Arc::clone(&self.controller);
        let clock = Arc::clone(&self.clock);
        let running = Arc::clone(&self.running);

        let position_task = tokio::spawn(async move {
            debug!("Position consumer task started");

            while let Some(update) = position_rx.recv().await {
                if !running.load(Ordering::SeqCst) {
                    break;
                }

                let events = {
                    let mut controller = controller.lock().await;
                    controller.on_position_update(update, Instant::now())
                };
                forward_events(&clock, &event_tx, events).await;
            }

            debug!("Position consumer task stopped");
        });

        {
            let mut task = self.position_task.lock().await;
            *task = Some(position_task);
        }

        Ok(event_rx)
    }

    /// Stop the session and join its tasks
    pub async fn stop(&self) -> Result<()> {
        if !self.running.swap(false, Ordering::SeqCst) {
            warn!("Playback session not running");
            return Ok(());
        }

        info!("Stopping playback session");

        self.clock.stop().await?;

        {
            let mut tx = self.event_tx.lock().await;
            *tx = None;
        }

        let task = {
            let mut task = self.position_task.lock().await;
            task.take()
        };
        if let Some(task) = task {
            if let Err(e) = task.await {
                error!("Position consumer task panicked: {}", e);
            }
        }

        Ok(())
    }

    /// Jump media playback to the start of a transcript segment
    pub async fn seek_to_segment(&self, id: &str) -> Result<()> {
        let events = {
            let mut controller = self.controller.lock().await;
            controller.seek_to_segment(id, Instant::now())
        };
        self.dispatch(events).await;
        Ok(())
    }

    /// A seek-bar drag began
    pub async fn scrub_start(&self) {
        let events = {
            let mut controller = self.controller.lock().await;
            controller.scrub_start()
        };
        self.dispatch(events).await;
    }

    /// An intermediate drag position
    pub async fn scrub_move(&self, time: f64) {
        let events = {
            let mut controller = self.controller.lock().await;
            controller.scrub_move(time)
        };
        self.dispatch(events).await;
    }

    /// The drag ended with a final position
    pub async fn scrub_end(&self, time: f64) {
        let events = {
            let mut controller = self.controller.lock().await;
            controller.scrub_end(time)
        };
        self.dispatch(events).await;
    }

    /// Index of the segment currently deemed playing
    pub async fn active_segment_index(&self) -> Option<usize> {
        self.controller.lock().await.active_segment_index()
    }

    /// The segment currently deemed playing
    pub async fn current_segment(&self) -> Option<TranscriptSegment> {
        self.controller.lock().await.current_segment().cloned()
    }

    /// Run a search over the transcript and remember the results for
    /// next/previous navigation
    ///
    /// Searching never moves playback; only navigation does.
    pub async fn search(&self, query: &str) -> SearchResults {
        let results = {
            let controller = self.controller.lock().await;
            SearchResults::scan(controller.index().segments(), query)
        };

        info!(
            "Search '{}' matched {} segments",
            query,
            results.len()
        );

        {
            let mut current = self.results.lock().await;
            *current = Some(results.clone());
        }

        results
    }

    /// Jump media to the match under the cursor without advancing it
    ///
    /// A fresh search leaves the cursor on the first match; this is the entry
    /// point for the initial "go to first result" jump. `next_match` and
    /// `previous_match` advance the cursor first.
    pub async fn jump_to_current_match(&self) -> Result<Option<SearchMatch>> {
        let target = {
            let results = self.results.lock().await;
            results.as_ref().and_then(|r| r.current().cloned())
        };

        if let Some(found) = &target {
            self.seek_to_segment(&found.segment_id).await?;
        }

        Ok(target)
    }

    /// Advance to the next search match (wrapping) and jump media there
    pub async fn next_match(&self) -> Result<Option<SearchMatch>> {
        let target = {
            let mut results = self.results.lock().await;
            results.as_mut().and_then(|r| r.next().cloned())
        };

        if let Some(found) = &target {
            self.seek_to_segment(&found.segment_id).await?;
        }

        Ok(target)
    }

    /// Step back to the previous search match (wrapping) and jump media there
    pub async fn previous_match(&self) -> Result<Option<SearchMatch>> {
        let target = {
            let mut results = self.results.lock().await;
            results.as_mut().and_then(|r| r.previous().cloned())
        };

        if let Some(found) = &target {
            self.seek_to_segment(&found.segment_id).await?;
        }

        Ok(target)
    }

    /// Cursor position within the current search results
    pub async fn current_match_index(&self) -> Option<usize> {
        let results = self.results.lock().await;
        results.as_ref().and_then(|r| r.current_match_index())
    }

    async fn dispatch(&self, events: Vec<SyncEvent>) {
        let tx = self.event_tx.lock().await.clone();
        if let Some(tx) = tx {
            forward_events(&self.clock, &tx, events).await;
        }
    }
}

/// Execute seek requests against the clock; forward everything else to the
/// UI consumer
async fn forward_events(
    clock: &MediaClock,
    event_tx: &mpsc::Sender<SyncEvent>,
    events: Vec<SyncEvent>,
) {
    for event in events {
        match event {
            SyncEvent::SeekRequested { time, generation } => {
                if !clock.seek(time, generation).await {
                    // Duration unknown: seeking is disabled until metadata
                    // resolves, which the consumer should surface
                    let _ = event_tx.send(SyncEvent::SeekUnavailable).await;
                }
            }
            other => {
                let _ = event_tx.send(other).await;
            }
        }
    }
}
