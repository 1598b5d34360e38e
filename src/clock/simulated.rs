use anyhow::Result;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use super::surface::MediaSurface;

/// Deterministic in-memory playback surface
///
/// Advances along a virtual timeline under caller control; stands in for a
/// real player in tests and the demo binary. Clones share the same timeline,
/// so a test can keep one handle while the clock owns another.
#[derive(Clone)]
pub struct SimulatedSurface {
    state: Arc<Mutex<SurfaceState>>,
    seekable: bool,
}

#[derive(Debug)]
struct SurfaceState {
    position: f64,
    duration: Option<f64>,
    playing: bool,
}

impl SimulatedSurface {
    /// Surface with known duration, paused at 0
    pub fn new(duration: f64) -> Self {
        Self::with_state(Some(duration), true)
    }

    /// Surface whose media metadata has not loaded yet
    pub fn without_duration() -> Self {
        Self::with_state(None, true)
    }

    /// Surface that silently ignores seeks (e.g. a live stream)
    pub fn unseekable(duration: f64) -> Self {
        Self::with_state(Some(duration), false)
    }

    fn with_state(duration: Option<f64>, seekable: bool) -> Self {
        Self {
            state: Arc::new(Mutex::new(SurfaceState {
                position: 0.0,
                duration,
                playing: false,
            })),
            seekable,
        }
    }

    pub fn set_playing(&self, playing: bool) {
        self.lock().playing = playing;
    }

    /// Resolve previously unknown media metadata
    pub fn set_duration(&self, duration: f64) {
        self.lock().duration = Some(duration);
    }

    /// Advance the virtual timeline while playing
    ///
    /// Clamps at the end of the media and pauses there.
    pub fn advance(&self, seconds: f64) {
        let mut state = self.lock();
        if !state.playing {
            return;
        }
        state.position += seconds;
        if let Some(duration) = state.duration {
            if state.position >= duration {
                state.position = duration;
                state.playing = false;
            }
        }
    }

    /// Whether the timeline has reached the end of the media
    pub fn at_end(&self) -> bool {
        let state = self.lock();
        match state.duration {
            Some(duration) => state.position >= duration,
            None => false,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SurfaceState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait::async_trait]
impl MediaSurface for SimulatedSurface {
    fn position(&self) -> f64 {
        self.lock().position
    }

    fn duration(&self) -> Option<f64> {
        self.lock().duration
    }

    fn is_playing(&self) -> bool {
        self.lock().playing
    }

    async fn set_position(&self, time: f64) -> Result<()> {
        if !self.seekable {
            debug!("Simulated surface is unseekable; ignoring seek to {:.2}s", time);
            return Ok(());
        }
        self.lock().position = time;
        Ok(())
    }

    fn name(&self) -> &str {
        "simulated"
    }
}
