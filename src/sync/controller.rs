use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::clock::PositionUpdate;
use crate::config::ReplayConfig;
use crate::transcript::{SegmentIndex, TranscriptSegment};

/// Sync controller states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// No media or no segments available yet
    Idle,
    /// The active segment tracks the live playback position
    Following,
    /// A seek-bar drag is in progress; previews only, no real seeks
    UserScrubbing,
    /// A programmatic seek was issued and awaits position confirmation
    Jumping,
}

/// Events emitted by the controller
///
/// `SeekRequested` is an instruction for the driver owning the media clock;
/// everything else is for the UI consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    /// The active segment changed. Emitted on change only; an unchanged index
    /// is never re-emitted, so consumers can scroll/restyle without diffing.
    ActiveSegmentChanged { index: Option<usize> },

    /// Preview while scrubbing; real playback has not moved yet
    PreviewSegment { index: Option<usize> },

    /// The controller entered a new state
    StateChanged(ControllerState),

    /// The driver should issue this seek against the media clock
    SeekRequested { time: f64, generation: u64 },

    /// A jump never confirmed within the watchdog window; the transcript
    /// stays visible but unsynchronized until playback recovers
    SeekUnavailable,
}

struct PendingJump {
    target: f64,
    deadline: Instant,
}

/// State machine binding media position updates to segment lookups
///
/// Pure: no I/O, no channels, no timers. Inputs arrive as method calls with
/// the current instant injected, and effects come back as events for the
/// caller to execute, so the machine is testable without a runtime.
/// [`PlaybackSession`](super::PlaybackSession) wires it to a real clock.
pub struct SyncController {
    index: SegmentIndex,
    state: ControllerState,

    /// Last index reported to consumers; lookups resolving to the same index
    /// are suppressed
    active_index: Option<usize>,

    /// Last preview index reported during a scrub
    preview_index: Option<Option<usize>>,

    last_position: f64,

    /// Monotonic seek generation; position echoes from superseded seeks are
    /// discarded
    seek_generation: u64,

    pending_jump: Option<PendingJump>,

    seek_tolerance: f64,
    jump_watchdog: Duration,
}

impl SyncController {
    pub fn new(index: SegmentIndex, config: &ReplayConfig) -> Self {
        Self {
            index,
            state: ControllerState::Idle,
            active_index: None,
            preview_index: None,
            last_position: 0.0,
            seek_generation: 0,
            pending_jump: None,
            seek_tolerance: config.seek_tolerance(),
            jump_watchdog: config.jump_watchdog(),
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Index of the segment currently deemed playing
    pub fn active_segment_index(&self) -> Option<usize> {
        self.active_index
    }

    /// The segment currently deemed playing
    pub fn current_segment(&self) -> Option<&TranscriptSegment> {
        self.active_index.and_then(|i| self.index.get(i))
    }

    pub fn index(&self) -> &SegmentIndex {
        &self.index
    }

    /// Last playback position seen, in seconds
    pub fn position(&self) -> f64 {
        self.last_position
    }

    /// Signal that a usable media clock is attached
    ///
    /// Promotes `Idle` to `Following` once segments are present. An empty
    /// transcript keeps the controller idle: every lookup would be `None`.
    pub fn media_ready(&mut self) -> Vec<SyncEvent> {
        let mut events = Vec::new();
        if self.state == ControllerState::Idle && !self.index.is_empty() {
            self.set_state(ControllerState::Following, &mut events);
        }
        events
    }

    /// Consume one rate-limited position update from the media clock
    pub fn on_position_update(&mut self, update: PositionUpdate, now: Instant) -> Vec<SyncEvent> {
        let mut events = Vec::new();

        // Echoes from superseded seeks are stale; a newer seek or search
        // jump has already replaced their target.
        if let Some(generation) = update.generation {
            if generation != self.seek_generation {
                debug!(
                    "Ignoring stale seek echo (generation {}, current {})",
                    generation, self.seek_generation
                );
                return events;
            }
        }

        match self.state {
            ControllerState::Idle => {}

            ControllerState::Following => {
                self.follow(update.time, &mut events);
            }

            ControllerState::UserScrubbing => {
                // Live ticks during a drag never move the highlight; the
                // preview follows the drag position instead.
                self.last_position = update.time;
            }

            ControllerState::Jumping => {
                let Some(jump) = self.pending_jump.as_ref() else {
                    // No pending target to wait on; resume following
                    self.set_state(ControllerState::Following, &mut events);
                    self.follow(update.time, &mut events);
                    return events;
                };
                let target = jump.target;
                let deadline = jump.deadline;

                if update.generation.is_some() {
                    // Optimistic echo of the in-flight seek: move the
                    // highlight now so the jump feels instant, but hold in
                    // Jumping until the surface itself reports the target.
                    // An unseekable surface never will, and the watchdog
                    // below bounds that case.
                    self.follow(update.time, &mut events);
                } else if (update.time - target).abs() <= self.seek_tolerance {
                    self.pending_jump = None;
                    self.set_state(ControllerState::Following, &mut events);
                    self.follow(update.time, &mut events);
                } else if now >= deadline {
                    warn!(
                        "Seek to {:.2}s never confirmed; falling back to live position {:.2}s",
                        target, update.time
                    );
                    self.pending_jump = None;
                    events.push(SyncEvent::SeekUnavailable);
                    self.set_state(ControllerState::Following, &mut events);
                    self.follow(update.time, &mut events);
                }
                // Otherwise: a pre-seek position still in flight. Dropping it
                // prevents the highlight flicking back to the old segment for
                // one tick after the user's jump.
            }
        }

        events
    }

    /// Jump playback to the start of the segment with the given id
    ///
    /// Entry point for "click a transcript line" and for search-match
    /// navigation. The controller holds in `Jumping` until an untagged
    /// position update from the surface lands within tolerance of the
    /// target; the seek's own optimistic echo only previews the highlight.
    pub fn seek_to_segment(&mut self, id: &str, now: Instant) -> Vec<SyncEvent> {
        let mut events = Vec::new();

        let Some(segment_index) = self.index.index_of(id) else {
            warn!("seek_to_segment: unknown segment id {}", id);
            return events;
        };

        if self.state == ControllerState::Idle {
            debug!("seek_to_segment ignored while idle");
            return events;
        }

        let target = match self.index.get(segment_index) {
            Some(segment) => segment.start_time,
            None => return events,
        };

        self.preview_index = None;
        self.seek_generation += 1;
        self.pending_jump = Some(PendingJump {
            target,
            deadline: now + self.jump_watchdog,
        });
        self.set_state(ControllerState::Jumping, &mut events);
        events.push(SyncEvent::SeekRequested {
            time: target,
            generation: self.seek_generation,
        });

        events
    }

    /// A seek-bar drag began
    pub fn scrub_start(&mut self) -> Vec<SyncEvent> {
        let mut events = Vec::new();

        match self.state {
            ControllerState::Following | ControllerState::Jumping => {
                // Grabbing the bar abandons any in-flight jump
                self.pending_jump = None;
                self.preview_index = None;
                self.set_state(ControllerState::UserScrubbing, &mut events);
            }
            ControllerState::UserScrubbing => {}
            ControllerState::Idle => {
                debug!("scrub_start ignored while idle");
            }
        }

        events
    }

    /// An intermediate drag position; computes a preview, issues no seek
    pub fn scrub_move(&mut self, time: f64) -> Vec<SyncEvent> {
        let mut events = Vec::new();

        if self.state != ControllerState::UserScrubbing {
            return events;
        }

        let preview = self.index.find_segment_at(time);
        if self.preview_index != Some(preview) {
            self.preview_index = Some(preview);
            events.push(SyncEvent::PreviewSegment { index: preview });
        }

        events
    }

    /// The drag ended; issue exactly one seek with the final value
    pub fn scrub_end(&mut self, time: f64) -> Vec<SyncEvent> {
        let mut events = Vec::new();

        if self.state != ControllerState::UserScrubbing {
            debug!("scrub_end outside of a scrub; ignoring");
            return events;
        }

        self.preview_index = None;
        self.seek_generation += 1;
        self.set_state(ControllerState::Following, &mut events);
        events.push(SyncEvent::SeekRequested {
            time,
            generation: self.seek_generation,
        });

        events
    }

    fn follow(&mut self, time: f64, events: &mut Vec<SyncEvent>) {
        self.last_position = time;
        let index = self.index.find_segment_at(time);
        if index != self.active_index {
            self.active_index = index;
            events.push(SyncEvent::ActiveSegmentChanged { index });
        }
    }

    fn set_state(&mut self, state: ControllerState, events: &mut Vec<SyncEvent>) {
        if self.state != state {
            self.state = state;
            events.push(SyncEvent::StateChanged(state));
        }
    }
}
