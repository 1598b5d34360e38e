//! Transcript/playback synchronization
//!
//! The pure state machine lives in [`controller`]; [`session`] wires it to a
//! media clock with tokio channels and exposes the UI-facing entry points.

pub mod controller;
pub mod session;

pub use controller::{ControllerState, SyncController, SyncEvent};
pub use session::PlaybackSession;
