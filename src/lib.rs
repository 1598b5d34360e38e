pub mod clock;
pub mod config;
pub mod search;
pub mod sync;
pub mod transcript;

pub use clock::{MediaClock, MediaSurface, PositionUpdate, SimulatedSurface};
pub use config::{Config, ReplayConfig};
pub use search::{scan_segments, MatchSpan, QueryDebouncer, SearchMatch, SearchResults};
pub use sync::{ControllerState, PlaybackSession, SyncController, SyncEvent};
pub use transcript::{
    load_transcript, parse_transcript, SegmentIndex, TranscriptDocument, TranscriptSegment,
};
