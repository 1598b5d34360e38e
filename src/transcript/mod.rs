pub mod index;
pub mod loader;
pub mod segment;

pub use index::SegmentIndex;
pub use loader::{load_transcript, parse_transcript};
pub use segment::{TranscriptDocument, TranscriptSegment};
