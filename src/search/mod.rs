pub mod debounce;
pub mod engine;

pub use debounce::QueryDebouncer;
pub use engine::{scan_segments, MatchSpan, SearchMatch, SearchResults};
