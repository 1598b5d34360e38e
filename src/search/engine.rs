use serde::Serialize;
use tracing::warn;

use crate::transcript::TranscriptSegment;

/// Byte-offset range of one query occurrence within a segment's text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
}

/// All occurrences of the current query within one segment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchMatch {
    pub segment_id: String,
    pub segment_index: usize,
    pub spans: Vec<MatchSpan>,
}

/// Scan segments for a case-insensitive literal substring
///
/// One pass in segment order; the whole in-memory transcript is cheap to
/// rescan on every debounced query change. A segment whose case folding
/// shifts byte offsets is skipped with a warning rather than reported with
/// misaligned highlight spans.
pub fn scan_segments(segments: &[TranscriptSegment], query: &str) -> Vec<SearchMatch> {
    if query.is_empty() {
        return Vec::new();
    }
    if !fold_preserves_offsets(query) {
        // Folded-needle byte widths would misalign the reported spans
        warn!("Query case folding shifts byte offsets; returning no matches");
        return Vec::new();
    }

    let needle = query.to_lowercase();
    let mut matches = Vec::new();

    for (segment_index, segment) in segments.iter().enumerate() {
        if !fold_preserves_offsets(&segment.text) {
            warn!(
                "Skipping segment {} in search: case folding shifts byte offsets",
                segment.id
            );
            continue;
        }

        let haystack = segment.text.to_lowercase();
        let spans = find_spans(&haystack, &needle);
        if !spans.is_empty() {
            matches.push(SearchMatch {
                segment_id: segment.id.clone(),
                segment_index,
                spans,
            });
        }
    }

    matches
}

/// Non-overlapping occurrences of `needle` in `haystack`, left to right
fn find_spans(haystack: &str, needle: &str) -> Vec<MatchSpan> {
    let mut spans = Vec::new();
    let mut from = 0;

    while let Some(found) = haystack[from..].find(needle) {
        let start = from + found;
        let end = start + needle.len();
        spans.push(MatchSpan { start, end });
        from = end;
    }

    spans
}

/// Whether every character keeps its UTF-8 length under lowercasing, so
/// offsets into the folded text map back to the original
fn fold_preserves_offsets(text: &str) -> bool {
    text.chars().all(|c| {
        c.to_lowercase().map(char::len_utf8).sum::<usize>() == c.len_utf8()
    })
}

/// Ordered search matches plus a navigation cursor
///
/// The cursor starts on the first match; `next`/`previous` cycle with
/// wraparound. Navigation only reports the target; jumping the media there is
/// the session's job.
#[derive(Debug, Clone)]
pub struct SearchResults {
    query: String,
    matches: Vec<SearchMatch>,
    current: Option<usize>,
}

impl SearchResults {
    pub fn scan(segments: &[TranscriptSegment], query: &str) -> Self {
        let matches = scan_segments(segments, query);
        let current = if matches.is_empty() { None } else { Some(0) };
        Self {
            query: query.to_string(),
            matches,
            current,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn matches(&self) -> &[SearchMatch] {
        &self.matches
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Cursor position within the matches, if any
    pub fn current_match_index(&self) -> Option<usize> {
        self.current
    }

    /// The match under the cursor
    pub fn current(&self) -> Option<&SearchMatch> {
        self.current.and_then(|i| self.matches.get(i))
    }

    /// Move the cursor to the next match, wrapping past the last
    pub fn next(&mut self) -> Option<&SearchMatch> {
        if self.matches.is_empty() {
            return None;
        }
        let next = match self.current {
            Some(i) => (i + 1) % self.matches.len(),
            None => 0,
        };
        self.current = Some(next);
        self.matches.get(next)
    }

    /// Move the cursor to the previous match, wrapping past the first
    pub fn previous(&mut self) -> Option<&SearchMatch> {
        if self.matches.is_empty() {
            return None;
        }
        let previous = match self.current {
            Some(i) => (i + self.matches.len() - 1) % self.matches.len(),
            None => self.matches.len() - 1,
        };
        self.current = Some(previous);
        self.matches.get(previous)
    }
}
