use tracing::warn;

use super::segment::TranscriptSegment;

/// Sorted, queryable collection of transcript segments
///
/// Built once per viewing session; the segments are immutable afterwards.
/// Lookups happen on every playback position tick, so `find_segment_at` is
/// O(log n) even for multi-hour meetings with thousands of segments.
#[derive(Debug, Clone)]
pub struct SegmentIndex {
    segments: Vec<TranscriptSegment>,
}

impl SegmentIndex {
    /// Build an index from an ordered segment list
    ///
    /// Out-of-order input is corrected with a stable re-sort by start time
    /// (segments sharing a start time keep their original relative order) and
    /// logged as a data-quality warning rather than rejected. Overlapping
    /// neighbours are tolerated and flagged the same way.
    pub fn new(mut segments: Vec<TranscriptSegment>) -> Self {
        let sorted = segments
            .windows(2)
            .all(|w| w[0].start_time <= w[1].start_time);
        if !sorted {
            warn!("Transcript segments arrived out of order; re-sorting by start time");
            segments.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
        }

        let overlaps = segments
            .windows(2)
            .filter(|w| w[1].start_time < w[0].end_time)
            .count();
        if overlaps > 0 {
            warn!("Transcript contains {} overlapping segment pairs", overlaps);
        }

        Self { segments }
    }

    /// Segments in index order
    pub fn segments(&self) -> &[TranscriptSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segment at `index`, if in range
    pub fn get(&self, index: usize) -> Option<&TranscriptSegment> {
        self.segments.get(index)
    }

    /// Index of the segment with the given id
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.segments.iter().position(|s| s.id == id)
    }

    /// Find the segment active at `time`
    ///
    /// Returns the segment with the greatest start time <= `time`, so the
    /// nearest preceding segment stays highlighted across silence gaps and a
    /// position past the last segment's end still reports the last segment.
    /// Returns `None` when `time` precedes the first segment. Among segments
    /// sharing a start time, the lowest original index wins.
    pub fn find_segment_at(&self, time: f64) -> Option<usize> {
        let after = self.segments.partition_point(|s| s.start_time <= time);
        let last = after.checked_sub(1)?;
        let start = self.segments[last].start_time;
        Some(self.segments.partition_point(|s| s.start_time < start))
    }
}
