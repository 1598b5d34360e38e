// Unit tests for the segment index: sortedness repair, binary search lookup,
// and the nearest-preceding gap policy.

use meeting_replay::{SegmentIndex, TranscriptSegment};

fn seg(id: &str, start: f64, end: f64) -> TranscriptSegment {
    TranscriptSegment {
        id: id.to_string(),
        speaker: None,
        text: format!("segment {}", id),
        start_time: start,
        end_time: end,
        confidence: None,
    }
}

#[test]
fn test_contained_time_resolves_to_containing_segment() {
    let index = SegmentIndex::new(vec![
        seg("s1", 0.0, 5.0),
        seg("s2", 5.0, 12.0),
        seg("s3", 20.0, 25.0),
    ]);

    assert_eq!(index.find_segment_at(0.0), Some(0));
    assert_eq!(index.find_segment_at(3.0), Some(0));
    assert_eq!(index.find_segment_at(5.0), Some(1));
    assert_eq!(index.find_segment_at(11.9), Some(1));
    assert_eq!(index.find_segment_at(22.0), Some(2));
}

#[test]
fn test_gap_resolves_to_nearest_preceding_segment() {
    let index = SegmentIndex::new(vec![seg("s1", 0.0, 5.0), seg("s2", 20.0, 25.0)]);

    // Silence between s1 and s2 keeps s1 highlighted
    assert_eq!(index.find_segment_at(10.0), Some(0));
    assert_eq!(index.find_segment_at(19.9), Some(0));
}

#[test]
fn test_time_before_first_segment_is_none() {
    let index = SegmentIndex::new(vec![seg("s1", 2.0, 5.0)]);

    assert_eq!(index.find_segment_at(0.0), None);
    assert_eq!(index.find_segment_at(1.9), None);
}

#[test]
fn test_time_past_last_end_reports_last_segment() {
    let index = SegmentIndex::new(vec![seg("s1", 0.0, 5.0), seg("s2", 5.0, 12.0)]);

    assert_eq!(index.find_segment_at(12.0), Some(1));
    assert_eq!(index.find_segment_at(1000.0), Some(1));
}

#[test]
fn test_empty_index_always_none() {
    let index = SegmentIndex::new(Vec::new());

    assert!(index.is_empty());
    assert_eq!(index.find_segment_at(0.0), None);
    assert_eq!(index.find_segment_at(100.0), None);
}

#[test]
fn test_single_segment_active_from_its_start() {
    let index = SegmentIndex::new(vec![seg("only", 1.0, 4.0)]);

    assert_eq!(index.find_segment_at(0.5), None);
    assert_eq!(index.find_segment_at(1.0), Some(0));
    assert_eq!(index.find_segment_at(3.0), Some(0));
    assert_eq!(index.find_segment_at(10.0), Some(0));
}

#[test]
fn test_duplicate_start_times_lowest_index_wins() {
    let index = SegmentIndex::new(vec![
        seg("a", 0.0, 5.0),
        seg("b", 5.0, 8.0),
        seg("c", 5.0, 9.0),
    ]);

    assert_eq!(index.find_segment_at(5.0), Some(1));
    assert_eq!(index.find_segment_at(6.0), Some(1));
}

#[test]
fn test_out_of_order_input_is_stable_sorted() {
    let index = SegmentIndex::new(vec![
        seg("x", 5.0, 8.0),
        seg("y", 0.0, 5.0),
        seg("z", 5.0, 9.0),
    ]);

    // Re-sorted by start time; x and z share a start and keep their original
    // relative order
    let ids: Vec<&str> = index.segments().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["y", "x", "z"]);
    assert_eq!(index.find_segment_at(5.0), Some(1));
    assert_eq!(index.get(1).map(|s| s.id.as_str()), Some("x"));
}

#[test]
fn test_overlapping_segments_are_tolerated() {
    let index = SegmentIndex::new(vec![seg("a", 0.0, 6.0), seg("b", 4.0, 10.0)]);

    assert_eq!(index.len(), 2);
    // Inside the overlap the later-starting segment wins (greatest start <= t)
    assert_eq!(index.find_segment_at(5.0), Some(1));
    assert_eq!(index.find_segment_at(3.0), Some(0));
}

#[test]
fn test_index_of_finds_segments_by_id() {
    let index = SegmentIndex::new(vec![seg("s1", 0.0, 5.0), seg("s2", 5.0, 12.0)]);

    assert_eq!(index.index_of("s2"), Some(1));
    assert_eq!(index.index_of("missing"), None);
}
