// End-to-end playback session tests over the simulated surface: position
// updates flow through the controller to the event channel, transcript clicks
// move the clock, and search navigation follows matches.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use meeting_replay::{
    MediaClock, MediaSurface, PlaybackSession, ReplayConfig, SegmentIndex, SimulatedSurface,
    SyncEvent, TranscriptSegment,
};
use tokio::sync::mpsc;
use tokio::time::timeout;

fn seg(id: &str, text: &str, start: f64, end: f64) -> TranscriptSegment {
    TranscriptSegment {
        id: id.to_string(),
        speaker: None,
        text: text.to_string(),
        start_time: start,
        end_time: end,
        confidence: None,
    }
}

fn fast_config() -> ReplayConfig {
    ReplayConfig {
        tick_interval_ms: 10,
        ..ReplayConfig::default()
    }
}

fn fixture_index() -> SegmentIndex {
    SegmentIndex::new(vec![
        seg("s1", "welcome everyone", 0.0, 5.0),
        seg("s2", "first agenda item", 5.0, 12.0),
        seg("s3", "budget discussion", 20.0, 25.0),
    ])
}

fn session_over(surface: &SimulatedSurface) -> PlaybackSession {
    let config = fast_config();
    let clock = MediaClock::new(Arc::new(surface.clone()), config.tick_interval());
    PlaybackSession::new(fixture_index(), clock, &config)
}

/// Drain events until the next active-segment change (or time out)
async fn next_active(events: &mut mpsc::Receiver<SyncEvent>) -> Option<usize> {
    let deadline = Duration::from_secs(2);
    loop {
        let event = timeout(deadline, events.recv())
            .await
            .expect("timed out waiting for event")
            .expect("event channel closed");
        if let SyncEvent::ActiveSegmentChanged { index } = event {
            return index;
        }
    }
}

#[tokio::test]
async fn test_session_tracks_advancing_playback() -> Result<()> {
    let surface = SimulatedSurface::new(30.0);
    surface.set_playing(true);
    let session = session_over(&surface);

    let mut events = session.start().await?;

    assert_eq!(next_active(&mut events).await, Some(0));

    surface.advance(7.0); // position 7.0, inside s2
    assert_eq!(next_active(&mut events).await, Some(1));

    surface.advance(15.0); // position 22.0, inside s3
    assert_eq!(next_active(&mut events).await, Some(2));

    session.stop().await
}

#[tokio::test]
async fn test_seek_to_segment_moves_clock_and_highlight() -> Result<()> {
    let surface = SimulatedSurface::new(30.0);
    surface.set_playing(true);
    let session = session_over(&surface);

    let mut events = session.start().await?;
    assert_eq!(next_active(&mut events).await, Some(0));

    session.seek_to_segment("s3").await?;

    assert_eq!(next_active(&mut events).await, Some(2));
    assert!((surface.position() - 20.0).abs() < 0.01);
    assert_eq!(session.active_segment_index().await, Some(2));
    assert_eq!(
        session.current_segment().await.map(|s| s.id),
        Some("s3".to_string())
    );

    session.stop().await
}

#[tokio::test]
async fn test_search_navigation_jumps_between_matches() -> Result<()> {
    let surface = SimulatedSurface::new(30.0);
    surface.set_playing(true);
    let session = session_over(&surface);

    let mut events = session.start().await?;
    assert_eq!(next_active(&mut events).await, Some(0));

    let results = session.search("agenda").await;
    assert_eq!(results.len(), 1);
    assert_eq!(session.current_match_index().await, Some(0));

    let target = session.next_match().await?.expect("should have a match");
    assert_eq!(target.segment_id, "s2");

    assert_eq!(next_active(&mut events).await, Some(1));
    assert!((surface.position() - 5.0).abs() < 0.01);

    session.stop().await
}

#[tokio::test]
async fn test_match_navigation_starts_at_first_match() -> Result<()> {
    let surface = SimulatedSurface::new(30.0);
    surface.set_playing(true);
    let session = session_over(&surface);

    let mut events = session.start().await?;
    assert_eq!(next_active(&mut events).await, Some(0));

    // "i" hits s2 ("first agenda item") and s3 ("budget discussion")
    let results = session.search("i").await;
    assert_eq!(results.len(), 2);

    // The initial jump goes to the cursor's match, not past it
    let first = session.jump_to_current_match().await?.expect("first match");
    assert_eq!(first.segment_id, "s2");
    assert_eq!(next_active(&mut events).await, Some(1));
    assert!((surface.position() - 5.0).abs() < 0.01);

    let second = session.next_match().await?.expect("second match");
    assert_eq!(second.segment_id, "s3");
    assert_eq!(next_active(&mut events).await, Some(2));

    // Wraparound navigates back to the first match
    let wrapped = session.next_match().await?.expect("wrapped match");
    assert_eq!(wrapped.segment_id, "s2");
    assert_eq!(next_active(&mut events).await, Some(1));

    session.stop().await
}

#[tokio::test]
async fn test_no_match_search_leaves_playback_alone() -> Result<()> {
    let surface = SimulatedSurface::new(30.0);
    surface.set_playing(true);
    let session = session_over(&surface);

    let mut events = session.start().await?;
    assert_eq!(next_active(&mut events).await, Some(0));

    let results = session.search("zebra").await;
    assert!(results.is_empty());
    assert!(session.next_match().await?.is_none());

    // Playback never moved off the start
    assert!(surface.position() < 5.0);

    session.stop().await
}

#[tokio::test]
async fn test_unknown_duration_reports_seek_unavailable() -> Result<()> {
    let surface = SimulatedSurface::without_duration();
    surface.set_playing(true);
    let session = session_over(&surface);

    let mut events = session.start().await?;

    session.seek_to_segment("s3").await?;

    let deadline = Duration::from_secs(2);
    loop {
        let event = timeout(deadline, events.recv())
            .await
            .expect("timed out waiting for SeekUnavailable")
            .expect("event channel closed");
        if event == SyncEvent::SeekUnavailable {
            break;
        }
    }

    session.stop().await
}

#[tokio::test]
async fn test_unseekable_stream_times_out_with_seek_unavailable() -> Result<()> {
    let surface = SimulatedSurface::unseekable(30.0);
    surface.set_playing(true);
    let config = ReplayConfig {
        tick_interval_ms: 10,
        jump_watchdog_ms: 300,
        ..ReplayConfig::default()
    };
    let clock = MediaClock::new(Arc::new(surface.clone()), config.tick_interval());
    let session = PlaybackSession::new(fixture_index(), clock, &config);

    let mut events = session.start().await?;
    assert_eq!(next_active(&mut events).await, Some(0));

    session.seek_to_segment("s3").await?;

    // The optimistic echo previews the target segment first
    assert_eq!(next_active(&mut events).await, Some(2));

    // The surface silently ignored the seek, so the watchdog must give up
    let deadline = Duration::from_secs(2);
    loop {
        let event = timeout(deadline, events.recv())
            .await
            .expect("timed out waiting for SeekUnavailable")
            .expect("event channel closed");
        if event == SyncEvent::SeekUnavailable {
            break;
        }
    }

    // The highlight falls back to the surface's real position
    assert_eq!(next_active(&mut events).await, Some(0));
    assert!(surface.position() < 5.0);

    session.stop().await
}

#[tokio::test]
async fn test_scrub_commits_single_seek_on_release() -> Result<()> {
    let surface = SimulatedSurface::new(30.0);
    surface.set_playing(false);
    let session = session_over(&surface);

    let mut events = session.start().await?;
    // Paused at 0.0 still resolves to the first segment
    assert_eq!(next_active(&mut events).await, Some(0));

    session.scrub_start().await;
    session.scrub_move(7.0).await;
    session.scrub_move(15.0).await;
    session.scrub_move(21.0).await;

    // No real seek during the drag
    assert!(surface.position() < 0.01);

    session.scrub_end(21.0).await;
    assert_eq!(next_active(&mut events).await, Some(2));
    assert!((surface.position() - 21.0).abs() < 0.01);

    session.stop().await
}

#[tokio::test]
async fn test_stop_closes_event_channel() -> Result<()> {
    let surface = SimulatedSurface::new(30.0);
    surface.set_playing(true);
    let session = session_over(&surface);

    let mut events = session.start().await?;
    assert_eq!(next_active(&mut events).await, Some(0));

    session.stop().await?;

    let closed = timeout(Duration::from_secs(2), async {
        while events.recv().await.is_some() {}
    })
    .await;
    assert!(closed.is_ok(), "event channel should close after stop");

    Ok(())
}
