use anyhow::Result;
use clap::Parser;
use meeting_replay::{
    load_transcript, Config, MediaClock, PlaybackSession, QueryDebouncer, ReplayConfig,
    SegmentIndex, SimulatedSurface, SyncEvent,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Replay a meeting transcript against a simulated playback surface
#[derive(Parser, Debug)]
#[command(name = "meeting-replay")]
struct Args {
    /// Path to a transcript JSON file (document or bare segment array)
    transcript: PathBuf,

    /// Playback speed multiplier for the simulated timeline
    #[arg(long, default_value_t = 8.0)]
    speed: f64,

    /// Search the transcript and jump to the first match before playback
    #[arg(long)]
    query: Option<String>,

    /// Config file with [replay] tunables (defaults apply when omitted)
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let replay_config = match &args.config {
        Some(path) => Config::load(path)?.replay,
        None => ReplayConfig::default(),
    };

    let doc = load_transcript(&args.transcript)?;
    info!(
        "Meeting {}: {} segments",
        doc.meeting_id,
        doc.segments.len()
    );

    let duration = doc.segments.iter().map(|s| s.end_time).fold(0.0, f64::max);
    let index = SegmentIndex::new(doc.segments);
    let view = index.clone();

    let surface = SimulatedSurface::new(duration);
    surface.set_playing(true);

    let clock = MediaClock::new(
        Arc::new(surface.clone()),
        replay_config.tick_interval(),
    );
    let session = Arc::new(PlaybackSession::new(index, clock, &replay_config));
    let mut events = session.start().await?;

    if let Some(query) = &args.query {
        // Feed the query through the debouncer one keystroke at a time, as
        // the search box would; only the settled value triggers a scan
        let (debouncer, mut queries) = QueryDebouncer::new(replay_config.search_debounce());
        for end in query.char_indices().map(|(i, c)| i + c.len_utf8()) {
            debouncer.submit(&query[..end]).await?;
        }
        debouncer.shutdown().await;

        if let Some(settled) = queries.recv().await {
            let results = session.search(&settled).await;
            info!("Query '{}' matched {} segments", settled, results.len());
            if let Some(found) = session.jump_to_current_match().await? {
                info!(
                    "Jumping to first match in segment {} ({} spans)",
                    found.segment_id,
                    found.spans.len()
                );
            }
        }
    }

    // Drive the virtual timeline in real time, scaled by --speed; stop the
    // session once the media runs out so the event channel closes
    let driver = {
        let surface = surface.clone();
        let session = Arc::clone(&session);
        let speed = args.speed;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_millis(50));
            loop {
                ticker.tick().await;
                surface.advance(0.05 * speed);
                if surface.at_end() {
                    break;
                }
            }
            if let Err(e) = session.stop().await {
                warn!("Failed to stop session: {}", e);
            }
        })
    };

    while let Some(event) = events.recv().await {
        match event {
            SyncEvent::ActiveSegmentChanged { index: Some(i) } => {
                if let Some(segment) = view.get(i) {
                    let speaker = segment.speaker.as_deref().unwrap_or("unknown");
                    info!(
                        "[{:>7.2}s] {}: {}",
                        segment.start_time, speaker, segment.text
                    );
                }
            }
            SyncEvent::ActiveSegmentChanged { index: None } => {
                info!("Before first segment");
            }
            SyncEvent::SeekUnavailable => {
                warn!("Seek unavailable; transcript will stay unsynchronized");
            }
            SyncEvent::StateChanged(state) => {
                info!("Controller state: {:?}", state);
            }
            _ => {}
        }
    }

    let _ = driver.await;
    info!("Replay complete");

    Ok(())
}
