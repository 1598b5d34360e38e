use anyhow::Result;

/// Underlying playable media surface
///
/// Implementations wrap whatever actually plays the meeting recording: a
/// browser audio element bridge, a local decoder, or a simulated timeline for
/// tests. The engine never talks to a surface directly; everything goes
/// through [`MediaClock`](super::MediaClock).
#[async_trait::async_trait]
pub trait MediaSurface: Send + Sync {
    /// Current playback position in seconds
    fn position(&self) -> f64;

    /// Total duration in seconds, or `None` while media metadata is still
    /// loading (a normal transient state, not an error)
    fn duration(&self) -> Option<f64>;

    /// Whether playback is currently advancing
    fn is_playing(&self) -> bool;

    /// Request a new playback position
    ///
    /// Unseekable surfaces may silently ignore this; callers must not rely on
    /// the position actually moving.
    async fn set_position(&self, time: f64) -> Result<()>;

    /// Surface name for logging
    fn name(&self) -> &str;
}
