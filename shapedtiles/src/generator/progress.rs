//! Progress tracking and observer callbacks.

use std::fmt;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::{GenerationOutcome, GenerationState};
use crate::coord::TileIndex;

/// Counters for a running generation.
///
/// Owned by the generator; observers only ever see the [`ProgressUpdate`]
/// snapshots it produces.
#[derive(Debug, Clone)]
pub struct GenerationProgress {
    total: usize,
    completed: usize,
    started: Option<Instant>,
}

impl GenerationProgress {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            completed: 0,
            started: None,
        }
    }

    pub(crate) fn start(&mut self, now: Instant) {
        self.started = Some(now);
    }

    pub(crate) fn record(&mut self) {
        self.completed += 1;
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.completed)
    }

    /// Fraction done, `0.0..=1.0`.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.completed as f64 / self.total as f64
    }

    pub fn elapsed(&self) -> Duration {
        self.started.map(|s| s.elapsed()).unwrap_or_default()
    }

    /// Remaining time at the average per-tile rate so far.
    pub fn eta(&self, elapsed: Duration) -> Option<Duration> {
        if self.completed == 0 {
            return None;
        }
        let per_tile = elapsed.as_secs_f64() / self.completed as f64;
        Some(Duration::from_secs_f64(per_tile * self.remaining() as f64))
    }

    /// Snapshot taken right after `tile` was written.
    pub fn update(&self, tile: TileIndex) -> ProgressUpdate {
        let elapsed = self.elapsed();
        ProgressUpdate {
            completed: self.completed,
            total: self.total,
            tile,
            elapsed,
            eta: self.eta(elapsed),
        }
    }
}

/// One progress report, emitted after every tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressUpdate {
    pub completed: usize,
    pub total: usize,
    /// The tile just written
    pub tile: TileIndex,
    pub elapsed: Duration,
    pub eta: Option<Duration>,
}

impl ProgressUpdate {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.completed as f64 * 100.0 / self.total as f64
    }

    /// `Tile 12/400 (Z11) (~3m left)`
    pub fn label(&self) -> String {
        let mut label = format!(
            "Tile {}/{} (Z{})",
            self.completed, self.total, self.tile.zoom
        );
        if let Some(eta) = self.eta {
            label.push_str(&format!(" ({})", format_eta(eta)));
        }
        label
    }
}

impl fmt::Display for ProgressUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Formats a remaining-time estimate.
///
/// Under a minute as whole seconds, under an hour as whole minutes,
/// otherwise as hours with one decimal.
pub fn format_eta(remaining: Duration) -> String {
    let secs = remaining.as_secs_f64();
    if secs < 60.0 {
        format!("~{}s left", secs as u64)
    } else if secs < 3600.0 {
        format!("~{}m left", (secs / 60.0) as u64)
    } else {
        format!("~{:.1}h left", secs / 3600.0)
    }
}

/// Receives progress and the final outcome of a generation.
///
/// Called on the thread driving the generator, between tiles.
pub trait GenerationObserver {
    fn on_progress(&mut self, _update: &ProgressUpdate) {}

    /// Called exactly once per run, after the archive is closed.
    fn on_finished(&mut self, _outcome: &GenerationOutcome) {}
}

impl<O: GenerationObserver + ?Sized> GenerationObserver for Box<O> {
    fn on_progress(&mut self, update: &ProgressUpdate) {
        (**self).on_progress(update)
    }

    fn on_finished(&mut self, outcome: &GenerationOutcome) {
        (**self).on_finished(outcome)
    }
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl GenerationObserver for NoopObserver {}

/// Logs progress through `tracing`.
///
/// Every tile is logged at debug level; every `info_every` tiles (and the
/// last one) at info level.
#[derive(Debug, Clone)]
pub struct TracingObserver {
    info_every: usize,
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self { info_every: 100 }
    }
}

impl TracingObserver {
    pub fn new(info_every: usize) -> Self {
        Self {
            info_every: info_every.max(1),
        }
    }
}

impl GenerationObserver for TracingObserver {
    fn on_progress(&mut self, update: &ProgressUpdate) {
        debug!(
            tile = %update.tile,
            completed = update.completed,
            total = update.total,
            "Tile written"
        );
        if update.completed % self.info_every == 0 || update.completed == update.total {
            info!(percent = %format!("{:.1}", update.percent()), "{}", update.label());
        }
    }

    fn on_finished(&mut self, outcome: &GenerationOutcome) {
        match outcome.state {
            GenerationState::Completed => info!(
                tiles = outcome.tiles_written,
                elapsed_secs = outcome.elapsed.as_secs_f64(),
                "{}",
                outcome.message
            ),
            GenerationState::Cancelled => info!(
                tiles = outcome.tiles_written,
                total = outcome.total_tiles,
                "{}",
                outcome.message
            ),
            _ => warn!(tiles = outcome.tiles_written, "{}", outcome.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_eta_buckets() {
        assert_eq!(format_eta(Duration::from_secs(0)), "~0s left");
        assert_eq!(format_eta(Duration::from_secs_f64(59.9)), "~59s left");
        assert_eq!(format_eta(Duration::from_secs(60)), "~1m left");
        assert_eq!(format_eta(Duration::from_secs(3599)), "~59m left");
        assert_eq!(format_eta(Duration::from_secs(3600)), "~1.0h left");
        assert_eq!(format_eta(Duration::from_secs(5 * 3600 + 1080)), "~5.3h left");
    }

    #[test]
    fn test_eta_uses_average_rate() {
        let mut progress = GenerationProgress::new(10);
        assert_eq!(progress.eta(Duration::from_secs(5)), None);

        for _ in 0..4 {
            progress.record();
        }
        // 2 s per tile, 6 tiles left
        assert_eq!(
            progress.eta(Duration::from_secs(8)),
            Some(Duration::from_secs(12))
        );
        assert_eq!(progress.remaining(), 6);
        assert!((progress.fraction() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_label() {
        let update = ProgressUpdate {
            completed: 12,
            total: 400,
            tile: TileIndex::new(11, 1, 2).unwrap(),
            elapsed: Duration::from_secs(6),
            eta: Some(Duration::from_secs(194)),
        };
        assert_eq!(update.label(), "Tile 12/400 (Z11) (~3m left)");
        assert_eq!(update.to_string(), update.label());
        assert!((update.percent() - 3.0).abs() < 1e-12);

        let no_eta = ProgressUpdate { eta: None, ..update };
        assert_eq!(no_eta.label(), "Tile 12/400 (Z11)");
    }
}
