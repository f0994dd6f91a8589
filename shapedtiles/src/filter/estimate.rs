//! Preflight tile-count estimates.

use std::time::Duration;

/// Nominal render cost used to turn a tile count into a time estimate.
pub const SECONDS_PER_TILE_ESTIMATE: f64 = 0.1;

/// Result of a tile-count estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileEstimate {
    /// Number of tiles (an upper bound when `exact` is false)
    pub count: u64,
    /// Whether `count` came from the exact intersection test
    pub exact: bool,
}

/// Rough size class of a job, for colouring preflight output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimateSeverity {
    /// Under 10,000 tiles
    Low,
    /// Under 100,000 tiles
    Medium,
    /// 100,000 tiles or more
    High,
}

impl TileEstimate {
    pub fn estimated_duration(&self) -> Duration {
        Duration::from_secs_f64(self.count as f64 * SECONDS_PER_TILE_ESTIMATE)
    }

    pub fn severity(&self) -> EstimateSeverity {
        match self.count {
            0..=9_999 => EstimateSeverity::Low,
            10_000..=99_999 => EstimateSeverity::Medium,
            _ => EstimateSeverity::High,
        }
    }

    /// One-line summary such as `~12,345 tiles (max) (~21min)`.
    pub fn label(&self) -> String {
        let secs = self.estimated_duration().as_secs_f64();
        let time = match self.severity() {
            EstimateSeverity::Low => format!("~{:.0}s", secs),
            EstimateSeverity::Medium => format!("~{:.0}min", secs / 60.0),
            EstimateSeverity::High => format!("~{:.1}h", secs / 3600.0),
        };
        if self.exact {
            format!("{} tiles ({})", format_count(self.count), time)
        } else {
            format!("~{} tiles (max) ({})", format_count(self.count), time)
        }
    }
}

/// Formats an integer with comma thousands separators.
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
