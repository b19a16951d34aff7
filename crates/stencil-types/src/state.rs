// ─────────────────────────────────────────────────────────────────────
// SCPN Stencil Bench — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use std::time::Instant;

/// What one shard reports back after DRAIN: its wall-clock window and the
/// absolute error it accumulated over its own private cells.
#[derive(Debug, Clone, Copy)]
pub struct ShardOutcome {
    /// Instant the start gate opened on this shard (first compute launch).
    pub started_at: Instant,
    /// Instant the shard finished draining all of its work.
    pub finished_at: Instant,
    /// Sum of |out - iterations * (COEF_X + COEF_Y)| over checked cells.
    pub abs_err: f64,
}

/// Reduced run result: validation error plus throughput figures computed
/// over the [min start, max end] window across shards.
#[derive(Debug, Clone, Copy)]
pub struct RunReport {
    pub abs_err: f64,
    pub elapsed_s: f64,
    pub avg_time_s: f64,
    pub mflops: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_shard_outcome_window_is_ordered() {
        let start = Instant::now();
        let outcome = ShardOutcome {
            started_at: start,
            finished_at: start + Duration::from_millis(5),
            abs_err: 0.0,
        };
        assert!(outcome.finished_at >= outcome.started_at);
    }
}
