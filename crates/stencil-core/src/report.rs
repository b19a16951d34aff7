//! Run-level reduction: error validation and throughput figures.

use stencil_types::config::RunConfig;
use stencil_types::constants::EPSILON;
use stencil_types::error::{StencilError, StencilResult};
use stencil_types::state::{RunReport, ShardOutcome};

/// Floating-point operations of one stencil sweep: 2 per weighted term
/// plus the final add, over every cell of the global core.
pub fn stencil_flops(n: usize, radius: usize) -> f64 {
    let stencil_size = (4 * radius + 1) as f64;
    let active = (n - 2 * radius) as f64;
    (2.0 * stencil_size + 1.0) * active * active
}

/// Fold per-shard outcomes into the run verdict: total error against the
/// fixed threshold, and throughput over the wall-clock window spanning
/// the earliest shard start and the latest shard finish.
pub fn reduce(outcomes: &[ShardOutcome], config: &RunConfig) -> StencilResult<RunReport> {
    let started = outcomes
        .iter()
        .map(|o| o.started_at)
        .min()
        .ok_or_else(|| StencilError::Sync("no shard outcomes to reduce".to_string()))?;
    let finished = outcomes
        .iter()
        .map(|o| o.finished_at)
        .max()
        .ok_or_else(|| StencilError::Sync("no shard outcomes to reduce".to_string()))?;
    let abs_err: f64 = outcomes.iter().map(|o| o.abs_err).sum();

    if abs_err >= EPSILON {
        return Err(StencilError::Validation {
            measured: abs_err,
            threshold: EPSILON,
        });
    }

    let elapsed_s = finished.duration_since(started).as_secs_f64();
    let avg_time_s = elapsed_s / config.iterations as f64;
    Ok(RunReport {
        abs_err,
        elapsed_s,
        avg_time_s,
        mflops: 1.0e-6 * stencil_flops(config.n, config.radius) / avg_time_s,
    })
}
