// ─────────────────────────────────────────────────────────────────────
// SCPN Stencil Bench — Run Driver
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Top-level run orchestration.
//!
//! Validates the configuration, builds the tile grid, the exchange
//! graph and the shared tile slots, then spawns one shard thread and
//! one courier thread per shard. Shards synchronize only through the
//! phase signals and the start/finish gates; the driver just collects
//! their outcomes and reduces them into the run verdict.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use ndarray::Array2;
use tracing::debug;

use stencil_math::partition::TileGrid;
use stencil_math::weights::WeightTable;
use stencil_types::config::RunConfig;
use stencil_types::error::{StencilError, StencilResult};
use stencil_types::state::{RunReport, ShardOutcome};

use crate::exchange::{Courier, ExchangeGraph, TileSlot};
use crate::place::Placement;
use crate::report;
use crate::shard::{run_shard, ShardCtx};
use crate::signal::PhaseSignal;

/// Everything a finished run produces: the reduced report plus the
/// per-shard accumulator planes for inspection.
pub struct RunOutput {
    pub report: RunReport,
    pub grid: TileGrid,
    pub outputs: Vec<Array2<f64>>,
}

/// Run the benchmark and return the reduced report.
pub fn run(config: &RunConfig, placement: &dyn Placement) -> StencilResult<RunReport> {
    Ok(run_detailed(config, placement)?.report)
}

/// Run the benchmark keeping the per-shard output planes.
pub fn run_detailed(config: &RunConfig, placement: &dyn Placement) -> StencilResult<RunOutput> {
    config.validate()?;
    let shards = config.total_shards();
    let grid = TileGrid::decompose(config.n, shards, config.radius)?;
    debug!(
        n = config.n,
        shards,
        px = grid.px,
        py = grid.py,
        radius = config.radius,
        "decomposed tile grid"
    );

    let weights = WeightTable::new(config.radius);
    let graph = ExchangeGraph::new(&grid);
    let slots: Vec<Arc<TileSlot>> = grid
        .tiles
        .iter()
        .map(|tile| Arc::new(TileSlot::new(tile.halo)))
        .collect();
    let start_gate = PhaseSignal::new(shards as u32);
    let finish_gate = PhaseSignal::new(shards as u32);

    // Wire every shard's courier and channels up front so a wiring
    // error surfaces before any thread is spawned.
    let mut lanes = Vec::with_capacity(shards);
    for rank in 0..shards {
        let (go_tx, go_rx) = mpsc::channel::<usize>();
        let (done_tx, done_rx) = mpsc::channel::<usize>();
        let courier = Courier::new(rank, &grid, &graph, &slots)?;
        let workers = placement.workers_for(rank).max(1);
        lanes.push((rank, workers, go_tx, go_rx, done_tx, done_rx, courier));
    }

    let results: Vec<StencilResult<(ShardOutcome, Array2<f64>)>> = thread::scope(|s| {
        let mut courier_handles = Vec::with_capacity(shards);
        let mut shard_handles = Vec::with_capacity(shards);
        for (rank, workers, go_tx, go_rx, done_tx, done_rx, courier) in lanes {
            courier_handles.push(s.spawn(move || courier.serve(go_rx, done_tx)));
            let ctx = ShardCtx {
                rank,
                iterations: config.iterations,
                workers,
                grid: &grid,
                graph: &graph,
                slots: &slots,
                weights: &weights,
                start_gate: &start_gate,
                finish_gate: &finish_gate,
            };
            shard_handles.push(s.spawn(move || run_shard(ctx, go_tx, done_rx)));
        }
        let results = shard_handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(StencilError::Sync("shard thread panicked".to_string())))
            })
            .collect();
        for handle in courier_handles {
            let _ = handle.join();
        }
        results
    });

    let mut outcomes = Vec::with_capacity(shards);
    let mut outputs = Vec::with_capacity(shards);
    for result in results {
        let (outcome, plane) = result?;
        outcomes.push(outcome);
        outputs.push(plane);
    }
    let report = report::reduce(&outcomes, config)?;
    debug!(
        abs_err = report.abs_err,
        mflops = report.mflops,
        "run complete"
    );
    Ok(RunOutput {
        report,
        grid,
        outputs,
    })
}
