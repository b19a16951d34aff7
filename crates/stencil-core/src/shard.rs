// ─────────────────────────────────────────────────────────────────────
// SCPN Stencil Bench — SPMD Shard Driver
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Per-shard iteration state machine.
//!
//! INIT seeds the planes and attaches to the exchange graph, then each
//! iteration runs interior compute overlapped with the courier's ghost
//! exchange, boundary compute once the ghosts are installed, and the
//! increment once every neighbor has staged this shard's exposed data.
//! DRAIN retires the courier and stamps the shard's timing window; DONE
//! accumulates the correctness error over the shard's private cells.

use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::time::Instant;

use ndarray::{s, Array2, ArrayViewMut2, Axis};
use rayon::prelude::*;
use tracing::{debug, trace};

use stencil_math::kernel::{accumulated_error, apply_stencil, fill_linear};
use stencil_math::partition::TileGrid;
use stencil_math::rect::Rect;
use stencil_math::subtile::{balanced_bands, BoundaryDir, GhostDir};
use stencil_math::weights::WeightTable;
use stencil_types::error::{StencilError, StencilResult};
use stencil_types::state::ShardOutcome;

use crate::exchange::{ExchangeGraph, TileSlot};
use crate::signal::PhaseSignal;

pub(crate) struct ShardCtx<'a> {
    pub rank: usize,
    pub iterations: usize,
    pub workers: usize,
    pub grid: &'a TileGrid,
    pub graph: &'a ExchangeGraph,
    pub slots: &'a [Arc<TileSlot>],
    pub weights: &'a WeightTable,
    pub start_gate: &'a PhaseSignal,
    pub finish_gate: &'a PhaseSignal,
}

/// Split a tile plane into disjoint mutable views, one per band. Bands
/// are tile-local, y-disjoint and ascending.
fn banded_views<'v>(
    plane: &'v mut Array2<f64>,
    bands: &[Rect],
) -> Vec<(Rect, ArrayViewMut2<'v, f64>)> {
    let mut views = Vec::with_capacity(bands.len());
    let mut rest = plane.view_mut();
    let mut row = 0usize;
    for band in bands {
        let (_, tail) = rest.split_at(Axis(0), band.y0 - row);
        let (rows, tail) = tail.split_at(Axis(0), band.height());
        views.push((*band, rows.slice_move(s![.., band.x0..band.x1])));
        rest = tail;
        row = band.y1;
    }
    views
}

pub(crate) fn run_shard(
    ctx: ShardCtx<'_>,
    go: Sender<usize>,
    done: Receiver<usize>,
) -> StencilResult<(ShardOutcome, Array2<f64>)> {
    let tile = ctx.grid.tile(ctx.rank);
    let frame = tile.halo;
    let core = ctx.grid.core();

    // Worker-sized bands, clamped to the global core where the stencil
    // may actually be evaluated, in tile-local coordinates. The
    // increment sweeps the whole private region unclamped.
    let interior_bands: Vec<Rect> = balanced_bands(tile.interior, ctx.workers)
        .into_iter()
        .filter_map(|b| b.intersect(core))
        .map(|b| b.relative_to(frame))
        .collect();
    let private_bands: Vec<Rect> = balanced_bands(tile.private, ctx.workers)
        .into_iter()
        .map(|b| b.relative_to(frame))
        .collect();
    let slivers: Vec<Rect> = BoundaryDir::ALL
        .iter()
        .filter_map(|d| tile.boundary(*d))
        .filter_map(|b| b.intersect(core))
        .map(|b| b.relative_to(frame))
        .collect();
    debug_assert!(
        BoundaryDir::ALL.iter().all(|d| {
            tile.boundary(*d).is_none()
                || d.ghost_deps().iter().all(|g| tile.has_neighbor(*g))
        }),
        "boundary sliver present without its ghost strips"
    );

    // INIT: seed the input plane, pre-zero the accumulator plane, expose
    // the first generation and rendezvous with every other shard before
    // any ghost data is read.
    {
        let mut input = ctx.slots[ctx.rank]
            .input
            .write()
            .expect("tile slot lock poisoned");
        fill_linear(&mut input.view_mut(), frame);
    }
    let mut output = Array2::zeros(frame.shape());
    for dir in GhostDir::ALL {
        if let Some(pair) = ctx.graph.own(ctx.rank, dir) {
            pair.full.arrive();
        }
    }
    debug!(rank = ctx.rank, "shard initialized");
    ctx.start_gate.arrive();
    ctx.start_gate.wait_for(1);
    let started_at = Instant::now();

    for iteration in 0..ctx.iterations {
        // Release the exchange for this iteration, then overlap it with
        // interior compute; neither touches the other's cells.
        go.send(iteration).map_err(|_| {
            StencilError::Sync(format!("shard {}: exchange courier disconnected", ctx.rank))
        })?;

        {
            let input = ctx.slots[ctx.rank]
                .input
                .read()
                .expect("tile slot lock poisoned");
            let iv = input.view();
            banded_views(&mut output, &interior_bands)
                .into_par_iter()
                .for_each(|(band, mut view)| {
                    apply_stencil(&iv, &mut view, (band.x0, band.y0), band, ctx.weights);
                });
        }

        let acked = done.recv().map_err(|_| {
            StencilError::Sync(format!("shard {}: exchange courier disconnected", ctx.rank))
        })?;
        debug_assert_eq!(acked, iteration);

        // Boundary slivers: ghosts for this generation are installed.
        {
            let input = ctx.slots[ctx.rank]
                .input
                .read()
                .expect("tile slot lock poisoned");
            let iv = input.view();
            let mut ov = output.view_mut();
            for sliver in &slivers {
                apply_stencil(&iv, &mut ov, (0, 0), *sliver, ctx.weights);
            }
        }

        // Increment: every neighbor must have staged this shard's
        // exposed strips before the input plane may advance.
        let generation = iteration as u64 + 1;
        for dir in GhostDir::ALL {
            if let Some(pair) = ctx.graph.inbound(ctx.rank, dir) {
                pair.empty.wait_for(generation);
            }
        }
        {
            let mut input = ctx.slots[ctx.rank]
                .input
                .write()
                .expect("tile slot lock poisoned");
            banded_views(&mut input, &private_bands)
                .into_par_iter()
                .for_each(|(_, mut view)| view.mapv_inplace(|v| v + 1.0));
        }
        for dir in GhostDir::ALL {
            if let Some(pair) = ctx.graph.own(ctx.rank, dir) {
                pair.full.arrive();
            }
        }
        trace!(rank = ctx.rank, iteration, "iteration complete");
    }

    // DRAIN: retire the courier, then rendezvous so the closing
    // timestamp covers all outstanding work.
    drop(go);
    ctx.finish_gate.arrive();
    ctx.finish_gate.wait_for(1);
    let finished_at = Instant::now();

    // DONE: correctness check over this shard's private cells.
    let abs_err = accumulated_error(
        &output.view(),
        frame,
        tile.private,
        ctx.grid.n,
        ctx.grid.radius,
        ctx.iterations,
    );
    debug!(rank = ctx.rank, abs_err, "shard drained");

    Ok((
        ShardOutcome {
            started_at,
            finished_at,
            abs_err,
        },
        output,
    ))
}
