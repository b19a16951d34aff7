// ─────────────────────────────────────────────────────────────────────
// SCPN Stencil Bench — Ghost Exchange
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! The per-iteration ghost exchange.
//!
//! Every tile edge carries a `SignalPair` owned by the shard on that
//! side: `full` advances when the owner's private input plane is exposed
//! for the current generation, `empty` when the owner has staged the
//! neighbor's strip into its ghost buffer. A shard's courier pulls each
//! neighbor's boundary strip into a local staging buffer (wait `full`,
//! copy, raise `empty`), then installs all staged strips into the ghost
//! cells of the shard's own input plane. The staging buffer decouples
//! the neighbor's overwrite cadence from the local read: no generation
//! can be overwritten before it has been staged, and no stage can be
//! read before its generation was signaled.

use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, RwLock};

use ndarray::{s, Array2};
use stencil_types::error::{StencilError, StencilResult};

use stencil_math::partition::TileGrid;
use stencil_math::rect::Rect;
use stencil_math::subtile::GhostDir;

use crate::signal::SignalPair;

/// The cross-shard face of one shard: its input plane. Neighbors take
/// short read locks to pull boundary strips; the owner takes the write
/// lock to install ghosts and to advance the plane between iterations.
/// The output plane never crosses shard boundaries and stays private to
/// the shard thread.
#[derive(Debug)]
pub struct TileSlot {
    pub input: RwLock<Array2<f64>>,
}

impl TileSlot {
    pub fn new(halo: Rect) -> Self {
        TileSlot {
            input: RwLock::new(Array2::zeros(halo.shape())),
        }
    }
}

/// All edge signals of a run, indexed `[rank][direction]`. The pair at
/// `[r][d]` is owned (raised) by shard `r`; the consumer side of an edge
/// is always the neighbor's pair for the flipped direction, so every
/// wired edge is bidirectional by construction.
#[derive(Debug)]
pub struct ExchangeGraph {
    pairs: Vec<[Option<Arc<SignalPair>>; 4]>,
    neighbors: Vec<[Option<usize>; 4]>,
}

impl ExchangeGraph {
    pub fn new(grid: &TileGrid) -> Self {
        let ranks = grid.shard_count();
        let mut pairs: Vec<[Option<Arc<SignalPair>>; 4]> = Vec::with_capacity(ranks);
        let mut neighbors = Vec::with_capacity(ranks);
        for rank in 0..ranks {
            let mut row: [Option<Arc<SignalPair>>; 4] = [None, None, None, None];
            let mut nbrs = [None; 4];
            for dir in GhostDir::ALL {
                if let Some(nbr) = grid.neighbor(rank, dir) {
                    row[dir.index()] = Some(Arc::new(SignalPair::new(1)));
                    nbrs[dir.index()] = Some(nbr);
                }
            }
            pairs.push(row);
            neighbors.push(nbrs);
        }
        ExchangeGraph { pairs, neighbors }
    }

    /// The pair shard `rank` raises for edge `dir`.
    pub fn own(&self, rank: usize, dir: GhostDir) -> Option<&Arc<SignalPair>> {
        self.pairs[rank][dir.index()].as_ref()
    }

    /// The pair shard `rank` waits on for edge `dir`: the neighbor's
    /// pair for the flipped direction.
    pub fn inbound(&self, rank: usize, dir: GhostDir) -> Option<&Arc<SignalPair>> {
        let nbr = self.neighbors[rank][dir.index()]?;
        self.pairs[nbr][dir.flip().index()].as_ref()
    }

    pub fn neighbor(&self, rank: usize, dir: GhostDir) -> Option<usize> {
        self.neighbors[rank][dir.index()]
    }
}

/// A slot's plane must match the tile geometry it claims to hold before
/// any region copy is derived from that geometry.
fn check_slot_shape(slot: &TileSlot, halo: Rect) -> StencilResult<()> {
    let actual = slot.input.read().expect("tile slot lock poisoned").dim();
    let expected = halo.shape();
    if actual != expected {
        return Err(StencilError::ShapeMismatch { expected, actual });
    }
    Ok(())
}

/// One wired edge of a shard: where to pull from, where to install, and
/// the signals gating both.
#[derive(Debug)]
struct Edge {
    neighbor: usize,
    /// Pull source, in the neighbor's tile-local frame.
    src: Rect,
    /// Install destination, in the owner's tile-local frame.
    dst: Rect,
    /// Raised by this shard: `empty` after staging.
    own: Arc<SignalPair>,
    /// Waited by this shard: neighbor's `full` before pulling.
    inbound: Arc<SignalPair>,
    buffer: Array2<f64>,
}

/// Executes the pull/install steps of one shard, one iteration at a
/// time. Runs on its own thread so that signal waits never occupy a
/// rayon worker; the shard thread overlaps interior compute with it and
/// rendezvouses through a channel before boundary compute.
#[derive(Debug)]
pub struct Courier<'a> {
    rank: usize,
    slots: &'a [Arc<TileSlot>],
    edges: Vec<Edge>,
}

impl<'a> Courier<'a> {
    pub fn new(
        rank: usize,
        grid: &TileGrid,
        graph: &ExchangeGraph,
        slots: &'a [Arc<TileSlot>],
    ) -> StencilResult<Self> {
        let tile = grid.tile(rank);
        check_slot_shape(&slots[rank], tile.halo)?;
        let mut edges = Vec::new();
        for dir in GhostDir::ALL {
            let Some(ghost) = tile.ghost(dir) else {
                continue;
            };
            let neighbor = graph.neighbor(rank, dir).ok_or_else(|| {
                StencilError::Sync(format!(
                    "shard {rank} has a ghost strip toward {dir:?} but no wired neighbor"
                ))
            })?;
            let own = graph.own(rank, dir).ok_or_else(|| {
                StencilError::Sync(format!("shard {rank} is missing its {dir:?} signal pair"))
            })?;
            let inbound = graph.inbound(rank, dir).ok_or_else(|| {
                StencilError::Sync(format!(
                    "shard {rank} has no inbound {dir:?} signal pair; neighbor wiring must be bidirectional"
                ))
            })?;
            let nbr_tile = grid.tile(neighbor);
            check_slot_shape(&slots[neighbor], nbr_tile.halo)?;
            // The ghost rect is the same cells on both sides; only the
            // local frames differ.
            let src = ghost.relative_to(nbr_tile.halo);
            let dst = ghost.relative_to(tile.halo);
            edges.push(Edge {
                neighbor,
                src,
                dst,
                own: Arc::clone(own),
                inbound: Arc::clone(inbound),
                buffer: Array2::zeros(ghost.shape()),
            });
        }
        Ok(Courier { rank, slots, edges })
    }

    /// Pull every neighbored direction for the given iteration, then
    /// install the staged strips into the owner's ghost cells.
    pub fn exchange(&mut self, iteration: usize) {
        let generation = iteration as u64 + 1;
        for edge in &mut self.edges {
            edge.inbound.full.wait_for(generation);
            {
                let src = self.slots[edge.neighbor]
                    .input
                    .read()
                    .expect("tile slot lock poisoned");
                edge.buffer.assign(&src.slice(s![
                    edge.src.y0..edge.src.y1,
                    edge.src.x0..edge.src.x1
                ]));
            }
            edge.own.empty.arrive();
        }
        if self.edges.is_empty() {
            return;
        }
        let mut dst = self.slots[self.rank]
            .input
            .write()
            .expect("tile slot lock poisoned");
        for edge in &self.edges {
            dst.slice_mut(s![edge.dst.y0..edge.dst.y1, edge.dst.x0..edge.dst.x1])
                .assign(&edge.buffer);
        }
    }

    /// Serve iterations handed over the channel until it closes,
    /// acknowledging each completed exchange.
    pub fn serve(mut self, iterations: Receiver<usize>, done: Sender<usize>) {
        for iteration in iterations {
            self.exchange(iteration);
            if done.send(iteration).is_err() {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::ArrayView2;
    use stencil_math::kernel::fill_linear;
    use stencil_types::constants::{COEF_X, COEF_Y};

    fn seeded_slots(grid: &TileGrid) -> Vec<Arc<TileSlot>> {
        grid.tiles
            .iter()
            .map(|tile| {
                let slot = TileSlot::new(tile.halo);
                fill_linear(
                    &mut slot.input.write().expect("fresh lock").view_mut(),
                    tile.halo,
                );
                Arc::new(slot)
            })
            .collect()
    }

    fn assert_matches_ramp(plane: &ArrayView2<f64>, frame: Rect, region: Rect) {
        for gy in region.y0..region.y1 {
            for gx in region.x0..region.x1 {
                let expect = COEF_X * gx as f64 + COEF_Y * gy as f64;
                let got = plane[[gy - frame.y0, gx - frame.x0]];
                assert_eq!(got, expect, "ghost cell ({gx},{gy})");
            }
        }
    }

    #[test]
    fn test_graph_wiring_is_bidirectional() {
        let grid = TileGrid::decompose(24, 6, 2).expect("decompose");
        let graph = ExchangeGraph::new(&grid);
        for rank in 0..grid.shard_count() {
            for dir in GhostDir::ALL {
                match graph.neighbor(rank, dir) {
                    Some(nbr) => {
                        assert!(graph.own(rank, dir).is_some());
                        assert!(graph.inbound(rank, dir).is_some());
                        assert_eq!(graph.neighbor(nbr, dir.flip()), Some(rank));
                    }
                    None => {
                        assert!(graph.own(rank, dir).is_none());
                        assert!(graph.inbound(rank, dir).is_none());
                    }
                }
            }
        }
    }

    #[test]
    fn test_one_exchange_installs_neighbor_data() {
        // After one exchange round, every ghost cell holds exactly the
        // value the owning neighbor carries at that global coordinate.
        // Seeding overwrites ghost cells with the ramp too, so corrupt
        // them first to prove the exchange actually rewrites them.
        let grid = TileGrid::decompose(16, 4, 2).expect("decompose");
        let graph = ExchangeGraph::new(&grid);
        let slots = seeded_slots(&grid);
        for (slot, tile) in slots.iter().zip(&grid.tiles) {
            let mut plane = slot.input.write().expect("lock");
            for dir in GhostDir::ALL {
                if let Some(ghost) = tile.ghost(dir) {
                    let local = ghost.relative_to(tile.halo);
                    plane
                        .slice_mut(s![local.y0..local.y1, local.x0..local.x1])
                        .fill(-1.0);
                }
            }
        }

        // Expose generation 1 everywhere, then run every courier once.
        for rank in 0..grid.shard_count() {
            for dir in GhostDir::ALL {
                if let Some(pair) = graph.own(rank, dir) {
                    pair.full.arrive();
                }
            }
        }
        for rank in 0..grid.shard_count() {
            let mut courier = Courier::new(rank, &grid, &graph, &slots).expect("wired");
            courier.exchange(0);
        }

        for (slot, tile) in slots.iter().zip(&grid.tiles) {
            let plane = slot.input.read().expect("lock");
            for dir in GhostDir::ALL {
                if let Some(ghost) = tile.ghost(dir) {
                    assert_matches_ramp(&plane.view(), tile.halo, ghost);
                }
            }
            // Private cells still carry the seeded ramp.
            assert_matches_ramp(&plane.view(), tile.halo, tile.private);
        }
    }

    #[test]
    fn test_exchange_raises_empty_signals() {
        let grid = TileGrid::decompose(16, 2, 2).expect("decompose");
        let graph = ExchangeGraph::new(&grid);
        let slots = seeded_slots(&grid);
        for rank in 0..grid.shard_count() {
            for dir in GhostDir::ALL {
                if let Some(pair) = graph.own(rank, dir) {
                    pair.full.arrive();
                }
            }
        }
        let mut courier = Courier::new(0, &grid, &graph, &slots).expect("wired");
        courier.exchange(0);
        // Shard 0 staged its neighbor's data: its own empty signal for
        // the edge must have completed generation 1.
        let dir = GhostDir::ALL
            .into_iter()
            .find(|d| grid.tile(0).has_neighbor(*d))
            .expect("two-shard grid has an edge");
        assert_eq!(graph.own(0, dir).expect("pair").empty.generation(), 1);
    }

    #[test]
    fn test_courier_rejects_misshapen_slot() {
        let grid = TileGrid::decompose(16, 2, 2).expect("decompose");
        let graph = ExchangeGraph::new(&grid);
        let mut slots = seeded_slots(&grid);
        slots[1] = Arc::new(TileSlot::new(Rect::new(0, 0, 4, 4)));
        let err = Courier::new(0, &grid, &graph, &slots).expect_err("shape guard");
        match err {
            StencilError::ShapeMismatch { expected, actual } => {
                assert_eq!(expected, grid.tile(1).halo.shape());
                assert_eq!(actual, (4, 4));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_single_shard_courier_is_a_noop() {
        let grid = TileGrid::decompose(16, 1, 2).expect("decompose");
        let graph = ExchangeGraph::new(&grid);
        let slots = seeded_slots(&grid);
        let mut courier = Courier::new(0, &grid, &graph, &slots).expect("wired");
        // No edges: must return without waiting on anything.
        courier.exchange(0);
        courier.exchange(1);
    }
}
