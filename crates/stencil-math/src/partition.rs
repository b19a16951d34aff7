// ─────────────────────────────────────────────────────────────────────
// SCPN Stencil Bench — Grid Partitioner
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Global decomposition of the n×n grid into a Px×Py tile grid, one
//! halo-extended tile per shard.

use stencil_types::error::{StencilError, StencilResult};

use crate::rect::Rect;
use crate::subtile::{carve, GhostDir, TileGeometry};

/// Near-square factorization of the shard count: scan Px downward from
/// floor(sqrt(shards + 1)) until it divides the shard count evenly.
pub fn process_grid(shards: usize) -> (usize, usize) {
    debug_assert!(shards > 0);
    let mut px = ((shards + 1) as f64).sqrt() as usize;
    while px > 1 && shards % px != 0 {
        px -= 1;
    }
    (px, shards / px)
}

/// The complete tile grid: per-shard geometry plus the parameters it was
/// derived from. Tiles are stored in row-major rank order
/// (`rank = ty * px + tx`).
#[derive(Debug, Clone)]
pub struct TileGrid {
    pub n: usize,
    pub radius: usize,
    pub px: usize,
    pub py: usize,
    pub tiles: Vec<TileGeometry>,
}

impl TileGrid {
    /// Partition the grid across `shards` tiles. Fails on any geometric
    /// precondition: the grid must divide evenly along both tile-grid
    /// axes, the radius must be positive, the stencil must fit in the
    /// grid, and every partitioned tile must be wider than the radius
    /// (a ghost strip is pulled from a single neighbor).
    pub fn decompose(n: usize, shards: usize, radius: usize) -> StencilResult<TileGrid> {
        if shards == 0 {
            return Err(StencilError::Config(format!(
                "Number of shards must be > 0 : {shards}"
            )));
        }
        let (px, py) = process_grid(shards);
        if n % px != 0 {
            return Err(StencilError::Config(format!(
                "Grid size {n} is not evenly divisible by {px} tiles in the x-direction"
            )));
        }
        if n % py != 0 {
            return Err(StencilError::Config(format!(
                "Grid size {n} is not evenly divisible by {py} tiles in the y-direction"
            )));
        }
        if radius < 1 {
            return Err(StencilError::Config(format!(
                "Stencil radius {radius} should be positive"
            )));
        }
        if 2 * radius + 1 > n {
            return Err(StencilError::Config(format!(
                "Stencil radius {radius} exceeds grid size {n}"
            )));
        }
        if (px > 1 && n / px <= radius) || (py > 1 && n / py <= radius) {
            return Err(StencilError::Config(format!(
                "Tile extent {}x{} is narrower than stencil radius {radius}",
                n / px,
                n / py
            )));
        }

        let tile_w = n / px;
        let tile_h = n / py;
        let mut tiles = Vec::with_capacity(shards);
        for ty in 0..py {
            for tx in 0..px {
                let halo = Rect::new(
                    (tx * tile_w).saturating_sub(radius),
                    (ty * tile_h).saturating_sub(radius),
                    ((tx + 1) * tile_w + radius).min(n),
                    ((ty + 1) * tile_h + radius).min(n),
                );
                let rank = ty * px + tx;
                tiles.push(carve(rank, tx, ty, halo, n, radius));
            }
        }
        Ok(TileGrid {
            n,
            radius,
            px,
            py,
            tiles,
        })
    }

    pub fn shard_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn tile(&self, rank: usize) -> &TileGeometry {
        &self.tiles[rank]
    }

    /// Rank of the neighbor across the given edge, if any.
    pub fn neighbor(&self, rank: usize, dir: GhostDir) -> Option<usize> {
        let tile = &self.tiles[rank];
        let (dx, dy) = dir.offset();
        let nx = tile.tx as isize + dx;
        let ny = tile.ty as isize + dy;
        if nx < 0 || ny < 0 || nx >= self.px as isize || ny >= self.py as isize {
            return None;
        }
        Some(ny as usize * self.px + nx as usize)
    }

    /// The cells in the global core of the grid: at least `radius` away
    /// from every global border. Only these cells are ever written by
    /// the stencil and checked at run end.
    pub fn core(&self) -> Rect {
        Rect::new(
            self.radius,
            self.radius,
            self.n - self.radius,
            self.n - self.radius,
        )
    }
}
