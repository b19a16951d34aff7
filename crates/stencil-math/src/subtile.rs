// ─────────────────────────────────────────────────────────────────────
// SCPN Stencil Bench — Tile Sub-Partitioner
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Carving one halo tile into its disjoint regions.
//!
//! A shard's halo tile decomposes at two levels. At the tile level: the
//! private rect (the tile with its halo padding stripped) plus up to four
//! radius-wide ghost strips, one per side that has a neighbor. At the
//! private level: an interior rect plus up to eight boundary slivers (four
//! edges, four corners) covering the ring that needs ghost data. Each
//! decomposition is a partition: disjoint pieces whose union is the parent.

use crate::rect::Rect;

/// Side of a tile that faces a neighbor. Discriminants match the
/// signal/buffer array layout used by the exchange engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GhostDir {
    Left = 0,
    Up = 1,
    Right = 2,
    Down = 3,
}

impl GhostDir {
    pub const ALL: [GhostDir; 4] = [GhostDir::Left, GhostDir::Up, GhostDir::Right, GhostDir::Down];

    pub fn index(self) -> usize {
        self as usize
    }

    /// The same edge seen from the neighbor's side.
    pub fn flip(self) -> GhostDir {
        match self {
            GhostDir::Left => GhostDir::Right,
            GhostDir::Up => GhostDir::Down,
            GhostDir::Right => GhostDir::Left,
            GhostDir::Down => GhostDir::Up,
        }
    }

    /// Tile-grid offset (dx, dy) toward the neighbor.
    pub fn offset(self) -> (isize, isize) {
        match self {
            GhostDir::Left => (-1, 0),
            GhostDir::Up => (0, -1),
            GhostDir::Right => (1, 0),
            GhostDir::Down => (0, 1),
        }
    }
}

/// One of the eight directional slivers of the private region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryDir {
    Left = 0,
    LeftUp = 1,
    Up = 2,
    UpRight = 3,
    Right = 4,
    RightDown = 5,
    Down = 6,
    DownLeft = 7,
}

impl BoundaryDir {
    pub const ALL: [BoundaryDir; 8] = [
        BoundaryDir::Left,
        BoundaryDir::LeftUp,
        BoundaryDir::Up,
        BoundaryDir::UpRight,
        BoundaryDir::Right,
        BoundaryDir::RightDown,
        BoundaryDir::Down,
        BoundaryDir::DownLeft,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Ghost strips this sliver reads: one for an edge, two for a corner.
    pub fn ghost_deps(self) -> &'static [GhostDir] {
        match self {
            BoundaryDir::Left => &[GhostDir::Left],
            BoundaryDir::LeftUp => &[GhostDir::Left, GhostDir::Up],
            BoundaryDir::Up => &[GhostDir::Up],
            BoundaryDir::UpRight => &[GhostDir::Up, GhostDir::Right],
            BoundaryDir::Right => &[GhostDir::Right],
            BoundaryDir::RightDown => &[GhostDir::Right, GhostDir::Down],
            BoundaryDir::Down => &[GhostDir::Down],
            BoundaryDir::DownLeft => &[GhostDir::Down, GhostDir::Left],
        }
    }
}

/// Full region decomposition of one shard's halo tile, in global grid
/// coordinates.
#[derive(Debug, Clone)]
pub struct TileGeometry {
    pub rank: usize,
    pub tx: usize,
    pub ty: usize,
    /// The tile including halo padding: what the shard actually stores.
    pub halo: Rect,
    /// The tile's exclusively owned cells.
    pub private: Rect,
    /// Private cells whose stencil reads need no ghost data.
    pub interior: Rect,
    /// Per-direction ghost strip; `None` on global-edge sides.
    pub ghosts: [Option<Rect>; 4],
    /// Per-direction boundary sliver of the private region.
    pub boundaries: [Option<Rect>; 8],
}

impl TileGeometry {
    pub fn has_neighbor(&self, dir: GhostDir) -> bool {
        self.ghosts[dir.index()].is_some()
    }

    pub fn ghost(&self, dir: GhostDir) -> Option<Rect> {
        self.ghosts[dir.index()]
    }

    pub fn boundary(&self, dir: BoundaryDir) -> Option<Rect> {
        self.boundaries[dir.index()]
    }
}

/// Derive every region of a tile from its halo rect, the global grid
/// size and the stencil radius. Pure geometry; the halo rect is assumed
/// to already be clamped to `[0, n)` on both axes.
pub fn carve(rank: usize, tx: usize, ty: usize, halo: Rect, n: usize, radius: usize) -> TileGeometry {
    // Strip the halo padding back out on every side that has a neighbor
    // (i.e. every side not flush with the global edge).
    let mut private = halo;
    if halo.x0 != 0 {
        private.x0 += radius;
    }
    if halo.x1 != n {
        private.x1 -= radius;
    }
    if halo.y0 != 0 {
        private.y0 += radius;
    }
    if halo.y1 != n {
        private.y1 -= radius;
    }

    // Ghost strips are cross-arms: radius wide, spanning the private
    // range of the orthogonal axis. No corners.
    let mut ghosts = [None; 4];
    if private.x0 != halo.x0 {
        ghosts[GhostDir::Left.index()] = Some(Rect::new(halo.x0, private.y0, private.x0, private.y1));
    }
    if private.y0 != halo.y0 {
        ghosts[GhostDir::Up.index()] = Some(Rect::new(private.x0, halo.y0, private.x1, private.y0));
    }
    if private.x1 != halo.x1 {
        ghosts[GhostDir::Right.index()] = Some(Rect::new(private.x1, private.y0, halo.x1, private.y1));
    }
    if private.y1 != halo.y1 {
        ghosts[GhostDir::Down.index()] = Some(Rect::new(private.x0, private.y1, private.x1, halo.y1));
    }

    // Interior: shrink the private rect by radius on every neighbored side.
    let mut interior = private;
    if ghosts[GhostDir::Left.index()].is_some() {
        interior.x0 += radius;
    }
    if ghosts[GhostDir::Up.index()].is_some() {
        interior.y0 += radius;
    }
    if ghosts[GhostDir::Right.index()].is_some() {
        interior.x1 -= radius;
    }
    if ghosts[GhostDir::Down.index()].is_some() {
        interior.y1 -= radius;
    }

    // Boundary ring: four edge slivers plus a corner wherever both
    // adjacent edges exist.
    let mut boundaries = [None; 8];
    let left = interior.x0 > private.x0;
    let up = interior.y0 > private.y0;
    let right = interior.x1 < private.x1;
    let down = interior.y1 < private.y1;

    if left {
        boundaries[BoundaryDir::Left.index()] =
            Some(Rect::new(private.x0, interior.y0, interior.x0, interior.y1));
        if up {
            boundaries[BoundaryDir::LeftUp.index()] =
                Some(Rect::new(private.x0, private.y0, interior.x0, interior.y0));
        }
    }
    if up {
        boundaries[BoundaryDir::Up.index()] =
            Some(Rect::new(interior.x0, private.y0, interior.x1, interior.y0));
        if right {
            boundaries[BoundaryDir::UpRight.index()] =
                Some(Rect::new(interior.x1, private.y0, private.x1, interior.y0));
        }
    }
    if right {
        boundaries[BoundaryDir::Right.index()] =
            Some(Rect::new(interior.x1, interior.y0, private.x1, interior.y1));
        if down {
            boundaries[BoundaryDir::RightDown.index()] =
                Some(Rect::new(interior.x1, interior.y1, private.x1, private.y1));
        }
    }
    if down {
        boundaries[BoundaryDir::Down.index()] =
            Some(Rect::new(interior.x0, interior.y1, interior.x1, private.y1));
        if left {
            boundaries[BoundaryDir::DownLeft.index()] =
                Some(Rect::new(private.x0, interior.y1, interior.x0, private.y1));
        }
    }

    TileGeometry {
        rank,
        tx,
        ty,
        halo,
        private,
        interior,
        ghosts,
        boundaries,
    }
}

/// Split `region` into `workers` horizontal bands of near-equal height:
/// the first `height % workers` bands get one extra row. Empty bands
/// (more workers than rows) are dropped; the returned bands partition
/// the region exactly.
pub fn balanced_bands(region: Rect, workers: usize) -> Vec<Rect> {
    debug_assert!(workers > 0, "band split needs at least one worker");
    let height = region.height();
    let base = height / workers;
    let remainder = height % workers;

    let mut bands = Vec::with_capacity(workers.min(height));
    let mut y = region.y0;
    for k in 0..workers {
        let rows = base + usize::from(k < remainder);
        if rows == 0 {
            continue;
        }
        bands.push(Rect::new(region.x0, y, region.x1, y + rows));
        y += rows;
    }
    bands
}
