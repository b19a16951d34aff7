// ─────────────────────────────────────────────────────────────────────
// SCPN Stencil Bench — Property-Based Tests (proptest) for stencil-math
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for stencil-math using proptest.
//!
//! Covers: tile-grid coverage and disjointness, the two-level region
//! partitions, ghost symmetry across neighbors, balanced band splits,
//! and linearity of the stencil kernel.

use ndarray::Array2;
use proptest::prelude::*;
use stencil_math::kernel::apply_stencil;
use stencil_math::partition::{process_grid, TileGrid};
use stencil_math::rect::Rect;
use stencil_math::subtile::{balanced_bands, GhostDir};
use stencil_math::weights::WeightTable;

/// A shard count, radius and grid size that satisfy every decomposition
/// precondition by construction.
fn valid_setup() -> impl Strategy<Value = (usize, usize, usize)> {
    (1usize..=12, 1usize..=3, 1usize..=3).prop_map(|(shards, radius, c)| {
        let (px, py) = process_grid(shards);
        let n = px * py * (2 * radius + c);
        (n, shards, radius)
    })
}

proptest! {
    /// Every grid cell is owned by exactly one tile's private region.
    #[test]
    fn private_regions_partition_grid((n, shards, radius) in valid_setup()) {
        let grid = TileGrid::decompose(n, shards, radius).expect("valid by construction");
        let mut covered = vec![0u32; n * n];
        for tile in &grid.tiles {
            for y in tile.private.y0..tile.private.y1 {
                for x in tile.private.x0..tile.private.x1 {
                    covered[y * n + x] += 1;
                }
            }
        }
        prop_assert!(covered.iter().all(|&c| c == 1));
    }

    /// Interior plus the eight boundary slivers tile the private region.
    #[test]
    fn boundary_pieces_partition_private((n, shards, radius) in valid_setup()) {
        let grid = TileGrid::decompose(n, shards, radius).expect("valid by construction");
        for tile in &grid.tiles {
            let mut area = tile.interior.area();
            let pieces: Vec<Rect> = tile
                .boundaries
                .iter()
                .flatten()
                .copied()
                .chain(std::iter::once(tile.interior))
                .collect();
            for b in tile.boundaries.iter().flatten() {
                area += b.area();
            }
            prop_assert_eq!(area, tile.private.area());
            for (i, a) in pieces.iter().enumerate() {
                for b in pieces.iter().skip(i + 1) {
                    prop_assert!(a.intersect(*b).is_none(), "{:?} overlaps {:?}", a, b);
                }
            }
        }
    }

    /// A ghost strip has the shape of the neighbor's facing boundary
    /// strip and lies entirely inside the neighbor's private region.
    #[test]
    fn ghost_strips_are_symmetric((n, shards, radius) in valid_setup()) {
        let grid = TileGrid::decompose(n, shards, radius).expect("valid by construction");
        for rank in 0..grid.shard_count() {
            for dir in GhostDir::ALL {
                let Some(nbr) = grid.neighbor(rank, dir) else { continue };
                prop_assert_eq!(grid.neighbor(nbr, dir.flip()), Some(rank));
                let ghost = grid.tile(rank).ghost(dir).expect("ghost exists");
                let nbr_private = grid.tile(nbr).private;
                prop_assert_eq!(ghost.intersect(nbr_private), Some(ghost));
            }
        }
    }

    /// Band splits cover the region exactly with near-equal heights.
    #[test]
    fn bands_partition_region(
        x0 in 0usize..8, y0 in 0usize..8,
        w in 1usize..24, h in 1usize..24,
        workers in 1usize..10,
    ) {
        let region = Rect::new(x0, y0, x0 + w, y0 + h);
        let bands = balanced_bands(region, workers);
        let total: usize = bands.iter().map(|b| b.area()).sum();
        prop_assert_eq!(total, region.area());
        let mut y = region.y0;
        for b in &bands {
            prop_assert_eq!(b.x0, region.x0);
            prop_assert_eq!(b.x1, region.x1);
            prop_assert_eq!(b.y0, y);
            y = b.y1;
        }
        prop_assert_eq!(y, region.y1);
        let hs: Vec<usize> = bands.iter().map(|b| b.height()).collect();
        let min = hs.iter().min().expect("at least one band");
        let max = hs.iter().max().expect("at least one band");
        prop_assert!(max - min <= 1);
    }

    /// stencil(a X) == a stencil(X) away from borders.
    #[test]
    fn kernel_is_homogeneous(
        cells in proptest::collection::vec(-100.0f64..100.0, 144),
        scale in -4.0f64..4.0,
    ) {
        let weights = WeightTable::new(2);
        let input = Array2::from_shape_vec((12, 12), cells).expect("shape");
        let scaled = input.mapv(|v| v * scale);
        let target = Rect::new(2, 2, 10, 10);

        let mut out_a = Array2::zeros((12, 12));
        apply_stencil(&input.view(), &mut out_a.view_mut(), (0, 0), target, &weights);
        let mut out_b = Array2::zeros((12, 12));
        apply_stencil(&scaled.view(), &mut out_b.view_mut(), (0, 0), target, &weights);

        for y in target.y0..target.y1 {
            for x in target.x0..target.x1 {
                prop_assert!(
                    (out_a[[y, x]] * scale - out_b[[y, x]]).abs() < 1e-9,
                    "({}, {}): {} vs {}", x, y, out_a[[y, x]] * scale, out_b[[y, x]]
                );
            }
        }
    }

    /// stencil(X + Y) == stencil(X) + stencil(Y) away from borders.
    #[test]
    fn kernel_is_additive(
        xs in proptest::collection::vec(-50.0f64..50.0, 144),
        ys in proptest::collection::vec(-50.0f64..50.0, 144),
    ) {
        let weights = WeightTable::new(2);
        let a = Array2::from_shape_vec((12, 12), xs).expect("shape");
        let b = Array2::from_shape_vec((12, 12), ys).expect("shape");
        let sum = &a + &b;
        let target = Rect::new(2, 2, 10, 10);

        let mut out_a = Array2::zeros((12, 12));
        apply_stencil(&a.view(), &mut out_a.view_mut(), (0, 0), target, &weights);
        let mut out_b = Array2::zeros((12, 12));
        apply_stencil(&b.view(), &mut out_b.view_mut(), (0, 0), target, &weights);
        let mut out_sum = Array2::zeros((12, 12));
        apply_stencil(&sum.view(), &mut out_sum.view_mut(), (0, 0), target, &weights);

        for y in target.y0..target.y1 {
            for x in target.x0..target.x1 {
                prop_assert!(
                    (out_a[[y, x]] + out_b[[y, x]] - out_sum[[y, x]]).abs() < 1e-9
                );
            }
        }
    }
}
