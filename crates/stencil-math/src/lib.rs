//! Geometry and numerics for SCPN Stencil Bench.
//!
//! Everything in this crate is pure: rectangle algebra, the tile-grid
//! partitioner, the halo/boundary sub-partitioner, the cross weight
//! table and the stencil kernel. Concurrency lives in `stencil-core`.

pub mod kernel;
pub mod partition;
pub mod rect;
pub mod subtile;
pub mod weights;
