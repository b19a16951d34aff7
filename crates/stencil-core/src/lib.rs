// ─────────────────────────────────────────────────────────────────────
// SCPN Stencil Bench — Stencil Core
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! The concurrent halo-exchange engine: phase signals, the ghost
//! exchange graph, the SPMD shard driver and the run-level reduction.

pub mod driver;
pub mod exchange;
pub mod place;
pub mod report;
pub mod shard;
pub mod signal;
