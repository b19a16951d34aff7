// ─────────────────────────────────────────────────────────────────────
// SCPN Stencil Bench — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
/// X coefficient of the linear ramp used to seed the input plane.
pub const COEF_X: f64 = 1.0;

/// Y coefficient of the linear ramp used to seed the input plane.
pub const COEF_Y: f64 = 1.0;

/// Tolerance on the run-end accumulated error (double precision).
pub const EPSILON: f64 = 1.0e-8;
