// ─────────────────────────────────────────────────────────────────────
// SCPN Stencil Bench — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use serde::{Deserialize, Serialize};

use crate::error::{StencilError, StencilResult};

/// Run parameters for one stencil benchmark execution.
///
/// `shards` is the number of SPMD participants before the NUMA multiplier
/// is applied; `threads` is the per-shard worker count used to band the
/// interior and private regions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub threads: usize,
    pub iterations: usize,
    pub n: usize,
    #[serde(default = "default_radius")]
    pub radius: usize,
    #[serde(default = "default_shards")]
    pub shards: usize,
    #[serde(default = "default_numa_nodes")]
    pub numa_nodes: usize,
}

fn default_radius() -> usize {
    2
}
fn default_shards() -> usize {
    1
}
fn default_numa_nodes() -> usize {
    1
}

impl RunConfig {
    /// Load from a JSON file.
    pub fn from_file(path: &str) -> StencilResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Total SPMD shard count (NUMA multiplier applied).
    pub fn total_shards(&self) -> usize {
        self.shards * self.numa_nodes
    }

    /// Check every process-input precondition. Violations are fatal for
    /// the run; the message names the constraint that failed.
    pub fn validate(&self) -> StencilResult<()> {
        if self.threads == 0 {
            return Err(StencilError::Config(format!(
                "Number of THREADS must be > 0 : {}",
                self.threads
            )));
        }
        if self.iterations < 1 {
            return Err(StencilError::Config(format!(
                "iterations must be >= 1 : {}",
                self.iterations
            )));
        }
        if self.n == 0 {
            return Err(StencilError::Config(format!(
                "Grid size must be greater than 0 : {}",
                self.n
            )));
        }
        if self.shards == 0 {
            return Err(StencilError::Config(format!(
                "Number of shards must be > 0 : {}",
                self.shards
            )));
        }
        if self.numa_nodes == 0 {
            return Err(StencilError::Config(format!(
                "Number of NUMA nodes must be > 0 : {}",
                self.numa_nodes
            )));
        }
        if self.radius < 1 {
            return Err(StencilError::Config(format!(
                "Stencil radius {} should be positive",
                self.radius
            )));
        }
        if 2 * self.radius + 1 > self.n {
            return Err(StencilError::Config(format!(
                "Stencil radius {} exceeds grid size {}",
                self.radius, self.n
            )));
        }
        Ok(())
    }
}
