// ─────────────────────────────────────────────────────────────────────
// SCPN Stencil Bench — Phase Signals
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Generation-counted synchronization primitives.
//!
//! A `PhaseSignal` is a reusable, monotonically advancing counter: a
//! fixed number of `arrive()` calls completes one generation and wakes
//! every waiter, then the signal is immediately usable for the next
//! generation. Unlike a one-shot event it is advanced and re-waited
//! every iteration for the whole run. The start-of-run gate is the same
//! type with multiplicity equal to the shard count, used once.

use std::sync::{Condvar, Mutex};

#[derive(Debug)]
struct SignalState {
    arrivals: u32,
    generation: u64,
}

/// A reusable arrival counter. `multiplicity` producers must arrive to
/// complete each generation; consumers wait on explicit generation
/// numbers, so a fast producer and a slow consumer never observe a torn
/// generation.
#[derive(Debug)]
pub struct PhaseSignal {
    multiplicity: u32,
    state: Mutex<SignalState>,
    cond: Condvar,
}

impl PhaseSignal {
    pub fn new(multiplicity: u32) -> Self {
        debug_assert!(multiplicity > 0, "a signal needs at least one producer");
        PhaseSignal {
            multiplicity,
            state: Mutex::new(SignalState {
                arrivals: 0,
                generation: 0,
            }),
            cond: Condvar::new(),
        }
    }

    /// Record one producer arrival; the arrival completing the current
    /// generation advances the counter and wakes all waiters.
    pub fn arrive(&self) {
        let mut state = self.state.lock().expect("signal mutex poisoned");
        state.arrivals += 1;
        if state.arrivals == self.multiplicity {
            state.arrivals = 0;
            state.generation += 1;
            self.cond.notify_all();
        }
    }

    /// Block until at least `generation` generations have completed.
    pub fn wait_for(&self, generation: u64) {
        let mut state = self.state.lock().expect("signal mutex poisoned");
        while state.generation < generation {
            state = self.cond.wait(state).expect("signal mutex poisoned");
        }
    }

    /// Completed generation count.
    pub fn generation(&self) -> u64 {
        self.state.lock().expect("signal mutex poisoned").generation
    }
}

/// The paired signals attached to one side of one tile edge: `full`
/// advances when the owner's exposed data is ready for the neighbor,
/// `empty` advances when the owner has finished staging the neighbor's
/// data and the producer may overwrite.
#[derive(Debug)]
pub struct SignalPair {
    pub full: PhaseSignal,
    pub empty: PhaseSignal,
}

impl SignalPair {
    pub fn new(multiplicity: u32) -> Self {
        SignalPair {
            full: PhaseSignal::new(multiplicity),
            empty: PhaseSignal::new(multiplicity),
        }
    }
}
