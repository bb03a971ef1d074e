/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Uniform `[0, 1)` random source for the scheduling engine.
//!
//! Every stochastic choice in the engine — PSO initialisation and velocity
//! draws, ACO roulette selection, workload synthesis — reads from a single
//! [`Prng`] handle that the facade constructs once per call and threads
//! through as `&mut`.  There is no process-global generator: two concurrent
//! scheduling calls each own their handle, and a seeded handle makes a call a
//! pure function of its inputs.
//!
//! # Sources
//! * **Seeded** — a 32-bit mixed-multiply stream (Mulberry32).  Given the
//!   same seed, two handles produce bit-identical streams; this is the sole
//!   hook that makes benchmark runs reproducible.
//! * **Host** — `rand`'s `StdRng` initialised from OS entropy, used when the
//!   caller supplies no seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ── Mulberry32 ────────────────────────────────────────────────────────────────

/// 32-bit mixed-multiply generator.
///
/// Small state, full 2³² period, and good enough mixing for metaheuristic
/// sampling.  Not suitable for anything security-related.
#[derive(Debug, Clone)]
struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut z = self.state;
        z = (z ^ (z >> 15)).wrapping_mul(z | 1);
        z ^= z.wrapping_add((z ^ (z >> 7)).wrapping_mul(z | 61));
        z ^ (z >> 14)
    }

    /// Uniform `f64` in `[0, 1)` — the 32-bit draw scaled by 2⁻³².
    fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }
}

// ── Prng handle ───────────────────────────────────────────────────────────────

enum Source {
    Seeded(Mulberry32),
    Host(Box<StdRng>),
}

/// Per-call random source handle.
///
/// # Ownership
/// Exclusively owned by one scheduling call; solvers borrow it `&mut` in the
/// order they run, so the draw sequence (and therefore the result) is fixed
/// by the seed alone.
pub struct Prng {
    source: Source,
}

impl Prng {
    /// Deterministic stream from a 32-bit seed.
    pub fn seeded(seed: u32) -> Self {
        Self {
            source: Source::Seeded(Mulberry32::new(seed)),
        }
    }

    /// Non-reproducible stream backed by host entropy.
    pub fn from_entropy() -> Self {
        Self {
            source: Source::Host(Box::new(StdRng::from_entropy())),
        }
    }

    /// Seeded stream when a seed is given, host entropy otherwise.
    ///
    /// This is the facade-facing constructor: it mirrors the request's
    /// optional `seed` field directly.
    pub fn new(seed: Option<u32>) -> Self {
        match seed {
            Some(s) => Self::seeded(s),
            None => Self::from_entropy(),
        }
    }

    /// Next uniform draw in `[0, 1)`.
    pub fn next(&mut self) -> f64 {
        match &mut self.source {
            Source::Seeded(m) => m.next_f64(),
            Source::Host(r) => r.gen::<f64>(),
        }
    }

    /// Uniform index in `[0, n)`.
    ///
    /// # Panics
    /// Panics if `n == 0` — callers index into non-empty collections only.
    pub fn pick(&mut self, n: usize) -> usize {
        debug_assert!(n > 0, "Prng::pick called with n == 0");
        let idx = (self.next() * n as f64) as usize;
        // next() < 1.0 keeps idx < n except for pathological rounding
        idx.min(n - 1)
    }

    /// Uniform draw in `[lo, hi)`.
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
