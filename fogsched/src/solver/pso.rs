/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Binary particle swarm optimiser over the task→node assignment space.
//!
//! Each particle carries a binary position matrix — one `1` per task row,
//! naming the assigned node — evolved through a continuous velocity space.
//! The position is stored as a per-task node-index vector, which makes the
//! single-assignment row invariant structural rather than checked: a row
//! cannot hold zero or two ones.
//!
//! The velocity update uses a linearly-decaying inertia weight with a
//! stochastic tail (the last 30 % of iterations draw the weight uniformly
//! between the bounds, which keeps the swarm from freezing around a local
//! optimum), and a contraction factor that bounds trajectories whenever
//! `c₁ + c₂ > 4`.

use tracing::{debug, info};

use crate::rng::Prng;
use crate::workload::{Assignment, Workload};

// ── Configuration ─────────────────────────────────────────────────────────────

/// Swarm parameters.  The defaults are the standalone-run settings; the
/// hybrid pipeline halves `iterations` because the two stages share one
/// budget.
#[derive(Debug, Clone)]
pub struct PsoConfig {
    /// Number of particles `S`.
    pub swarm: usize,
    /// Number of iterations `K`.
    pub iterations: usize,
    /// Upper inertia bound `w_max`.
    pub w_max: f64,
    /// Lower inertia bound `w_min`.
    pub w_min: f64,
    /// Cognitive coefficient `c₁` (pull toward the personal best).
    pub c1: f64,
    /// Social coefficient `c₂` (pull toward the global best).
    pub c2: f64,
    /// Symmetric velocity clamp.
    pub v_max: f64,
}

impl Default for PsoConfig {
    fn default() -> Self {
        Self {
            swarm: 30,
            iterations: 100,
            w_max: 0.9,
            w_min: 0.4,
            c1: 2.0,
            c2: 2.0,
            v_max: 4.0,
        }
    }
}

/// Best position found by a run, with its ranking fitness.
#[derive(Debug, Clone)]
pub struct PsoOutcome {
    /// One node index per task row.  Every row holds exactly one assignment.
    pub assignment: Assignment,
    /// Ranking fitness of `assignment` (reciprocal weighted objective).
    pub fitness: f64,
}

// ── Particle ──────────────────────────────────────────────────────────────────

/// One candidate allocation with velocity state.
///
/// The personal best is a by-value copy updated in place; particles never
/// share references.
struct Particle {
    assign: Assignment,
    velocity: Vec<Vec<f64>>,
    best_assign: Assignment,
    best_fitness: f64,
}

// ── Solver ────────────────────────────────────────────────────────────────────

/// Run the optimiser and return the best position seen.
///
/// Ties on fitness are broken first-seen: a later particle or iteration only
/// displaces the incumbent when strictly better.  With an empty task set the
/// trivial empty assignment (fitness `+∞`) is returned immediately.
pub fn run(workload: &Workload<'_>, cfg: &PsoConfig, rng: &mut Prng) -> PsoOutcome {
    let n = workload.task_count();
    let m = workload.node_count();

    if n == 0 {
        return PsoOutcome {
            assignment: Vec::new(),
            fitness: f64::INFINITY,
        };
    }

    info!(
        particles = cfg.swarm,
        iterations = cfg.iterations,
        tasks = n,
        nodes = m,
        "running binary PSO"
    );

    // ── Initialisation ────────────────────────────────────────────────────────
    let mut swarm: Vec<Particle> = (0..cfg.swarm)
        .map(|_| {
            let assign: Assignment = (0..n).map(|_| rng.pick(m)).collect();
            let velocity = (0..n)
                .map(|_| (0..m).map(|_| rng.range(-cfg.v_max, cfg.v_max)).collect())
                .collect();
            let fitness = workload.ranking_fitness(&assign);
            Particle {
                best_assign: assign.clone(),
                assign,
                velocity,
                best_fitness: fitness,
            }
        })
        .collect();

    let mut global_assign = swarm[0].best_assign.clone();
    let mut global_fitness = swarm[0].best_fitness;
    for p in &swarm[1..] {
        if p.best_fitness > global_fitness {
            global_fitness = p.best_fitness;
            global_assign = p.best_assign.clone();
        }
    }

    // Contraction factor η is a function of c₁+c₂ only, so it is constant
    // across the whole run.
    let eta = contraction_factor(cfg.c1 + cfg.c2);

    // ── Iterations ────────────────────────────────────────────────────────────
    let k_total = cfg.iterations as f64;
    for k in 0..cfg.iterations {
        for particle in &mut swarm {
            let w = if (k as f64) < 0.7 * k_total {
                cfg.w_max - (cfg.w_max - cfg.w_min) * k as f64 / k_total
            } else {
                cfg.w_min + (cfg.w_max - cfg.w_min) * rng.next()
            };

            for i in 0..n {
                for j in 0..m {
                    let r1 = rng.next();
                    let r2 = rng.next();
                    let pos = indicator(particle.assign[i], j);
                    let pbest = indicator(particle.best_assign[i], j);
                    let gbest = indicator(global_assign[i], j);
                    let v = eta
                        * (w * particle.velocity[i][j]
                            + cfg.c1 * r1 * (pbest - pos)
                            + cfg.c2 * r2 * (gbest - pos));
                    particle.velocity[i][j] = v.clamp(-cfg.v_max, cfg.v_max);
                }
            }

            // Rebuild the position row by row: the column whose squashed
            // velocity is maximal receives the single 1.  First maximum wins.
            for i in 0..n {
                let mut best_j = 0;
                let mut best_sig = sigmoid(particle.velocity[i][0]);
                for (j, &v) in particle.velocity[i].iter().enumerate().skip(1) {
                    let sig = sigmoid(v);
                    if sig > best_sig {
                        best_sig = sig;
                        best_j = j;
                    }
                }
                particle.assign[i] = best_j;
            }

            let fitness = workload.ranking_fitness(&particle.assign);
            if fitness > particle.best_fitness {
                particle.best_fitness = fitness;
                particle.best_assign.clone_from(&particle.assign);
            }
            if fitness > global_fitness {
                global_fitness = fitness;
                global_assign.clone_from(&particle.assign);
            }
        }
    }

    debug!(fitness = global_fitness, "PSO finished");

    PsoOutcome {
        assignment: global_assign,
        fitness: global_fitness,
    }
}

/// Logistic squashing function σ(x) = 1 / (1 + e⁻ˣ).
fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Contraction factor for coefficient sum `φ`: `1` when `φ ≤ 4`, otherwise
/// `2 / |2 − φ − √(φ² − 4φ)|`.
fn contraction_factor(phi: f64) -> f64 {
    if phi <= 4.0 {
        1.0
    } else {
        2.0 / (2.0 - phi - (phi * phi - 4.0 * phi).sqrt()).abs()
    }
}

/// 1.0 when the row's assigned column is `j`, else 0.0 — the binary position
/// matrix read through the compact representation.
fn indicator(assigned: usize, j: usize) -> f64 {
    if assigned == j {
        1.0
    } else {
        0.0
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
