/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Hybrid PSO → ACO scheduling pipeline.
//!
//! PSO explores the combinatorial space quickly; its best position then seeds
//! the ACO pheromone matrix, biasing the colony toward that region for
//! refinement.  Both stages run at half the standalone iteration count since
//! they share one budget.

use tracing::info;

use crate::error::EngineResult;
use crate::rng::Prng;
use crate::solver::{aco, pso};
use crate::workload::{Allocation, Workload};

/// Iterations per stage — half the standalone default of 100.
const STAGE_ITERATIONS: usize = 50;

/// Run the full pipeline over a workload and evaluate the result.
pub fn run(workload: &Workload<'_>, rng: &mut Prng) -> EngineResult<Allocation> {
    info!(
        tasks = workload.task_count(),
        nodes = workload.node_count(),
        "running hybrid PSO→ACO scheduler"
    );

    let pso_cfg = pso::PsoConfig {
        iterations: STAGE_ITERATIONS,
        ..pso::PsoConfig::default()
    };
    let explored = pso::run(workload, &pso_cfg, rng);

    let aco_cfg = aco::AcoConfig {
        iterations: STAGE_ITERATIONS,
        ..aco::AcoConfig::default()
    };
    let refined = aco::run(workload, &aco_cfg, Some(&explored.assignment), rng);

    workload.evaluate(&refined.path)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
