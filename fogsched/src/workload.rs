//! Per-call scheduling context and the public allocation result.
//!
//! [`Workload`] is built once at call entry from the validated request
//! slices.  It precomputes the id→index maps and the `n×m` delay / energy /
//! weighted-overhead tables so the solvers never perform a per-iteration
//! linear search — with swarm sizes of 30 over 100 iterations the tables are
//! read millions of times per call.
//!
//! # Ownership
//! `Workload` borrows the request buffers read-only for the duration of one
//! call.  Solvers own their working state (positions, paths, pheromone) and
//! only read from here; the compiler guarantees the inputs cannot change
//! under them mid-run.
//!
//! The compact solver representation is a per-task node-index vector
//! (`assignment[i] = j`).  Conversion to the public id→id mapping happens
//! exactly once, in [`Workload::evaluate`].

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::cost;
use crate::error::{EngineError, EngineResult};
use crate::model::{FogNode, Task, TerminalDevice};

/// Compact solver-side solution: one fog-node index per task row.
pub type Assignment = Vec<usize>;

// ── Workload ──────────────────────────────────────────────────────────────────

/// Read-only, index-addressed view of one scheduling call's inputs.
#[derive(Debug)]
pub struct Workload<'a> {
    tasks: &'a [Task],
    nodes: &'a [FogNode],
    devices: &'a [TerminalDevice],

    /// task index → index of its owning device.
    device_of: Vec<usize>,

    /// `n×m` end-to-end delay table in seconds.
    delay: Vec<Vec<f64>>,
    /// `n×m` device-side energy table in joules.
    energy: Vec<Vec<f64>>,
    /// `n×m` weighted overhead table (`w_t·T + w_e·E`).
    overhead: Vec<Vec<f64>>,
}

impl<'a> Workload<'a> {
    /// Build the indexed context, resolving every task's device reference.
    ///
    /// # Errors
    /// * [`EngineError::NoResourcesAvailable`] when `nodes` is empty.
    /// * [`EngineError::Validation`] when a task references an unknown
    ///   device id.
    pub fn new(
        tasks: &'a [Task],
        nodes: &'a [FogNode],
        devices: &'a [TerminalDevice],
    ) -> EngineResult<Self> {
        if nodes.is_empty() {
            return Err(EngineError::NoResourcesAvailable);
        }

        let device_index: HashMap<&str, usize> = devices
            .iter()
            .enumerate()
            .map(|(i, d)| (d.id.as_str(), i))
            .collect();

        let mut device_of = Vec::with_capacity(tasks.len());
        for (i, task) in tasks.iter().enumerate() {
            let idx = device_index.get(task.device_id.as_str()).copied().ok_or_else(|| {
                EngineError::validation(
                    format!("tasks[{i}].deviceId"),
                    format!("unknown device '{}'", task.device_id),
                )
            })?;
            device_of.push(idx);
        }

        let n = tasks.len();
        let m = nodes.len();
        let mut delay = vec![vec![0.0; m]; n];
        let mut energy = vec![vec![0.0; m]; n];
        let mut overhead = vec![vec![0.0; m]; n];
        for i in 0..n {
            let device = &devices[device_of[i]];
            for j in 0..m {
                delay[i][j] = cost::total_delay(&tasks[i], &nodes[j]);
                energy[i][j] = cost::energy(&tasks[i], &nodes[j], device);
                overhead[i][j] = device.delay_weight * delay[i][j]
                    + device.energy_weight * energy[i][j];
            }
        }

        Ok(Self {
            tasks,
            nodes,
            devices,
            device_of,
            delay,
            energy,
            overhead,
        })
    }

    /// Number of tasks `n`.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Number of fog nodes `m`.  Always ≥ 1.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn task(&self, i: usize) -> &Task {
        &self.tasks[i]
    }

    pub fn node(&self, j: usize) -> &FogNode {
        &self.nodes[j]
    }

    /// The device owning task `i`.
    pub fn device_of(&self, i: usize) -> &TerminalDevice {
        &self.devices[self.device_of[i]]
    }

    /// Precomputed end-to-end delay of task `i` on node `j`, seconds.
    pub fn delay(&self, i: usize, j: usize) -> f64 {
        self.delay[i][j]
    }

    /// Precomputed device energy of task `i` on node `j`, joules.
    pub fn energy(&self, i: usize, j: usize) -> f64 {
        self.energy[i][j]
    }

    /// Precomputed weighted overhead of assigning task `i` to node `j`.
    pub fn overhead(&self, i: usize, j: usize) -> f64 {
        self.overhead[i][j]
    }

    /// Weighted objective of a complete assignment: `Σᵢ overhead(i, a[i])`.
    pub fn objective(&self, assignment: &[usize]) -> f64 {
        assignment
            .iter()
            .enumerate()
            .map(|(i, &j)| self.overhead[i][j])
            .sum()
    }

    /// Solver ranking fitness of an assignment (reciprocal objective, `+∞`
    /// at zero).  Used to compare candidate positions; never persisted.
    pub fn ranking_fitness(&self, assignment: &[usize]) -> f64 {
        cost::fitness_of(self.objective(assignment))
    }

    // ── Evaluation ────────────────────────────────────────────────────────────

    /// Evaluate a complete assignment into the public [`Allocation`].
    ///
    /// Pure in its inputs: evaluating the mapping carried by a returned
    /// allocation yields the same allocation again.
    ///
    /// # Errors
    /// [`EngineError::Internal`] when the accumulated metrics go non-finite
    /// in a NaN sense — unreachable given positive-real inputs.
    pub fn evaluate(&self, assignment: &[usize]) -> EngineResult<Allocation> {
        debug_assert_eq!(assignment.len(), self.task_count());

        let mut assignments = BTreeMap::new();
        let mut per_task = Vec::with_capacity(assignment.len());
        let mut total_delay = 0.0;
        let mut total_energy = 0.0;
        let mut reliable = 0usize;

        for (i, &j) in assignment.iter().enumerate() {
            let task = &self.tasks[i];
            let node = &self.nodes[j];
            let device = self.device_of(i);

            let execution = cost::execution_time(task, node);
            let transmission = cost::transmission_time(task, node);
            let delay = self.delay[i][j];
            let energy = self.energy[i][j];

            total_delay += delay;
            total_energy += energy;
            if delay <= task.max_tolerance_s && energy <= device.residual_energy_j {
                reliable += 1;
            }

            assignments.insert(task.id.clone(), node.id.clone());
            per_task.push(PerTaskMetrics {
                task_id: task.id.clone(),
                node_id: node.id.clone(),
                execution_time: execution,
                transmission_time: transmission,
                total_delay: delay,
                energy_consumption: energy,
                fitness: cost::fitness_of(delay + energy),
            });
        }

        if total_delay.is_nan() || total_energy.is_nan() {
            return Err(EngineError::Internal {
                assertion: "finite_totals",
            });
        }

        let reliability = if assignment.is_empty() {
            100.0
        } else {
            100.0 * reliable as f64 / assignment.len() as f64
        };

        Ok(Allocation {
            assignments,
            total_delay,
            total_energy,
            fitness: cost::fitness_of(total_delay + total_energy),
            reliability,
            per_task,
        })
    }
}

// ── Allocation ────────────────────────────────────────────────────────────────

/// Fully-evaluated scheduling result for the fog-bound portion of a batch.
///
/// Conceptually immutable once returned: every field is derived from
/// `assignments` and the call inputs, and re-evaluating the mapping
/// reproduces the same values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    /// Total mapping task id → fog node id.  Every fog-bound task appears
    /// exactly once.
    pub assignments: BTreeMap<String, String>,

    /// Sum of end-to-end delays over all assigned tasks, seconds.
    pub total_delay: f64,

    /// Sum of device-side energies over all assigned tasks, joules.
    pub total_energy: f64,

    /// `1 / (totalDelay + totalEnergy)`, `+∞` when the denominator is zero.
    pub fitness: f64,

    /// Percentage of tasks meeting both their delay tolerance and their
    /// device's energy budget.  In `[0, 100]`; `100` for an empty batch.
    pub reliability: f64,

    /// Per-task metric breakdown, in input task order.
    pub per_task: Vec<PerTaskMetrics>,
}

/// Metrics for a single task under the returned mapping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PerTaskMetrics {
    pub task_id: String,
    pub node_id: String,
    pub execution_time: f64,
    pub transmission_time: f64,
    pub total_delay: f64,
    pub energy_consumption: f64,
    pub fitness: f64,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
