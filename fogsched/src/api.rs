/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! External interface facade: typed request/response shapes and dispatch.
//!
//! The facade is the single decision point between the surrounding service
//! and the engine.  It receives an already-deserialised [`ScheduleRequest`],
//! runs semantic validation beyond what the schema can express (positive
//! numerics, weights in `[0, 1]`, device references, priorities), dispatches
//! on the [`Mode`] tag, and measures wall-clock execution time for
//! reporting.  Pure in, pure out: no I/O happens here.
//!
//! The serde (camelCase) field names of every type in this module are the
//! wire contract of the surrounding service — renaming one is a breaking
//! change.

use std::collections::{BTreeSet, HashSet};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::baseline;
use crate::error::{EngineError, EngineResult};
use crate::experiment::{self, ExperimentKind, ExperimentOutcome};
use crate::model::{CloudNode, FogNode, Task, TerminalDevice};
use crate::offload::{self, ThreeTierReport};
use crate::rng::Prng;
use crate::solver::{aco, hybrid, pso};
use crate::workload::{Allocation, Workload};

/// Sweep points used when an experiment request leaves `iterations` unset.
const DEFAULT_EXPERIMENT_POINTS: u32 = 5;

// ── Request ───────────────────────────────────────────────────────────────────

/// Scheduling algorithm / operation selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    #[serde(rename = "HH")]
    Hh,
    #[serde(rename = "IPSO_only")]
    IpsoOnly,
    #[serde(rename = "IACO_only")]
    IacoOnly,
    #[serde(rename = "FCFS")]
    Fcfs,
    #[serde(rename = "RR")]
    Rr,
    #[serde(rename = "MinMin")]
    MinMin,
    Compare,
    ThreeTier,
    Experiment,
}

/// One scheduling call, fully described.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub mode: Mode,
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// Fog executors.  Required non-empty except in `Experiment` mode, which
    /// synthesises its own fog.
    #[serde(default)]
    pub fog_nodes: Vec<FogNode>,
    #[serde(default)]
    pub devices: Vec<TerminalDevice>,
    #[serde(default)]
    pub cloud: Option<CloudNode>,
    /// 32-bit seed for reproducible runs; host entropy when absent.
    #[serde(default)]
    pub seed: Option<u32>,
    /// Experiment selector, required when `mode` is `Experiment`.
    #[serde(default)]
    pub experiment: Option<ExperimentKind>,
    /// Task-count sweep points for `Experiment` mode.  Must be ≥ 1.
    #[serde(default)]
    pub iterations: Option<u32>,
}

// ── Responses ─────────────────────────────────────────────────────────────────

/// Response of every single-algorithm mode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AllocationReport {
    #[serde(flatten)]
    pub allocation: Allocation,
    pub execution_time_ms: u64,
}

/// One algorithm's headline numbers inside a comparison run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlgoSummary {
    pub delay: f64,
    pub energy: f64,
    pub reliability: f64,
    pub execution_time_ms: u64,
}

/// Response of `Compare` mode: one entry per algorithm.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompareReport {
    pub hh: AlgoSummary,
    pub ipso: AlgoSummary,
    pub iaco: AlgoSummary,
    pub rr: AlgoSummary,
    pub min_min: AlgoSummary,
}

/// Union of all response shapes, discriminated by the request mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScheduleResponse {
    Single(AllocationReport),
    Compare(CompareReport),
    ThreeTier(ThreeTierReport),
    Experiment(ExperimentOutcome),
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Validate and dispatch one scheduling call.
pub fn schedule(request: &ScheduleRequest) -> EngineResult<ScheduleResponse> {
    validate(request)?;

    info!(
        mode = ?request.mode,
        tasks = request.tasks.len(),
        fog_nodes = request.fog_nodes.len(),
        seeded = request.seed.is_some(),
        "scheduling call accepted"
    );

    match request.mode {
        Mode::Hh | Mode::IpsoOnly | Mode::IacoOnly | Mode::Fcfs | Mode::Rr | Mode::MinMin => {
            Ok(ScheduleResponse::Single(run_single(request, request.mode)?))
        }
        Mode::Compare => {
            let report = CompareReport {
                hh: summarise(run_single(request, Mode::Hh)?),
                ipso: summarise(run_single(request, Mode::IpsoOnly)?),
                iaco: summarise(run_single(request, Mode::IacoOnly)?),
                rr: summarise(run_single(request, Mode::Rr)?),
                min_min: summarise(run_single(request, Mode::MinMin)?),
            };
            Ok(ScheduleResponse::Compare(report))
        }
        Mode::ThreeTier => {
            let mut rng = Prng::new(request.seed);
            let report = offload::run(
                &request.tasks,
                &request.fog_nodes,
                &request.devices,
                request.cloud.as_ref(),
                &mut rng,
            )?;
            Ok(ScheduleResponse::ThreeTier(report))
        }
        Mode::Experiment => {
            // Presence of `experiment` was checked during validation.
            let kind = request.experiment.ok_or(EngineError::Internal {
                assertion: "experiment_selector_present_after_validation",
            })?;
            let points = request.iterations.unwrap_or(DEFAULT_EXPERIMENT_POINTS) as usize;
            let outcome = experiment::run(kind, points, request.seed)?;
            Ok(ScheduleResponse::Experiment(outcome))
        }
    }
}

/// Run one algorithm over the request batch and evaluate it.
///
/// Each invocation owns a fresh PRNG built from the request seed, so the
/// algorithms inside a comparison run are seeded identically rather than
/// sharing a drifting stream.
fn run_single(request: &ScheduleRequest, algorithm: Mode) -> EngineResult<AllocationReport> {
    let started = Instant::now();
    let workload = Workload::new(&request.tasks, &request.fog_nodes, &request.devices)?;
    let mut rng = Prng::new(request.seed);

    let allocation: Allocation = match algorithm {
        Mode::Hh => hybrid::run(&workload, &mut rng)?,
        Mode::IpsoOnly => {
            let out = pso::run(&workload, &pso::PsoConfig::default(), &mut rng);
            workload.evaluate(&out.assignment)?
        }
        Mode::IacoOnly => {
            let out = aco::run(&workload, &aco::AcoConfig::default(), None, &mut rng);
            workload.evaluate(&out.path)?
        }
        Mode::Fcfs => workload.evaluate(&baseline::fcfs(&workload))?,
        Mode::Rr => workload.evaluate(&baseline::round_robin(&workload))?,
        Mode::MinMin => workload.evaluate(&baseline::min_min(&workload))?,
        Mode::Compare | Mode::ThreeTier | Mode::Experiment => {
            return Err(EngineError::Internal {
                assertion: "run_single_called_with_composite_mode",
            })
        }
    };

    Ok(AllocationReport {
        allocation,
        execution_time_ms: started.elapsed().as_millis() as u64,
    })
}

fn summarise(report: AllocationReport) -> AlgoSummary {
    AlgoSummary {
        delay: report.allocation.total_delay,
        energy: report.allocation.total_energy,
        reliability: report.allocation.reliability,
        execution_time_ms: report.execution_time_ms,
    }
}

// ── Validation ────────────────────────────────────────────────────────────────

/// Semantic validation beyond the schema.  The first offence wins; its field
/// path is reported in request notation.
fn validate(request: &ScheduleRequest) -> EngineResult<()> {
    for (i, device) in request.devices.iter().enumerate() {
        require_positive(
            device.transmission_power_w,
            format!("devices[{i}].transmissionPowerW"),
        )?;
        require_positive(device.idle_power_w, format!("devices[{i}].idlePowerW"))?;
        require_weight(device.delay_weight, format!("devices[{i}].delayWeight"))?;
        require_weight(device.energy_weight, format!("devices[{i}].energyWeight"))?;
        if !(device.residual_energy_j >= 0.0) {
            return Err(EngineError::validation(
                format!("devices[{i}].residualEnergyJ"),
                "must be non-negative",
            ));
        }
    }
    require_unique_ids(request.devices.iter().map(|d| d.id.as_str()), "devices")?;

    let device_ids: HashSet<&str> = request.devices.iter().map(|d| d.id.as_str()).collect();
    for (i, task) in request.tasks.iter().enumerate() {
        require_positive(task.data_size_mbits, format!("tasks[{i}].dataSizeMbits"))?;
        require_positive(task.cycles_per_bit, format!("tasks[{i}].cyclesPerBit"))?;
        require_positive(task.max_tolerance_s, format!("tasks[{i}].maxToleranceS"))?;
        require_positive(
            task.expected_completion_s,
            format!("tasks[{i}].expectedCompletionS"),
        )?;
        if !(1..=5).contains(&task.priority) {
            return Err(EngineError::validation(
                format!("tasks[{i}].priority"),
                "must lie in 1..=5",
            ));
        }
        if !device_ids.contains(task.device_id.as_str()) {
            return Err(EngineError::validation(
                format!("tasks[{i}].deviceId"),
                format!("unknown device '{}'", task.device_id),
            ));
        }
    }
    require_unique_ids(request.tasks.iter().map(|t| t.id.as_str()), "tasks")?;

    // Experiment mode synthesises its own fog; every other mode schedules
    // onto the supplied nodes.
    if request.mode != Mode::Experiment && request.fog_nodes.is_empty() {
        return Err(EngineError::validation(
            "fogNodes",
            "at least one fog node is required",
        ));
    }
    for (i, node) in request.fog_nodes.iter().enumerate() {
        require_positive(node.cycles_per_s, format!("fogNodes[{i}].cyclesPerS"))?;
        require_positive(node.storage_gb, format!("fogNodes[{i}].storageGb"))?;
        require_positive(node.bandwidth_mbps, format!("fogNodes[{i}].bandwidthMbps"))?;
        if !(0.0..=1.0).contains(&node.current_load) {
            return Err(EngineError::validation(
                format!("fogNodes[{i}].currentLoad"),
                "must lie in [0, 1]",
            ));
        }
    }
    require_unique_ids(request.fog_nodes.iter().map(|n| n.id.as_str()), "fogNodes")?;

    if let Some(cloud) = &request.cloud {
        require_positive(cloud.cycles_per_s, "cloud.cyclesPerS".to_string())?;
        require_positive(cloud.wan_bandwidth_mbps, "cloud.wanBandwidthMbps".to_string())?;
        if !(cloud.latency_penalty_ms >= 0.0) {
            return Err(EngineError::validation(
                "cloud.latencyPenaltyMs",
                "must be non-negative",
            ));
        }
        if !(cloud.cost_per_cycle >= 0.0) {
            return Err(EngineError::validation(
                "cloud.costPerCycle",
                "must be non-negative",
            ));
        }
    }

    if request.mode == Mode::Experiment {
        if request.experiment.is_none() {
            return Err(EngineError::validation(
                "experiment",
                "required when mode is Experiment",
            ));
        }
        if let Some(iterations) = request.iterations {
            if iterations < 1 {
                return Err(EngineError::validation("iterations", "must be at least 1"));
            }
        }
    }

    Ok(())
}

/// `value > 0.0`, with NaN counting as a failure.
fn require_positive(value: f64, field: String) -> EngineResult<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(EngineError::validation(field, "must be positive"))
    }
}

fn require_weight(value: f64, field: String) -> EngineResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(EngineError::validation(field, "must lie in [0, 1]"))
    }
}

fn require_unique_ids<'a>(
    ids: impl Iterator<Item = &'a str>,
    collection: &str,
) -> EngineResult<()> {
    let mut seen = BTreeSet::new();
    for (i, id) in ids.enumerate() {
        if !seen.insert(id) {
            return Err(EngineError::validation(
                format!("{collection}[{i}].id"),
                format!("duplicate id '{id}'"),
            ));
        }
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
