/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Three-tier offloading policy: terminal → fog → cloud.
//!
//! Each task is placed independently, in strict priority order:
//!
//! 1. **Local**, when the device is stationary, the coarse on-device
//!    estimate meets the tolerance, and it beats the best fog offer.
//! 2. **Fog**, the lowest-delay node that is not overloaded (load above
//!    0.9; exactly 0.9 still qualifies) and meets both the deadline and the
//!    device's energy budget.
//! 3. **Cloud**, when available.
//! 4. Otherwise a degraded fallback: the least-loaded fog node takes the
//!    task unconditionally and the decision records why.
//!
//! After the per-task pass, the fog-bound subset (including degraded
//! placements) is scheduled as one batch by the hybrid PSO→ACO pipeline —
//! the per-task fog candidate is an estimate, not the final assignment.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::cost;
use crate::error::EngineResult;
use crate::model::{CloudNode, FogNode, Task, TerminalDevice};
use crate::rng::Prng;
use crate::solver::hybrid;
use crate::workload::Workload;

/// Load fraction above which a fog node is considered overloaded.  The
/// comparison is strict, so a node at exactly this load still qualifies.
const OVERLOAD_THRESHOLD: f64 = 0.9;

// ── Decision types ────────────────────────────────────────────────────────────

/// Tier a task was routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffloadTarget {
    Local,
    Fog,
    Cloud,
}

/// Per-task routing decision with the estimates it was based on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub task_id: String,
    pub offload_target: OffloadTarget,
    /// Executor id: a fog node, the cloud endpoint, or the device itself.
    pub target_id: String,
    pub reason: String,
    pub estimated_delay: f64,
    pub estimated_energy: f64,
    pub estimated_cost: f64,
}

/// Combined three-tier assignment report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreeTierReport {
    /// Final task→node mapping for the fog-bound subset, produced by the
    /// hybrid scheduler.
    pub fog_allocations: BTreeMap<String, String>,
    pub cloud_offloaded: Vec<String>,
    pub local_processed: Vec<String>,
    pub decisions: Vec<Decision>,
    pub total_fog_delay: f64,
    pub total_cloud_delay: f64,
    pub total_cost: f64,
}

// ── Policy ────────────────────────────────────────────────────────────────────

/// Route every task to a tier, then schedule the fog-bound subset.
///
/// # Errors
/// Propagates workload-construction failures (no fog nodes, unknown device
/// references) and any evaluation failure from the hybrid stage.
pub fn run(
    tasks: &[Task],
    nodes: &[FogNode],
    devices: &[TerminalDevice],
    cloud: Option<&CloudNode>,
    rng: &mut Prng,
) -> EngineResult<ThreeTierReport> {
    let workload = Workload::new(tasks, nodes, devices)?;
    let m = workload.node_count();
    let cloud = cloud.filter(|c| c.available);

    let mut decisions = Vec::with_capacity(tasks.len());
    let mut fog_bound: Vec<Task> = Vec::new();
    let mut cloud_offloaded = Vec::new();
    let mut local_processed = Vec::new();
    let mut total_cloud_delay = 0.0;
    let mut total_cost = 0.0;

    for (i, task) in tasks.iter().enumerate() {
        let device = workload.device_of(i);

        let local_estimate = cost::local_execution_time(task);
        let local_candidate = local_estimate <= task.max_tolerance_s && !device.mobile;

        // Best fog offer: lowest delay among non-overloaded nodes meeting
        // both bounds.  Earliest-seen node wins ties.
        let mut fog_offer: Option<(usize, f64, f64)> = None;
        let mut overloaded = 0usize;
        for j in 0..m {
            if workload.node(j).current_load > OVERLOAD_THRESHOLD {
                overloaded += 1;
                continue;
            }
            let delay = workload.delay(i, j);
            let energy = workload.energy(i, j);
            if delay <= task.max_tolerance_s && energy <= device.residual_energy_j {
                let better = match fog_offer {
                    Some((_, best, _)) => delay < best,
                    None => true,
                };
                if better {
                    fog_offer = Some((j, delay, energy));
                }
            }
        }
        let fog_delay = fog_offer.map(|(_, d, _)| d).unwrap_or(f64::INFINITY);

        let decision = if local_candidate && local_estimate < fog_delay {
            local_processed.push(task.id.clone());
            Decision {
                task_id: task.id.clone(),
                offload_target: OffloadTarget::Local,
                target_id: device.id.clone(),
                reason: "on-device execution meets the tolerance and beats the best fog offer"
                    .into(),
                estimated_delay: local_estimate,
                estimated_energy: device.idle_power_w * local_estimate,
                estimated_cost: 0.0,
            }
        } else if let Some((j, delay, energy)) = fog_offer {
            fog_bound.push(task.clone());
            Decision {
                task_id: task.id.clone(),
                offload_target: OffloadTarget::Fog,
                target_id: workload.node(j).id.clone(),
                reason: "lowest-delay fog node within the deadline and energy budget".into(),
                estimated_delay: delay,
                estimated_energy: energy,
                estimated_cost: 0.0,
            }
        } else if let Some(cloud) = cloud {
            let delay = cost::cloud_execution_time(task, cloud);
            let cloud_fee = cost::cloud_cost(task, cloud);
            total_cloud_delay += delay;
            total_cost += cloud_fee;
            cloud_offloaded.push(task.id.clone());
            let reason = if overloaded == m {
                format!("all {m} fog nodes overloaded (load above {OVERLOAD_THRESHOLD}); offloading to cloud")
            } else {
                "no fog node meets the deadline and energy bounds; offloading to cloud".into()
            };
            Decision {
                task_id: task.id.clone(),
                offload_target: OffloadTarget::Cloud,
                target_id: cloud.id.clone(),
                reason,
                estimated_delay: delay,
                estimated_energy: cost::cloud_energy(task, cloud, device),
                estimated_cost: cloud_fee,
            }
        } else {
            // Degraded outcome: no tier accepts the task, so the least-loaded
            // fog node takes it unconditionally.
            let mut j = 0;
            for candidate in 1..m {
                if workload.node(candidate).current_load < workload.node(j).current_load {
                    j = candidate;
                }
            }
            warn!(
                task = %task.id,
                node = %workload.node(j).id,
                "degraded placement: no feasible tier, forcing least-loaded fog node"
            );
            fog_bound.push(task.clone());
            Decision {
                task_id: task.id.clone(),
                offload_target: OffloadTarget::Fog,
                target_id: workload.node(j).id.clone(),
                reason: "degraded: no tier satisfies the constraints; forced onto the least-loaded fog node"
                    .into(),
                estimated_delay: workload.delay(i, j),
                estimated_energy: workload.energy(i, j),
                estimated_cost: 0.0,
            }
        };
        decisions.push(decision);
    }

    info!(
        fog = fog_bound.len(),
        cloud = cloud_offloaded.len(),
        local = local_processed.len(),
        "three-tier split complete"
    );

    // The fog-bound subset is scheduled as one batch; per-task offers above
    // were only estimates.
    let fog_workload = Workload::new(&fog_bound, nodes, devices)?;
    let fog_allocation = hybrid::run(&fog_workload, rng)?;

    Ok(ThreeTierReport {
        fog_allocations: fog_allocation.assignments.clone(),
        cloud_offloaded,
        local_processed,
        decisions,
        total_fog_delay: fog_allocation.total_delay,
        total_cloud_delay,
        total_cost,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn device(id: &str, mobile: bool) -> TerminalDevice {
        TerminalDevice {
            id: id.into(),
            transmission_power_w: 0.1,
            idle_power_w: 0.05,
            mobile,
            delay_weight: 1.0,
            energy_weight: 0.0,
            residual_energy_j: f64::INFINITY,
        }
    }

    fn task(id: &str, size_mbits: f64, cycles_per_bit: f64, tolerance_s: f64) -> Task {
        Task {
            id: id.into(),
            data_size_mbits: size_mbits,
            cycles_per_bit,
            max_tolerance_s: tolerance_s,
            expected_completion_s: tolerance_s,
            device_id: "d".into(),
            priority: 1,
        }
    }

    fn node(id: &str, load: f64) -> FogNode {
        FogNode {
            id: id.into(),
            cycles_per_s: 2.0e9,
            storage_gb: 500.0,
            bandwidth_mbps: 100.0,
            current_load: load,
        }
    }

    fn cloud() -> CloudNode {
        CloudNode {
            id: "cloud".into(),
            cycles_per_s: 1.0e10,
            wan_bandwidth_mbps: 20.0,
            latency_penalty_ms: 100.0,
            cost_per_cycle: 0.0001,
            available: true,
        }
    }

    #[test]
    fn mobile_device_never_processes_locally() {
        // The local estimate (0.002 s) would easily beat fog, but the device
        // is mobile, so the idle fog node takes the task.
        let t = task("t0", 10.0, 200.0, 10.0);
        let devices = [device("d", true)];
        let nodes = [node("A", 0.0)];
        let report = run(&[t], &nodes, &devices, None, &mut Prng::seeded(1)).unwrap();
        assert_eq!(report.decisions[0].offload_target, OffloadTarget::Fog);
        assert_eq!(report.fog_allocations["t0"], "A");
        assert!(report.local_processed.is_empty());
    }

    #[test]
    fn oversized_local_estimate_prefers_fog() {
        // Local estimate 40·50 000·10⁻⁶ = 2 s exceeds the 1.9 s tolerance,
        // so the local tier is rejected although the device is stationary.
        // The only non-overloaded fog node delivers within the tolerance.
        let t = task("t0", 40.0, 50_000.0, 1.9);
        let fast = FogNode {
            id: "fast".into(),
            cycles_per_s: 2.0e13,
            storage_gb: 500.0,
            bandwidth_mbps: 100.0,
            current_load: 0.5,
        };
        let busy = node("busy", 0.95);
        let devices = [device("d", false)];
        let report = run(
            &[t],
            &[busy, fast],
            &devices,
            Some(&cloud()),
            &mut Prng::seeded(1),
        )
        .unwrap();
        assert_eq!(report.decisions[0].offload_target, OffloadTarget::Fog);
        assert_eq!(report.decisions[0].target_id, "fast");
        assert!(report.cloud_offloaded.is_empty());
    }

    #[test]
    fn fully_overloaded_fog_falls_through_to_cloud() {
        let t = task("t0", 10.0, 200.0, 60.0);
        let devices = [device("d", true)];
        let nodes = [node("A", 1.0), node("B", 1.0)];
        let report = run(
            &[t],
            &nodes,
            &devices,
            Some(&cloud()),
            &mut Prng::seeded(1),
        )
        .unwrap();
        assert_eq!(report.decisions[0].offload_target, OffloadTarget::Cloud);
        assert_eq!(report.decisions[0].target_id, "cloud");
        assert!(
            report.decisions[0].reason.contains("overloaded"),
            "reason should name the overload: {}",
            report.decisions[0].reason
        );
        assert_eq!(report.cloud_offloaded, vec!["t0".to_string()]);
        assert!(report.fog_allocations.is_empty());
        assert!(report.total_cost > 0.0);
        assert!(report.total_cloud_delay > 0.0);
    }

    #[test]
    fn load_exactly_at_threshold_still_qualifies() {
        let t = task("t0", 10.0, 200.0, 60.0);
        let devices = [device("d", true)];
        let nodes = [node("edge", 0.9)];
        let report = run(
            &[t],
            &nodes,
            &devices,
            Some(&cloud()),
            &mut Prng::seeded(1),
        )
        .unwrap();
        assert_eq!(
            report.decisions[0].offload_target,
            OffloadTarget::Fog,
            "a node at exactly 0.9 load is not overloaded"
        );
    }

    #[test]
    fn stationary_device_with_fast_local_stays_local() {
        // L = 10·200·10⁻⁶ = 0.002 s, far below the fog delay of 8.1 s.
        let t = task("t0", 10.0, 200.0, 10.0);
        let devices = [device("d", false)];
        let nodes = [node("A", 0.0)];
        let report = run(&[t], &nodes, &devices, None, &mut Prng::seeded(1)).unwrap();
        assert_eq!(report.decisions[0].offload_target, OffloadTarget::Local);
        assert_eq!(report.decisions[0].target_id, "d");
        assert_eq!(report.local_processed, vec!["t0".to_string()]);
        assert!(report.fog_allocations.is_empty());
        assert_eq!(report.total_cost, 0.0);
    }

    #[test]
    fn no_tier_available_forces_degraded_fog_placement() {
        // Every node overloaded, no cloud: the least-loaded node takes it.
        let t = task("t0", 10.0, 200.0, 60.0);
        let devices = [device("d", true)];
        let nodes = [node("worse", 1.0), node("better", 0.95)];
        let report = run(&[t], &nodes, &devices, None, &mut Prng::seeded(1)).unwrap();
        assert_eq!(report.decisions[0].offload_target, OffloadTarget::Fog);
        assert_eq!(report.decisions[0].target_id, "better");
        assert!(report.decisions[0].reason.contains("degraded"));
        assert_eq!(report.fog_allocations["t0"], "better");
    }

    #[test]
    fn unavailable_cloud_is_ignored() {
        let t = task("t0", 10.0, 200.0, 60.0);
        let devices = [device("d", true)];
        let nodes = [node("A", 1.0)];
        let mut off_cloud = cloud();
        off_cloud.available = false;
        let report = run(
            &[t],
            &nodes,
            &devices,
            Some(&off_cloud),
            &mut Prng::seeded(1),
        )
        .unwrap();
        assert!(report.cloud_offloaded.is_empty());
        assert!(report.decisions[0].reason.contains("degraded"));
    }

    #[test]
    fn buckets_are_disjoint_and_cover_the_batch() {
        // A mobile device keeps the first two tasks off the local tier; the
        // third task's huge intensity pushes it past every fog deadline.
        let tasks = [
            task("t-a", 10.0, 200.0, 10.0),
            task("t-b", 10.0, 200.0, 60.0),
            task("t-c", 10.0, 2_000_000.0, 0.5),
        ];
        let devices = [device("d", true)];
        let nodes = [node("A", 0.0)];
        let report = run(
            &tasks,
            &nodes,
            &devices,
            Some(&cloud()),
            &mut Prng::seeded(1),
        )
        .unwrap();

        let mut seen: Vec<&str> = Vec::new();
        seen.extend(report.fog_allocations.keys().map(|s| s.as_str()));
        seen.extend(report.cloud_offloaded.iter().map(|s| s.as_str()));
        seen.extend(report.local_processed.iter().map(|s| s.as_str()));
        seen.sort_unstable();
        assert_eq!(seen.len(), 3, "buckets must cover the batch exactly once");
        assert_eq!(report.decisions.len(), 3);
    }
}
