/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Pure cost formulas: time, energy, objective, and fitness.
//!
//! These are free functions rather than methods so they can be used and
//! tested independently of the solvers.  None of them logs or allocates;
//! every stochastic or stateful concern lives upstream.
//!
//! Units are part of the contract and are honoured exactly:
//! data sizes arrive in **megabits**, computing resources in **cycles/s**,
//! bandwidths in **Mbps**, powers in **watts**, energies in **joules**.
//! Division by zero cannot occur — all divisors are positive-real by
//! construction (enforced at the facade).

use crate::model::{CloudNode, FogNode, Task, TerminalDevice};

// ── Fog-tier formulas ─────────────────────────────────────────────────────────

/// Execution time of `task` on `node` in seconds.
///
/// The data size is converted from megabits to bits (`× 10⁶ × 8`) before
/// being multiplied by the per-bit cycle intensity.
pub fn execution_time(task: &Task, node: &FogNode) -> f64 {
    (task.data_size_mbits * 1.0e6 * 8.0 * task.cycles_per_bit) / node.cycles_per_s
}

/// Transmission time of `task` to `node` in seconds: megabits over Mbps.
pub fn transmission_time(task: &Task, node: &FogNode) -> f64 {
    task.data_size_mbits / node.bandwidth_mbps
}

/// End-to-end delay: transmission plus execution.
pub fn total_delay(task: &Task, node: &FogNode) -> f64 {
    transmission_time(task, node) + execution_time(task, node)
}

/// Energy charged to the owning device in joules: the radio burns
/// transmission power while sending, the device idles at its idle power
/// while the node executes.
pub fn energy(task: &Task, node: &FogNode, device: &TerminalDevice) -> f64 {
    transmission_time(task, node) * device.transmission_power_w
        + execution_time(task, node) * device.idle_power_w
}

/// Per-assignment weighted overhead: `w_t·T + w_e·E` under the owning
/// device's weights.  This is the cell cost the solvers minimise.
pub fn weighted_cost(task: &Task, node: &FogNode, device: &TerminalDevice) -> f64 {
    device.delay_weight * total_delay(task, node) + device.energy_weight * energy(task, node, device)
}

/// Solver ranking fitness: the reciprocal of an objective value, with a zero
/// objective mapping to `+∞`.  Larger is better; never persisted.
pub fn fitness_of(objective: f64) -> f64 {
    if objective == 0.0 {
        f64::INFINITY
    } else {
        1.0 / objective
    }
}

// ── Local estimate ────────────────────────────────────────────────────────────

/// Coarse on-device execution-time estimate in seconds, used only by the
/// three-tier policy's local-vs-fog choice: `D · θ · 10⁻⁶`.
pub fn local_execution_time(task: &Task) -> f64 {
    task.data_size_mbits * task.cycles_per_bit * 1.0e-6
}

// ── Cloud-tier formulas ───────────────────────────────────────────────────────

/// Cloud execution time in seconds: compute, WAN transfer, and the fixed
/// latency penalty (milliseconds → seconds).
pub fn cloud_execution_time(task: &Task, cloud: &CloudNode) -> f64 {
    (task.data_size_mbits * task.cycles_per_bit) / cloud.cycles_per_s
        + task.data_size_mbits / cloud.wan_bandwidth_mbps
        + cloud.latency_penalty_ms / 1000.0
}

/// Monetary cost of running `task` in the cloud: computation units times the
/// per-unit fee.
pub fn cloud_cost(task: &Task, cloud: &CloudNode) -> f64 {
    task.data_size_mbits * task.cycles_per_bit * cloud.cost_per_cycle
}

/// Energy charged to the device for a cloud offload: WAN transmission at
/// transmission power, then idling for the whole cloud execution.
pub fn cloud_energy(task: &Task, cloud: &CloudNode, device: &TerminalDevice) -> f64 {
    device.transmission_power_w * (task.data_size_mbits / cloud.wan_bandwidth_mbps)
        + device.idle_power_w * cloud_execution_time(task, cloud)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
