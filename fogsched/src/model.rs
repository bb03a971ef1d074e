/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Core data entities for the fog scheduling engine.
//!
//! Four record types model the three tiers of the offloading hierarchy plus
//! the unit of work moving through it:
//!
//! ```text
//! TerminalDevice ──produces──► Task ──scheduler──► FogNode
//!                                │                    │ overflow
//!                                └────────────────► CloudNode
//! ```
//!
//! # Lifecycle
//! All entities for one scheduling call are deserialised (or synthesised) at
//! call entry, borrowed read-only by the solvers for the duration of the
//! call, and dropped on return.  Nothing here is mutated by the engine — the
//! working state (positions, paths, pheromone) lives inside the solvers and
//! owns its own buffers.
//!
//! Field names carry their unit as a suffix; the serde (camelCase) names are
//! the wire contract of the surrounding service.

use serde::{Deserialize, Serialize};

// ── TerminalDevice ────────────────────────────────────────────────────────────

/// A terminal device that produces tasks and pays the energy bill for them.
///
/// The per-device weights `delay_weight` / `energy_weight` steer the
/// scheduling objective: a battery-powered sensor typically carries a high
/// energy weight, a latency-critical controller a high delay weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminalDevice {
    /// Unique device id within a scheduling call.
    pub id: String,

    /// Radio transmission power in watts.  Positive.
    pub transmission_power_w: f64,

    /// Idle/compute-wait power draw in watts.  Positive.
    pub idle_power_w: f64,

    /// Whether the device is mobile.  Mobile devices are never candidates
    /// for local processing in the three-tier policy.
    #[serde(default)]
    pub mobile: bool,

    /// Delay weight `w_t` in the scheduling objective.  In `[0, 1]`.
    pub delay_weight: f64,

    /// Energy weight `w_e` in the scheduling objective.  In `[0, 1]`.
    pub energy_weight: f64,

    /// Residual battery energy in joules.  `+∞` (the default) models a
    /// mains-powered device, which trivially satisfies every energy bound.
    #[serde(default = "unbounded_energy")]
    pub residual_energy_j: f64,
}

fn unbounded_energy() -> f64 {
    f64::INFINITY
}

impl TerminalDevice {
    /// `true` when the device has no effective energy budget.
    pub fn has_unbounded_energy(&self) -> bool {
        self.residual_energy_j.is_infinite()
    }
}

// ── Task ──────────────────────────────────────────────────────────────────────

/// One unit of computation, owned by exactly one [`TerminalDevice`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task id within a batch.
    pub id: String,

    /// Input data size `D` in megabits.  Positive.
    pub data_size_mbits: f64,

    /// Computation intensity `θ` in CPU cycles per bit.  Positive.
    pub cycles_per_bit: f64,

    /// Maximum tolerated end-to-end delay in seconds.  A task whose actual
    /// delay exceeds this counts against the batch reliability.
    pub max_tolerance_s: f64,

    /// Caller-side completion-time expectation in seconds.  Carried through
    /// for reporting; the engine does not schedule on it.
    pub expected_completion_s: f64,

    /// Id of the owning [`TerminalDevice`].
    pub device_id: String,

    /// Priority class, 1 (lowest) to 5 (highest).  Part of the batch
    /// contract; the current algorithms treat all tasks uniformly.
    #[serde(default = "default_priority")]
    pub priority: u8,
}

fn default_priority() -> u8 {
    1
}

// ── FogNode ───────────────────────────────────────────────────────────────────

/// An edge-proximate compute node — the executor tier the engine allocates
/// over.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FogNode {
    /// Unique node id within a scheduling call.
    pub id: String,

    /// Computing resource `C` in CPU cycles per second.  Positive.
    pub cycles_per_s: f64,

    /// Storage capacity in gigabytes.  Part of the node contract; unused by
    /// the allocation algorithms.
    pub storage_gb: f64,

    /// Access network bandwidth `B` in megabits per second.  Positive.
    pub bandwidth_mbps: f64,

    /// Load fraction in `[0, 1]` at call entry.  Read by the baselines and
    /// the three-tier policy; never written by the engine.
    #[serde(default)]
    pub current_load: f64,
}

// ── CloudNode ─────────────────────────────────────────────────────────────────

/// The overflow executor behind the fog tier.
///
/// Cloud execution trades a WAN round-trip and a per-cycle fee for
/// effectively unbounded compute; the three-tier policy only reaches for it
/// when no fog node satisfies a task's constraints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudNode {
    /// Cloud endpoint id.
    pub id: String,

    /// Computing resource in CPU cycles per second.  Positive.
    pub cycles_per_s: f64,

    /// WAN bandwidth in megabits per second.  Positive.
    pub wan_bandwidth_mbps: f64,

    /// Fixed WAN latency penalty in milliseconds.  Non-negative.
    #[serde(default)]
    pub latency_penalty_ms: f64,

    /// Monetary cost per computation unit (cycle).  Non-negative.
    #[serde(default)]
    pub cost_per_cycle: f64,

    /// Whether the cloud tier accepts offloads in this call.
    #[serde(default = "default_true")]
    pub available: bool,
}

fn default_true() -> bool {
    true
}

// ── Tests ─────────────────────────────────────────────────────────────────────
