//! Scenario file loading.
//!
//! A scenario file is one whole [`ScheduleRequest`] in YAML — devices, tasks,
//! fog nodes, an optional cloud endpoint, the mode and an optional seed:
//!
//! ```yaml
//! mode: HH
//! seed: 42
//! devices:
//!   - id: d1
//!     transmissionPowerW: 0.1
//!     idlePowerW: 0.05
//!     delayWeight: 1.0
//!     energyWeight: 0.0
//! tasks:
//!   - id: t1
//!     dataSizeMbits: 10.0
//!     cyclesPerBit: 200.0
//!     maxToleranceS: 10.0
//!     expectedCompletionS: 8.0
//!     deviceId: d1
//! fogNodes:
//!   - id: fog-a
//!     cyclesPerS: 2.0e9
//!     storageGb: 500.0
//!     bandwidthMbps: 100.0
//! ```
//!
//! Semantic validation (positive numerics, reference integrity) happens later
//! in the facade; this module only guards file access and YAML structure.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::api::ScheduleRequest;

/// Parse `path` into a [`ScheduleRequest`].
///
/// # Errors
/// Returns an error if the file cannot be opened or if the YAML is
/// structurally invalid.
pub fn load_scenario(path: &Path) -> Result<ScheduleRequest> {
    info!("Loading scenario from: {}", path.display());

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot open scenario file: {}", path.display()))?;

    let request: ScheduleRequest = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse YAML scenario: {}", path.display()))?;

    info!(
        tasks = request.tasks.len(),
        devices = request.devices.len(),
        fog_nodes = request.fog_nodes.len(),
        "scenario loaded"
    );

    Ok(request)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
