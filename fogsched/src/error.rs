/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured error types for the fog scheduling engine.
//!
//! Three failure kinds cover the whole engine:
//!
//! * [`EngineError::Validation`] — a request field failed semantic validation
//!   (carries the offending field path).  Recovered locally: the facade
//!   returns it as a structured value and nothing inside the engine ran.
//! * [`EngineError::Internal`] — a solver invariant was violated or the
//!   objective went non-finite.  Fatal for the call; propagates unchanged.
//! * [`EngineError::NoResourcesAvailable`] — an operation that needs a fog
//!   node was given none.  The caller decides whether to fall back to cloud.
//!
//! Every variant carries enough structured data to emit a fully-qualified
//! `tracing` event and to be matched by the surrounding service when mapping
//! onto its transport codes (see [`EngineError::code`]).  **Do not** replace
//! these with `anyhow::Error` in engine paths — the structured variants are
//! intentional; `anyhow` is reserved for the application layer (config
//! loading, CLI).

use thiserror::Error;

/// Top-level error type returned by every fallible engine entry point.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A request field failed semantic validation (non-positive numerics,
    /// weights outside `[0,1]`, unknown device references, and so on).
    ///
    /// `field` is the path of the offending field in request notation, e.g.
    /// `tasks[2].dataSizeMbits`.
    #[error("validation failed at '{field}': {message}")]
    Validation { field: String, message: String },

    /// An internal solver invariant was violated, or an arithmetic anomaly
    /// (NaN objective) was detected.  Unreachable given a correct engine;
    /// surfaced with the internal assertion name rather than recovered.
    #[error("internal invariant violated: {assertion}")]
    Internal { assertion: &'static str },

    /// No fog node remains for an operation that requires at least one.
    ///
    /// Behind the facade this is prevented by request validation; the variant
    /// exists for callers that drive the engine modules directly with a
    /// pre-filtered node list.
    #[error("no fog nodes available for scheduling")]
    NoResourcesAvailable,
}

impl EngineError {
    /// Shorthand constructor for [`EngineError::Validation`].
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Stable machine-readable code for the surrounding transport layer.
    ///
    /// The engine never formats user-facing messages; the outer service maps
    /// these codes onto its own status scheme (e.g. HTTP 422 / 500 / 503).
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::Validation { .. } => "VALIDATION_ERROR",
            EngineError::Internal { .. } => "SCHEDULING_ERROR",
            EngineError::NoResourcesAvailable => "NO_RESOURCES_AVAILABLE",
        }
    }
}

/// Convenience alias used throughout the engine.
pub type EngineResult<T> = Result<T, EngineError>;

// ── Tests ─────────────────────────────────────────────────────────────────────
