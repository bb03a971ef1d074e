/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Command-line driver for the fog scheduling engine.
//!
//! Loads a YAML scenario, optionally overrides its mode and seed from the
//! command line, runs the facade, and prints the serialised response to
//! stdout.  Logs go to stderr via `tracing`, controlled by `RUST_LOG`.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use fogsched::api;
use fogsched::config;

#[derive(Debug, Parser)]
#[command(name = "fogsched", about = "Fog-computing task scheduler")]
struct Cli {
    /// Path to the YAML scenario file.
    scenario: PathBuf,

    /// Override the scenario's mode (e.g. HH, FCFS, Compare, ThreeTier).
    #[arg(long)]
    mode: Option<String>,

    /// Override the scenario's PRNG seed.
    #[arg(long)]
    seed: Option<u32>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut request = config::load_scenario(&cli.scenario)?;
    if let Some(mode) = &cli.mode {
        // The CLI accepts the same mode names as the wire contract.
        request.mode = serde_yaml::from_str(mode)
            .map_err(|_| anyhow!("unknown mode '{mode}' (try HH, FCFS, RR, MinMin, Compare, ThreeTier, Experiment)"))?;
    }
    if let Some(seed) = cli.seed {
        request.seed = Some(seed);
    }

    let response = api::schedule(&request).map_err(|e| {
        error!(code = e.code(), "scheduling call failed");
        anyhow::Error::new(e)
    })?;

    let rendered = serde_yaml::to_string(&response).context("serialising response")?;
    println!("{rendered}");
    Ok(())
}
