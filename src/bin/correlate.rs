//! Offline harness for the correlation engine.
//!
//! Loads a topology snapshot and two observation lists from JSON files, runs
//! one correlation pass, and prints the scored pairs/clusters as JSON.
//!
//! This is not the HTTP surface, the relay-directory fetcher, or the
//! synthetic-observation generator (all external collaborators, out of
//! scope) — it is a thin way to exercise the library directly from the
//! command line.
//!
//! Usage:
//!   correlate --topology topology.json --entries entries.json --exits exits.json

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use correlate::config::EngineConfig;
use correlate::repetition::RepetitionTracker;
use correlate::topology::TopologySnapshot;
use correlate::types::{Observation, Relay};
use correlate::CorrelationEngine;

#[derive(Parser)]
#[command(name = "correlate")]
struct Args {
    /// JSON file containing a list of relay records.
    #[arg(long)]
    topology: PathBuf,

    /// JSON file containing a list of entry-side observations.
    #[arg(long)]
    entries: PathBuf,

    /// JSON file containing a list of exit-side observations.
    #[arg(long)]
    exits: PathBuf,

    /// Optional TOML config file. Falls back to CORRELATE_CONFIG / correlate.toml / defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pretty-print the JSON result.
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let relays: Vec<Relay> = load_json(&args.topology)?;
    let entries: Vec<Observation> = load_json(&args.entries)?;
    let exits: Vec<Observation> = load_json(&args.exits)?;

    let config = EngineConfig::load(args.config.as_deref())
        .context("failed to load engine configuration")?;
    let topology = TopologySnapshot::build(relays).context("failed to build topology snapshot")?;
    let tracker = RepetitionTracker::new(config.repetition_config());

    let result = CorrelationEngine::run(&entries, &exits, &topology, &tracker, &config)
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    let output = if args.pretty {
        serde_json::to_string_pretty(&SerializableResult::from(&result))?
    } else {
        serde_json::to_string(&SerializableResult::from(&result))?
    };
    println!("{output}");

    Ok(())
}

fn load_json<T: serde::de::DeserializeOwned>(path: &PathBuf) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

/// Thin serialization shim so the CLI output shape doesn't depend on the
/// internal field layout of `CorrelationResult`.
#[derive(serde::Serialize)]
struct SerializableResult<'a> {
    pairs: &'a [correlate::types::SessionPair],
    clusters: &'a [correlate::types::CorrelationCluster],
    audit: &'a [correlate::types::AuditEntry],
}

impl<'a> From<&'a correlate::CorrelationResult> for SerializableResult<'a> {
    fn from(result: &'a correlate::CorrelationResult) -> Self {
        Self {
            pairs: &result.pairs,
            clusters: &result.clusters,
            audit: &result.audit,
        }
    }
}
