//! CLI command definitions

use crate::execution::EngineConfig;
use crate::target::SimulatedTargetConfig;
use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use std::time::Duration;

/// Serve the HTTP API
#[derive(Debug, Args, Clone)]
pub struct ServeCommand {
    /// Address to listen on
    #[arg(long, env = "DATAFLOW_BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind: String,

    /// Pipelines YAML file to register at startup
    #[arg(short, long)]
    pub pipelines: Option<String>,

    /// Bearer token required by the data-flow routes
    #[arg(long, env = "DATAFLOW_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    #[command(flatten)]
    pub targets: TargetArgs,
}

/// Run flows locally
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Path to pipelines YAML file
    #[arg(short, long)]
    pub file: String,

    /// Name of the pipeline to run
    #[arg(short, long)]
    pub pipeline: String,

    /// Payload as inline JSON, or @path to a JSON file
    #[arg(short, long)]
    pub data: String,

    /// Number of flows to submit
    #[arg(long, default_value_t = 1)]
    pub repeat: usize,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub targets: TargetArgs,
}

/// Validate a pipelines file
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Path to pipelines YAML file
    #[arg(short, long)]
    pub file: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Simulated target and engine settings
#[derive(Debug, Args, Clone)]
pub struct TargetArgs {
    /// Upper bound of the simulated per-target delay
    #[arg(long, env = "DATAFLOW_MAX_STEP_DELAY_MS", default_value_t = 100)]
    pub max_delay_ms: u64,

    /// Fail a target after this many milliseconds
    #[arg(long, env = "DATAFLOW_STEP_TIMEOUT_MS")]
    pub step_timeout_ms: Option<u64>,

    /// Make a simulated target reject every payload (repeatable)
    #[arg(long)]
    pub fail_target: Vec<String>,
}

impl TargetArgs {
    pub fn target_config(&self) -> SimulatedTargetConfig {
        self.fail_target.iter().fold(
            SimulatedTargetConfig::new().with_max_delay(self.max_delay_ms),
            |config, target| config.with_failing_target(target.clone()),
        )
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            step_timeout: self.step_timeout_ms.map(Duration::from_millis),
        }
    }
}

/// Parse an inline JSON payload or read one from `@path`
pub fn parse_payload(raw: &str) -> Result<Value> {
    let content = match raw.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read payload file {}", path))?,
        None => raw.to_string(),
    };

    serde_json::from_str(&content).context("Payload is not valid JSON")
}
