use anyhow::{Context, Result};
use dataflow::api::{create_router, AppState};
use dataflow::cli::commands::{parse_payload, RunCommand, ServeCommand, ValidateCommand};
use dataflow::cli::output::*;
use dataflow::cli::{Cli, Command};
use dataflow::core::config::PipelinesConfig;
use dataflow::execution::FlowEngine;
use dataflow::store::FlowStore;
use dataflow::target::{SharedInvoker, SimulatedTarget};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let default_filter = if cli.verbose {
        "dataflow=debug,tower_http=debug"
    } else {
        "dataflow=info,tower_http=info"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .context("Failed to set logging subscriber")?;

    // Execute command
    match &cli.command {
        Command::Serve(cmd) => serve(cmd).await?,
        Command::Run(cmd) => run_flows(cmd).await?,
        Command::Validate(cmd) => validate_pipelines(cmd)?,
    }

    Ok(())
}

async fn serve(cmd: &ServeCommand) -> Result<()> {
    let store = Arc::new(FlowStore::new());

    if let Some(path) = &cmd.pipelines {
        let config = PipelinesConfig::from_file(path)
            .with_context(|| format!("Failed to load pipelines from {}", path))?;
        for pipeline in &config.pipelines {
            store.create_from_config(pipeline).await;
        }
        info!("Registered {} pipeline(s) from {}", store.len().await, path);
    }

    let invoker: SharedInvoker = Arc::new(SimulatedTarget::new(cmd.targets.target_config()));
    let engine = FlowEngine::with_config(store, invoker, cmd.targets.engine_config());

    if cmd.api_token.is_none() {
        info!("No API token configured, data-flow routes are open");
    }
    let state = AppState::new(Arc::new(engine)).with_api_token(cmd.api_token.clone());
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&cmd.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", cmd.bind))?;
    info!("Listening on {}", cmd.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}

async fn run_flows(cmd: &RunCommand) -> Result<()> {
    let config = PipelinesConfig::from_file(&cmd.file).context("Failed to load pipelines file")?;
    let definition = config
        .find(&cmd.pipeline)
        .with_context(|| format!("Pipeline '{}' not found in {}", cmd.pipeline, cmd.file))?;
    let payload = parse_payload(&cmd.data)?;

    let store = Arc::new(FlowStore::new());
    let pipeline = store.create_from_config(definition).await;
    let engine = FlowEngine::with_config(
        store.clone(),
        SimulatedTarget::new(cmd.targets.target_config()),
        cmd.targets.engine_config(),
    );

    let stream_events = !cmd.json && cmd.repeat == 1;
    if stream_events {
        println!(
            "{} Running {} ({} → {})",
            INFO,
            style(&pipeline.name).bold(),
            style(&pipeline.source).dim(),
            style(pipeline.targets.join(" → ")).cyan()
        );
        engine
            .add_event_handler(|event| println!("{}", format_flow_event(event)))
            .await;
    }

    let progress = (!stream_events && !cmd.json && cmd.repeat > 1)
        .then(|| create_progress_bar(cmd.repeat));

    let mut outcomes = Vec::with_capacity(cmd.repeat);
    for _ in 0..cmd.repeat {
        let outcome = engine.process_data_flow(pipeline.id, payload.clone()).await;
        if let Some(progress) = &progress {
            progress.inc(1);
        }
        outcomes.push(outcome);
    }
    if let Some(progress) = progress {
        progress.finish_and_clear();
    }

    let failures = outcomes.iter().filter(|o| !o.is_success()).count();
    let metrics = store
        .get_flow_metrics(pipeline.id)
        .await
        .context("Pipeline disappeared from the store")?;

    if cmd.json {
        let results: Vec<_> = outcomes.into_iter().map(|o| o.into_response()).collect();
        let data = serde_json::json!({ "results": results, "metrics": metrics });
        println!("{}", serde_json::to_string_pretty(&data)?);
    } else {
        if let Some(last) = outcomes.last() {
            println!("\n{}", format_outcome(last));
            if let dataflow::FlowOutcome::Completed(report) = last {
                for step in &report.steps {
                    println!("{}", format_step(step));
                }
            }
        }

        let (completed, failed) = store.count_terminal_events(pipeline.id).await;
        println!("{}", format_metrics(&pipeline.name, &metrics.pipeline.metrics));
        println!(
            "  {} retained terminal events: {} completed, {} failed",
            style("log").dim(),
            completed,
            failed
        );
    }

    if failures > 0 {
        anyhow::bail!("{} of {} flow(s) failed", failures, cmd.repeat);
    }

    Ok(())
}

fn validate_pipelines(cmd: &ValidateCommand) -> Result<()> {
    println!("{} Validating pipelines...", INFO);

    let config = PipelinesConfig::from_file(&cmd.file).context("Validation failed")?;

    println!("{} Pipelines file is valid!", CHECK);
    for pipeline in &config.pipelines {
        println!(
            "  {} ({:?}): {} target(s), {} required field(s)",
            style(&pipeline.name).bold(),
            pipeline.error_handling,
            style(pipeline.targets.len()).cyan(),
            style(pipeline.schema.required.len()).cyan()
        );
    }

    if cmd.json {
        println!("\n{}", serde_json::to_string_pretty(&config)?);
    }

    Ok(())
}
