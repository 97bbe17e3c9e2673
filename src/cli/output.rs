//! CLI output formatting

use crate::core::{FlowEvent, FlowEventType, FlowOutcome, PipelineMetrics, StepResult, StepStatus};
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "!");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Create a progress bar
pub fn create_progress_bar(total: usize) -> ProgressBar {
    let progress = ProgressBar::new(total as u64);
    if let Ok(bar_style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        progress.set_style(bar_style.progress_chars("#>-"));
    }
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}

fn short_id(id: &uuid::Uuid) -> String {
    id.to_string()[..8].to_string()
}

/// Format a flow event for display
pub fn format_flow_event(event: &FlowEvent) -> String {
    let module = event.module.as_deref().unwrap_or("-");
    let duration = event
        .duration
        .map(|d| format!(" {}", style(format!("{}ms", d)).dim()))
        .unwrap_or_default();

    match event.event_type {
        FlowEventType::Start => format!("{} Flow started", ROCKET),
        FlowEventType::Step => format!("{} {}{}", CHECK, style(module).green(), duration),
        FlowEventType::Complete => {
            format!("{} Flow {}{}", INFO, style("completed").green(), duration)
        }
        FlowEventType::Error => {
            let error = event
                .data
                .as_ref()
                .and_then(|d| d.get("error"))
                .and_then(|e| e.as_str())
                .unwrap_or("unknown error");
            if event.module.is_some() {
                format!("{} {}: {}{}", WARN, style(module).yellow(), style(error).dim(), duration)
            } else {
                format!(
                    "{} Flow {}: {}{}",
                    CROSS,
                    style("failed").red(),
                    style(error).dim(),
                    duration
                )
            }
        }
    }
}

/// Format a step result for display
pub fn format_step(step: &StepResult) -> String {
    match step.status {
        StepStatus::Success => format!(
            "  {} {} ({}ms)",
            CHECK,
            style(&step.module).green(),
            step.duration
        ),
        StepStatus::Failed => format!(
            "  {} {} ({}ms): {}",
            CROSS,
            style(&step.module).red(),
            step.duration,
            style(step.error.as_deref().unwrap_or_default()).dim()
        ),
    }
}

/// Format a flow outcome as a one-line summary
pub fn format_outcome(outcome: &FlowOutcome) -> String {
    match outcome {
        FlowOutcome::Completed(report) => {
            let failed = report.failed_steps().count();
            let detail = if failed > 0 {
                style(format!("{} step(s) failed", failed)).yellow().to_string()
            } else {
                style("all steps succeeded").green().to_string()
            };
            format!(
                "{} Flow {} completed in {}ms, {}",
                CHECK,
                style(short_id(&report.flow_id)).dim(),
                report.duration_ms,
                detail
            )
        }
        FlowOutcome::PipelineNotFound => format!("{} Pipeline not found", CROSS),
        FlowOutcome::ValidationFailed { flow_id, missing, .. } => format!(
            "{} Flow {} rejected, missing field(s): {}",
            CROSS,
            style(short_id(flow_id)).dim(),
            style(missing.join(", ")).red()
        ),
        FlowOutcome::Aborted {
            flow_id,
            module,
            error,
            ..
        } => format!(
            "{} Flow {} aborted at {}: {}",
            CROSS,
            style(short_id(flow_id)).dim(),
            style(module).red(),
            style(error).dim()
        ),
    }
}

/// Format pipeline metrics for display
pub fn format_metrics(name: &str, metrics: &PipelineMetrics) -> String {
    format!(
        "{} {}: {} flows ({} succeeded, {} failed), {} success, avg {}",
        INFO,
        style(name).bold(),
        style(metrics.total_flows).cyan(),
        style(metrics.successful_flows).green(),
        style(metrics.failed_flows).red(),
        style(format!("{:.1}%", metrics.success_rate())).cyan(),
        style(format!("{:.1}ms", metrics.average_process_time)).dim()
    )
}
