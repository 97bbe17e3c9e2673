//! Step executor - hands a payload to a single target

use crate::target::{TargetError, TargetInvoker};
use serde_json::Value;
use std::time::Instant;
use tokio::time::{timeout, Duration};
use tracing::{debug, error};

/// Result of executing a step
#[derive(Debug)]
pub enum ExecutionResult {
    /// Target returned a new payload
    Success { output: Value, duration_ms: u64 },
    /// Target failed or timed out
    Failed { error: TargetError, duration_ms: u64 },
}


/// Executes a single step
pub struct StepExecutor<T> {
    invoker: T,
    step_timeout: Option<Duration>,
}

impl<T: TargetInvoker> StepExecutor<T> {
    pub fn new(invoker: T) -> Self {
        Self {
            invoker,
            step_timeout: None,
        }
    }

    /// Fail steps that take longer than `step_timeout`
    pub fn with_timeout(mut self, step_timeout: Option<Duration>) -> Self {
        self.step_timeout = step_timeout;
        self
    }

    /// Invoke a target and time it
    pub async fn execute(&self, target: &str, payload: Value) -> ExecutionResult {
        debug!("Invoking target: {}", target);
        let started = Instant::now();

        let result = match self.step_timeout {
            Some(limit) => match timeout(limit, self.invoker.invoke(target, payload)).await {
                Ok(result) => result,
                Err(_) => {
                    error!("Timeout for target {} after {}ms", target, limit.as_millis());
                    Err(TargetError::Timeout(target.to_string(), limit.as_millis() as u64))
                }
            },
            None => self.invoker.invoke(target, payload).await,
        };

        let duration_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(output) => ExecutionResult::Success { output, duration_ms },
            Err(error) => {
                error!("Target {} failed after {}ms: {}", target, duration_ms, error);
                ExecutionResult::Failed { error, duration_ms }
            }
        }
    }
}
