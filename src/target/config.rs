//! Simulated target configuration

use std::collections::HashSet;

/// Configuration for the simulated target
#[derive(Debug, Clone)]
pub struct SimulatedTargetConfig {
    /// Upper bound of the random delay per invocation, in milliseconds
    pub max_delay_ms: u64,

    /// Targets that reject every payload
    pub failing_targets: HashSet<String>,
}

impl Default for SimulatedTargetConfig {
    fn default() -> Self {
        Self {
            max_delay_ms: 100,
            failing_targets: HashSet::new(),
        }
    }
}

impl SimulatedTargetConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_delay(mut self, max_delay_ms: u64) -> Self {
        self.max_delay_ms = max_delay_ms;
        self
    }

    pub fn with_failing_target(mut self, target: impl Into<String>) -> Self {
        self.failing_targets.insert(target.into());
        self
    }
}
