//! Stand-in target with a bounded random delay

use crate::target::{SimulatedTargetConfig, TargetError, TargetInvoker};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// Payload key listing the targets a payload passed through
pub const PROCESSED_BY_KEY: &str = "processedBy";

/// Payload key holding the time of the last target hop
pub const PROCESSED_AT_KEY: &str = "processedAt";

/// Target that sleeps for a random time and stamps the payload
#[derive(Debug, Clone, Default)]
pub struct SimulatedTarget {
    config: SimulatedTargetConfig,
}

impl SimulatedTarget {
    pub fn new(config: SimulatedTargetConfig) -> Self {
        Self { config }
    }

    fn stamp(target: &str, payload: Value) -> Value {
        let mut object = match payload {
            Value::Object(object) => object,
            other => return other,
        };

        let trail = object
            .entry(PROCESSED_BY_KEY)
            .or_insert_with(|| Value::Array(Vec::new()));
        match trail {
            Value::Array(items) => items.push(json!(target)),
            other => *other = json!([target]),
        }

        object.insert(
            PROCESSED_AT_KEY.to_string(),
            json!(chrono::Utc::now().to_rfc3339()),
        );

        Value::Object(object)
    }
}

#[async_trait]
impl TargetInvoker for SimulatedTarget {
    async fn invoke(&self, target: &str, payload: Value) -> Result<Value, TargetError> {
        let delay = fastrand::u64(0..=self.config.max_delay_ms);
        debug!("Simulating target {} with {}ms delay", target, delay);
        tokio::time::sleep(Duration::from_millis(delay)).await;

        if self.config.failing_targets.contains(target) {
            return Err(TargetError::rejected(target, "simulated failure"));
        }

        Ok(Self::stamp(target, payload))
    }
}
