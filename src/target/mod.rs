//! Target invocation boundary
//!
//! Flows are handed to downstream modules through [`TargetInvoker`]. The
//! bundled [`SimulatedTarget`] stands in for real services.

pub mod config;
pub mod error;
pub mod simulated;

use async_trait::async_trait;
use serde_json::Value;

pub use config::SimulatedTargetConfig;
pub use error::TargetError;
pub use simulated::SimulatedTarget;

/// Trait for target invocation - allows for different implementations
#[async_trait]
pub trait TargetInvoker: Send + Sync {
    /// Hand a payload to a target and return the target's output
    async fn invoke(&self, target: &str, payload: Value) -> Result<Value, TargetError>;
}

/// Type-erased invoker shared between the engine and its callers
pub type SharedInvoker = std::sync::Arc<dyn TargetInvoker>;

#[async_trait]
impl<T: TargetInvoker + ?Sized> TargetInvoker for std::sync::Arc<T> {
    async fn invoke(&self, target: &str, payload: Value) -> Result<Value, TargetError> {
        (**self).invoke(target, payload).await
    }
}
