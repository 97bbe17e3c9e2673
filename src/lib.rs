//! dataflow - route payloads through pipelines of targets with event tracing and metrics

pub mod api;
pub mod cli;
pub mod core;
pub mod execution;
pub mod store;
pub mod target;

// Re-export commonly used types
pub use core::{ErrorHandling, FlowEvent, FlowEventType, FlowOutcome, Pipeline, ValidationSchema};
pub use execution::{EngineConfig, FlowEngine};
pub use store::FlowStore;
pub use target::{SimulatedTarget, SimulatedTargetConfig, TargetError, TargetInvoker};
