//! Flow execution engine

pub mod engine;
pub mod executor;

pub use engine::{EngineConfig, EventHandler, FlowEngine};
pub use executor::{ExecutionResult, StepExecutor};
