//! Scenario-based tests for dataflow

mod helpers;

mod fail_fast;
mod log_and_continue;
mod success_chain;
mod unknown_pipeline;
mod validation;
