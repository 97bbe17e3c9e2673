//! Core domain models for data flows
//!
//! This module defines the fundamental data structures that represent
//! pipelines, payload schemas, flow events and flow outcomes.

pub mod config;
pub mod event;
pub mod pipeline;
pub mod schema;
pub mod state;

pub use event::*;
pub use pipeline::*;
pub use schema::*;
pub use state::*;
