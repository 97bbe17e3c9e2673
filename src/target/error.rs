//! Target error types

use thiserror::Error;

/// Error types for target invocations
#[derive(Debug, Error)]
pub enum TargetError {
    #[error("Target '{target}' rejected the payload: {reason}")]
    Rejected { target: String, reason: String },

    #[error("Target '{0}' timed out after {1}ms")]
    Timeout(String, u64),
}

impl TargetError {
    pub fn rejected(target: impl Into<String>, reason: impl Into<String>) -> Self {
        TargetError::Rejected {
            target: target.into(),
            reason: reason.into(),
        }
    }

    /// Name of the target that failed
    pub fn target(&self) -> &str {
        match self {
            TargetError::Rejected { target, .. } | TargetError::Timeout(target, _) => target,
        }
    }
}
