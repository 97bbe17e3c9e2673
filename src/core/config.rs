//! Pipeline definitions loaded from YAML

use crate::core::{ErrorHandling, ValidationSchema};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level pipelines file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelinesConfig {
    /// Pipeline definitions
    #[serde(default)]
    pub pipelines: Vec<PipelineConfig>,
}

/// A single pipeline as defined in YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Pipeline name
    pub name: String,

    /// Where payloads come from
    pub source: String,

    /// Targets to route through, in order
    pub targets: Vec<String>,

    /// Payload validation rules
    #[serde(default)]
    pub schema: ValidationSchema,

    /// What to do when a target fails
    #[serde(default)]
    pub error_handling: ErrorHandling,
}

impl PipelinesConfig {
    /// Load pipeline definitions from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse pipeline definitions from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: PipelinesConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the pipeline definitions
    pub fn validate(&self) -> Result<()> {
        let mut seen_names = std::collections::HashSet::new();

        for pipeline in &self.pipelines {
            if pipeline.name.trim().is_empty() {
                anyhow::bail!("Pipeline name cannot be empty");
            }

            if !seen_names.insert(&pipeline.name) {
                anyhow::bail!("Duplicate pipeline name: {}", pipeline.name);
            }

            if pipeline.targets.is_empty() {
                anyhow::bail!("Pipeline '{}' has no targets", pipeline.name);
            }

            if let Some(position) = pipeline.targets.iter().position(|t| t.trim().is_empty()) {
                anyhow::bail!(
                    "Pipeline '{}' has an empty target label at position {}",
                    pipeline.name,
                    position + 1
                );
            }

            if pipeline.schema.required.iter().any(|f| f.trim().is_empty()) {
                anyhow::bail!(
                    "Pipeline '{}' lists an empty required field",
                    pipeline.name
                );
            }
        }

        Ok(())
    }

    /// Find a pipeline definition by name
    pub fn find(&self, name: &str) -> Option<&PipelineConfig> {
        self.pipelines.iter().find(|p| p.name == name)
    }
}
