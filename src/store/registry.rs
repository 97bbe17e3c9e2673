//! Pipeline registry

use super::{FlowStore, PipelineEntry};
use crate::core::{config::PipelineConfig, ErrorHandling, Pipeline, ValidationSchema};
use tracing::info;
use uuid::Uuid;

impl FlowStore {
    /// Register a new pipeline with zeroed metrics and an empty event log
    ///
    /// Names, sources and targets are not checked for uniqueness.
    pub async fn create_pipeline(
        &self,
        name: impl Into<String>,
        source: impl Into<String>,
        targets: Vec<String>,
        schema: ValidationSchema,
        error_handling: ErrorHandling,
    ) -> Pipeline {
        let pipeline = Pipeline::new(name, source, targets, schema, error_handling);

        self.entries
            .write()
            .await
            .insert(pipeline.id, PipelineEntry::new(pipeline.clone()));

        info!(
            "Pipeline created: {} ({}) with {} target(s), {:?}",
            pipeline.name,
            pipeline.id,
            pipeline.targets.len(),
            pipeline.error_handling
        );

        pipeline
    }

    /// Register a pipeline from its YAML definition
    pub async fn create_from_config(&self, config: &PipelineConfig) -> Pipeline {
        self.create_pipeline(
            config.name.clone(),
            config.source.clone(),
            config.targets.clone(),
            config.schema.clone(),
            config.error_handling,
        )
        .await
    }

    /// All registered pipelines, in no particular order
    pub async fn list_pipelines(&self) -> Vec<Pipeline> {
        self.entries
            .read()
            .await
            .values()
            .map(|entry| entry.pipeline.clone())
            .collect()
    }

    /// Get a pipeline by ID
    pub async fn get_pipeline(&self, id: Uuid) -> Option<Pipeline> {
        self.entries
            .read()
            .await
            .get(&id)
            .map(|entry| entry.pipeline.clone())
    }
}
