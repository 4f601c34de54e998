use crate::model::artifact::PipelineArtifact;
use crate::model::pipeline::SalesPipeline;
use anyhow::Context;
use std::path::Path;

/// Loads and validates the serialized pipeline. Called once at startup; the
/// result is held in the application state for the process lifetime.
pub fn load_pipeline(path: &Path) -> anyhow::Result<SalesPipeline> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read model artifact at {}", path.display()))?;

    let artifact = serde_json::from_str::<PipelineArtifact>(&raw)
        .with_context(|| format!("model artifact at {} is not valid pipeline JSON", path.display()))?;

    let pipeline = artifact
        .validate_and_into_pipeline()
        .with_context(|| format!("model artifact at {} failed validation", path.display()))?;

    tracing::debug!(path = %path.display(), "model artifact read and validated");
    Ok(pipeline)
}
