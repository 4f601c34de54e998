pub mod artifact;
pub mod loader;
pub mod pipeline;

use crate::domain::record::StoreRecord;

/// Inference seam. The HTTP layer only ever sees this trait, so a stub can
/// stand in for the fitted pipeline in tests.
pub trait Forecaster: Send + Sync {
    fn model_name(&self) -> &str;

    fn model_version(&self) -> &str;

    fn predict(&self, record: &StoreRecord) -> anyhow::Result<f64>;
}
