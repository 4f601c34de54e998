use crate::domain::record::StoreRecord;
use crate::model::Forecaster;
use anyhow::ensure;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Standardization plus coefficient for one numeric feature.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NumericTerm {
    pub mean: f64,
    pub std: f64,
    pub weight: f64,
}

impl NumericTerm {
    fn apply(&self, value: f64) -> f64 {
        self.weight * (value - self.mean) / self.std
    }
}

/// The validated fitted pipeline. Categorical one-hot terms are folded into
/// per-level weights indexed by the domain enums, so lookups cannot miss after
/// `PipelineArtifact::validate_and_into_pipeline`.
#[derive(Debug, Clone)]
pub struct SalesPipeline {
    pub(crate) model_name: String,
    pub(crate) model_version: String,
    pub(crate) trained_at: DateTime<Utc>,
    pub(crate) intercept: f64,
    pub(crate) store_type: [f64; 4],
    pub(crate) assortment: [f64; 3],
    pub(crate) state_holiday: [f64; 4],
    pub(crate) promo: [f64; 2],
    pub(crate) customers: NumericTerm,
    pub(crate) competition_distance: NumericTerm,
}

impl SalesPipeline {
    pub fn trained_at(&self) -> DateTime<Utc> {
        self.trained_at
    }
}

impl Forecaster for SalesPipeline {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn model_version(&self) -> &str {
        &self.model_version
    }

    fn predict(&self, record: &StoreRecord) -> anyhow::Result<f64> {
        let mut forecast = self.intercept;
        forecast += self.store_type[record.store_type.index()];
        forecast += self.assortment[record.assortment.index()];
        forecast += self.state_holiday[record.state_holiday.index()];
        forecast += self.promo[usize::from(record.promo)];
        forecast += self.customers.apply(f64::from(record.customers));
        forecast += self
            .competition_distance
            .apply(f64::from(record.competition_distance));

        ensure!(
            forecast.is_finite(),
            "pipeline produced a non-finite forecast for record {record:?}"
        );
        Ok(forecast)
    }
}
