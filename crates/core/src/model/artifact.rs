use crate::domain::record::{Assortment, StateHoliday, StoreType};
use crate::model::pipeline::{NumericTerm, SalesPipeline};
use anyhow::{bail, ensure, Context};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const FORMAT_VERSION: u32 = 1;

const PROMO_LEVELS: [&str; 2] = ["0", "1"];

/// On-disk schema of the fitted pipeline. Categorical entries carry the
/// contribution of each level (one-hot times coefficient, folded); numeric
/// entries carry standardization plus coefficient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineArtifact {
    pub format_version: u32,
    pub model_name: String,
    pub model_version: String,
    pub trained_at: DateTime<Utc>,
    pub intercept: f64,
    pub categorical: BTreeMap<String, BTreeMap<String, f64>>,
    pub numeric: BTreeMap<String, NumericTerm>,
}

impl PipelineArtifact {
    pub fn validate_and_into_pipeline(self) -> anyhow::Result<SalesPipeline> {
        ensure!(
            self.format_version == FORMAT_VERSION,
            "unsupported artifact format_version: {} (expected {FORMAT_VERSION})",
            self.format_version
        );

        let model_name = self.model_name.trim().to_string();
        ensure!(!model_name.is_empty(), "model_name must be non-empty");

        let model_version = self.model_version.trim().to_string();
        ensure!(!model_version.is_empty(), "model_version must be non-empty");

        ensure!(
            self.intercept.is_finite(),
            "intercept must be finite (got {})",
            self.intercept
        );

        let mut categorical = self.categorical;
        let store_type = take_category(
            &mut categorical,
            "storetype",
            StoreType::ALL.map(|v| v.as_str()),
        )?;
        let assortment = take_category(
            &mut categorical,
            "assortment",
            Assortment::ALL.map(|v| v.as_str()),
        )?;
        let state_holiday = take_category(
            &mut categorical,
            "stateholiday",
            StateHoliday::ALL.map(|v| v.as_str()),
        )?;
        let promo = take_category(&mut categorical, "promo", PROMO_LEVELS)?;
        if let Some(extra) = categorical.keys().next() {
            bail!("unknown categorical feature: {extra:?}");
        }

        let mut numeric = self.numeric;
        let customers = take_numeric(&mut numeric, "customers")?;
        let competition_distance = take_numeric(&mut numeric, "competitiondistance")?;
        if let Some(extra) = numeric.keys().next() {
            bail!("unknown numeric feature: {extra:?}");
        }

        Ok(SalesPipeline {
            model_name,
            model_version,
            trained_at: self.trained_at,
            intercept: self.intercept,
            store_type,
            assortment,
            state_holiday,
            promo,
            customers,
            competition_distance,
        })
    }
}

fn take_category<const N: usize>(
    features: &mut BTreeMap<String, BTreeMap<String, f64>>,
    feature: &str,
    levels: [&str; N],
) -> anyhow::Result<[f64; N]> {
    let mut by_level = features
        .remove(feature)
        .with_context(|| format!("missing categorical feature: {feature}"))?;

    let mut weights = [0.0; N];
    for (slot, level) in weights.iter_mut().zip(levels) {
        let weight = by_level
            .remove(level)
            .with_context(|| format!("categorical feature {feature} is missing level {level:?}"))?;
        ensure!(
            weight.is_finite(),
            "weight for {feature}={level} must be finite (got {weight})"
        );
        *slot = weight;
    }

    if let Some(extra) = by_level.keys().next() {
        bail!("categorical feature {feature} has unknown level {extra:?}");
    }

    Ok(weights)
}

fn take_numeric(
    features: &mut BTreeMap<String, NumericTerm>,
    feature: &str,
) -> anyhow::Result<NumericTerm> {
    let term = features
        .remove(feature)
        .with_context(|| format!("missing numeric feature: {feature}"))?;

    ensure!(
        term.mean.is_finite(),
        "mean for {feature} must be finite (got {})",
        term.mean
    );
    ensure!(
        term.std.is_finite() && term.std > 0.0,
        "std for {feature} must be finite and positive (got {})",
        term.std
    );
    ensure!(
        term.weight.is_finite(),
        "weight for {feature} must be finite (got {})",
        term.weight
    );

    Ok(term)
}
