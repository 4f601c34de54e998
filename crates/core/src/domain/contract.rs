use crate::domain::record::{Assortment, StateHoliday, StoreRecord, StoreType};
use anyhow::{bail, Context};
use serde::Deserialize;

/// Raw form payload, exactly as the browser posts it. Field names match the
/// feature schema the pipeline was fitted on.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictionRequest {
    pub storetype: String,
    pub assortment: String,
    pub stateholiday: String,
    pub customers: String,
    pub competitiondistance: String,
    pub promo: String,
}

impl PredictionRequest {
    pub fn validate_and_into_record(self) -> anyhow::Result<StoreRecord> {
        let store_type = parse_level("storetype", &self.storetype, StoreType::parse)?;
        let assortment = parse_level("assortment", &self.assortment, Assortment::parse)?;
        let state_holiday = parse_level("stateholiday", &self.stateholiday, StateHoliday::parse)?;

        let customers = parse_count("customers", &self.customers)?;
        let competition_distance = parse_count("competitiondistance", &self.competitiondistance)?;

        let promo = match self.promo.trim() {
            "0" => false,
            "1" => true,
            other => bail!("promo must be 0 or 1 (got {other:?})"),
        };

        Ok(StoreRecord {
            store_type,
            assortment,
            state_holiday,
            customers,
            competition_distance,
            promo,
        })
    }
}

fn parse_level<T>(field: &str, raw: &str, parse: impl Fn(&str) -> Option<T>) -> anyhow::Result<T> {
    let trimmed = raw.trim();
    parse(trimmed).with_context(|| format!("unknown {field} level: {trimmed:?}"))
}

fn parse_count(field: &str, raw: &str) -> anyhow::Result<u32> {
    let trimmed = raw.trim();
    trimmed
        .parse::<u32>()
        .with_context(|| format!("{field} must be a non-negative integer (got {trimmed:?})"))
}
