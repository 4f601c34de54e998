use serde::{Deserialize, Serialize};
use std::fmt;

/// Store category as used in the historical sales data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreType {
    #[serde(rename = "a")]
    A,
    #[serde(rename = "b")]
    B,
    #[serde(rename = "c")]
    C,
    #[serde(rename = "d")]
    D,
}

impl StoreType {
    pub const ALL: [StoreType; 4] = [StoreType::A, StoreType::B, StoreType::C, StoreType::D];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreType::A => "a",
            StoreType::B => "b",
            StoreType::C => "c",
            StoreType::D => "d",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == s)
    }

    pub(crate) fn index(self) -> usize {
        match self {
            StoreType::A => 0,
            StoreType::B => 1,
            StoreType::C => 2,
            StoreType::D => 3,
        }
    }
}

/// Assortment breadth carried by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Assortment {
    #[serde(rename = "a")]
    Basic,
    #[serde(rename = "b")]
    Extra,
    #[serde(rename = "c")]
    Extended,
}

impl Assortment {
    pub const ALL: [Assortment; 3] = [Assortment::Basic, Assortment::Extra, Assortment::Extended];

    pub fn as_str(&self) -> &'static str {
        match self {
            Assortment::Basic => "a",
            Assortment::Extra => "b",
            Assortment::Extended => "c",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == s)
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Assortment::Basic => 0,
            Assortment::Extra => 1,
            Assortment::Extended => 2,
        }
    }
}

/// State holiday flag. "0" means no holiday in the source data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateHoliday {
    #[serde(rename = "0")]
    None,
    #[serde(rename = "a")]
    Public,
    #[serde(rename = "b")]
    Easter,
    #[serde(rename = "c")]
    Christmas,
}

impl StateHoliday {
    pub const ALL: [StateHoliday; 4] = [
        StateHoliday::None,
        StateHoliday::Public,
        StateHoliday::Easter,
        StateHoliday::Christmas,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StateHoliday::None => "0",
            StateHoliday::Public => "a",
            StateHoliday::Easter => "b",
            StateHoliday::Christmas => "c",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == s)
    }

    pub(crate) fn index(self) -> usize {
        match self {
            StateHoliday::None => 0,
            StateHoliday::Public => 1,
            StateHoliday::Easter => 2,
            StateHoliday::Christmas => 3,
        }
    }
}

impl fmt::Display for StoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Assortment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for StateHoliday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single-row record submitted for one prediction. Built fresh per request
/// and dropped right after inference; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreRecord {
    pub store_type: StoreType,
    pub assortment: Assortment,
    pub state_holiday: StateHoliday,
    pub customers: u32,
    pub competition_distance: u32,
    pub promo: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_levels_round_trip_through_parse() {
        for v in StoreType::ALL {
            assert_eq!(StoreType::parse(v.as_str()), Some(v));
        }
        for v in Assortment::ALL {
            assert_eq!(Assortment::parse(v.as_str()), Some(v));
        }
        for v in StateHoliday::ALL {
            assert_eq!(StateHoliday::parse(v.as_str()), Some(v));
        }
    }

    #[test]
    fn unknown_levels_do_not_parse() {
        assert_eq!(StoreType::parse("e"), None);
        assert_eq!(Assortment::parse("d"), None);
        assert_eq!(StateHoliday::parse("x"), None);
        assert_eq!(StateHoliday::parse(""), None);
    }

    #[test]
    fn record_serializes_with_wire_levels() {
        let record = StoreRecord {
            store_type: StoreType::B,
            assortment: Assortment::Extended,
            state_holiday: StateHoliday::None,
            customers: 650,
            competition_distance: 450,
            promo: true,
        };

        let v = serde_json::to_value(&record).unwrap();
        assert_eq!(v["store_type"], "b");
        assert_eq!(v["assortment"], "c");
        assert_eq!(v["state_holiday"], "0");
        assert_eq!(v["customers"], 650);
    }
}
