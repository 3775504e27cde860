use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

pub const HOURS_PER_DAY: usize = 24;

/// One hourly price for one settlement point, as loaded from the raw files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    pub settlement_point: String,
    pub timestamp: NaiveDateTime,
    pub price: f64,
}

impl PriceObservation {
    pub fn new(settlement_point: impl Into<String>, timestamp: NaiveDateTime, price: f64) -> Self {
        Self {
            settlement_point: settlement_point.into(),
            timestamp,
            price,
        }
    }

    pub fn day(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn hour(&self) -> usize {
        self.timestamp.hour() as usize
    }

    pub fn year(&self) -> i32 {
        self.timestamp.year()
    }

    pub fn month(&self) -> u32 {
        self.timestamp.month()
    }

    /// Monday = 0 .. Sunday = 6
    pub fn weekday(&self) -> u32 {
        self.timestamp.weekday().num_days_from_monday()
    }

    pub fn has_prefix(&self, prefix: &str) -> bool {
        has_prefix_ignore_case(&self.settlement_point, prefix)
    }
}

pub fn has_prefix_ignore_case(settlement_point: &str, prefix: &str) -> bool {
    settlement_point
        .get(..prefix.len())
        .map_or(false, |head| head.eq_ignore_ascii_case(prefix))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAverage {
    #[serde(rename = "SettlementPoint")]
    pub settlement_point: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Month")]
    pub month: u32,
    #[serde(rename = "AveragePrice")]
    pub average_price: f64,
}

impl MonthlyAverage {
    pub fn month_start(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogReturn {
    pub settlement_point: String,
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualVolatility {
    #[serde(rename = "SettlementPoint")]
    pub settlement_point: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "HourlyVolatility")]
    pub hourly_volatility: f64,
}

/// One settlement point's prices for one calendar day, indexed by hour of day.
#[derive(Debug, Clone, PartialEq)]
pub struct WideDayRow {
    pub settlement_point: String,
    pub day: NaiveDate,
    pub hours: [Option<f64>; HOURS_PER_DAY],
}

impl WideDayRow {
    pub fn new(settlement_point: impl Into<String>, day: NaiveDate) -> Self {
        Self {
            settlement_point: settlement_point.into(),
            day,
            hours: [None; HOURS_PER_DAY],
        }
    }

    pub fn filled_hours(&self) -> usize {
        self.hours.iter().filter(|h| h.is_some()).count()
    }
}

/// Normalized intraday shape for one (settlement point, month, weekday) group.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeProfileRow {
    pub settlement_point: String,
    pub month: u32,
    pub day_of_week: u32,
    pub shape: [Option<f64>; HOURS_PER_DAY],
}

/// Column headers `X1..X24` used by the wide-format outputs.
pub fn hour_columns() -> Vec<String> {
    (1..=HOURS_PER_DAY).map(|h| format!("X{}", h)).collect()
}
