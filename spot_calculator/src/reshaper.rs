use crate::error::{ReportError, Result};
use crate::models::{PriceObservation, WideDayRow};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Pivot long observations into one 24-slot row per (settlement point, day).
///
/// Missing hours stay `None`. A second price for an already filled slot is a
/// `DuplicateHour` error rather than being averaged away.
pub fn wide_day_rows(observations: &[PriceObservation]) -> Result<Vec<WideDayRow>> {
    let mut days: BTreeMap<(&str, NaiveDate), WideDayRow> = BTreeMap::new();

    for obs in observations {
        let row = days
            .entry((obs.settlement_point.as_str(), obs.day()))
            .or_insert_with(|| WideDayRow::new(obs.settlement_point.as_str(), obs.day()));

        let slot = &mut row.hours[obs.hour()];
        if slot.is_some() {
            return Err(ReportError::DuplicateHour {
                settlement_point: obs.settlement_point.clone(),
                day: obs.day(),
                hour: obs.hour(),
            });
        }
        *slot = Some(obs.price);
    }

    Ok(days.into_values().collect())
}

/// Split wide rows into per-settlement-point groups, keeping day order.
pub fn group_by_settlement_point(rows: Vec<WideDayRow>) -> BTreeMap<String, Vec<WideDayRow>> {
    let mut groups: BTreeMap<String, Vec<WideDayRow>> = BTreeMap::new();
    for row in rows {
        groups.entry(row.settlement_point.clone()).or_default().push(row);
    }
    groups
}

/// Expand wide rows back into long observations, skipping empty hours.
pub fn unpivot(rows: &[WideDayRow]) -> Vec<PriceObservation> {
    rows.iter()
        .flat_map(|row| {
            row.hours.iter().enumerate().filter_map(move |(hour, price)| {
                let price = (*price)?;
                let timestamp = row.day.and_hms_opt(hour as u32, 0, 0)?;
                Some(PriceObservation::new(row.settlement_point.as_str(), timestamp, price))
            })
        })
        .collect()
}
