use crate::error::{ReportError, Result};
use crate::models::{hour_columns, AnnualVolatility, MonthlyAverage, ShapeProfileRow, WideDayRow};
use serde::Serialize;
use std::path::Path;

pub const MONTHLY_AVERAGE_FILE: &str = "AveragePriceByMonth.csv";
pub const HOURLY_VOLATILITY_FILE: &str = "HourlyVolatilityByYear.csv";
pub const MAX_VOLATILITY_FILE: &str = "MaxVolatilityByYear.csv";

fn format_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Write serde records with a header row taken from their field names.
pub fn write_records<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| ReportError::write(path, e))?;
    for record in records {
        writer.serialize(record).map_err(|e| ReportError::write(path, e))?;
    }
    writer.flush().map_err(|e| ReportError::write(path, e))?;
    Ok(())
}

pub fn write_monthly_averages(path: &Path, rows: &[MonthlyAverage]) -> Result<()> {
    if rows.is_empty() {
        return write_header(path, &["SettlementPoint", "Year", "Month", "AveragePrice"]);
    }
    write_records(path, rows)
}

pub fn write_volatility(path: &Path, rows: &[AnnualVolatility]) -> Result<()> {
    if rows.is_empty() {
        return write_header(path, &["SettlementPoint", "Year", "HourlyVolatility"]);
    }
    write_records(path, rows)
}

// serde emits no header for an empty slice
fn write_header(path: &Path, columns: &[&str]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| ReportError::write(path, e))?;
    writer.write_record(columns).map_err(|e| ReportError::write(path, e))?;
    writer.flush().map_err(|e| ReportError::write(path, e))?;
    Ok(())
}

/// `spot_<point>.csv`: Variable, Date, X1..X24 for one settlement point.
pub fn write_spot_history(path: &Path, rows: &[WideDayRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| ReportError::write(path, e))?;

    let mut header = vec!["Variable".to_string(), "Date".to_string()];
    header.extend(hour_columns());
    writer.write_record(&header).map_err(|e| ReportError::write(path, e))?;

    for row in rows {
        let mut record = Vec::with_capacity(header.len());
        record.push(row.settlement_point.clone());
        record.push(row.day.format("%Y-%m-%d").to_string());
        record.extend(row.hours.iter().map(|h| format_cell(*h)));
        writer.write_record(&record).map_err(|e| ReportError::write(path, e))?;
    }

    writer.flush().map_err(|e| ReportError::write(path, e))?;
    Ok(())
}

/// `profile_<point>.csv`: SettlementPoint, Month, DayOfWeek, X1..X24.
pub fn write_shape_profile(path: &Path, rows: &[ShapeProfileRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| ReportError::write(path, e))?;

    let mut header = vec![
        "SettlementPoint".to_string(),
        "Month".to_string(),
        "DayOfWeek".to_string(),
    ];
    header.extend(hour_columns());
    writer.write_record(&header).map_err(|e| ReportError::write(path, e))?;

    for row in rows {
        let mut record = Vec::with_capacity(header.len());
        record.push(row.settlement_point.clone());
        record.push(row.month.to_string());
        record.push(row.day_of_week.to_string());
        record.extend(row.shape.iter().map(|s| format_cell(*s)));
        writer.write_record(&record).map_err(|e| ReportError::write(path, e))?;
    }

    writer.flush().map_err(|e| ReportError::write(path, e))?;
    Ok(())
}
