use crate::error::{ReportError, Result};
use crate::models::PriceObservation;
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;
use std::path::{Path, PathBuf};

pub const SETTLEMENT_POINT_COL: &str = "SettlementPoint";
pub const DATE_COL: &str = "Date";
pub const PRICE_COL: &str = "Price";

const REQUIRED_COLUMNS: [&str; 3] = [SETTLEMENT_POINT_COL, DATE_COL, PRICE_COL];

const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

pub struct DataLoader;

impl DataLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load every file in order and concatenate the rows. The first failing file aborts the load.
    pub fn load_files(&self, paths: &[PathBuf]) -> Result<Vec<PriceObservation>> {
        let mut observations = Vec::new();

        for path in paths {
            let rows = self.load_file(path)?;
            log::info!("Loaded {} rows from {}", rows.len(), path.display());
            observations.extend(rows);
        }

        Ok(observations)
    }

    /// Load day-ahead prices from one CSV file
    pub fn load_file(&self, path: &Path) -> Result<Vec<PriceObservation>> {
        if !path.is_file() {
            return Err(ReportError::data_load(path, "file not found"));
        }

        // Infer over the whole file so a stray bad price keeps the column as text
        let file = std::fs::File::open(path).map_err(|e| ReportError::data_load(path, e))?;
        let df = CsvReader::new(file)
            .has_header(true)
            .infer_schema(None)
            .finish()
            .map_err(|e| ReportError::data_load(path, e))?;

        let columns = df.get_column_names();
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .into_iter()
            .filter(|required| !columns.contains(required))
            .collect();
        if !missing.is_empty() {
            return Err(ReportError::data_load(
                path,
                format!("missing required column(s): {}", missing.join(", ")),
            ));
        }

        // Bad values are reported by row, so every column is parsed from text
        let points = Self::text_column(&df, path, SETTLEMENT_POINT_COL)?;
        let dates = Self::text_column(&df, path, DATE_COL)?;
        let prices = Self::text_column(&df, path, PRICE_COL)?;
        let points = points.utf8().map_err(|e| ReportError::data_load(path, e))?;
        let dates = dates.utf8().map_err(|e| ReportError::data_load(path, e))?;
        let prices = prices.utf8().map_err(|e| ReportError::data_load(path, e))?;

        let mut observations = Vec::with_capacity(df.height());

        for (idx, ((point, date), price)) in points
            .into_iter()
            .zip(dates.into_iter())
            .zip(prices.into_iter())
            .enumerate()
        {
            let row = idx + 1;
            let parse_error = |reason: String| ReportError::Parse {
                path: path.to_path_buf(),
                row,
                reason,
            };

            let point = point
                .filter(|p| !p.trim().is_empty())
                .ok_or_else(|| parse_error("missing settlement point".to_string()))?;

            let date = date
                .filter(|d| !d.trim().is_empty())
                .ok_or_else(|| parse_error("missing date".to_string()))?;
            let timestamp = parse_timestamp(date)
                .ok_or_else(|| parse_error(format!("unparseable timestamp '{}'", date)))?;

            let price = price
                .filter(|p| !p.trim().is_empty())
                .ok_or_else(|| parse_error("missing price".to_string()))?;
            let price = parse_price(price)
                .ok_or_else(|| parse_error(format!("unparseable price '{}'", price)))?;

            observations.push(PriceObservation::new(point, timestamp, price));
        }

        Ok(observations)
    }

    fn text_column(df: &DataFrame, path: &Path, name: &str) -> Result<Series> {
        df.column(name)
            .and_then(|s| s.cast(&DataType::Utf8))
            .map_err(|e| ReportError::data_load(path, e))
    }
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an hourly timestamp; a bare date means midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn parse_price(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|p| p.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use std::io::Write;

    fn write_csv(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert_eq!(parse_timestamp("2016-01-01 13:00:00").unwrap().hour(), 13);
        assert_eq!(parse_timestamp("2016-01-01T05:00:00").unwrap().hour(), 5);
        assert_eq!(parse_timestamp("01/02/2016 07:00").unwrap().hour(), 7);
        assert_eq!(parse_timestamp("2016-01-01").unwrap().hour(), 0);
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_load_concatenates_in_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_csv(
            dir.path(),
            "a.csv",
            "Date,SettlementPoint,Price\n2016-01-01 00:00:00,HB_NORTH,20.5\n2016-01-01 01:00:00,HB_NORTH,-3\n",
        );
        let b = write_csv(
            dir.path(),
            "b.csv",
            "Date,SettlementPoint,Price\n2017-01-01 00:00:00,LZ_WEST,18\n",
        );

        let rows = DataLoader::new().load_files(&[a, b]).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].settlement_point, "HB_NORTH");
        assert_eq!(rows[1].price, -3.0);
        assert_eq!(rows[2].settlement_point, "LZ_WEST");
        assert_eq!(rows[2].year(), 2017);
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "extra.csv",
            "Date,SettlementPoint,Price,Market\n2016-03-01 02:00:00,HB_HUBAVG,12.25,DAM\n",
        );

        let rows = DataLoader::new().load_file(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].price, 12.25);
    }

    #[test]
    fn test_missing_file_is_data_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DataLoader::new()
            .load_file(&dir.path().join("ERCOT_DA_Prices_2030.csv"))
            .unwrap_err();
        assert!(matches!(err, ReportError::DataLoad { .. }));
    }

    #[test]
    fn test_missing_column_is_data_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "bad.csv",
            "Date,Node,Price\n2016-01-01 00:00:00,HB_NORTH,20\n",
        );

        match DataLoader::new().load_file(&path).unwrap_err() {
            ReportError::DataLoad { reason, .. } => assert!(reason.contains("SettlementPoint")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_columns_are_all_named() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "renamed.csv",
            "Date,Node,Value\n2016-01-01 00:00:00,HB_NORTH,20\n",
        );

        match DataLoader::new().load_file(&path).unwrap_err() {
            ReportError::DataLoad { reason, .. } => {
                assert_eq!(reason, "missing required column(s): SettlementPoint, Price");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_integer_prices_are_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "ints.csv",
            "Date,SettlementPoint,Price\n2016-01-01 00:00:00,HB_NORTH,20\n2016-01-01 01:00:00,HB_NORTH,-7\n",
        );

        let rows = DataLoader::new().load_file(&path).unwrap();
        assert_eq!(rows[0].price, 20.0);
        assert_eq!(rows[1].price, -7.0);
    }

    #[test]
    fn test_bad_price_reports_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "bad_price.csv",
            "Date,SettlementPoint,Price\n2016-01-01 00:00:00,HB_NORTH,20\n2016-01-01 01:00:00,HB_NORTH,abc\n",
        );

        match DataLoader::new().load_file(&path).unwrap_err() {
            ReportError::Parse { row, .. } => assert_eq!(row, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_timestamp_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "bad_date.csv",
            "Date,SettlementPoint,Price\nnot-a-date,HB_NORTH,20\n",
        );

        assert!(matches!(
            DataLoader::new().load_file(&path),
            Err(ReportError::Parse { row: 1, .. })
        ));
    }
}
