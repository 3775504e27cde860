use chrono::{Duration, NaiveDate, NaiveDateTime};
use spot_calculator::{
    config::spot_file_name,
    models::{PriceObservation, WideDayRow, HOURS_PER_DAY},
    monthly::monthly_averages,
    reshaper::{group_by_settlement_point, unpivot, wide_day_rows},
    shape_profile::shape_profiles,
    volatility::max_volatility_by_year,
    writer::write_spot_history,
    VolatilityEstimator,
};
use std::collections::BTreeMap;
use std::path::Path;

fn base_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2016, 12, 20)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Three weeks of hourly prices around a year boundary, with a few gaps and non-positive prices.
fn sample_observations() -> Vec<PriceObservation> {
    let points = ["HB_HOUSTON", "HB_NORTH", "LZ_WEST"];
    let mut rows = Vec::new();

    for (idx, point) in points.iter().enumerate() {
        for hour in 0..(21 * 24) {
            if (hour + idx) % 97 == 0 {
                continue;
            }
            let wave = ((hour % 24) as f64 * 0.4 + idx as f64).cos();
            let mut price = 20.0 + 8.0 * wave + (hour % 7) as f64;
            if (hour + 3 * idx) % 131 == 0 {
                price = -1.5;
            }
            rows.push(PriceObservation::new(
                *point,
                base_time() + Duration::hours(hour as i64),
                price,
            ));
        }
    }
    rows
}

fn read_spot_file(path: &Path) -> Vec<WideDayRow> {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers.len(), 2 + HOURS_PER_DAY);

    reader
        .records()
        .map(|record| {
            let record = record.unwrap();
            let day = NaiveDate::parse_from_str(&record[1], "%Y-%m-%d").unwrap();
            let mut row = WideDayRow::new(&record[0], day);
            for hour in 0..HOURS_PER_DAY {
                let cell = &record[2 + hour];
                if !cell.is_empty() {
                    row.hours[hour] = Some(cell.parse().unwrap());
                }
            }
            row
        })
        .collect()
}

#[test]
fn spot_files_round_trip_to_monthly_averages() {
    let observations = sample_observations();
    let expected = monthly_averages(&observations);

    let dir = tempfile::tempdir().unwrap();
    let groups = group_by_settlement_point(wide_day_rows(&observations).unwrap());
    for (point, rows) in &groups {
        write_spot_history(&dir.path().join(spot_file_name(point)), rows).unwrap();
    }

    let mut restored = Vec::new();
    for point in groups.keys() {
        let rows = read_spot_file(&dir.path().join(spot_file_name(point)));
        assert!(rows.iter().all(|r| &r.settlement_point == point));
        restored.extend(unpivot(&rows));
    }

    let actual = monthly_averages(&restored);
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(&expected) {
        assert_eq!((&a.settlement_point, a.year, a.month), (&e.settlement_point, e.year, e.month));
        assert!((a.average_price - e.average_price).abs() < 1e-9);
    }
}

#[test]
fn max_volatility_matches_independent_maximum() {
    let observations = sample_observations();
    let volatility = VolatilityEstimator::new("HB_").annual_volatility(&observations);
    assert!(!volatility.is_empty());
    assert!(volatility.iter().all(|v| v.settlement_point.starts_with("HB_")));

    let mut independent: BTreeMap<i32, f64> = BTreeMap::new();
    for v in &volatility {
        let best = independent.entry(v.year).or_insert(f64::NEG_INFINITY);
        *best = best.max(v.hourly_volatility);
    }

    let max = max_volatility_by_year(&volatility);
    assert_eq!(max.len(), independent.len());
    for row in &max {
        assert_eq!(row.hourly_volatility, independent[&row.year]);
    }
}

#[test]
fn full_coverage_shapes_average_to_one() {
    let observations = sample_observations();
    let profiles = shape_profiles(&observations);
    assert!(!profiles.rows.is_empty());

    let mut checked = 0;
    for row in &profiles.rows {
        if row.shape.iter().all(|s| s.is_some()) {
            let mean = row.shape.iter().flatten().sum::<f64>() / HOURS_PER_DAY as f64;
            assert!((mean - 1.0).abs() < 1e-9, "{} {} {}", row.settlement_point, row.month, row.day_of_week);
            checked += 1;
        }
    }
    assert!(checked > 0);
}
