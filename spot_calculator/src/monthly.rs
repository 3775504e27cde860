use crate::models::{MonthlyAverage, PriceObservation};
use std::collections::BTreeMap;

/// Mean price per settlement point and calendar month.
///
/// Months without observations are absent, never zero-filled. Rows come out
/// ordered by settlement point, then year, then month.
pub fn monthly_averages(observations: &[PriceObservation]) -> Vec<MonthlyAverage> {
    let mut buckets: BTreeMap<(&str, i32, u32), (f64, usize)> = BTreeMap::new();

    for obs in observations {
        let entry = buckets
            .entry((obs.settlement_point.as_str(), obs.year(), obs.month()))
            .or_insert((0.0, 0));
        entry.0 += obs.price;
        entry.1 += 1;
    }

    buckets
        .into_iter()
        .map(|((point, year, month), (sum, count))| MonthlyAverage {
            settlement_point: point.to_string(),
            year,
            month,
            average_price: sum / count as f64,
        })
        .collect()
}
