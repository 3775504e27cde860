use crate::models::{PriceObservation, ShapeProfileRow, HOURS_PER_DAY};
use std::collections::BTreeMap;

type GroupKey<'a> = (&'a str, u32, u32);

/// Shape profiles plus how many hourly cells had no usable normalizer.
#[derive(Debug, Clone, Default)]
pub struct ShapeProfiles {
    pub rows: Vec<ShapeProfileRow>,
    pub undefined_cells: usize,
}

/// Normalized intraday price shape per (settlement point, month, weekday).
///
/// Each hour's mean price is divided by the mean of the group's hourly means.
/// A zero denominator leaves the group's cells undefined.
pub fn shape_profiles(observations: &[PriceObservation]) -> ShapeProfiles {
    // (sum, count) per group and hour of day
    let mut sums: BTreeMap<GroupKey, [(f64, usize); HOURS_PER_DAY]> = BTreeMap::new();

    for obs in observations {
        let hours = sums
            .entry((obs.settlement_point.as_str(), obs.month(), obs.weekday()))
            .or_insert([(0.0, 0); HOURS_PER_DAY]);
        let cell = &mut hours[obs.hour()];
        cell.0 += obs.price;
        cell.1 += 1;
    }

    let mut profiles = ShapeProfiles::default();

    for ((point, month, day_of_week), hours) in sums {
        let hourly_means: Vec<Option<f64>> = hours
            .iter()
            .map(|&(sum, count)| (count > 0).then(|| sum / count as f64))
            .collect();

        let present: Vec<f64> = hourly_means.iter().flatten().copied().collect();
        let denominator = present.iter().sum::<f64>() / present.len() as f64;

        let mut shape = [None; HOURS_PER_DAY];
        if denominator != 0.0 && denominator.is_finite() {
            for (slot, mean) in shape.iter_mut().zip(&hourly_means) {
                *slot = mean.map(|m| m / denominator);
            }
        } else {
            profiles.undefined_cells += present.len();
            log::warn!(
                "Hourly shape undefined for {} month {} weekday {}: mean price is zero",
                point,
                month,
                day_of_week
            );
        }

        profiles.rows.push(ShapeProfileRow {
            settlement_point: point.to_string(),
            month,
            day_of_week,
            shape,
        });
    }

    profiles
}
