use crate::models::{has_prefix_ignore_case, AnnualVolatility, LogReturn, PriceObservation};
use chrono::Datelike;
use std::collections::{BTreeMap, HashSet};

/// Hourly log-return volatility for hub settlement points.
pub struct VolatilityEstimator {
    hub_prefix: String,
}

impl VolatilityEstimator {
    pub fn new(hub_prefix: impl Into<String>) -> Self {
        Self {
            hub_prefix: hub_prefix.into(),
        }
    }

    /// Per-hub, time-ordered observations. Non-hub points never enter this component.
    fn hub_series<'a>(&self, observations: &'a [PriceObservation]) -> BTreeMap<&'a str, Vec<&'a PriceObservation>> {
        let mut series: BTreeMap<&str, Vec<&PriceObservation>> = BTreeMap::new();

        for obs in observations
            .iter()
            .filter(|o| has_prefix_ignore_case(&o.settlement_point, &self.hub_prefix))
        {
            series.entry(obs.settlement_point.as_str()).or_default().push(obs);
        }

        // Files arrive in any order; the merged table is never assumed sorted
        for rows in series.values_mut() {
            rows.sort_by_key(|o| o.timestamp);
        }
        series
    }

    /// `ln(p_t / p_{t-1})` for adjacent observations whose prices are both strictly positive.
    ///
    /// A non-positive price ends the run it sits in: neither the return into it
    /// nor the return out of it exists.
    pub fn log_returns(&self, observations: &[PriceObservation]) -> Vec<LogReturn> {
        let mut returns = Vec::new();

        for (point, rows) in self.hub_series(observations) {
            for pair in rows.windows(2) {
                let (prev, curr) = (pair[0], pair[1]);
                if prev.price <= 0.0 || curr.price <= 0.0 {
                    continue;
                }

                returns.push(LogReturn {
                    settlement_point: point.to_string(),
                    timestamp: curr.timestamp,
                    value: (curr.price / prev.price).ln(),
                });
            }
        }

        returns
    }

    /// Sample standard deviation of log returns per hub and year.
    ///
    /// A return belongs to the year of its later observation. Hub/years with
    /// fewer than two returns have no defined volatility and are left out.
    pub fn annual_volatility(&self, observations: &[PriceObservation]) -> Vec<AnnualVolatility> {
        let mut by_year: BTreeMap<(String, i32), Vec<f64>> = BTreeMap::new();

        for ret in self.log_returns(observations) {
            let year = ret.timestamp.year();
            by_year
                .entry((ret.settlement_point, year))
                .or_default()
                .push(ret.value);
        }

        by_year
            .into_iter()
            .filter_map(|((point, year), values)| {
                sample_std_dev(&values).map(|vol| AnnualVolatility {
                    settlement_point: point,
                    year,
                    hourly_volatility: vol,
                })
            })
            .collect()
    }
}

/// Bessel-corrected standard deviation; `None` below two values.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(variance.sqrt())
}

/// The most volatile hub for each year, ordered by year.
///
/// Ties on volatility go to the lexicographically smallest settlement point.
pub fn max_volatility_by_year(volatility: &[AnnualVolatility]) -> Vec<AnnualVolatility> {
    let mut ranked: Vec<&AnnualVolatility> = volatility.iter().collect();
    ranked.sort_by(|a, b| {
        b.hourly_volatility
            .total_cmp(&a.hourly_volatility)
            .then_with(|| a.settlement_point.cmp(&b.settlement_point))
    });

    let mut seen_years = HashSet::new();
    let mut winners: Vec<AnnualVolatility> = ranked
        .into_iter()
        .filter(|v| seen_years.insert(v.year))
        .cloned()
        .collect();

    winners.sort_by_key(|v| v.year);
    winners
}
