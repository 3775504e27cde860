use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use spot_calculator::{
    models::PriceObservation, monthly, reshaper, shape_profile, VolatilityEstimator,
};

// One year of hourly prices for a handful of hubs and load zones
fn generate_year() -> Vec<PriceObservation> {
    let base_time = NaiveDate::from_ymd_opt(2019, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let points = ["HB_HOUSTON", "HB_NORTH", "HB_SOUTH", "HB_WEST", "LZ_AEN", "LZ_CPS"];

    let mut prices = Vec::with_capacity(points.len() * 8760);
    for (idx, point) in points.iter().enumerate() {
        for hour in 0..8760i64 {
            let daily = ((hour % 24) as f64 / 24.0 * std::f64::consts::TAU).sin();
            let price = 25.0 + idx as f64 + 10.0 * daily;
            prices.push(PriceObservation::new(*point, base_time + Duration::hours(hour), price));
        }
    }
    prices
}

fn benchmark_monthly(c: &mut Criterion) {
    let prices = generate_year();
    c.bench_function("monthly_averages", |b| {
        b.iter(|| black_box(monthly::monthly_averages(&prices)));
    });
}

fn benchmark_volatility(c: &mut Criterion) {
    let prices = generate_year();
    let estimator = VolatilityEstimator::new("HB_");
    c.bench_function("annual_volatility", |b| {
        b.iter(|| black_box(estimator.annual_volatility(&prices)));
    });
}

fn benchmark_reshape(c: &mut Criterion) {
    let prices = generate_year();
    c.bench_function("wide_day_rows", |b| {
        b.iter(|| black_box(reshaper::wide_day_rows(&prices).unwrap()));
    });
    c.bench_function("shape_profiles", |b| {
        b.iter(|| black_box(shape_profile::shape_profiles(&prices)));
    });
}

criterion_group!(benches, benchmark_monthly, benchmark_volatility, benchmark_reshape);
criterion_main!(benches);
