use chrono::{Duration, NaiveDate};
use plotters::prelude::*;
use spot_calculator::{AnnualVolatility, MonthlyAverage, ReportError, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

pub const HUB_MONTHLY_CHART: &str = "SettlementHubAveragePriceByMonth.png";
pub const ZONE_MONTHLY_CHART: &str = "LoadZoneAveragePriceByMonth.png";
pub const HUB_VOLATILITY_CHART: &str = "SettlementHubHourlyVolatility.png";

const CHART_SIZE: (u32, u32) = (1200, 500);

pub struct ChartRenderer {
    output_dir: PathBuf,
}

impl ChartRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// One line per settlement point accepted by `include`, monthly average price over time.
    pub fn render_monthly_averages(
        &self,
        file_name: &str,
        title: &str,
        monthly: &[MonthlyAverage],
        include: impl Fn(&str) -> bool,
    ) -> Result<PathBuf> {
        let mut series: BTreeMap<&str, Vec<(NaiveDate, f64)>> = BTreeMap::new();
        for row in monthly.iter().filter(|m| include(&m.settlement_point)) {
            if let Some(month_start) = row.month_start() {
                series
                    .entry(row.settlement_point.as_str())
                    .or_default()
                    .push((month_start, row.average_price));
            }
        }

        if series.is_empty() {
            return Err(ReportError::render(file_name, "no settlement points to plot"));
        }

        let points = series.values().flatten();
        let (Some(min_date), Some(max_date)) = (
            points.clone().map(|(d, _)| *d).min(),
            points.clone().map(|(d, _)| *d).max(),
        ) else {
            return Err(ReportError::render(file_name, "no dates to plot"));
        };
        let min_price = points.clone().map(|(_, p)| *p).fold(f64::INFINITY, f64::min);
        let max_price = points.map(|(_, p)| *p).fold(f64::NEG_INFINITY, f64::max);
        let pad = ((max_price - min_price) * 0.1).max(1.0);

        let output_path = self.output_dir.join(file_name);
        {
            let root = BitMapBackend::new(&output_path, CHART_SIZE).into_drawing_area();

            root.fill(&WHITE).map_err(render_error(file_name))?;

            let mut chart = ChartBuilder::on(&root)
                .caption(title, ("sans-serif", 30).into_font())
                .margin(15)
                .x_label_area_size(50)
                .y_label_area_size(70)
                .build_cartesian_2d(
                    min_date..(max_date + Duration::days(15)),
                    (min_price - pad)..(max_price + pad),
                )
                .map_err(render_error(file_name))?;

            chart
                .configure_mesh()
                .x_desc("Date")
                .y_desc("Price")
                .x_label_formatter(&|d| d.format("%Y-%m").to_string())
                .draw()
                .map_err(render_error(file_name))?;

            for (idx, (point, values)) in series.iter().enumerate() {
                let color = Palette99::pick(idx).to_rgba();
                chart
                    .draw_series(LineSeries::new(values.iter().copied(), color.stroke_width(2)))
                    .map_err(render_error(file_name))?
                    .label(*point)
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
            }

            chart
                .configure_series_labels()
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()
                .map_err(render_error(file_name))?;

            root.present().map_err(render_error(file_name))?;
        }
        Ok(output_path)
    }

    /// Grouped bars: one group per year, one bar per settlement point.
    pub fn render_volatility(&self, file_name: &str, volatility: &[AnnualVolatility]) -> Result<PathBuf> {
        if volatility.is_empty() {
            return Err(ReportError::render(file_name, "no volatility rows to plot"));
        }

        let years: Vec<i32> = volatility
            .iter()
            .map(|v| v.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let points: Vec<&str> = volatility
            .iter()
            .map(|v| v.settlement_point.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let max_vol = volatility
            .iter()
            .map(|v| v.hourly_volatility)
            .fold(0.0, f64::max);

        let output_path = self.output_dir.join(file_name);
        draw_grouped_bars(&output_path, file_name, &years, &points, volatility, max_vol)?;
        Ok(output_path)
    }
}

fn render_error<E: std::fmt::Display>(chart: &str) -> impl Fn(E) -> ReportError + '_ {
    move |e| ReportError::render(chart, e)
}

fn draw_grouped_bars(
    output_path: &Path,
    file_name: &str,
    years: &[i32],
    points: &[&str],
    volatility: &[AnnualVolatility],
    max_vol: f64,
) -> Result<()> {
    let root = BitMapBackend::new(output_path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_error(file_name))?;

    let group_width = 0.8;
    let bar_width = group_width / points.len() as f64;
    let y_max = if max_vol > 0.0 { max_vol * 1.15 } else { 1.0 };

    let mut chart = ChartBuilder::on(&root)
        .caption("Settlement Hub Hourly Volatility", ("sans-serif", 30).into_font())
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5..(years.len() as f64 - 0.5), 0.0..y_max)
        .map_err(render_error(file_name))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Year")
        .y_desc("Hourly Volatility")
        .x_labels(years.len())
        .x_label_formatter(&|x| {
            let idx = x.round();
            if (x - idx).abs() < 1e-9 && idx >= 0.0 {
                years.get(idx as usize).map(|y| y.to_string()).unwrap_or_default()
            } else {
                String::new()
            }
        })
        .draw()
        .map_err(render_error(file_name))?;

    for (p_idx, point) in points.iter().enumerate() {
        let color = Palette99::pick(p_idx).to_rgba();
        let bars = volatility
            .iter()
            .filter(|v| v.settlement_point == *point)
            .filter_map(|v| {
                let y_idx = years.iter().position(|y| *y == v.year)?;
                let left = y_idx as f64 - group_width / 2.0 + p_idx as f64 * bar_width;
                Some(Rectangle::new(
                    [(left, 0.0), (left + bar_width, v.hourly_volatility)],
                    color.filled(),
                ))
            });

        chart
            .draw_series(bars)
            .map_err(render_error(file_name))?
            .label(*point)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(render_error(file_name))?;

    root.present().map_err(render_error(file_name))?;
    Ok(())
}
