use crate::charts::{ChartRenderer, HUB_MONTHLY_CHART, HUB_VOLATILITY_CHART, ZONE_MONTHLY_CHART};
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use spot_calculator::config::{profile_file_name, spot_file_name};
use spot_calculator::models::ShapeProfileRow;
use spot_calculator::writer::{
    self, HOURLY_VOLATILITY_FILE, MAX_VOLATILITY_FILE, MONTHLY_AVERAGE_FILE,
};
use spot_calculator::{
    monthly, reshaper, shape_profile, volatility, AnnualVolatility, DataLoader, MonthlyAverage,
    ReportConfig, VolatilityEstimator,
};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub observations: usize,
    pub settlement_points: usize,
    pub monthly_rows: usize,
    pub volatility_rows: usize,
    pub spot_files: usize,
    pub profile_files: usize,
    pub undefined_shape_cells: usize,
    pub charts_rendered: usize,
    pub charts_skipped: usize,
}

impl RunSummary {
    pub fn print(&self) {
        println!("\n📊 Run summary");
        println!("{}", "=".repeat(60));
        println!("  Observations loaded:     {}", self.observations);
        println!("  Settlement points:       {}", self.settlement_points);
        println!("  Monthly average rows:    {}", self.monthly_rows);
        println!("  Hub volatility rows:     {}", self.volatility_rows);
        println!("  Spot history files:      {}", self.spot_files);
        println!("  Shape profile files:     {}", self.profile_files);
        if self.undefined_shape_cells > 0 {
            println!("  ⚠️  Undefined shape cells: {}", self.undefined_shape_cells);
        }
        println!(
            "  Charts:                  {} rendered, {} skipped",
            self.charts_rendered, self.charts_skipped
        );
    }
}

/// Loads the raw day-ahead files once and derives every table and chart from them.
pub struct PriceReportPipeline {
    config: ReportConfig,
}

impl PriceReportPipeline {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    pub fn run(&self) -> Result<RunSummary> {
        println!("⚡ ERCOT Day-Ahead Price Reports");
        println!("{}", "=".repeat(60));

        let mut summary = RunSummary::default();

        self.config
            .ensure_dirs()
            .with_context(|| format!("preparing {}", self.config.output_dir.display()))?;

        // Step 1: Load and concatenate the yearly files
        let files = self.config.discover_files()?;
        println!("📂 Loading {} price files from {}", files.len(), self.config.raw_dir.display());
        let observations = DataLoader::new().load_files(&files)?;

        summary.observations = observations.len();
        summary.settlement_points = observations
            .iter()
            .map(|o| o.settlement_point.as_str())
            .collect::<HashSet<_>>()
            .len();
        println!(
            "  📊 {} observations across {} settlement points",
            summary.observations, summary.settlement_points
        );

        // Step 2: Compute every table before anything is written
        println!("\n📅 Computing monthly average prices...");
        let monthly = monthly::monthly_averages(&observations);

        println!("📈 Computing hourly volatility for {}* settlement points...", self.config.hub_prefix);
        let estimator = VolatilityEstimator::new(self.config.hub_prefix.as_str());
        let hub_volatility = estimator.annual_volatility(&observations);
        let max_volatility = volatility::max_volatility_by_year(&hub_volatility);

        println!("🔄 Reshaping spot history to daily rows...");
        let spot_groups = reshaper::group_by_settlement_point(reshaper::wide_day_rows(&observations)?);

        let profile_groups = if self.config.build_profiles {
            println!("🕐 Building hourly shape profiles...");
            let profiles = shape_profile::shape_profiles(&observations);
            summary.undefined_shape_cells = profiles.undefined_cells;

            let mut groups: BTreeMap<String, Vec<ShapeProfileRow>> = BTreeMap::new();
            for row in profiles.rows {
                groups.entry(row.settlement_point.clone()).or_default().push(row);
            }
            Some(groups)
        } else {
            None
        };

        for row in &max_volatility {
            println!(
                "  {} most volatile hub: {} ({:.4})",
                row.year, row.settlement_point, row.hourly_volatility
            );
        }

        // Step 3: Tables
        println!("\n💾 Writing tables to {}...", self.config.table_dir().display());
        writer::write_monthly_averages(&self.config.table_dir().join(MONTHLY_AVERAGE_FILE), &monthly)?;
        writer::write_volatility(&self.config.table_dir().join(HOURLY_VOLATILITY_FILE), &hub_volatility)?;
        writer::write_volatility(&self.config.table_dir().join(MAX_VOLATILITY_FILE), &max_volatility)?;
        summary.monthly_rows = monthly.len();
        summary.volatility_rows = hub_volatility.len();

        // Step 4: Wide-format spot history, one file per settlement point
        summary.spot_files = write_per_point(
            &self.config.spot_dir(),
            &spot_groups,
            spot_file_name,
            writer::write_spot_history,
            "spot history",
        )?;

        // Step 5: Optional hourly shape profiles
        if let Some(profile_groups) = &profile_groups {
            summary.profile_files = write_per_point(
                &self.config.profile_dir(),
                profile_groups,
                profile_file_name,
                writer::write_shape_profile,
                "shape profiles",
            )?;
        }

        // Step 6: Charts
        println!("\n🖼️  Rendering charts...");
        self.render_charts(&monthly, &hub_volatility, &mut summary)?;

        Ok(summary)
    }

    fn render_charts(
        &self,
        monthly: &[MonthlyAverage],
        hub_volatility: &[AnnualVolatility],
        summary: &mut RunSummary,
    ) -> Result<()> {
        let renderer = ChartRenderer::new(self.config.figure_dir());

        let outcomes = [
            renderer.render_monthly_averages(
                HUB_MONTHLY_CHART,
                "Settlement Hub Average Price by Month",
                monthly,
                |p| self.config.is_hub(p),
            ),
            renderer.render_monthly_averages(
                ZONE_MONTHLY_CHART,
                "Load Zone Average Price by Month",
                monthly,
                |p| self.config.is_zone(p),
            ),
            renderer.render_volatility(HUB_VOLATILITY_CHART, hub_volatility),
        ];

        for outcome in outcomes {
            match outcome {
                Ok(path) => {
                    summary.charts_rendered += 1;
                    println!("  ✅ Saved {}", path.display());
                }
                Err(e) if e.is_recoverable() => {
                    summary.charts_skipped += 1;
                    log::warn!("Skipping chart: {}", e);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

/// Write one file per settlement point in parallel. Every path is owned by exactly one worker.
fn write_per_point<T: Sync>(
    dir: &Path,
    groups: &BTreeMap<String, Vec<T>>,
    file_name: fn(&str) -> String,
    write: fn(&Path, &[T]) -> spot_calculator::Result<()>,
    label: &str,
) -> Result<usize> {
    let pb = ProgressBar::new(groups.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({msg})")?,
    );
    pb.set_message(label.to_string());

    let written = groups
        .par_iter()
        .map(|(point, rows)| {
            let result = write(&dir.join(file_name(point)), rows);
            pb.inc(1);
            result
        })
        .collect::<spot_calculator::Result<Vec<()>>>();

    pb.finish_with_message(format!("{} written", label));
    written.with_context(|| format!("writing {} to {}", label, dir.display()))?;

    Ok(groups.len())
}
