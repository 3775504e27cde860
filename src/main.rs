use anyhow::Result;
use spot_calculator::ReportConfig;

mod charts;
mod pipeline;

use pipeline::PriceReportPipeline;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Per-settlement-point file writes fan out over all cores
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_cpus::get())
        .build_global()?;

    let config = ReportConfig::default();
    let summary = PriceReportPipeline::new(config.clone()).run()?;
    summary.print();

    let output_dir = std::fs::canonicalize(&config.output_dir).unwrap_or(config.output_dir);
    println!("\n✅ Done. Outputs saved to: {}", output_dir.display());

    Ok(())
}
