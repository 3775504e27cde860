use crate::error::{ReportError, Result};
use glob::glob;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the raw files live, where outputs go, and how settlement points are classified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub raw_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Input file names under `raw_dir`, loaded in order. Empty means "every CSV in raw_dir".
    pub files: Vec<String>,
    pub hub_prefix: String,
    pub zone_prefix: String,
    pub build_profiles: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            raw_dir: PathBuf::from("data/raw"),
            output_dir: PathBuf::from("output"),
            files: (2016..=2019)
                .map(|year| format!("ERCOT_DA_Prices_{}.csv", year))
                .collect(),
            hub_prefix: "HB_".to_string(),
            zone_prefix: "LZ_".to_string(),
            build_profiles: true,
        }
    }
}

impl ReportConfig {
    /// Same layout and classification as the default, rooted at other directories.
    pub fn with_dirs(raw_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            raw_dir: raw_dir.into(),
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    pub fn table_dir(&self) -> PathBuf {
        self.output_dir.join("tables")
    }

    pub fn figure_dir(&self) -> PathBuf {
        self.output_dir.join("figures")
    }

    pub fn spot_dir(&self) -> PathBuf {
        self.output_dir.join("formattedSpotHistory")
    }

    pub fn profile_dir(&self) -> PathBuf {
        self.output_dir.join("hourlyShapeProfiles")
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        let mut dirs = vec![self.table_dir(), self.figure_dir(), self.spot_dir()];
        if self.build_profiles {
            dirs.push(self.profile_dir());
        }

        for dir in dirs {
            std::fs::create_dir_all(&dir).map_err(|e| ReportError::write(&dir, e))?;
        }
        Ok(())
    }

    /// Resolve the input paths. An explicit list is taken as-is; existence is checked at load time.
    pub fn discover_files(&self) -> Result<Vec<PathBuf>> {
        if !self.files.is_empty() {
            return Ok(self.files.iter().map(|f| self.raw_dir.join(f)).collect());
        }

        let pattern = self.raw_dir.join("*.csv");
        let pattern = pattern
            .to_str()
            .ok_or_else(|| ReportError::data_load(&self.raw_dir, "raw directory is not valid UTF-8"))?;

        let mut files: Vec<PathBuf> = glob(pattern)
            .map_err(|e| ReportError::data_load(&self.raw_dir, e))?
            .filter_map(|entry| entry.ok())
            .collect();
        files.sort();

        if files.is_empty() {
            return Err(ReportError::data_load(&self.raw_dir, "no CSV files found"));
        }
        Ok(files)
    }

    pub fn is_hub(&self, settlement_point: &str) -> bool {
        crate::models::has_prefix_ignore_case(settlement_point, &self.hub_prefix)
    }

    pub fn is_zone(&self, settlement_point: &str) -> bool {
        crate::models::has_prefix_ignore_case(settlement_point, &self.zone_prefix)
    }
}

/// File-system safe form of a settlement point name for per-entity outputs.
pub fn file_stem_for(settlement_point: &str) -> String {
    settlement_point.replace(['/', '\\', ' '], "_")
}

pub fn spot_file_name(settlement_point: &str) -> String {
    format!("spot_{}.csv", file_stem_for(settlement_point))
}

pub fn profile_file_name(settlement_point: &str) -> String {
    format!("profile_{}.csv", file_stem_for(settlement_point))
}
