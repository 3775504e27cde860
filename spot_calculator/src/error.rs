use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReportError>;

/// Failures raised while building the price reports.
///
/// Everything except `Render` is fatal to a run: the tables feed a downstream
/// pricing model and must never be written partially.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Data load error: {path}: {reason}")]
    DataLoad { path: PathBuf, reason: String },

    #[error("Parse error: {path} row {row}: {reason}")]
    Parse {
        path: PathBuf,
        row: usize,
        reason: String,
    },

    #[error("Duplicate hour: {settlement_point} has more than one price for {day} hour {hour}")]
    DuplicateHour {
        settlement_point: String,
        day: NaiveDate,
        hour: usize,
    },

    #[error("Render error: {chart}: {reason}")]
    Render { chart: String, reason: String },

    #[error("Write error: {path}: {reason}")]
    Write { path: PathBuf, reason: String },
}

impl ReportError {
    pub fn data_load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ReportError::DataLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn write(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ReportError::Write {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn render(chart: impl Into<String>, reason: impl ToString) -> Self {
        ReportError::Render {
            chart: chart.into(),
            reason: reason.to_string(),
        }
    }

    /// Chart failures are isolated; every other kind aborts the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ReportError::Render { .. })
    }
}
