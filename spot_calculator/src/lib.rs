pub mod config;
pub mod data_loader;
pub mod error;
pub mod models;
pub mod monthly;
pub mod reshaper;
pub mod shape_profile;
pub mod volatility;
pub mod writer;

pub use config::ReportConfig;
pub use data_loader::DataLoader;
pub use error::{ReportError, Result};
pub use models::{AnnualVolatility, MonthlyAverage, PriceObservation, ShapeProfileRow, WideDayRow};
pub use shape_profile::ShapeProfiles;
pub use volatility::VolatilityEstimator;
