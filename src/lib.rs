pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::chart::{NoopChartRenderer, SvgChartRenderer};
pub use adapters::storage::LocalStorage;
pub use config::{AnalysisSettings, TomlConfig};
pub use core::{etl::EtlEngine, pipeline::AnalysisPipeline};
pub use utils::error::{EtlError, Result};
