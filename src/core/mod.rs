pub mod aggregations;
pub mod charts;
pub mod etl;
pub mod export;
pub mod pipeline;
pub mod source;

pub use crate::domain::model::{AnalysisReport, AnalysisResult, Dataset, Record, Transaction};
pub use crate::domain::ports::{ChartRenderer, ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
