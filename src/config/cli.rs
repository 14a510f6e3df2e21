use crate::config::settings::AnalysisSettings;
use crate::domain::model::SaleFilter;
use crate::utils::error::{EtlError, Result};
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FilterKind {
    /// Total sale above the threshold
    TotalSale,
    /// Customer rating above the threshold
    Rating,
}

impl FilterKind {
    pub fn with_threshold(self, threshold: f64) -> SaleFilter {
        match self {
            FilterKind::TotalSale => SaleFilter::TotalSaleAbove(threshold),
            FilterKind::Rating => SaleFilter::RatingAbove(threshold),
        }
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "sales-etl")]
#[command(about = "Summarise retail sales transactions from a CSV file")]
pub struct CliConfig {
    /// Input CSV file [default: data.csv]
    #[arg(short, long)]
    pub input: Option<String>,

    /// Directory for filtered_data.csv, summary.txt and charts [default: .]
    #[arg(short, long)]
    pub output_path: Option<String>,

    /// Filter used for filtered_data.csv; prompts interactively when omitted
    #[arg(long, value_enum, requires = "threshold")]
    pub filter: Option<FilterKind>,

    /// Threshold for --filter
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Rating above which a sale counts as high-rated [default: 8.0]
    #[arg(long)]
    pub rating_threshold: Option<f64>,

    /// Unit price above which revenue is summed [default: 50]
    #[arg(long)]
    pub unit_price_threshold: Option<f64>,

    /// Chart directory, relative to the output path [default: charts]
    #[arg(long)]
    pub charts_dir: Option<String>,

    /// Skip chart rendering
    #[arg(long)]
    pub no_charts: bool,

    /// Skip the export step without prompting
    #[arg(long, conflicts_with = "filter")]
    pub no_filter: bool,

    /// Also write summary.json
    #[arg(long)]
    pub json: bool,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,

    /// Log memory usage and elapsed time per phase
    #[arg(long)]
    pub monitor: bool,
}

impl CliConfig {
    /// 命令列參數覆蓋既有設定
    pub fn apply_to(&self, settings: &mut AnalysisSettings) -> Result<()> {
        if let Some(input) = &self.input {
            settings.input_path = input.clone();
        }
        if let Some(output) = &self.output_path {
            settings.output_path = output.clone();
        }
        if let Some(t) = self.rating_threshold {
            settings.rating_threshold = t;
        }
        if let Some(t) = self.unit_price_threshold {
            settings.unit_price_threshold = t;
        }
        if let Some(dir) = &self.charts_dir {
            settings.charts_dir = dir.clone();
        }
        if self.no_charts {
            settings.charts_enabled = false;
        }
        if self.json && !settings.output_formats.iter().any(|f| f == "json") {
            settings.output_formats.push("json".to_string());
        }
        if self.monitor {
            settings.monitor = true;
        }

        match (self.filter, self.threshold) {
            (Some(kind), Some(threshold)) => settings.filter = Some(kind.with_threshold(threshold)),
            (Some(_), None) => {
                return Err(EtlError::MissingConfigError {
                    field: "threshold".to_string(),
                })
            }
            (None, _) if self.no_filter => settings.filter = Some(SaleFilter::Skip),
            (None, _) => {}
        }

        Ok(())
    }
}
