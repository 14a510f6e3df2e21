use crate::config::toml_config::TomlConfig;
use crate::core::aggregations::{DEFAULT_RATING_THRESHOLD, DEFAULT_UNIT_PRICE_THRESHOLD};
use crate::domain::model::SaleFilter;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};

pub const DEFAULT_INPUT: &str = "data.csv";
pub const DEFAULT_OUTPUT: &str = ".";
pub const DEFAULT_CHARTS_DIR: &str = "charts";

/// 合併預設值、TOML 檔與命令列後的最終設定
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    pub input_path: String,
    pub output_path: String,
    /// `None` 表示尚未選擇，交由互動提示決定
    pub filter: Option<SaleFilter>,
    pub rating_threshold: f64,
    pub unit_price_threshold: f64,
    pub output_formats: Vec<String>,
    pub charts_enabled: bool,
    pub charts_dir: String,
    pub monitor: bool,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            input_path: DEFAULT_INPUT.to_string(),
            output_path: DEFAULT_OUTPUT.to_string(),
            filter: None,
            rating_threshold: DEFAULT_RATING_THRESHOLD,
            unit_price_threshold: DEFAULT_UNIT_PRICE_THRESHOLD,
            output_formats: vec!["txt".to_string()],
            charts_enabled: true,
            charts_dir: DEFAULT_CHARTS_DIR.to_string(),
            monitor: false,
        }
    }
}

impl AnalysisSettings {
    pub fn from_toml(config: &TomlConfig) -> Self {
        let defaults = Self::default();
        Self {
            input_path: config
                .input_path()
                .map(str::to_string)
                .unwrap_or(defaults.input_path),
            output_path: config
                .output_path()
                .map(str::to_string)
                .unwrap_or(defaults.output_path),
            filter: config.filter,
            rating_threshold: config
                .rating_threshold()
                .unwrap_or(defaults.rating_threshold),
            unit_price_threshold: config
                .unit_price_threshold()
                .unwrap_or(defaults.unit_price_threshold),
            output_formats: config
                .output_formats()
                .map(<[String]>::to_vec)
                .unwrap_or(defaults.output_formats),
            charts_enabled: config.charts_enabled().unwrap_or(defaults.charts_enabled),
            charts_dir: config
                .charts_dir()
                .map(str::to_string)
                .unwrap_or(defaults.charts_dir),
            monitor: config.monitoring_enabled(),
        }
    }

    /// 圖表目錄；相對路徑以輸出目錄為基準
    pub fn resolved_charts_dir(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.output_path).join(&self.charts_dir)
    }

    pub fn needs_filter_prompt(&self) -> bool {
        self.filter.is_none()
    }
}

impl ConfigProvider for AnalysisSettings {
    fn input_path(&self) -> &str {
        &self.input_path
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn filter(&self) -> SaleFilter {
        self.filter.unwrap_or(SaleFilter::Skip)
    }

    fn rating_threshold(&self) -> f64 {
        self.rating_threshold
    }

    fn unit_price_threshold(&self) -> f64 {
        self.unit_price_threshold
    }

    fn write_json_summary(&self) -> bool {
        self.output_formats.iter().any(|f| f == "json")
    }
}

impl Validate for AnalysisSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input", &self.input_path)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_path("charts_dir", &self.charts_dir)?;
        validation::validate_output_formats("output_formats", &self.output_formats)?;
        validation::validate_threshold("rating_threshold", self.rating_threshold)?;
        validation::validate_threshold("unit_price_threshold", self.unit_price_threshold)?;

        match self.filter {
            Some(SaleFilter::TotalSaleAbove(t)) | Some(SaleFilter::RatingAbove(t)) => {
                validation::validate_threshold("threshold", t)
            }
            _ => Ok(()),
        }
    }
}
