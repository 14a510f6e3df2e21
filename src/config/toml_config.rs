use crate::domain::model::SaleFilter;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub input: Option<InputConfig>,
    pub filter: Option<SaleFilter>,
    pub thresholds: Option<ThresholdConfig>,
    pub output: Option<OutputConfig>,
    pub charts: Option<ChartConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdConfig {
    pub high_rating: Option<f64>,
    pub unit_price: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: Option<String>,
    pub formats: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    pub enabled: Option<bool>,
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SALES_DATA})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn input_path(&self) -> Option<&str> {
        self.input.as_ref().map(|i| i.path.as_str())
    }

    pub fn output_path(&self) -> Option<&str> {
        self.output.as_ref().and_then(|o| o.path.as_deref())
    }

    pub fn rating_threshold(&self) -> Option<f64> {
        self.thresholds.as_ref().and_then(|t| t.high_rating)
    }

    pub fn unit_price_threshold(&self) -> Option<f64> {
        self.thresholds.as_ref().and_then(|t| t.unit_price)
    }

    pub fn charts_enabled(&self) -> Option<bool> {
        self.charts.as_ref().and_then(|c| c.enabled)
    }

    pub fn charts_dir(&self) -> Option<&str> {
        self.charts.as_ref().and_then(|c| c.dir.as_deref())
    }

    pub fn output_formats(&self) -> Option<&[String]> {
        self.output.as_ref().and_then(|o| o.formats.as_deref())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(input) = self.input_path() {
            validation::validate_path("input.path", input)?;
        }

        if let Some(output) = self.output_path() {
            validation::validate_path("output.path", output)?;
        }

        if let Some(formats) = self.output_formats() {
            validation::validate_output_formats("output.formats", formats)?;
        }

        match self.filter {
            Some(SaleFilter::TotalSaleAbove(t)) | Some(SaleFilter::RatingAbove(t)) => {
                validation::validate_threshold("filter.threshold", t)?;
            }
            _ => {}
        }

        if let Some(t) = self.rating_threshold() {
            validation::validate_threshold("thresholds.high_rating", t)?;
        }

        if let Some(t) = self.unit_price_threshold() {
            validation::validate_threshold("thresholds.unit_price", t)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[input]
path = "supermarket_sales.csv"

[filter]
kind = "total_sale_above"
threshold = 500.0

[thresholds]
high_rating = 9.0
unit_price = 75.0

[output]
path = "./reports"
formats = ["txt", "json"]

[charts]
enabled = false

[monitoring]
enabled = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.input_path(), Some("supermarket_sales.csv"));
        assert_eq!(config.filter, Some(SaleFilter::TotalSaleAbove(500.0)));
        assert_eq!(config.rating_threshold(), Some(9.0));
        assert_eq!(config.unit_price_threshold(), Some(75.0));
        assert_eq!(config.output_path(), Some("./reports"));
        assert_eq!(config.charts_enabled(), Some(false));
        assert!(config.monitoring_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_is_valid() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.input.is_none());
        assert!(config.filter.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_skip_filter_kind() {
        let config = TomlConfig::from_toml_str("[filter]\nkind = \"skip\"\n").unwrap();
        assert_eq!(config.filter, Some(SaleFilter::Skip));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SALES_ETL_TEST_INPUT", "from_env.csv");

        let config =
            TomlConfig::from_toml_str("[input]\npath = \"${SALES_ETL_TEST_INPUT}\"\n").unwrap();
        assert_eq!(config.input_path(), Some("from_env.csv"));

        std::env::remove_var("SALES_ETL_TEST_INPUT");
    }

    #[test]
    fn test_config_validation() {
        let bad_format = r#"
[output]
formats = ["xlsx"]
"#;
        let config = TomlConfig::from_toml_str(bad_format).unwrap();
        assert!(config.validate().is_err());

        let empty_input = "[input]\npath = \"\"\n";
        let config = TomlConfig::from_toml_str(empty_input).unwrap();
        assert!(config.validate().is_err());

        // 任何副檔名與負門檻值都可接受
        let any_input = "[input]\npath = \"sales.txt\"\n";
        let config = TomlConfig::from_toml_str(any_input).unwrap();
        assert!(config.validate().is_ok());

        let negative = "[filter]\nkind = \"rating_above\"\nthreshold = -1.0\n";
        let config = TomlConfig::from_toml_str(negative).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[thresholds]\nunit_price = 20.0\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.unit_price_threshold(), Some(20.0));
        assert_eq!(config.rating_threshold(), None);
    }
}
