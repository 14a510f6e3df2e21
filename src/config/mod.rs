#[cfg(feature = "cli")]
pub mod cli;
pub mod prompt;
pub mod settings;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, FilterKind};
pub use settings::AnalysisSettings;
pub use toml_config::TomlConfig;
