use crate::domain::model::SortBy;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{BioxError, Result};
use crate::utils::logger::LogSettings;
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static ENV_VAR_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").ok());

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub logging: Option<LoggingConfig>,
    pub finder: Option<FinderConfig>,
    pub workers: Option<WorkersConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub debug: Option<bool>,
    pub log_dir: Option<String>,
    pub file_logging: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinderConfig {
    pub recursive: Option<bool>,
    pub sort_by: Option<String>,
    pub reverse: Option<bool>,
    pub file_format: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkersConfig {
    pub num_workers: Option<usize>,
}

impl TomlConfig {
    /// Load the configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BioxError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parse the configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| BioxError::ConfigParseError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Substitute `${VAR}` references from the environment; unset variables are left as-is.
    fn substitute_env_vars(content: &str) -> String {
        let Some(re) = ENV_VAR_PATTERN.as_ref() else {
            return content.to_string();
        };

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(logging) = &self.logging {
            if let Some(level) = &logging.level {
                validation::validate_log_level("logging.level", level)?;
            }
            if let Some(dir) = &logging.log_dir {
                validation::validate_path("logging.log_dir", dir)?;
            }
        }

        if let Some(finder) = &self.finder {
            if let Some(sort_by) = &finder.sort_by {
                sort_by.parse::<SortBy>()?;
            }
            if let Some(format) = &finder.file_format {
                validation::validate_non_empty_string("finder.file_format", format)?;
            }
        }

        if let Some(num_workers) = self.workers.as_ref().and_then(|w| w.num_workers) {
            validation::validate_positive_number("workers.num_workers", num_workers, 1)?;
        }

        Ok(())
    }

    pub fn default_file_format(&self) -> Option<&str> {
        self.finder.as_ref().and_then(|f| f.file_format.as_deref())
    }

    pub fn default_reverse(&self) -> bool {
        self.finder.as_ref().and_then(|f| f.reverse).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn log_settings(&self) -> LogSettings {
        let defaults = LogSettings::default();
        let Some(logging) = &self.logging else {
            return defaults;
        };

        LogSettings {
            debug: logging.debug.unwrap_or(defaults.debug),
            level: logging.level.clone().unwrap_or(defaults.level),
            log_dir: logging
                .log_dir
                .as_ref()
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            file_logging: logging.file_logging.unwrap_or(defaults.file_logging),
        }
    }

    fn num_workers(&self) -> Option<usize> {
        self.workers.as_ref().and_then(|w| w.num_workers)
    }

    fn default_sort_by(&self) -> SortBy {
        // Validated on load; falls back to name
        self.finder
            .as_ref()
            .and_then(|f| f.sort_by.as_deref())
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    fn default_recursive(&self) -> bool {
        self.finder.as_ref().and_then(|f| f.recursive).unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
