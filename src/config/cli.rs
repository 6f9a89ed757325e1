use crate::config::toml_config::TomlConfig;
use crate::config::CliConfig;
use crate::domain::model::SortBy;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{BioxError, Result};
use crate::utils::logger::LogSettings;
use crate::utils::validation::Validate;

/// Command line flags layered over an optional TOML file.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub cli: CliConfig,
    pub file: TomlConfig,
}

impl AppSettings {
    pub fn new(cli: CliConfig, file: Option<TomlConfig>) -> Self {
        Self {
            cli,
            file: file.unwrap_or_default(),
        }
    }

    /// Loads `--config` when given; otherwise only CLI flags and defaults apply.
    pub fn load(cli: CliConfig) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => {
                if !path.is_file() {
                    return Err(BioxError::ConfigError {
                        message: format!("config file not found: {}", path.display()),
                    });
                }
                let file = TomlConfig::from_file(path)?;
                file.validate()?;
                Some(file)
            }
            None => None,
        };
        Ok(Self::new(cli, file))
    }

    pub fn monitor_enabled(&self) -> bool {
        self.cli.monitor
    }
}

impl ConfigProvider for AppSettings {
    fn log_settings(&self) -> LogSettings {
        let mut settings = self.file.log_settings();
        if self.cli.verbose {
            settings.debug = true;
        }
        if self.cli.log_file {
            settings.file_logging = true;
        }
        if let Some(dir) = &self.cli.log_dir {
            settings.log_dir = dir.clone();
        }
        settings
    }

    fn num_workers(&self) -> Option<usize> {
        self.file.num_workers()
    }

    fn default_sort_by(&self) -> SortBy {
        self.file.default_sort_by()
    }

    fn default_recursive(&self) -> bool {
        self.file.default_recursive()
    }
}

impl Validate for AppSettings {
    fn validate(&self) -> Result<()> {
        self.file.validate()
    }
}
