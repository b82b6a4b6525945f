pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use toml_config::{TomlConfig, EXPORT_FORMATS};

/// Effective settings after merging defaults, an optional TOML file and flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data_dir: String,
    pub store_file: String,
    pub export_path: String,
    pub export_formats: Vec<String>,
    pub bundle_exports: bool,
    pub log_level: Option<String>,
    pub json_logs: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
            store_file: "measurements.csv".to_string(),
            export_path: "./exports".to_string(),
            export_formats: vec!["csv".to_string()],
            bundle_exports: false,
            log_level: None,
            json_logs: false,
        }
    }
}

impl Settings {
    pub fn from_toml(config: &TomlConfig) -> Self {
        Self {
            data_dir: config.data_dir().to_string(),
            store_file: config.store_file().to_string(),
            export_path: config.export_path().to_string(),
            export_formats: config.export_formats().to_vec(),
            bundle_exports: config.bundle_exports(),
            log_level: config.log_level().map(str::to_string),
            json_logs: config.json_logs(),
        }
    }
}

impl ConfigProvider for Settings {
    fn data_dir(&self) -> &str {
        &self.data_dir
    }

    fn store_file(&self) -> &str {
        &self.store_file
    }

    fn export_path(&self) -> &str {
        &self.export_path
    }

    fn export_formats(&self) -> &[String] {
        &self.export_formats
    }

    fn bundle_exports(&self) -> bool {
        self.bundle_exports
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_path("data_dir", &self.data_dir)?;
        validation::validate_file_extension("store_file", &self.store_file, &["csv"])?;
        validation::validate_path("export_path", &self.export_path)?;
        validation::validate_formats("export_formats", &self.export_formats, &EXPORT_FORMATS)?;
        if let Some(level) = &self.log_level {
            validation::validate_log_level("logging.level", level)?;
        }
        Ok(())
    }
}

#[cfg(feature = "cli")]
pub use args::{CliConfig, Command};

#[cfg(feature = "cli")]
mod args {
    use super::{Settings, TomlConfig};
    use crate::utils::error::Result;
    use chrono::NaiveDate;
    use clap::{Parser, Subcommand};

    #[derive(Debug, Clone, Parser)]
    #[command(name = "rom-tracker")]
    #[command(about = "Record, classify and review range-of-motion measurements")]
    pub struct CliConfig {
        /// Directory holding the measurement store
        #[arg(long, global = true)]
        pub data_dir: Option<String>,

        /// Store file name inside the data directory
        #[arg(long, global = true)]
        pub store_file: Option<String>,

        /// Optional TOML configuration file
        #[arg(long, global = true)]
        pub config: Option<String>,

        #[arg(long, global = true, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, global = true, help = "Emit logs as JSON lines")]
        pub json_logs: bool,

        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum Command {
        /// List the test battery and expected full ROM values
        Tests,

        /// Classify a single reading without storing it
        Classify {
            #[arg(long)]
            full_rom: Option<f64>,
            #[arg(long)]
            left: f64,
            #[arg(long)]
            right: f64,
        },

        /// Record a full battery for one subject
        Add {
            #[arg(long)]
            name: String,
            #[arg(long)]
            surname: String,
            /// Session date (YYYY-MM-DD), defaults to today
            #[arg(long)]
            date: Option<NaiveDate>,
            /// "<test>=<left>,<right>", repeatable
            #[arg(long = "reading", short = 'r')]
            readings: Vec<String>,
        },

        /// Search stored sessions
        Search {
            #[arg(long)]
            name: Option<String>,
            #[arg(long)]
            surname: Option<String>,
            #[arg(long)]
            date: Option<NaiveDate>,
            /// Print every measurement and a chart per session
            #[arg(long)]
            detail: bool,
        },

        /// Export all measurements
        Export {
            #[arg(long, value_delimiter = ',')]
            formats: Option<Vec<String>>,
            #[arg(long)]
            output: Option<String>,
            /// Bundle every format into one zip archive
            #[arg(long)]
            bundle: bool,
        },

        /// Delete one entry by id, or every entry
        Delete {
            #[arg(long, conflicts_with = "all", required_unless_present = "all")]
            id: Option<u64>,
            #[arg(long)]
            all: bool,
        },
    }

    impl CliConfig {
        /// Defaults, then the TOML file when given, then explicit flags.
        pub fn settings(&self) -> Result<Settings> {
            let mut settings = match &self.config {
                Some(path) => Settings::from_toml(&TomlConfig::from_file(path)?),
                None => Settings::default(),
            };

            if let Some(dir) = &self.data_dir {
                settings.data_dir = dir.clone();
            }
            if let Some(file) = &self.store_file {
                settings.store_file = file.clone();
            }
            if self.json_logs {
                settings.json_logs = true;
            }
            if let Command::Export {
                formats,
                output,
                bundle,
            } = &self.command
            {
                if let Some(formats) = formats {
                    settings.export_formats = formats.clone();
                }
                if let Some(output) = output {
                    settings.export_path = output.clone();
                }
                if *bundle {
                    settings.bundle_exports = true;
                }
            }

            Ok(settings)
        }
    }

}
