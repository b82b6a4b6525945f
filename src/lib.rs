pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{CliConfig, Command};

pub use crate::config::{cli::LocalStorage, toml_config::TomlConfig, Settings};
pub use crate::core::{export::Exporter, session::SessionRecorder, store::CsvMeasurementStore};
pub use crate::domain::model::Label;
pub use crate::domain::rules::classify;
pub use crate::utils::error::{Result, RomError};
