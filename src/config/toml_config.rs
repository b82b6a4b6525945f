use crate::core::ConfigProvider;
use crate::utils::error::{Result, RomError};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const EXPORT_FORMATS: [&str; 3] = ["csv", "tsv", "json"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub storage: StorageConfig,
    pub export: Option<ExportConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
    pub store_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub output_path: Option<String>,
    pub formats: Option<Vec<String>>,
    pub bundle: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: Option<bool>,
}

const DEFAULT_STORE_FILE: &str = "measurements.csv";
const DEFAULT_EXPORT_PATH: &str = "./exports";

impl TomlConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RomError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RomError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RomError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        crate::utils::validation::validate_path("storage.data_dir", &self.storage.data_dir)?;
        crate::utils::validation::validate_file_extension(
            "storage.store_file",
            self.store_file(),
            &["csv"],
        )?;
        crate::utils::validation::validate_path("export.output_path", self.export_path())?;
        crate::utils::validation::validate_formats(
            "export.formats",
            self.export_formats(),
            &EXPORT_FORMATS,
        )?;

        if let Some(level) = self.log_level() {
            crate::utils::validation::validate_log_level("logging.level", level)?;
        }

        Ok(())
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

static DEFAULT_FORMATS: std::sync::LazyLock<Vec<String>> =
    std::sync::LazyLock::new(|| vec!["csv".to_string()]);

impl ConfigProvider for TomlConfig {
    fn data_dir(&self) -> &str {
        &self.storage.data_dir
    }

    fn store_file(&self) -> &str {
        self.storage.store_file.as_deref().unwrap_or(DEFAULT_STORE_FILE)
    }

    fn export_path(&self) -> &str {
        self.export
            .as_ref()
            .and_then(|e| e.output_path.as_deref())
            .unwrap_or(DEFAULT_EXPORT_PATH)
    }

    fn export_formats(&self) -> &[String] {
        self.export
            .as_ref()
            .and_then(|e| e.formats.as_deref())
            .unwrap_or(DEFAULT_FORMATS.as_slice())
    }

    fn bundle_exports(&self) -> bool {
        self.export.as_ref().and_then(|e| e.bundle).unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
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
[storage]
data_dir = "/var/lib/rom"
store_file = "clinic.csv"

[export]
output_path = "/tmp/rom-exports"
formats = ["csv", "json"]
bundle = true

[logging]
level = "debug"
json = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.data_dir(), "/var/lib/rom");
        assert_eq!(config.store_file(), "clinic.csv");
        assert_eq!(config.export_path(), "/tmp/rom-exports");
        assert_eq!(config.export_formats(), ["csv", "json"]);
        assert!(config.bundle_exports());
        assert_eq!(config.log_level(), Some("debug"));
        assert!(config.json_logs());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_for_optional_sections() {
        let config = TomlConfig::from_toml_str("[storage]\ndata_dir = \"./data\"\n").unwrap();

        assert_eq!(config.store_file(), "measurements.csv");
        assert_eq!(config.export_path(), "./exports");
        assert_eq!(config.export_formats(), ["csv"]);
        assert!(!config.bundle_exports());
        assert!(!config.json_logs());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("ROM_TRACKER_TEST_DATA_DIR", "/srv/rom");

        let toml_content = r#"
[storage]
data_dir = "${ROM_TRACKER_TEST_DATA_DIR}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.data_dir(), "/srv/rom");

        std::env::remove_var("ROM_TRACKER_TEST_DATA_DIR");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[storage]
data_dir = "./data"
store_file = "measurements.db"
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let toml_content = r#"
[storage]
data_dir = "./data"

[export]
formats = ["xlsx"]
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_storage_section_fails_to_parse() {
        let result = TomlConfig::from_toml_str("[export]\nbundle = true\n");
        assert!(matches!(result, Err(RomError::ConfigValidationError { .. })));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[storage]\ndata_dir = \"./from-file\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.data_dir(), "./from-file");
    }
}
