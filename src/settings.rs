//! Runtime settings.
//!
//! Read from an optional `benchscope.json` in the working directory (or the
//! file named by `BENCHSCOPE_CONFIG`), then overridden by `BENCHSCOPE_*`
//! environment variables, e.g. `BENCHSCOPE_BIND_ADDRESS=0.0.0.0:9000`.

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::error::{BenchscopeError, Result};

pub const CONFIG_FILE: &str = "benchscope.json";
pub const CONFIG_FILE_VARIABLE: &str = "BENCHSCOPE_CONFIG";
const ENV_PREFIX: &str = "BENCHSCOPE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub bind_address: String,
    pub default_page_size: usize,
    pub max_page_size: usize,
    pub top_skills: usize,
    pub preview_rows: usize,
    /// JSON records file loaded at startup.
    pub dataset_path: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8050".to_string(),
            default_page_size: 25,
            max_page_size: 1000,
            top_skills: 10,
            preview_rows: 100,
            dataset_path: None,
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_FILE_VARIABLE).ok();
        Self::load_from(path.as_deref())
    }

    /// An explicitly named file must exist; the default one is optional.
    pub fn load_from(path: Option<&str>) -> Result<Self> {
        let file = match path {
            Some(p) => File::with_name(p).required(true),
            None => File::new(CONFIG_FILE, FileFormat::Json).required(false),
        };
        let settings: Settings = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;
        settings.validate()
    }

    fn validate(self) -> Result<Self> {
        if self.default_page_size == 0 || self.max_page_size == 0 {
            return Err(BenchscopeError::Config("page sizes must be at least 1".into()));
        }
        if self.default_page_size > self.max_page_size {
            return Err(BenchscopeError::Config(format!(
                "default_page_size {} exceeds max_page_size {}",
                self.default_page_size, self.max_page_size
            )));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn inverted_page_sizes_are_rejected() {
        let s = Settings { default_page_size: 50, max_page_size: 10, ..Settings::default() };
        assert!(matches!(s.validate(), Err(BenchscopeError::Config(_))));
    }

    #[test]
    fn explicit_file_overrides_defaults() {
        let path = std::env::temp_dir().join(format!("benchscope-settings-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"default_page_size": 40, "top_skills": 5}"#).unwrap();
        let settings = Settings::load_from(path.to_str()).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(settings.default_page_size, 40);
        assert_eq!(settings.top_skills, 5);
        assert_eq!(settings.max_page_size, 1000);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        assert!(Settings::load_from(Some("/nonexistent/benchscope.json")).is_err());
    }
}
