//! Threshold configuration for the CLI
//!
//! Sources, lowest precedence first: built-in defaults, the config file,
//! then `NF_TUNER_*` environment variables.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tuner_lib::Thresholds;

/// Prefix for environment overrides, e.g. `NF_TUNER_LOCAL_RUNTIME_SECS=900`
pub const ENV_PREFIX: &str = "NF_TUNER";

/// Load and validate thresholds
///
/// An explicitly given file must exist; the default file is optional.
pub fn load_thresholds(explicit: Option<&Path>) -> Result<Thresholds> {
    let mut builder = config::Config::builder();

    match explicit {
        Some(path) => {
            if !path.is_file() {
                bail!("Config file {} does not exist", path.display());
            }
            builder = builder.add_source(config::File::from(path).required(true));
        }
        None => {
            if let Some(path) = default_config_path() {
                builder = builder.add_source(config::File::from(path).required(false));
            }
        }
    }

    let settings = builder
        .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
        .build()
        .context("Failed to load configuration")?;

    let thresholds: Thresholds = settings
        .try_deserialize()
        .context("Failed to parse threshold configuration")?;
    thresholds.validate()?;
    Ok(thresholds)
}

/// Get the default configuration file path
fn default_config_path() -> Option<PathBuf> {
    dirs_next::home_dir().map(|home| home.join(".config").join("nf-tuner").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tuner.toml");
        fs::write(&path, "local_runtime_secs = 900\ncpu_high_efficiency = 0.95\n").unwrap();

        let thresholds = load_thresholds(Some(path.as_path())).unwrap();
        assert_eq!(thresholds.local_runtime_secs, 900.0);
        assert_eq!(thresholds.cpu_high_efficiency, 0.95);
        assert_eq!(thresholds.memory_high_ratio, 0.85);
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let dir = TempDir::new().unwrap();
        let err = load_thresholds(Some(dir.path().join("absent.toml").as_path())).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tuner.toml");
        fs::write(&path, "concurrency_percentile = 1.5\n").unwrap();

        let err = load_thresholds(Some(path.as_path())).unwrap_err();
        assert!(err.to_string().contains("concurrency_percentile"));
    }
}
