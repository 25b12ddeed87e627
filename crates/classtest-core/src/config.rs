//! classtest configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::schedule::SchoolHours;
use crate::session::DEFAULT_TEACHER_NAME;
use crate::storage::STORE_ENTRY;
use crate::store::CorruptStorePolicy;

/// Top-level classtest configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClasstestConfig {
    /// JSON file holding all submissions.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
    /// Catalog TOML file or directory.
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,
    /// Name that unlocks the teacher role.
    #[serde(default = "default_teacher_name")]
    pub teacher_name: String,
    /// What to do when the store file cannot be decoded.
    #[serde(default)]
    pub on_corrupt_store: CorruptStorePolicy,
    #[serde(default)]
    pub school_hours: SchoolHoursConfig,
}

/// Opening hours as written in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchoolHoursConfig {
    #[serde(default = "default_open")]
    pub open: String,
    #[serde(default = "default_close")]
    pub close: String,
    /// Refuse student actions outside the window instead of only warning.
    #[serde(default)]
    pub enforce: bool,
}

impl SchoolHoursConfig {
    pub fn hours(&self) -> Result<SchoolHours> {
        SchoolHours::parse(&self.open, &self.close).context("invalid [school_hours]")
    }
}

impl Default for SchoolHoursConfig {
    fn default() -> Self {
        Self {
            open: default_open(),
            close: default_close(),
            enforce: false,
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from("classtest-data").join(format!("{STORE_ENTRY}.json"))
}
fn default_catalog_path() -> PathBuf {
    PathBuf::from("catalog")
}
fn default_teacher_name() -> String {
    DEFAULT_TEACHER_NAME.to_string()
}
fn default_open() -> String {
    "10:00".to_string()
}
fn default_close() -> String {
    "22:45".to_string()
}

impl Default for ClasstestConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            catalog_path: default_catalog_path(),
            teacher_name: default_teacher_name(),
            on_corrupt_store: CorruptStorePolicy::default(),
            school_hours: SchoolHoursConfig::default(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `classtest.toml` in the current directory
/// 2. `~/.config/classtest/config.toml`
///
/// Environment variable overrides: `CLASSTEST_STORE`, `CLASSTEST_CATALOG`,
/// `CLASSTEST_TEACHER`.
pub fn load_config() -> Result<ClasstestConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
///
/// Relative paths inside a config file are resolved against the file's
/// directory.
pub fn load_config_from(path: Option<&Path>) -> Result<ClasstestConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("classtest.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match &config_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let mut config = toml::from_str::<ClasstestConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());

            resolve_relative_to(&mut config, path.parent().unwrap_or_else(|| Path::new("")));
            config
        }
        None => ClasstestConfig::default(),
    };

    // Apply env var overrides
    if let Ok(store) = std::env::var("CLASSTEST_STORE") {
        config.store_path = PathBuf::from(store);
    }
    if let Ok(catalog) = std::env::var("CLASSTEST_CATALOG") {
        config.catalog_path = PathBuf::from(catalog);
    }
    if let Ok(teacher) = std::env::var("CLASSTEST_TEACHER") {
        config.teacher_name = teacher;
    }

    anyhow::ensure!(
        !config.teacher_name.trim().is_empty(),
        "teacher_name must not be empty"
    );

    Ok(config)
}

/// Expand `${VAR}` references and anchor relative paths at `base`.
fn resolve_relative_to(config: &mut ClasstestConfig, base: &Path) {
    config.store_path = base.join(resolve_path(&config.store_path));
    config.catalog_path = base.join(resolve_path(&config.catalog_path));
    config.teacher_name = resolve_env_vars(&config.teacher_name);
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("classtest"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_CLASSTEST_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_CLASSTEST_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_CLASSTEST_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("no_close_${"), "no_close_${");
        assert_eq!(resolve_env_vars("${_CLASSTEST_UNSET_VAR}/x"), "/x");
        std::env::remove_var("_CLASSTEST_TEST_VAR");
    }

    #[test]
    fn resolved_value_is_not_expanded_again() {
        std::env::set_var("_CLASSTEST_SELF_REF", "${_CLASSTEST_SELF_REF}");
        assert_eq!(
            resolve_env_vars("a/${_CLASSTEST_SELF_REF}/b"),
            "a/${_CLASSTEST_SELF_REF}/b"
        );
        std::env::remove_var("_CLASSTEST_SELF_REF");
    }

    #[test]
    fn default_config() {
        let config = ClasstestConfig::default();
        assert_eq!(config.teacher_name, "никитовский");
        assert_eq!(
            config.store_path,
            PathBuf::from("classtest-data/testSubmissions.json")
        );
        assert_eq!(config.on_corrupt_store, CorruptStorePolicy::Reset);
        assert!(!config.school_hours.enforce);
        assert_eq!(
            config.school_hours.hours().unwrap(),
            SchoolHours::default()
        );
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
store_path = "data/subs.json"
catalog_path = "tests"
teacher_name = "Smith"
on_corrupt_store = "fail"

[school_hours]
open = "08:00"
close = "16:30"
enforce = true
"#;
        let config: ClasstestConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.teacher_name, "Smith");
        assert_eq!(config.on_corrupt_store, CorruptStorePolicy::Fail);
        assert!(config.school_hours.enforce);
        assert_eq!(config.school_hours.hours().unwrap().to_string(), "08:00 to 16:30");
    }

    #[test]
    fn explicit_path_resolves_relative_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("classtest.toml");
        std::fs::write(&path, "store_path = \"data/subs.json\"\n").unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert!(config.store_path.starts_with(dir.path()) || std::env::var("CLASSTEST_STORE").is_ok());
    }

    #[test]
    fn relative_paths_anchor_at_config_dir() {
        let mut config = ClasstestConfig {
            store_path: PathBuf::from("data/subs.json"),
            catalog_path: PathBuf::from("/abs/catalog"),
            ..ClasstestConfig::default()
        };
        resolve_relative_to(&mut config, Path::new("/etc/classtest"));
        assert_eq!(
            config.store_path,
            PathBuf::from("/etc/classtest/data/subs.json")
        );
        assert_eq!(config.catalog_path, PathBuf::from("/abs/catalog"));
    }

    #[test]
    fn missing_explicit_path_fails() {
        let err = load_config_from(Some(Path::new("/no/such/classtest.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn unknown_policy_rejected() {
        assert!(toml::from_str::<ClasstestConfig>("on_corrupt_store = \"ignore\"").is_err());
    }
}
