//! # Configuration Module
//!
//! This module provides configuration support for boilerplate: template file
//! locations, exclusion prefixes, extra comment prefixes and the extensions
//! the include check looks at.
//!
//! Configuration can be specified in a `.boilerplate.toml` file in the root
//! directory or via the `BOILERPLATE_CONFIG` environment variable:
//!
//! ```toml
//! license-file = "tools/license_header"
//! modeline-file = "tools/modelines.txt"
//! exclude-dirs = ["./_build_", "./runtime/stl"]
//! no-license = ["./runtime/MersenneTwister.h"]
//!
//! [comment-prefixes]
//! py = "#"
//!
//! [includes]
//! extensions = ["cpp", "cc"]
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::file_filter::ExclusionRules;
use crate::includes::DEFAULT_EXTENSIONS;
use crate::templates::CommentStyles;
use crate::verbose_log;

/// The default config file name.
pub const DEFAULT_CONFIG_FILENAME: &str = ".boilerplate.toml";

/// Environment variable for specifying config file path.
pub const CONFIG_ENV_VAR: &str = "BOILERPLATE_CONFIG";

/// Default license template location, relative to the root.
pub const DEFAULT_LICENSE_FILE: &str = "license_header";

/// Settings for the include-convention check.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct IncludesConfig {
  /// Implementation extensions to check, without leading dots.
  #[serde(default)]
  pub extensions: Option<Vec<String>>,
}

/// Main configuration struct for boilerplate.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
  /// License template file.
  #[serde(default)]
  pub license_file: Option<PathBuf>,

  /// Modeline template file. Without one, modelines are not enforced.
  #[serde(default)]
  pub modeline_file: Option<PathBuf>,

  /// Directory prefixes skipped entirely, e.g. `./_build_`.
  #[serde(default)]
  pub exclude_dirs: Vec<String>,

  /// Directory or file prefixes that never receive the license.
  #[serde(default)]
  pub no_license: Vec<String>,

  /// Extra or overridden comment prefixes, keyed by extension without the
  /// leading dot.
  #[serde(default)]
  pub comment_prefixes: BTreeMap<String, String>,

  /// Include-check settings.
  #[serde(default)]
  pub includes: IncludesConfig,
}

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// The config file could not be read.
  #[error("Failed to read config file '{path}': {source}")]
  ReadError { path: PathBuf, source: std::io::Error },

  /// The config file contains invalid TOML.
  #[error("Failed to parse config file '{path}': {source}")]
  ParseError { path: PathBuf, source: toml::de::Error },

  /// An extension entry is invalid.
  #[error("Invalid extension '{extension}': {message}")]
  InvalidExtension { extension: String, message: String },
}

/// Values given on the command line. They extend the config lists and
/// replace its scalar settings.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
  pub license_file: Option<PathBuf>,
  pub modeline_file: Option<PathBuf>,
  pub exclude_dirs: Vec<String>,
  pub no_license: Vec<String>,
  pub include_extensions: Vec<String>,
}

fn check_extension(extension: &str, context: &str) -> Result<(), ConfigError> {
  if extension.is_empty() {
    return Err(ConfigError::InvalidExtension {
      extension: extension.to_string(),
      message: format!("{context} cannot be empty"),
    });
  }
  if extension.starts_with('.') {
    return Err(ConfigError::InvalidExtension {
      extension: extension.to_string(),
      message: format!("{context} should not include leading dot"),
    });
  }
  Ok(())
}

impl Config {
  /// Load configuration from a file.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    verbose_log!("Loading config from: {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
      path: path.to_path_buf(),
      source: e,
    })?;

    let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
      path: path.to_path_buf(),
      source: e,
    })?;

    config.validate()?;

    verbose_log!(
      "Loaded {} exclusions, {} license exemptions, {} comment prefixes",
      config.exclude_dirs.len(),
      config.no_license.len(),
      config.comment_prefixes.len()
    );

    Ok(config)
  }

  /// Validate the configuration.
  ///
  /// Checks that:
  /// - Extension keys don't include the leading dot
  /// - Comment prefixes are non-empty
  /// - Include-check extensions don't include the leading dot
  pub fn validate(&self) -> Result<(), ConfigError> {
    for (ext, prefix) in &self.comment_prefixes {
      check_extension(ext, "extension")?;
      if prefix.is_empty() {
        return Err(ConfigError::InvalidExtension {
          extension: ext.clone(),
          message: "comment prefix cannot be empty".to_string(),
        });
      }
    }

    if let Some(ref extensions) = self.includes.extensions {
      for ext in extensions {
        check_extension(ext, "extension in includes list")?;
      }
    }

    Ok(())
  }

  /// Applies command-line values on top of this configuration.
  pub fn merge_cli_overrides(&mut self, overrides: CliOverrides) -> Result<(), ConfigError> {
    if let Some(license_file) = overrides.license_file {
      self.license_file = Some(license_file);
    }
    if let Some(modeline_file) = overrides.modeline_file {
      self.modeline_file = Some(modeline_file);
    }
    self.exclude_dirs.extend(overrides.exclude_dirs);
    self.no_license.extend(overrides.no_license);

    if !overrides.include_extensions.is_empty() {
      let extensions = overrides
        .include_extensions
        .into_iter()
        .map(|ext| ext.trim_start_matches('.').to_string())
        .collect();
      self.includes.extensions = Some(extensions);
    }

    self.validate()
  }

  /// The exclusion rules of this configuration.
  pub fn exclusion_rules(&self) -> ExclusionRules {
    ExclusionRules::new(self.exclude_dirs.iter().cloned(), self.no_license.iter().cloned())
  }

  /// The comment-style table: built-ins plus configured prefixes.
  pub fn comment_styles(&self) -> CommentStyles {
    CommentStyles::with_overrides(&self.comment_prefixes)
  }

  /// Implementation extensions checked by the include pass.
  pub fn include_extensions(&self) -> Vec<String> {
    match self.includes.extensions {
      Some(ref extensions) => extensions.clone(),
      None => DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
    }
  }

  /// License template path; relative paths resolve against `root`.
  pub fn license_path(&self, root: &Path) -> PathBuf {
    let path = self
      .license_file
      .clone()
      .unwrap_or_else(|| PathBuf::from(DEFAULT_LICENSE_FILE));
    resolve_against(root, &path)
  }

  /// Modeline template path, if any; relative paths resolve against `root`.
  pub fn modeline_path(&self, root: &Path) -> Option<PathBuf> {
    self.modeline_file.as_ref().map(|path| resolve_against(root, path))
  }
}

fn resolve_against(root: &Path, path: &Path) -> PathBuf {
  if path.is_absolute() {
    path.to_path_buf()
  } else {
    root.join(path)
  }
}

/// Discover the configuration file path.
///
/// The configuration file is discovered in the following order:
/// 1. Path specified via `--config` flag (passed as `explicit_path`)
/// 2. Path specified via `BOILERPLATE_CONFIG` environment variable
/// 3. `.boilerplate.toml` in the root directory
pub fn discover_config_path(explicit_path: Option<&Path>, root: &Path) -> Option<PathBuf> {
  if let Some(path) = explicit_path {
    if path.exists() {
      verbose_log!("Using explicit config path: {}", path.display());
      return Some(path.to_path_buf());
    }
    verbose_log!("Explicit config path does not exist: {}", path.display());
    return None;
  }

  if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
    let path = PathBuf::from(&env_path);
    if path.exists() {
      verbose_log!("Using config from {}: {}", CONFIG_ENV_VAR, path.display());
      return Some(path);
    }
    verbose_log!("{} path does not exist: {}", CONFIG_ENV_VAR, env_path);
  }

  let root_config = root.join(DEFAULT_CONFIG_FILENAME);
  if root_config.exists() {
    verbose_log!("Using root config: {}", root_config.display());
    return Some(root_config);
  }

  verbose_log!("No config file found");
  None
}

/// Load configuration from the discovered path, or return a default config.
///
/// An explicit path that does not exist is an error.
pub fn load_config(explicit_path: Option<&Path>, root: &Path, no_config: bool) -> Result<Config> {
  if no_config {
    verbose_log!("Config file discovery disabled (--no-config)");
    return Ok(Config::default());
  }

  if let Some(path) = explicit_path
    && !path.exists()
  {
    anyhow::bail!("Config file does not exist: {}", path.display());
  }

  match discover_config_path(explicit_path, root) {
    Some(path) => Config::load(&path).with_context(|| format!("Failed to load config from {}", path.display())),
    None => Ok(Config::default()),
  }
}

#[cfg(test)]
mod tests {
  use tempfile::TempDir;

  use super::*;
  use crate::templates::CommentStyle;

  #[test]
  fn test_parse_valid_config() {
    let config_content = concat!(
      "license-file = \"tools/license_header\"\n",
      "exclude-dirs = [\"./_build_\", \"./runtime/stl\"]\n",
      "no-license = [\"./runtime/MersenneTwister.h\"]\n",
      "\n",
      "[comment-prefixes]\n",
      "py = \"#\"\n",
      "\n",
      "[includes]\n",
      "extensions = [\"cpp\", \"cc\"]\n",
    );

    let config: Config = toml::from_str(config_content).expect("valid config should parse");

    assert_eq!(config.license_file, Some(PathBuf::from("tools/license_header")));
    assert_eq!(config.modeline_file, None);
    assert_eq!(config.exclude_dirs, vec!["./_build_", "./runtime/stl"]);
    assert_eq!(config.no_license, vec!["./runtime/MersenneTwister.h"]);
    assert_eq!(config.comment_prefixes.get("py").map(String::as_str), Some("#"));
    assert_eq!(config.include_extensions(), vec!["cpp", "cc"]);
  }

  #[test]
  fn test_parse_empty_config() {
    let config: Config = toml::from_str("").expect("empty config should parse");
    assert_eq!(config, Config::default());
    assert_eq!(config.include_extensions(), vec!["cpp"]);
  }

  #[test]
  fn test_unknown_key_is_rejected() {
    let result: Result<Config, _> = toml::from_str("exclude = [\"./x\"]\n");
    assert!(result.is_err());
  }

  #[test]
  fn test_validate_leading_dot() {
    let mut config = Config::default();
    config.comment_prefixes.insert(".py".to_string(), "#".to_string());
    assert!(matches!(
      config.validate().expect_err("should fail"),
      ConfigError::InvalidExtension { .. }
    ));
  }

  #[test]
  fn test_validate_empty_prefix() {
    let mut config = Config::default();
    config.comment_prefixes.insert("py".to_string(), String::new());
    assert!(config.validate().is_err());
  }

  #[test]
  fn test_validate_includes_leading_dot() {
    let config = Config {
      includes: IncludesConfig {
        extensions: Some(vec![".cpp".to_string()]),
      },
      ..Config::default()
    };
    assert!(config.validate().is_err());
  }

  #[test]
  fn test_merge_cli_overrides() {
    let mut config = Config {
      license_file: Some(PathBuf::from("from_config")),
      exclude_dirs: vec!["./_build_".to_string()],
      ..Config::default()
    };

    config
      .merge_cli_overrides(CliOverrides {
        license_file: Some(PathBuf::from("from_cli")),
        modeline_file: Some(PathBuf::from("modelines.txt")),
        exclude_dirs: vec!["./vendor".to_string()],
        no_license: vec!["./lib/atomic".to_string()],
        include_extensions: vec![".cc".to_string()],
      })
      .expect("merge succeeds");

    assert_eq!(config.license_file, Some(PathBuf::from("from_cli")));
    assert_eq!(config.modeline_file, Some(PathBuf::from("modelines.txt")));
    assert_eq!(config.exclude_dirs, vec!["./_build_", "./vendor"]);
    assert_eq!(config.include_extensions(), vec!["cc"]);

    let rules = config.exclusion_rules();
    assert!(rules.is_excluded_dir("./vendor/zlib"));
    assert!(rules.is_license_exempt("./lib/atomic", "./lib/atomic/ops.h"));
  }

  #[test]
  fn test_paths_resolve_against_root() {
    let root = Path::new("/src/tree");
    let config = Config {
      modeline_file: Some(PathBuf::from("tools/modelines.txt")),
      ..Config::default()
    };
    assert_eq!(config.license_path(root), PathBuf::from("/src/tree/license_header"));
    assert_eq!(
      config.modeline_path(root),
      Some(PathBuf::from("/src/tree/tools/modelines.txt"))
    );

    let absolute = Config {
      license_file: Some(PathBuf::from("/etc/license_header")),
      ..Config::default()
    };
    assert_eq!(absolute.license_path(root), PathBuf::from("/etc/license_header"));
    assert_eq!(absolute.modeline_path(root), None);
  }

  #[test]
  fn test_comment_styles_from_config() {
    let mut config = Config::default();
    config.comment_prefixes.insert("py".to_string(), "#".to_string());
    let styles = config.comment_styles();
    assert_eq!(styles.get("py"), Some(&CommentStyle::Custom("#".to_string())));
    assert_eq!(styles.get("s"), Some(&CommentStyle::Semicolon));
  }

  #[test]
  fn test_load_config_from_file() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let config_path = temp_dir.path().join(DEFAULT_CONFIG_FILENAME);
    std::fs::write(&config_path, "exclude-dirs = [\"./_build_\"]\n").expect("write config");

    let config = Config::load(&config_path).expect("load should succeed");
    assert_eq!(config.exclude_dirs, vec!["./_build_"]);
  }

  #[test]
  fn test_load_config_file_not_found() {
    let result = Config::load(Path::new("/nonexistent/path/.boilerplate.toml"));
    assert!(matches!(
      result.expect_err("should fail"),
      ConfigError::ReadError { .. }
    ));
  }

  #[test]
  fn test_load_config_invalid_toml() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let config_path = temp_dir.path().join(DEFAULT_CONFIG_FILENAME);
    std::fs::write(&config_path, "exclude-dirs = [").expect("write config");

    assert!(matches!(
      Config::load(&config_path).expect_err("should fail"),
      ConfigError::ParseError { .. }
    ));
  }

  #[test]
  fn test_discover_config_explicit_path() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let config_path = temp_dir.path().join("custom-config.toml");
    std::fs::write(&config_path, "").expect("write config");

    let result = discover_config_path(Some(&config_path), temp_dir.path());
    assert_eq!(result, Some(config_path));
  }

  #[test]
  fn test_discover_config_explicit_missing() {
    let temp_dir = TempDir::new().expect("create temp dir");
    std::fs::write(temp_dir.path().join(DEFAULT_CONFIG_FILENAME), "").expect("write config");

    let missing = temp_dir.path().join("missing.toml");
    assert_eq!(discover_config_path(Some(&missing), temp_dir.path()), None);
  }

  #[test]
  fn test_load_config_explicit_missing_is_error() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let missing = temp_dir.path().join("missing.toml");
    assert!(load_config(Some(&missing), temp_dir.path(), false).is_err());
  }

  #[test]
  fn test_load_config_disabled() {
    let temp_dir = TempDir::new().expect("create temp dir");
    std::fs::write(temp_dir.path().join(DEFAULT_CONFIG_FILENAME), "exclude-dirs = [\"./x\"]\n").expect("write config");

    let config = load_config(None, temp_dir.path(), true).expect("load");
    assert!(config.exclude_dirs.is_empty());
  }
}
