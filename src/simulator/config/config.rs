use std::path::Path;

use ::config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::config::DecoderConfig;
use crate::error::{DecoderError, Result};
use crate::qec::diag_mux::DiagLayout;
use crate::qec::lfsr::LfsrAdvance;

const DEFAULT_CONFIG: &str = include_str!("default.toml");

/// Simulation section
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SimulationSection {
  #[serde(default)]
  pub quiet: bool,
  #[serde(default)]
  pub step_mode: bool,
  #[serde(default)]
  pub trace_file: String,
  /// Stop after this many edges even if the stimulus continues
  #[serde(default)]
  pub max_cycles: Option<u64>,
}

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AppConfig {
  #[serde(default)]
  pub decoder: DecoderConfig,
  #[serde(default)]
  pub simulation: SimulationSection,
}

/// Command-line values that take precedence over every file
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
  pub quiet: bool,
  pub step: bool,
  pub trace_file: Option<String>,
  pub max_cycles: Option<u64>,
  pub lfsr_advance: Option<String>,
  pub diag_layout: Option<String>,
}

/// Built-in defaults only
pub fn load_default_config() -> Result<AppConfig> {
  Ok(toml::from_str::<AppConfig>(DEFAULT_CONFIG)?)
}

/// Defaults, then `path`, then environment variables named
/// `QECDEC_<SECTION>__<KEY>`, e.g. `QECDEC_DECODER__HISTORY_DEPTH=6`
pub fn load_config_file(path: Option<&Path>) -> Result<AppConfig> {
  let mut builder = Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));
  if let Some(path) = path {
    builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
  }
  let settings = builder
    .add_source(
      Environment::with_prefix("QECDEC")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true),
    )
    .build()?;
  Ok(settings.try_deserialize::<AppConfig>()?)
}

pub fn parse_lfsr_advance(value: &str) -> Result<LfsrAdvance> {
  match value.to_lowercase().replace('-', "_").as_str() {
    "always" => Ok(LfsrAdvance::Always),
    "test_mode_only" => Ok(LfsrAdvance::TestModeOnly),
    other => Err(DecoderError::Config(format!("unknown lfsr advance policy: {}", other))),
  }
}

pub fn parse_diag_layout(value: &str) -> Result<DiagLayout> {
  match value.to_lowercase().as_str() {
    "compact" => Ok(DiagLayout::Compact),
    "extended" => Ok(DiagLayout::Extended),
    other => Err(DecoderError::Config(format!("unknown diagnostic layout: {}", other))),
  }
}

pub fn apply_cli_overrides(config: &mut AppConfig, cli: &CliOverrides) -> Result<()> {
  if cli.quiet {
    config.simulation.quiet = true;
  }
  if cli.step {
    config.simulation.step_mode = true;
  }
  if let Some(file) = &cli.trace_file {
    config.simulation.trace_file = file.clone();
  }
  if cli.max_cycles.is_some() {
    config.simulation.max_cycles = cli.max_cycles;
  }
  if let Some(advance) = &cli.lfsr_advance {
    config.decoder.lfsr_advance = parse_lfsr_advance(advance)?;
  }
  if let Some(layout) = &cli.diag_layout {
    config.decoder.diag_layout = parse_diag_layout(layout)?;
  }
  Ok(())
}

pub fn validate_config(config: &AppConfig) -> Result<()> {
  config.decoder.validate()?;
  if config.simulation.max_cycles == Some(0) {
    return Err(DecoderError::Config("max_cycles must be greater than 0".to_string()));
  }
  Ok(())
}

/// Load and merge configuration
///
/// 1. built-in defaults
/// 2. custom config file, if given
/// 3. environment
/// 4. CLI overrides
/// 5. validation
pub fn load_and_merge_configs(custom_config_path: Option<&Path>, cli: &CliOverrides) -> Result<AppConfig> {
  let mut config = load_config_file(custom_config_path)?;
  apply_cli_overrides(&mut config, cli)?;
  validate_config(&config)?;
  Ok(config)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::qec::history::HistorySummary;
  use std::io::Write;

  #[test]
  fn test_default_toml_matches_code_defaults() {
    let cfg = load_default_config().unwrap();
    assert_eq!(cfg, AppConfig::default());
  }

  #[test]
  fn test_custom_file_overrides_defaults() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
      file,
      "[decoder]\nlfsr_advance = \"test_mode_only\"\nhistory_summary = \"or_aggregate\"\n[simulation]\nmax_cycles = 40"
    )
    .unwrap();

    let cfg = load_and_merge_configs(Some(file.path()), &CliOverrides::default()).unwrap();
    assert_eq!(cfg.decoder.lfsr_advance, LfsrAdvance::TestModeOnly);
    assert_eq!(cfg.decoder.history_summary, HistorySummary::OrAggregate);
    assert_eq!(cfg.decoder.history_depth, 4);
    assert_eq!(cfg.simulation.max_cycles, Some(40));
  }

  #[test]
  fn test_cli_wins() {
    let cli = CliOverrides {
      quiet: true,
      lfsr_advance: Some("test-mode-only".to_string()),
      diag_layout: Some("Compact".to_string()),
      ..Default::default()
    };
    let cfg = load_and_merge_configs(None, &cli).unwrap();
    assert!(cfg.simulation.quiet);
    assert_eq!(cfg.decoder.lfsr_advance, LfsrAdvance::TestModeOnly);
    assert_eq!(cfg.decoder.diag_layout, DiagLayout::Compact);
  }

  #[test]
  fn test_rejects_bad_values() {
    let cli = CliOverrides {
      diag_layout: Some("wide".to_string()),
      ..Default::default()
    };
    assert!(matches!(load_and_merge_configs(None, &cli), Err(DecoderError::Config(_))));

    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[decoder]\nlfsr_seed = 0").unwrap();
    assert!(load_and_merge_configs(Some(file.path()), &CliOverrides::default()).is_err());
  }

  #[test]
  fn test_environment_layer() {
    // process-wide: other tests must not read diag_layout from the environment
    std::env::set_var("QECDEC_DECODER__DIAG_LAYOUT", "compact");
    let loaded = load_config_file(None);
    std::env::remove_var("QECDEC_DECODER__DIAG_LAYOUT");

    let cfg = loaded.unwrap();
    assert_eq!(cfg.decoder.diag_layout, DiagLayout::Compact);
    assert_eq!(cfg.decoder.lfsr_seed, 0xACE1);
    assert_eq!(load_config_file(None).unwrap().decoder.diag_layout, DiagLayout::Extended);
  }

  #[test]
  fn test_missing_file_is_an_error() {
    let missing = Path::new("/nonexistent/qecdec.toml");
    assert!(load_config_file(Some(missing)).is_err());
  }
}
