//! Configuration for the bel validator.
//!
//! Layers, lowest first: the embedded `defaults/bel.default.toml`, a TOML
//! file (`--config`, or `bel.toml` in the working directory when present),
//! then single-key overrides from command-line flags.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/bel.default.toml");

/// Top-level configuration consumed by bel applications.
#[derive(Debug, Clone, Deserialize)]
pub struct BelConfig {
    pub validation: ValidationConfig,
    pub report: ReportConfig,
    pub export: ExportConfig,
}

/// Knobs for the parse/validate pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidationConfig {
    pub fail_fast: bool,
    pub repair: bool,
    pub check_patterns: bool,
    pub warn_ambiguous_entries: bool,
    pub warn_injected_relations: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    pub format: ReportFormatName,
}

/// Report layouts understood by the diagnostic renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportFormatName {
    Table,
    Csv,
    Tsv,
    Markdown,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    pub pretty: bool,
    pub force: bool,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// A loader holding only the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    fn with_toml(mut self, path: &Path, required: bool) -> Self {
        let source = File::from(path).format(FileFormat::Toml).required(required);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer a TOML file given on the command line; it must exist.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.with_toml(path.as_ref(), true)
    }

    /// Layer a TOML file picked up by convention, skipped when absent.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.with_toml(path.as_ref(), false)
    }

    /// Override one dotted key, e.g. `validation.fail_fast`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Merge every layer and deserialize into [`BelConfig`].
    pub fn build(self) -> Result<BelConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_default_config() {
        let config = Loader::new().build().expect("defaults to deserialize");
        assert!(!config.validation.fail_fast);
        assert!(!config.validation.repair);
        assert!(config.validation.check_patterns);
        assert_eq!(config.report.format, ReportFormatName::Table);
        assert!(config.export.pretty);
        assert!(!config.export.force);
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("report.format", "markdown")
            .expect("override to apply")
            .set_override("validation.fail_fast", true)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.report.format, ReportFormatName::Markdown);
        assert!(config.validation.fail_fast);
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let result = Loader::new()
            .with_file("/definitely/not/here/bel.toml")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn optional_file_is_layered_when_present() {
        let path = std::env::temp_dir().join(format!("bel-config-{}.toml", std::process::id()));
        std::fs::write(&path, "[report]\nformat = \"csv\"\n[export]\nforce = true\n")
            .expect("temp config to be written");
        let config = Loader::new()
            .with_optional_file(&path)
            .build()
            .expect("config to build");
        std::fs::remove_file(&path).ok();
        assert_eq!(config.report.format, ReportFormatName::Csv);
        assert!(config.export.force);
        assert!(config.export.pretty);
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("/definitely/not/here/bel.toml")
            .build()
            .expect("optional file to be skipped");
        assert_eq!(config.report.format, ReportFormatName::Table);
    }
}
