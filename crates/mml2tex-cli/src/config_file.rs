use std::{fs, io, path::Path};

use mml2tex::ConverterConfig;
use serde::Deserialize;
use thiserror::Error;

/// How a converted formula is written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Plain TeX.
    #[default]
    Tex,
    /// A `<?mml2tex ...?>` processing instruction.
    ProcessingInstruction,
}

/// Math delimiters around the TeX.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Wrap {
    #[default]
    None,
    /// `$...$`
    Inline,
    /// `\[...\]`
    Display,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub output: OutputFormat,
    pub wrap: Wrap,
    #[serde(flatten)]
    pub converter: ConverterConfig,
}

/// Error type for configuration loading operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("TOML parsing error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads and deserializes the configuration from a TOML file.
///
/// Returns `Err(ConfigError)` if the file cannot be read or parsed. Symbol clashes are only
/// detected later, when the converter is built.
pub fn load_config_file(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    Ok(config)
}

#[inline]
fn parse_config(s: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(s)?;
    Ok(config)
}
