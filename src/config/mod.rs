pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use toml_config::CombineSection;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use toml_config::TomlConfig;

pub const DEFAULT_DIR: &str = ".";
pub const DEFAULT_EXTENSION: &str = "txt";
pub const DEFAULT_OUTPUT: &str = "combined.csv";

/// Settings after layering: CLI flag, then config file, then default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombineConfig {
    pub input_dir: String,
    pub extension: String,
    pub output_file: String,
}

impl Default for CombineConfig {
    fn default() -> Self {
        Self {
            input_dir: DEFAULT_DIR.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
            output_file: DEFAULT_OUTPUT.to_string(),
        }
    }
}

impl CombineConfig {
    pub fn from_layers(cli: &CombineSection, file: &CombineSection) -> Self {
        fn pick(cli: &Option<String>, file: &Option<String>, default: &str) -> String {
            cli.clone()
                .or_else(|| file.clone())
                .unwrap_or_else(|| default.to_string())
        }

        Self {
            input_dir: pick(&cli.dir, &file.dir, DEFAULT_DIR),
            extension: pick(&cli.extension, &file.extension, DEFAULT_EXTENSION),
            output_file: pick(&cli.output, &file.output, DEFAULT_OUTPUT),
        }
    }
}

impl ConfigProvider for CombineConfig {
    fn input_dir(&self) -> &str {
        &self.input_dir
    }

    fn extension(&self) -> &str {
        &self.extension
    }

    fn output_file(&self) -> &str {
        &self.output_file
    }
}

impl Validate for CombineConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("dir", &self.input_dir)?;
        validation::validate_extension("extension", &self.extension)?;
        validation::validate_file_name("output", &self.output_file)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "csv-combine")]
#[command(about = "Combine delimited text files into one CSV, tagging each row with its source file")]
pub struct CliConfig {
    /// Directory holding the input files; the output is written there too
    #[arg(long)]
    pub dir: Option<String>,

    /// Extension of the input files, without the dot [default: txt]
    #[arg(long)]
    pub extension: Option<String>,

    /// Output file name, relative to --dir [default: combined.csv]
    #[arg(long)]
    pub output: Option<String>,

    /// Optional TOML file with a [combine] section
    #[arg(long)]
    pub config: Option<String>,

    /// List the sources and record counts without writing the output
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Also append debug-level logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[cfg(feature = "cli")]
impl CliConfig {
    fn overrides(&self) -> CombineSection {
        CombineSection {
            dir: self.dir.clone(),
            extension: self.extension.clone(),
            output: self.output.clone(),
        }
    }

    /// Loads the config file if one was given and layers the flags on top.
    pub fn resolve(&self) -> Result<CombineConfig> {
        let file = match &self.config {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path);
                let file = TomlConfig::from_file(path)?;
                file.validate()?;
                file
            }
            None => TomlConfig::default(),
        };

        let config = CombineConfig::from_layers(&self.overrides(), &file.combine);
        config.validate()?;
        Ok(config)
    }
}
