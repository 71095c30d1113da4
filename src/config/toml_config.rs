use crate::utils::error::{CombineError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Optional `combine.toml`-style file. Every key may be omitted.
///
/// ```toml
/// [combine]
/// dir = "./exports"
/// extension = "txt"
/// output = "combined.csv"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    #[serde(default)]
    pub combine: CombineSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CombineSection {
    pub dir: Option<String>,
    pub extension: Option<String>,
    pub output: Option<String>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| CombineError::ConfigFileError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            CombineError::ConfigFileError { message, .. } => CombineError::ConfigFileError {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CombineError::ConfigFileError {
            path: PathBuf::from("<inline>"),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the value of the environment variable. Unset
    /// variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| CombineError::ConfigFileError {
            path: PathBuf::from("<inline>"),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(dir) = &self.combine.dir {
            validation::validate_path("combine.dir", dir)?;
        }
        if let Some(extension) = &self.combine.extension {
            validation::validate_extension("combine.extension", extension)?;
        }
        if let Some(output) = &self.combine.output {
            validation::validate_file_name("combine.output", output)?;
        }
        Ok(())
    }
}
