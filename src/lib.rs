pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::cli::LocalStorage;
pub use config::{CombineConfig, LogFormat};

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use core::{engine::CombineEngine, pipeline::CombinePipeline};
pub use domain::model::{RunSummary, SourceSummary};
pub use utils::error::{CombineError, Result};
