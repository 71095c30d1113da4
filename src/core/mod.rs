pub mod combine;
pub mod engine;
pub mod pipeline;

pub use crate::domain::model::{CombineResult, RunSummary, SourceFile, SourceSummary};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
