use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One matching input file, read in full.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub file_name: String,
    pub label: String,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSummary {
    pub file_name: String,
    pub label: String,
    pub records: usize,
}

#[derive(Debug, Clone)]
pub struct CombineResult {
    pub sources: Vec<SourceSummary>,
    pub total_records: usize,
    pub output: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub output_path: String,
    pub dry_run: bool,
    pub sources: Vec<SourceSummary>,
    pub total_records: usize,
    pub finished_at: DateTime<Utc>,
}
