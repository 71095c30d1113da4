use crate::core::{Pipeline, RunSummary};
use crate::utils::error::Result;
use std::time::Instant;

pub struct CombineEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> CombineEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Reads every source before the output is touched, so a failing read
    /// leaves any previous output in place.
    pub async fn run(&self) -> Result<RunSummary> {
        self.execute(false).await
    }

    /// Same as `run` without writing the output.
    pub async fn plan(&self) -> Result<RunSummary> {
        self.execute(true).await
    }

    async fn execute(&self, dry_run: bool) -> Result<RunSummary> {
        let start = Instant::now();
        tracing::info!("Starting combine{}", if dry_run { " (dry run)" } else { "" });

        let sources = self.pipeline.extract().await?;
        tracing::info!("Extracted {} source files", sources.len());

        let result = self.pipeline.transform(sources).await?;
        tracing::info!("Combined {} records", result.total_records);

        let output_path = if dry_run {
            self.pipeline.output_location()
        } else {
            let path = self.pipeline.load(&result).await?;
            tracing::info!("Output saved to: {}", path);
            path
        };

        tracing::debug!("Finished in {:?}", start.elapsed());

        Ok(RunSummary {
            output_path,
            dry_run,
            sources: result.sources,
            total_records: result.total_records,
            finished_at: chrono::Utc::now(),
        })
    }
}
