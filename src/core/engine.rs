use crate::core::{Pipeline, SearchOutcome};
use crate::utils::error::Result;

/// What one search produced: the records and where they were exported.
#[derive(Debug, Clone, Default)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    pub exported: Vec<String>,
}

pub struct FinderEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> FinderEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Runs one search. An empty result is not an error; nothing is exported
    /// and the raw model output is kept on the report.
    pub async fn run(&self) -> Result<SearchReport> {
        tracing::info!("Starting company search");

        let raw_output = self.pipeline.extract().await?;
        let outcome = self.pipeline.transform(raw_output).await?;

        if outcome.is_empty() {
            tracing::warn!(
                "No valid companies found. Try relaxing filters or increasing the max companies."
            );
            return Ok(SearchReport {
                outcome,
                exported: Vec::new(),
            });
        }

        let exported = self.pipeline.load(&outcome).await?;
        for path in &exported {
            tracing::info!("📁 Saved {}", path);
        }

        Ok(SearchReport { outcome, exported })
    }
}
