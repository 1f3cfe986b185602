use crate::core::{BatchSummary, Pipeline};
use crate::utils::error::Result;

pub struct BatchEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> BatchEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn run(&self) -> Result<BatchSummary> {
        tracing::info!("Starting instrument batch check...");

        let records = self.pipeline.extract()?;
        tracing::info!("Read {} instruments", records.len());

        let result = self.pipeline.transform(records)?;
        let total = result.rows.len();
        let valid = result.rows.iter().filter(|row| row.valid).count();
        tracing::info!("Checked {} instruments: {} valid, {} invalid", total, valid, total - valid);

        let outputs = self.pipeline.load(&result)?;
        for path in &outputs {
            tracing::info!("Report saved to: {}", path);
        }

        Ok(BatchSummary {
            total,
            valid,
            invalid: total - valid,
            outputs,
        })
    }
}
