use crate::core::{Pipeline, PriceReport};
use crate::utils::error::Result;
use std::time::Instant;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// 依序執行擷取、清理、報告，任何階段失敗即中止
    pub async fn run(&self) -> Result<PriceReport> {
        let started = Instant::now();
        tracing::info!("🚀 Starting price ETL run");

        tracing::info!("📥 Extracting listings...");
        let raw_records = self.pipeline.extract().await?;
        tracing::info!("📥 Extracted {} listings", raw_records.len());

        tracing::info!("🧹 Cleaning prices...");
        let outcome = self.pipeline.transform().await?;
        tracing::info!(
            "🧹 Kept {} prices, skipped {} rows",
            outcome.prices.len(),
            outcome.skipped
        );

        tracing::info!("📊 Reporting...");
        let report = self.pipeline.load(outcome.prices).await?;

        tracing::info!("✅ ETL run finished in {:?}", started.elapsed());
        Ok(report)
    }
}
