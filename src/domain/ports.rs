use crate::domain::model::{CleanOutcome, PriceReport, PriceSeries, RawRecord};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn start_url(&self) -> &str;
    fn allowed_domains(&self) -> &[String];
    fn output_path(&self) -> &str;
    fn raw_file(&self) -> &str;
    fn cleaned_file(&self) -> &str;
    fn container_selector(&self) -> &str;
    fn name_selector(&self) -> &str;
    fn price_selector(&self) -> &str;
    fn price_suffix(&self) -> &str;
    fn currency_unit(&self) -> &str;
    fn bin_count(&self) -> usize;
    /// 匯出 SVG 的路徑；None 表示在終端顯示
    fn chart_output(&self) -> Option<&str>;
    fn request_timeout(&self) -> Duration;
}

/// Fetches one listing page and turns every container node into a [`RawRecord`].
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn fetch_listings(&self, url: &str, allowed_domains: &[String])
        -> Result<Vec<RawRecord>>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<RawRecord>>;
    async fn transform(&self) -> Result<CleanOutcome>;
    async fn load(&self, prices: PriceSeries) -> Result<PriceReport>;
}
