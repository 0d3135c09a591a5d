use crate::core::cleaner::Cleaner;
use crate::core::extractor::{raw_records_to_csv, HttpListingSource, ListingSelectors};
use crate::core::reporter::{ChartTarget, Reporter};
use crate::core::{
    CleanOutcome, ConfigProvider, ListingSource, Pipeline, PriceReport, PriceSeries, RawRecord,
    Storage,
};
use crate::utils::error::Result;

/// Scrape, clean and report pipeline; the raw and cleaned CSV files are the stage handoff.
pub struct PricePipeline<S: Storage, C: ConfigProvider, L: ListingSource> {
    storage: S,
    config: C,
    source: L,
    cleaner: Cleaner,
    reporter: Reporter,
}

impl<S: Storage, C: ConfigProvider, L: ListingSource> PricePipeline<S, C, L> {
    pub fn new(storage: S, config: C, source: L) -> Self {
        let cleaner = Cleaner::new(config.price_suffix());
        let reporter = Reporter::new(
            config.bin_count(),
            config.currency_unit(),
            ChartTarget::from_option(config.chart_output()),
        );

        Self {
            storage,
            config,
            source,
            cleaner,
            reporter,
        }
    }
}

impl<S: Storage, C: ConfigProvider> PricePipeline<S, C, HttpListingSource> {
    pub fn with_http_source(storage: S, config: C) -> Result<Self> {
        let selectors = ListingSelectors::parse(
            config.container_selector(),
            config.name_selector(),
            config.price_selector(),
        )?;
        let source = HttpListingSource::new(
            selectors,
            config.request_timeout(),
            config.allowed_domains().to_vec(),
        )?;
        Ok(Self::new(storage, config, source))
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, L: ListingSource> Pipeline for PricePipeline<S, C, L> {
    async fn extract(&self) -> Result<Vec<RawRecord>> {
        let records = self
            .source
            .fetch_listings(self.config.start_url(), self.config.allowed_domains())
            .await?;

        let csv = raw_records_to_csv(&records)?;
        self.storage.write_file(self.config.raw_file(), &csv).await?;
        tracing::debug!(
            "Wrote {} raw rows to {}",
            records.len(),
            self.config.raw_file()
        );

        Ok(records)
    }

    async fn transform(&self) -> Result<CleanOutcome> {
        self.cleaner
            .process(
                &self.storage,
                self.config.raw_file(),
                self.config.cleaned_file(),
            )
            .await
    }

    async fn load(&self, prices: PriceSeries) -> Result<PriceReport> {
        self.reporter.report(&self.storage, &prices).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::etl::EtlEngine;
    use crate::core::test_support::MockStorage;
    use crate::utils::error::EtlError;
    use async_trait::async_trait;
    use std::time::Duration;

    struct FixedSource {
        records: Vec<RawRecord>,
    }

    #[async_trait]
    impl ListingSource for FixedSource {
        async fn fetch_listings(
            &self,
            _url: &str,
            _allowed_domains: &[String],
        ) -> Result<Vec<RawRecord>> {
            Ok(self.records.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl ListingSource for FailingSource {
        async fn fetch_listings(
            &self,
            url: &str,
            _allowed_domains: &[String],
        ) -> Result<Vec<RawRecord>> {
            Err(EtlError::FetchStatusError {
                url: url.to_string(),
                status: 503,
            })
        }
    }

    struct MockConfig {
        allowed_domains: Vec<String>,
        chart_output: Option<String>,
    }

    impl MockConfig {
        fn new(chart_output: Option<&str>) -> Self {
            Self {
                allowed_domains: vec!["divan.ru".to_string()],
                chart_output: chart_output.map(str::to_string),
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn start_url(&self) -> &str {
            "https://www.divan.ru/category/divany-i-kresla"
        }

        fn allowed_domains(&self) -> &[String] {
            &self.allowed_domains
        }

        fn output_path(&self) -> &str {
            "test_output"
        }

        fn raw_file(&self) -> &str {
            "raw_prices.csv"
        }

        fn cleaned_file(&self) -> &str {
            "cleaned_prices.csv"
        }

        fn container_selector(&self) -> &str {
            "div._Ud0k"
        }

        fn name_selector(&self) -> &str {
            "div.lsooF span"
        }

        fn price_selector(&self) -> &str {
            "div.pY3d2 span"
        }

        fn price_suffix(&self) -> &str {
            "₽/мес."
        }

        fn currency_unit(&self) -> &str {
            "руб."
        }

        fn bin_count(&self) -> usize {
            20
        }

        fn chart_output(&self) -> Option<&str> {
            self.chart_output.as_deref()
        }

        fn request_timeout(&self) -> Duration {
            Duration::from_secs(5)
        }
    }

    fn scenario_source() -> FixedSource {
        FixedSource {
            records: vec![
                RawRecord::new(Some("Sofa A"), Some("1 000 ₽/мес.")),
                RawRecord::new(Some("Sofa B"), Some(" ")),
                RawRecord::new(Some("Sofa C"), Some("2 500 ₽/мес.")),
            ],
        }
    }

    #[tokio::test]
    async fn test_extract_writes_raw_file() {
        let storage = MockStorage::new();
        let pipeline = PricePipeline::new(
            storage.clone(),
            MockConfig::new(None),
            scenario_source(),
        );

        let records = pipeline.extract().await.unwrap();

        assert_eq!(records.len(), 3);
        let raw = storage.get_file("raw_prices.csv").await.unwrap();
        assert_eq!(
            String::from_utf8(raw).unwrap(),
            "name,price\nSofa A,1 000 ₽/мес.\nSofa B, \nSofa C,2 500 ₽/мес.\n"
        );
    }

    #[tokio::test]
    async fn test_engine_runs_scenario_end_to_end() {
        let storage = MockStorage::new();
        let pipeline = PricePipeline::new(
            storage.clone(),
            MockConfig::new(Some("price_histogram.svg")),
            scenario_source(),
        );

        let report = EtlEngine::new(pipeline).run().await.unwrap();

        assert_eq!(report.to_string(), "Average price: 1750.00 руб.");
        assert_eq!(report.count, 2);
        assert_eq!(report.histogram.bins.len(), 20);

        let cleaned = storage.get_file("cleaned_prices.csv").await.unwrap();
        assert_eq!(
            String::from_utf8(cleaned).unwrap(),
            "name,price\nSofa A,1000\nSofa C,2500\n"
        );
        assert!(storage.get_file("price_histogram.svg").await.is_some());
    }

    #[tokio::test]
    async fn test_engine_with_no_listings() {
        let storage = MockStorage::new();
        let pipeline = PricePipeline::new(
            storage.clone(),
            MockConfig::new(Some("price_histogram.svg")),
            FixedSource { records: vec![] },
        );

        let report = EtlEngine::new(pipeline).run().await.unwrap();

        assert_eq!(report.to_string(), "Average price: 0.00 руб.");
        assert_eq!(
            storage.get_file("cleaned_prices.csv").await.unwrap(),
            b"name,price\n"
        );
        assert!(storage.get_file("price_histogram.svg").await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_before_any_file() {
        let storage = MockStorage::new();
        let pipeline = PricePipeline::new(storage.clone(), MockConfig::new(None), FailingSource);

        let err = EtlEngine::new(pipeline).run().await.unwrap_err();

        assert!(matches!(err, EtlError::FetchStatusError { status: 503, .. }));
        assert!(storage.get_file("raw_prices.csv").await.is_none());
        assert!(storage.get_file("cleaned_prices.csv").await.is_none());
    }

    #[test]
    fn test_with_http_source_rejects_bad_selector() {
        struct BadSelector(MockConfig);

        impl ConfigProvider for BadSelector {
            fn start_url(&self) -> &str {
                self.0.start_url()
            }
            fn allowed_domains(&self) -> &[String] {
                self.0.allowed_domains()
            }
            fn output_path(&self) -> &str {
                self.0.output_path()
            }
            fn raw_file(&self) -> &str {
                self.0.raw_file()
            }
            fn cleaned_file(&self) -> &str {
                self.0.cleaned_file()
            }
            fn container_selector(&self) -> &str {
                "div[["
            }
            fn name_selector(&self) -> &str {
                self.0.name_selector()
            }
            fn price_selector(&self) -> &str {
                self.0.price_selector()
            }
            fn price_suffix(&self) -> &str {
                self.0.price_suffix()
            }
            fn currency_unit(&self) -> &str {
                self.0.currency_unit()
            }
            fn bin_count(&self) -> usize {
                self.0.bin_count()
            }
            fn chart_output(&self) -> Option<&str> {
                self.0.chart_output()
            }
            fn request_timeout(&self) -> Duration {
                self.0.request_timeout()
            }
        }

        let result =
            PricePipeline::with_http_source(MockStorage::new(), BadSelector(MockConfig::new(None)));
        assert!(matches!(result, Err(EtlError::SelectorError { .. })));
    }
}
