use crate::core::{ListingSource, RawRecord};
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use reqwest::redirect::{Attempt, Policy};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use url::Url;

pub const RAW_HEADER: [&str; 2] = ["name", "price"];

const MAX_REDIRECTS: usize = 10;

/// Compiled container/name/price selectors for one listing page layout.
#[derive(Debug, Clone)]
pub struct ListingSelectors {
    container: Selector,
    name: Selector,
    price: Selector,
}

impl ListingSelectors {
    pub fn parse(container: &str, name: &str, price: &str) -> Result<Self> {
        Ok(Self {
            container: compile(container)?,
            name: compile(name)?,
            price: compile(price)?,
        })
    }
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| EtlError::SelectorError {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

/// 每個容器產生一筆記錄，找不到的欄位保留為 None
pub fn parse_listings(html: &str, selectors: &ListingSelectors) -> Vec<RawRecord> {
    let document = Html::parse_document(html);

    document
        .select(&selectors.container)
        .map(|container| RawRecord {
            name: first_text(container, &selectors.name),
            price: first_text(container, &selectors.price),
        })
        .collect()
}

// 只取元素本身的文字節點，不含子元素
fn first_text(container: ElementRef<'_>, selector: &Selector) -> Option<String> {
    container
        .select(selector)
        .flat_map(|element| {
            element
                .children()
                .filter_map(|node| node.value().as_text().map(|text| String::from(&**text)))
        })
        .next()
}

/// Empty allowlist permits every host; otherwise the host must match or be a subdomain.
pub fn ensure_allowed_domain(url: &Url, allowed_domains: &[String]) -> Result<()> {
    if allowed_domains.is_empty() {
        return Ok(());
    }

    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    let permitted = allowed_domains.iter().any(|domain| {
        let domain = domain.trim().trim_start_matches('.').to_ascii_lowercase();
        host == domain || host.ends_with(&format!(".{}", domain))
    });

    if permitted {
        Ok(())
    } else {
        Err(EtlError::DomainNotAllowedError {
            url: url.to_string(),
            allowed: allowed_domains.join(", "),
        })
    }
}

/// 寫出原始 CSV；即使沒有資料也一定有標頭
pub fn raw_records_to_csv(records: &[RawRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(RAW_HEADER)?;
    for record in records {
        writer.serialize(record)?;
    }

    writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))
}

pub struct HttpListingSource {
    client: Client,
    selectors: ListingSelectors,
}

impl HttpListingSource {
    /// The client never follows a redirect to a host outside `allowed_domains`.
    pub fn new(
        selectors: ListingSelectors,
        timeout: Duration,
        allowed_domains: Vec<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(offsite_redirect_policy(allowed_domains))
            .build()?;
        Ok(Self { client, selectors })
    }

    async fn fetch_html(&self, url: &Url, allowed_domains: &[String]) -> Result<String> {
        tracing::debug!("Requesting listing page: {}", url);
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        tracing::debug!("Listing page response status: {}", status);

        // 被擋下的重新導向會原樣回傳 3xx，目標不在允許清單內就視為網域錯誤
        if status.is_redirection() {
            if let Some(location) = response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|value| value.to_str().ok())
            {
                let target = response.url().join(location)?;
                ensure_allowed_domain(&target, allowed_domains)?;
            }
        }

        if !status.is_success() {
            return Err(EtlError::FetchStatusError {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

// 停在第一個離站的跳轉，不送出請求
fn offsite_redirect_policy(allowed_domains: Vec<String>) -> Policy {
    Policy::custom(move |attempt: Attempt| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            attempt.error("too many redirects")
        } else if ensure_allowed_domain(attempt.url(), &allowed_domains).is_ok() {
            attempt.follow()
        } else {
            tracing::debug!("Refusing offsite redirect to {}", attempt.url());
            attempt.stop()
        }
    })
}

#[async_trait]
impl ListingSource for HttpListingSource {
    async fn fetch_listings(
        &self,
        url: &str,
        allowed_domains: &[String],
    ) -> Result<Vec<RawRecord>> {
        let url = Url::parse(url)?;
        ensure_allowed_domain(&url, allowed_domains)?;

        let html = self.fetch_html(&url, allowed_domains).await?;
        let records = parse_listings(&html, &self.selectors);

        let missing = records
            .iter()
            .filter(|r| r.name.is_none() || r.price.is_none())
            .count();
        if missing > 0 {
            tracing::debug!("{} listings are missing a name or price", missing);
        }

        Ok(records)
    }
}
