use crate::core::{CleanOutcome, CleanedRecord, RawRecord, Storage};
use crate::core::extractor::RAW_HEADER;
use crate::utils::error::{EtlError, Result};

pub const DEFAULT_PRICE_SUFFIX: &str = "₽/мес.";

/// 移除價格單位後綴以及所有空白字元（包含不換行空格）
pub fn normalize_price(raw: &str, suffix: &str) -> String {
    let without_suffix = if suffix.is_empty() {
        raw.to_string()
    } else {
        raw.replace(suffix, "")
    };
    without_suffix.chars().filter(|c| !c.is_whitespace()).collect()
}

pub fn parse_price(raw: &str, suffix: &str) -> Option<i64> {
    normalize_price(raw, suffix).parse::<i64>().ok()
}

#[derive(Debug, Clone)]
pub struct Cleaner {
    price_suffix: String,
}

impl Cleaner {
    pub fn new(price_suffix: impl Into<String>) -> Self {
        Self {
            price_suffix: price_suffix.into(),
        }
    }

    /// Reads `raw_path`, writes the cleaned CSV to `clean_path` and returns the valid prices.
    pub async fn process<S: Storage>(
        &self,
        storage: &S,
        raw_path: &str,
        clean_path: &str,
    ) -> Result<CleanOutcome> {
        let raw = storage.read_file(raw_path).await?;
        let (outcome, cleaned_csv) = self.clean(&raw)?;

        storage.write_file(clean_path, &cleaned_csv).await?;
        tracing::debug!(
            "Wrote {} cleaned rows to {} ({} skipped)",
            outcome.records.len(),
            clean_path,
            outcome.skipped
        );

        Ok(outcome)
    }

    /// 清理原始 CSV 位元組，回傳結果與清理後的 CSV
    pub fn clean(&self, raw_csv: &[u8]) -> Result<(CleanOutcome, Vec<u8>)> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(raw_csv);
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        writer.write_record(RAW_HEADER)?;

        let mut outcome = CleanOutcome::default();
        for (line, row) in reader.deserialize::<RawRecord>().enumerate() {
            let raw = match row {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::debug!("Skipping undecodable raw row {}: {}", line + 1, e);
                    outcome.skipped += 1;
                    continue;
                }
            };

            let Some(price) = raw
                .price
                .as_deref()
                .and_then(|p| parse_price(p, &self.price_suffix))
            else {
                outcome.skipped += 1;
                continue;
            };

            let record = CleanedRecord {
                name: raw.name.unwrap_or_default(),
                price,
            };
            writer.serialize(&record)?;
            outcome.prices.push(price);
            outcome.records.push(record);
        }

        let cleaned_csv = writer
            .into_inner()
            .map_err(|e| EtlError::IoError(e.into_error()))?;

        Ok((outcome, cleaned_csv))
    }
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::new(DEFAULT_PRICE_SUFFIX)
    }
}
