use serde::{Deserialize, Serialize};
use std::fmt;

/// 頁面上每個商品容器對應一筆，欄位可能缺少
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub name: Option<String>,
    pub price: Option<String>,
}

impl RawRecord {
    pub fn new(name: Option<&str>, price: Option<&str>) -> Self {
        Self {
            name: name.map(str::to_string),
            price: price.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanedRecord {
    pub name: String,
    pub price: i64,
}

/// 清理後的價格，依原始頁面順序
pub type PriceSeries = Vec<i64>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanOutcome {
    pub records: Vec<CleanedRecord>,
    pub prices: PriceSeries,
    /// 無法解析而被略過的列數，只用於診斷
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    /// Equal-width bins spanning `[min, max]`; the last bin is closed on the right.
    pub fn from_prices(prices: &[i64], bin_count: usize) -> Self {
        let (Some(&min), Some(&max)) = (prices.iter().min(), prices.iter().max()) else {
            return Self::default();
        };
        if bin_count == 0 {
            return Self::default();
        }

        let (lower, upper) = if min == max {
            (min as f64 - 0.5, max as f64 + 0.5)
        } else {
            (min as f64, max as f64)
        };
        let width = (upper - lower) / bin_count as f64;

        let mut counts = vec![0usize; bin_count];
        for &price in prices {
            let index = ((price as f64 - lower) / width) as usize;
            counts[index.min(bin_count - 1)] += 1;
        }

        let bins = counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                lower: lower + width * i as f64,
                upper: if i + 1 == bin_count {
                    upper
                } else {
                    lower + width * (i + 1) as f64
                },
                count,
            })
            .collect();

        Self { bins }
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn lower(&self) -> f64 {
        self.bins.first().map(|b| b.lower).unwrap_or(0.0)
    }

    pub fn upper(&self) -> f64 {
        self.bins.last().map(|b| b.upper).unwrap_or(0.0)
    }

    pub fn max_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceReport {
    pub mean: f64,
    pub count: usize,
    pub currency_unit: String,
    pub histogram: Histogram,
    /// 匯出的圖檔路徑（相對於輸出目錄），終端顯示時為 None
    pub chart_path: Option<String>,
}

impl fmt::Display for PriceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Average price: {:.2} {}", self.mean, self.currency_unit)
    }
}
