pub mod cleaner;
pub mod etl;
pub mod extractor;
pub mod pipeline;
pub mod reporter;

#[cfg(test)]
pub(crate) mod test_support;

pub use crate::domain::model::{
    CleanOutcome, CleanedRecord, Histogram, HistogramBin, PriceReport, PriceSeries, RawRecord,
};
pub use crate::domain::ports::{ConfigProvider, ListingSource, Pipeline, Storage};
pub use crate::utils::error::Result;
