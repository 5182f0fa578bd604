pub mod csv;

pub use self::csv::CsvHistorySource;

use async_trait::async_trait;

use crate::error::PredictError;
use crate::types::{Instrument, PriceSeries};

/// Source of historical price bars for an instrument. Implementations read
/// fresh on every call; nothing is cached between requests, so a prediction
/// always reflects the latest file contents.
#[async_trait]
pub trait HistorySource: Send + Sync {
    async fn load(&self, instrument: Instrument) -> Result<PriceSeries, PredictError>;
}
