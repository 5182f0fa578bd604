use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of historical market data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Option<Decimal>,
}

/// Price history sorted ascending by date; the most recent bar is the last
/// element. Construction owns the sort so downstream feature math can rely
/// on the ordering.
#[derive(Debug, Clone, Default)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn from_bars(mut bars: Vec<PriceBar>) -> Self {
        bars.sort_by_key(|b| b.date);
        Self { bars }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    /// Latest Close, the "current price" a prediction is normalized against.
    pub fn latest_close(&self) -> Option<Decimal> {
        self.bars.last().map(|b| b.close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn bar(date: &str, close: Decimal) -> PriceBar {
        PriceBar {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: None,
        }
    }

    #[test]
    fn test_from_bars_sorts_ascending_by_date() {
        let series = PriceSeries::from_bars(vec![
            bar("2024-01-03", dec!(103)),
            bar("2024-01-01", dec!(101)),
            bar("2024-01-02", dec!(102)),
        ]);
        let dates: Vec<NaiveDate> = series.bars().iter().map(|b| b.date).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
        assert_eq!(series.latest_close(), Some(dec!(103)));
    }

    #[test]
    fn test_empty_series() {
        let series = PriceSeries::from_bars(vec![]);
        assert!(series.is_empty());
        assert_eq!(series.latest_close(), None);
        assert!(series.last().is_none());
    }
}
