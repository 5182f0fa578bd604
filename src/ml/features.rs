use ndarray::Array1;
use rust_decimal::Decimal;

use crate::error::PredictError;
use crate::types::PriceSeries;

use super::FeatureWidth;

/// Fewest bars that make every field of the served row derivable: the row
/// holds the features of the second-to-last bar, whose trend flag needs
/// two closes before it.
pub const MIN_BARS: usize = 4;

/// Derived signals for one day, the model's input.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub daily_return: f64,
    pub gap: f64,
    pub high_low_range: f64,
    pub prev_day_trend: f64,
    pub volume: Option<f64>,
}

impl FeatureRow {
    /// Fixed-order vector handed to the model.
    pub fn to_vector(&self) -> Array1<f64> {
        let mut values = vec![
            self.daily_return,
            self.gap,
            self.high_low_range,
            self.prev_day_trend,
        ];
        if let Some(v) = self.volume {
            values.push(v);
        }
        Array1::from(values)
    }
}

/// Derives the single feature row used to predict the next unseen period.
///
/// Conceptually: compute the lagged feature columns over the whole series,
/// shift the table forward one position so "today" carries only values
/// known as of yesterday's close, drop incomplete rows and keep the last.
/// For a sorted series of n bars the surviving row holds the features
/// computed at bar n-2, so only those indices are touched here.
pub fn prepare_features(
    series: &PriceSeries,
    width: FeatureWidth,
) -> Result<FeatureRow, PredictError> {
    let bars = series.bars();
    let n = bars.len();
    if n < MIN_BARS {
        return Err(PredictError::InsufficientHistory {
            rows: n,
            min: MIN_BARS,
        });
    }

    let feat = &bars[n - 2];
    let prev = &bars[n - 3];
    let prev2 = &bars[n - 4];

    let daily_return = to_f64(feat.close - prev.close);
    let gap = to_f64(feat.open - prev.close);
    let high_low_range = to_f64(feat.high - feat.low);
    let prev_day_trend = if prev.close > prev2.close { 1.0 } else { 0.0 };

    let volume = if width.includes_volume() {
        match feat.volume {
            Some(v) => Some(to_f64(v)),
            None => {
                return Err(PredictError::MissingVolume {
                    expected: width.count(),
                })
            }
        }
    } else {
        None
    };

    Ok(FeatureRow {
        daily_return,
        gap,
        high_low_range,
        prev_day_trend,
        volume,
    })
}

fn to_f64(value: Decimal) -> f64 {
    value.try_into().unwrap_or(0.0)
}
