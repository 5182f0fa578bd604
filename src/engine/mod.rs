use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::SignalSettings;
use crate::error::PredictError;
use crate::history::HistorySource;
use crate::ml::{prepare_features, ModelRegistry, MIN_BARS};
use crate::types::{Instrument, TradeSignal};

/// Engine output before any presentation rounding. `requested` echoes the
/// caller's name uppercased, which may be an alias rather than the
/// canonical symbol.
#[derive(Debug, Clone)]
pub struct Prediction {
    pub requested: String,
    pub instrument: Instrument,
    pub current_price: Decimal,
    pub predicted_return: f64,
    pub signal: TradeSignal,
    pub threshold: f64,
}

/// Runs the request pipeline: resolve the instrument, look up its model,
/// load history, build the feature row, invoke the model, normalize the
/// output, classify.
pub struct PredictionEngine {
    registry: Arc<ModelRegistry>,
    history: Arc<dyn HistorySource>,
    signals: SignalSettings,
}

impl PredictionEngine {
    pub fn new(
        registry: Arc<ModelRegistry>,
        history: Arc<dyn HistorySource>,
        signals: SignalSettings,
    ) -> Self {
        Self {
            registry,
            history,
            signals,
        }
    }

    pub async fn predict(&self, requested: &str) -> Result<Prediction, PredictError> {
        let requested = requested.to_uppercase();
        let instrument =
            Instrument::resolve(&requested).ok_or_else(|| PredictError::UnsupportedStock {
                requested: requested.clone(),
                supported: Instrument::supported_list(),
            })?;

        let entry =
            self.registry
                .model_for(instrument)
                .ok_or_else(|| PredictError::ModelFailure {
                    reason: format!("no model registered for {}", instrument),
                })?;

        let series = self.history.load(instrument).await?;
        let current_price = series
            .latest_close()
            .ok_or(PredictError::InsufficientHistory {
                rows: 0,
                min: MIN_BARS,
            })?;

        let row = prepare_features(&series, entry.width)?;
        let raw = entry.model.predict(&row.to_vector())?;

        let price: f64 = current_price.try_into().unwrap_or(0.0);
        let predicted_return = normalize_return(raw, price, self.signals.price_level_cutoff);
        if !predicted_return.is_finite() {
            return Err(PredictError::ModelFailure {
                reason: format!("normalized return is not finite (raw output {})", raw),
            });
        }

        let signal = generate_signal(predicted_return, self.signals.threshold);
        debug!(
            "{}: raw={:.6} return={:.6} price={} signal={}",
            instrument, raw, predicted_return, current_price, signal
        );

        Ok(Prediction {
            requested,
            instrument,
            current_price,
            predicted_return,
            signal,
            threshold: self.signals.threshold,
        })
    }
}

/// Models trained on price targets emit absolute levels rather than
/// fractional returns. Outputs beyond `cutoff` in magnitude are converted
/// to a return against the current price; everything else passes through
/// unchanged, so already-normalized values survive a second application.
pub fn normalize_return(raw: f64, current_price: f64, cutoff: f64) -> f64 {
    if raw.abs() > cutoff {
        (raw - current_price) / current_price
    } else {
        raw
    }
}

/// Classifies a normalized return. The threshold is exclusive on both
/// sides: a return at exactly the threshold stays NO TRADE.
pub fn generate_signal(predicted_return: f64, threshold: f64) -> TradeSignal {
    if predicted_return > threshold {
        TradeSignal::Buy
    } else if predicted_return < -threshold {
        TradeSignal::Sell
    } else {
        TradeSignal::NoTrade
    }
}
