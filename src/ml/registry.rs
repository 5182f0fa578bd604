use std::collections::HashMap;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tracing::info;

use crate::types::Instrument;

use super::model::{FeatureWidth, LinearModel, ModelEntry, ModelFile};

/// A loaded, resolved model for one instrument.
#[derive(Debug, Clone)]
pub struct InstrumentModel {
    pub width: FeatureWidth,
    pub model: LinearModel,
    /// Which stored weights were selected: "single" or the candidate name.
    pub source: String,
}

/// Per-instrument models, built once at startup and shared read-only
/// across request handlers. Never mutated after construction.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: HashMap<Instrument, InstrumentModel>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, instrument: Instrument, model: InstrumentModel) {
        self.models.insert(instrument, model);
    }

    /// Loads one model file per catalog instrument from `models_dir`,
    /// failing if any file is missing, malformed, or resolves to no usable
    /// weights, so requests never see a partial registry.
    pub fn load(models_dir: &Path) -> Result<Self> {
        let mut registry = Self::new();
        for instrument in Instrument::all() {
            let path = models_dir.join(instrument.model_file());
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read model file {}", path.display()))?;
            let file: ModelFile = serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse model file {}", path.display()))?;
            let width = file.feature_count;
            let (model, source) = resolve_entry(file.entry, width)
                .with_context(|| format!("unusable model file {}", path.display()))?;
            info!(
                "Loaded model for {} ({} inputs, weights: {})",
                instrument,
                width.count(),
                source
            );
            registry.register(instrument, InstrumentModel { width, model, source });
        }
        Ok(registry)
    }

    pub fn model_for(&self, instrument: Instrument) -> Option<&InstrumentModel> {
        self.models.get(&instrument)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

/// Selection policy for stored weights: a single entry must match the
/// declared width exactly; a candidate collection is scanned in stored
/// order and the first set whose coefficient count matches wins.
fn resolve_entry(entry: ModelEntry, width: FeatureWidth) -> Result<(LinearModel, String)> {
    match entry {
        ModelEntry::Single {
            coefficients,
            intercept,
        } => {
            if coefficients.len() != width.count() {
                return Err(anyhow!(
                    "declared feature_count {} but weights have {} coefficients",
                    width.count(),
                    coefficients.len()
                ));
            }
            Ok((LinearModel::new(coefficients, intercept), "single".to_string()))
        }
        ModelEntry::Candidates { models } => {
            let total = models.len();
            for named in models {
                if named.coefficients.len() == width.count() {
                    return Ok((
                        LinearModel::new(named.coefficients, named.intercept),
                        named.name,
                    ));
                }
            }
            Err(anyhow!(
                "none of the {} candidates matches feature_count {}",
                total,
                width.count()
            ))
        }
    }
}
