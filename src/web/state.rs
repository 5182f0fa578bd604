use std::sync::Arc;

use crate::engine::PredictionEngine;

/// Combined application state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<PredictionEngine>,
}

impl AppState {
    pub fn new(engine: Arc<PredictionEngine>) -> Self {
        Self { engine }
    }
}
