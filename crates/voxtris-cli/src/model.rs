use serde::{Deserialize, Serialize};
use voxtris_evaluator::WeightVector;

/// JSON export of a training run: the trained weights plus enough
/// metadata to tell runs apart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct TrainedModel {
    pub(crate) name: String,
    pub(crate) variant: String,
    pub(crate) trained_at: String,
    pub(crate) generations: usize,
    pub(crate) fitness: u64,
    pub(crate) weights: WeightVector,
}

impl TrainedModel {
    pub(crate) fn new(
        name: String,
        variant: String,
        generations: usize,
        fitness: u64,
        weights: WeightVector,
    ) -> Self {
        Self {
            name,
            variant,
            trained_at: chrono::Local::now().to_rfc3339(),
            generations,
            fitness,
            weights,
        }
    }
}
