//! Learn the structure of the network.

pub mod score_based_algorithm;
pub mod score_function;

use thiserror::Error;

use crate::network::{BayesianNetwork, NetworkError};
use crate::tools::Dataset;

/// Error types for the structure learning task
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LearningError {
    #[error("dataset has {actual} variables but the network has {expected}")]
    ShapeMismatch { expected: usize, actual: usize },
    #[error(transparent)]
    Network(#[from] NetworkError),
}

pub trait StructureLearningAlgorithm {
    fn fit_transform(
        &self,
        net: BayesianNetwork,
        dataset: &Dataset,
    ) -> Result<BayesianNetwork, LearningError>;
}
