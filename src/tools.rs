//! Contains commonly used methods used across the crate.

use std::path::Path;

use ndarray::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use crate::network::BayesianNetwork;

/// Error types for the loader
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("variable {0} does not appear in the header")]
    MissingVariable(String),
    #[error("value {value} is outside the domain of variable {variable}")]
    InvalidValue { variable: String, value: String },
    #[error("data row {0} is empty")]
    EmptyRow(usize),
}

/// A fully observed sample matrix: one row per observation, one column per
/// network variable, each entry the value index of the observed category.
///
/// Row order carries no meaning; every score computed from a dataset is
/// invariant under row permutation.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    samples: Array2<usize>,
}

impl Dataset {
    pub fn new(samples: Array2<usize>) -> Dataset {
        Dataset { samples }
    }

    pub fn get_samples(&self) -> &Array2<usize> {
        &self.samples
    }

    pub fn get_number_of_samples(&self) -> usize {
        self.samples.nrows()
    }

    pub fn get_number_of_variables(&self) -> usize {
        self.samples.ncols()
    }
}

/// Load a CSV file into a [`Dataset`] using the variable order and value
/// indices of `net`.
///
/// The file must carry a header row naming the variables; columns may appear
/// in any order and extra columns are ignored. Every cell of a used column
/// must be a member of the declared domain of its variable, otherwise the
/// loader fails with [`LoaderError::InvalidValue`]. Empty rows are not
/// permitted: a record whose fields are all empty fails with
/// [`LoaderError::EmptyRow`].
pub fn load_discrete<P: AsRef<Path>>(
    path: P,
    net: &BayesianNetwork,
) -> Result<Dataset, LoaderError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();

    //Locate the column of each network variable inside the file.
    let columns = net
        .get_variable_indices()
        .map(|node| {
            let label = net.get_variable(node).get_label();
            headers
                .iter()
                .position(|header| header == label)
                .ok_or_else(|| LoaderError::MissingVariable(label.to_string()))
        })
        .collect::<Result<Vec<usize>, LoaderError>>()?;

    let mut values: Vec<usize> = Vec::new();
    let mut n_samples = 0;
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|cell| cell.is_empty()) {
            return Err(LoaderError::EmptyRow(n_samples + 1));
        }
        for (node, &column) in columns.iter().enumerate() {
            let variable = net.get_variable(node);
            let value = &record[column];
            let value_index =
                variable
                    .value_index(value)
                    .ok_or_else(|| LoaderError::InvalidValue {
                        variable: variable.get_label().to_string(),
                        value: value.to_string(),
                    })?;
            values.push(value_index);
        }
        n_samples += 1;
    }

    let samples =
        Array2::from_shape_vec((n_samples, net.get_number_of_variables()), values).unwrap();
    Ok(Dataset::new(samples))
}

/// Generate a random DAG over the variables of a network.
///
/// Every arc compatible with the variable order (lower index towards higher
/// index) is drawn independently with probability `density`, so the
/// generated graph is acyclic by construction.
pub struct UniformGraphGenerator {
    density: f64,
    rng: ChaCha8Rng,
}

impl UniformGraphGenerator {
    pub fn new(density: f64, seed: Option<u64>) -> UniformGraphGenerator {
        //Density is a probability
        if !(0.0..=1.0).contains(&density) {
            panic!("density must be in [0.0, 1.0]");
        }
        let rng: ChaCha8Rng = match seed {
            //If a seed is present use it to initialize the random generator.
            Some(seed) => SeedableRng::seed_from_u64(seed),
            //Otherwise create a new random generator using the method `from_entropy`
            None => SeedableRng::from_entropy(),
        };
        UniformGraphGenerator { density, rng }
    }

    pub fn generate_graph(&mut self, net: &mut BayesianNetwork) {
        for child in net.get_variable_indices() {
            for parent in 0..child {
                if self.rng.gen_bool(self.density) {
                    //parent < child, so the arc cannot close a cycle
                    net.add_edge(parent, child).unwrap();
                }
            }
        }
    }
}

/// Generate a dataset drawing every entry uniformly from the domain of its
/// variable, independently of the graph structure. Mainly useful for
/// benchmarks and tests.
pub fn uniform_dataset_generator(
    net: &BayesianNetwork,
    n_samples: usize,
    seed: Option<u64>,
) -> Dataset {
    let mut rng: ChaCha8Rng = match seed {
        //If a seed is present use it to initialize the random generator.
        Some(seed) => SeedableRng::seed_from_u64(seed),
        //Otherwise create a new random generator using the method `from_entropy`
        None => SeedableRng::from_entropy(),
    };

    let mut samples: Array2<usize> =
        Array::zeros((n_samples, net.get_number_of_variables()));
    for row in 0..n_samples {
        for node in net.get_variable_indices() {
            samples[[row, node]] = rng.gen_range(0..net.get_variable(node).get_cardinality());
        }
    }

    Dataset::new(samples)
}
