//! Module containing the score functions for structure learning, their
//! sufficient statistics and the score memoization cache.

use std::collections::{BTreeSet, HashMap};

use ndarray::prelude::*;

use crate::network::BayesianNetwork;
use crate::structure_learning::LearningError;
use crate::tools::Dataset;

/// Count the joint occurrences of `node` with a configuration of
/// `parent_set` over the dataset.
///
/// The result has one row per configuration of the parent set and one column
/// per value of `node`; the row index of a configuration is its mixed-radix
/// encoding over the parent cardinalities (the lowest parent index is the
/// fastest-varying digit). Marginal counts of a parent configuration are the
/// row sums. Configurations that never occur stay zero.
pub fn sufficient_statistics(
    net: &BayesianNetwork,
    dataset: &Dataset,
    node: usize,
    parent_set: &BTreeSet<usize>,
) -> Array2<usize> {
    //Get the number of values assumable by the node
    let node_domain = net.get_variable(node).get_cardinality();

    //Get the number of values assumable by each parent of the node
    let parentset_domain: Vec<usize> = parent_set
        .iter()
        .map(|&parent| net.get_variable(parent).get_cardinality())
        .collect();

    //Vector used to convert a specific configuration of the parent_set to the
    //corresponding row of the counts matrix
    let mut vector_to_idx: Array1<usize> = Array::zeros(net.get_number_of_variables());

    parent_set
        .iter()
        .zip(parentset_domain.iter())
        .fold(1, |acc, (&idx, &card)| {
            vector_to_idx[idx] = acc;
            acc * card
        });

    let mut counts: Array2<usize> =
        Array::zeros((parentset_domain.iter().product(), node_domain));

    for row in dataset.get_samples().rows() {
        counts[[vector_to_idx.dot(&row), row[node]]] += 1;
    }

    counts
}

/// A decomposable score: the network score is the sum over the variables of
/// [`call`](Self::call), each term depending only on the variable, its parent
/// set and the data.
pub trait ScoreFunction: Sync {
    /// Score of `node` under `parent_set`.
    ///
    /// The dataset must have one column per network variable; the public
    /// entry points ([`call_network`](Self::call_network) and the hill
    /// climber) validate this before scoring.
    fn call(
        &self,
        net: &BayesianNetwork,
        node: usize,
        parent_set: &BTreeSet<usize>,
        dataset: &Dataset,
    ) -> f64;

    /// Score of the whole network under its current parent sets.
    fn call_network(
        &self,
        net: &BayesianNetwork,
        dataset: &Dataset,
    ) -> Result<f64, LearningError> {
        if net.get_number_of_variables() != dataset.get_number_of_variables() {
            return Err(LearningError::ShapeMismatch {
                expected: net.get_number_of_variables(),
                actual: dataset.get_number_of_variables(),
            });
        }

        Ok(net
            .get_variable_indices()
            .map(|node| self.call(net, node, &net.get_parent_set(node), dataset))
            .sum())
    }
}

/// Multinomial log-likelihood of a variable given its parent set:
/// `sum over observed (x, u) of N(x, u) * ln(N(x, u) / N(u))`.
pub struct LogLikelihood {}

impl LogLikelihood {
    pub fn new() -> LogLikelihood {
        LogLikelihood {}
    }

    fn compute_score(
        &self,
        net: &BayesianNetwork,
        node: usize,
        parent_set: &BTreeSet<usize>,
        dataset: &Dataset,
    ) -> f64 {
        let counts = sufficient_statistics(net, dataset, node, parent_set);

        //Summation runs row major over the counts so repeated evaluations of
        //the same family are bit-identical.
        counts
            .outer_iter()
            .map(|configuration| {
                let marginal = configuration.sum();
                configuration
                    .iter()
                    .filter(|&&count| count > 0)
                    .map(|&count| count as f64 * (count as f64 / marginal as f64).ln())
                    .sum::<f64>()
            })
            .sum()
    }
}

impl ScoreFunction for LogLikelihood {
    fn call(
        &self,
        net: &BayesianNetwork,
        node: usize,
        parent_set: &BTreeSet<usize>,
        dataset: &Dataset,
    ) -> f64 {
        self.compute_score(net, node, parent_set, dataset)
    }
}

/// Bayesian Information Criterion:
/// `LL(node, parents) - 0.5 * ln(N) * dimension(node, parents)`.
///
/// Higher is better; the score is bounded above by zero, which guarantees
/// that a greedy search accepting only strict improvements terminates.
pub struct BIC {
    ll: LogLikelihood,
}

impl BIC {
    pub fn new() -> BIC {
        BIC {
            ll: LogLikelihood::new(),
        }
    }
}

impl ScoreFunction for BIC {
    fn call(
        &self,
        net: &BayesianNetwork,
        node: usize,
        parent_set: &BTreeSet<usize>,
        dataset: &Dataset,
    ) -> f64 {
        let ll = self.ll.compute_score(net, node, parent_set, dataset);
        let penalty = net.dimension(node, parent_set) as f64;
        ll - f64::ln(dataset.get_number_of_samples() as f64) / 2.0 * penalty
    }
}

/// Memoization of per-variable scores, keyed by (variable, sorted parent
/// tuple).
///
/// Entries are pure functions of the key and the dataset, so the cache is
/// never invalidated; it must not be reused across datasets. Memory grows
/// with the number of distinct parent sets ever scored; callers that fear
/// unbounded growth can pass `None` wherever a cache is accepted.
pub struct ScoreCache {
    entries: Vec<HashMap<Vec<usize>, f64>>,
}

impl ScoreCache {
    pub fn new(number_of_variables: usize) -> ScoreCache {
        ScoreCache {
            entries: vec![HashMap::new(); number_of_variables],
        }
    }

    pub fn get(&self, node: usize, parent_key: &[usize]) -> Option<f64> {
        self.entries[node].get(parent_key).copied()
    }

    pub fn insert(&mut self, node: usize, parent_key: Vec<usize>, score: f64) {
        self.entries[node].insert(parent_key, score);
    }
}

/// Score `node` under `parent_set`, consulting `cache` when one is given.
///
/// The cache key is the sorted parent tuple, which a `BTreeSet` yields by
/// construction, so the result is invariant under the order the parent set
/// was assembled in.
pub fn cached_call<S: ScoreFunction>(
    score_function: &S,
    net: &BayesianNetwork,
    node: usize,
    parent_set: &BTreeSet<usize>,
    dataset: &Dataset,
    cache: Option<&mut ScoreCache>,
) -> f64 {
    match cache {
        Some(cache) => {
            let parent_key: Vec<usize> = parent_set.iter().copied().collect();
            if let Some(score) = cache.get(node, &parent_key) {
                return score;
            }
            let score = score_function.call(net, node, parent_set, dataset);
            cache.insert(node, parent_key, score);
            score
        }
        None => score_function.call(net, node, parent_set, dataset),
    }
}
