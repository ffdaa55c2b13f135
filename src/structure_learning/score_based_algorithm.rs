//! Module containing the score based search: the single-edge candidate
//! maximizers and the Hill Climbing algorithm.

use log::info;
use ndarray::prelude::*;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::network::BayesianNetwork;
use crate::structure_learning::score_function::{cached_call, ScoreCache, ScoreFunction};
use crate::structure_learning::{LearningError, StructureLearningAlgorithm};
use crate::tools::Dataset;

/// Score every variable under its current parent set.
///
/// The per-variable terms are independent, so they are computed on the rayon
/// pool; the collected order is the variable order, making the result
/// identical to a sequential evaluation. When a cache is given the freshly
/// computed scores are stored in it.
pub fn variable_scores<S: ScoreFunction>(
    score_function: &S,
    net: &BayesianNetwork,
    dataset: &Dataset,
    cache: Option<&mut ScoreCache>,
) -> Array1<f64> {
    let scores: Vec<f64> = net
        .get_variable_indices()
        .into_par_iter()
        .map(|node| score_function.call(net, node, &net.get_parent_set(node), dataset))
        .collect();

    if let Some(cache) = cache {
        for node in net.get_variable_indices() {
            let parent_key: Vec<usize> = net.get_parent_set(node).into_iter().collect();
            cache.insert(node, parent_key, scores[node]);
        }
    }

    Array1::from_vec(scores)
}

/// Find the edge addition yielding the largest score increase.
///
/// Scans children in ascending index order and, within each child, candidate
/// parents in ascending order; candidates that would close a cycle are
/// skipped, as are children whose parent set already has `max_parent_set`
/// members. Returns the increase and the winning `(parent, child)` arc, or
/// `None` when no addition improves the score strictly.
pub fn max_addition<S: ScoreFunction>(
    score_function: &S,
    net: &BayesianNetwork,
    dataset: &Dataset,
    scores: &Array1<f64>,
    max_parent_set: Option<usize>,
    mut cache: Option<&mut ScoreCache>,
) -> (f64, Option<(usize, usize)>) {
    let mut max_delta = 0.0;
    let mut max_edge = None;

    for child in net.get_variable_indices() {
        let parent_set = net.get_parent_set(child);
        if let Some(limit) = max_parent_set {
            if parent_set.len() >= limit {
                continue;
            }
        }
        for parent in net.get_non_parent_set(child) {
            //The cycle check also rejects self loops.
            if net.causes_cycle(parent, child, false) {
                continue;
            }

            let mut candidate = parent_set.clone();
            candidate.insert(parent);
            let delta = cached_call(
                score_function,
                net,
                child,
                &candidate,
                dataset,
                cache.as_deref_mut(),
            ) - scores[child];

            if delta > max_delta {
                max_delta = delta;
                max_edge = Some((parent, child));
            }
        }
    }

    (max_delta, max_edge)
}

/// Find the edge removal yielding the largest score increase.
///
/// Same scan order and tie-breaking as [`max_addition`]; every existing arc
/// is a candidate.
pub fn max_removal<S: ScoreFunction>(
    score_function: &S,
    net: &BayesianNetwork,
    dataset: &Dataset,
    scores: &Array1<f64>,
    mut cache: Option<&mut ScoreCache>,
) -> (f64, Option<(usize, usize)>) {
    let mut max_delta = 0.0;
    let mut max_edge = None;

    for child in net.get_variable_indices() {
        let parent_set = net.get_parent_set(child);
        for &parent in parent_set.iter() {
            let mut candidate = parent_set.clone();
            candidate.remove(&parent);
            let delta = cached_call(
                score_function,
                net,
                child,
                &candidate,
                dataset,
                cache.as_deref_mut(),
            ) - scores[child];

            if delta > max_delta {
                max_delta = delta;
                max_edge = Some((parent, child));
            }
        }
    }

    (max_delta, max_edge)
}

/// Find the edge reversal yielding the largest score increase.
///
/// For each existing arc `parent -> child` the candidate is the arc
/// `child -> parent`; it is skipped when reversing would close a cycle
/// through another path, or when the parent set of `parent` is already at
/// `max_parent_set`. The increase is the sum of two decomposable terms: the
/// old parent gains `child` as a parent and the old child loses `parent`.
/// Both components are returned alongside the winning arc so the caller can
/// update the two affected scores.
pub fn max_reversal<S: ScoreFunction>(
    score_function: &S,
    net: &BayesianNetwork,
    dataset: &Dataset,
    scores: &Array1<f64>,
    max_parent_set: Option<usize>,
    mut cache: Option<&mut ScoreCache>,
) -> (f64, Option<((usize, usize), (f64, f64))>) {
    let mut max_delta = 0.0;
    let mut max_edge = None;

    for child in net.get_variable_indices() {
        let parent_set = net.get_parent_set(child);
        for &parent in parent_set.iter() {
            if net.causes_cycle(child, parent, true) {
                continue;
            }
            let parent_parent_set = net.get_parent_set(parent);
            if let Some(limit) = max_parent_set {
                if parent_parent_set.len() >= limit {
                    continue;
                }
            }

            let mut parent_candidate = parent_parent_set;
            parent_candidate.insert(child);
            let delta_parent = cached_call(
                score_function,
                net,
                parent,
                &parent_candidate,
                dataset,
                cache.as_deref_mut(),
            ) - scores[parent];

            let mut child_candidate = parent_set.clone();
            child_candidate.remove(&parent);
            let delta_child = cached_call(
                score_function,
                net,
                child,
                &child_candidate,
                dataset,
                cache.as_deref_mut(),
            ) - scores[child];

            let delta = delta_parent + delta_child;
            if delta > max_delta {
                max_delta = delta;
                max_edge = Some(((parent, child), (delta_parent, delta_child)));
            }
        }
    }

    (max_delta, max_edge)
}

/// Hill Climbing functor
///
/// Greedy search over single edge modifications: at every round the best
/// scoring addition, removal or reversal is applied, until no modification
/// improves the score strictly. Because the score is decomposable, applying
/// a move only updates the score of the variables whose parent set changed.
///
/// # Arguments
///
/// * `score_function` - decomposable score driving the search.
/// * `max_parent_set` - optional bound on the size of the learned parent
///   sets.
///
/// # Example
///
/// ```rust
/// use ndarray::arr2;
/// use reBN::network::{BayesianNetwork, Variable};
/// use reBN::structure_learning::score_based_algorithm::HillClimbing;
/// use reBN::structure_learning::score_function::BIC;
/// use reBN::structure_learning::StructureLearningAlgorithm;
/// use reBN::tools::Dataset;
///
/// // Two binary variables observed to always take the same value.
/// let net = BayesianNetwork::new(vec![
///     Variable::new("a".to_string(), vec!["no".to_string(), "yes".to_string()]),
///     Variable::new("b".to_string(), vec!["no".to_string(), "yes".to_string()]),
/// ])
/// .unwrap();
///
/// let dataset = Dataset::new(arr2(&[[0, 0], [0, 0], [0, 0], [1, 1], [1, 1], [1, 1]]));
///
/// let hc = HillClimbing::new(BIC::new(), None);
/// let net = hc.fit_transform(net, &dataset).unwrap();
///
/// assert!(net.has_edge(1, 0));
/// ```
pub struct HillClimbing<S: ScoreFunction> {
    score_function: S,
    max_parent_set: Option<usize>,
}

impl<S: ScoreFunction> HillClimbing<S> {
    pub fn new(score_function: S, max_parent_set: Option<usize>) -> HillClimbing<S> {
        HillClimbing {
            score_function,
            max_parent_set,
        }
    }

    /// Run the search on `net` in place, starting from its current structure.
    ///
    /// Returns the total score improvement, `0.0` when the starting structure
    /// is already a local optimum. Pass `None` as `cache` to disable score
    /// memoization.
    pub fn climb(
        &self,
        net: &mut BayesianNetwork,
        dataset: &Dataset,
        mut cache: Option<&mut ScoreCache>,
    ) -> Result<f64, LearningError> {
        //Check the coherence between dataset and network
        if net.get_number_of_variables() != dataset.get_number_of_variables() {
            return Err(LearningError::ShapeMismatch {
                expected: net.get_number_of_variables(),
                actual: dataset.get_number_of_variables(),
            });
        }

        let mut scores = variable_scores(&self.score_function, net, dataset, cache.as_deref_mut());
        let initial_score = scores.sum();

        loop {
            let (addition_delta, addition) = max_addition(
                &self.score_function,
                net,
                dataset,
                &scores,
                self.max_parent_set,
                cache.as_deref_mut(),
            );
            let (removal_delta, removal) = max_removal(
                &self.score_function,
                net,
                dataset,
                &scores,
                cache.as_deref_mut(),
            );
            let (reversal_delta, reversal) = max_reversal(
                &self.score_function,
                net,
                dataset,
                &scores,
                self.max_parent_set,
                cache.as_deref_mut(),
            );

            //On equal deltas additions win over removals and removals over
            //reversals.
            if addition_delta >= removal_delta && addition_delta >= reversal_delta {
                match addition {
                    Some((parent, child)) => {
                        info!("adding edge {} -> {} (delta: {})", parent, child, addition_delta);
                        net.add_edge(parent, child)?;
                        scores[child] += addition_delta;
                    }
                    None => break,
                }
            } else if removal_delta >= reversal_delta {
                match removal {
                    Some((parent, child)) => {
                        info!("removing edge {} -> {} (delta: {})", parent, child, removal_delta);
                        net.remove_edge(parent, child);
                        scores[child] += removal_delta;
                    }
                    None => break,
                }
            } else {
                match reversal {
                    Some(((parent, child), (delta_parent, delta_child))) => {
                        info!("reversing edge {} -> {} (delta: {})", parent, child, reversal_delta);
                        net.remove_edge(parent, child);
                        net.add_edge(child, parent)?;
                        scores[parent] += delta_parent;
                        scores[child] += delta_child;
                    }
                    None => break,
                }
            }
        }

        Ok(scores.sum() - initial_score)
    }
}

impl<S: ScoreFunction> StructureLearningAlgorithm for HillClimbing<S> {
    fn fit_transform(
        &self,
        net: BayesianNetwork,
        dataset: &Dataset,
    ) -> Result<BayesianNetwork, LearningError> {
        //Make the network mutable.
        let mut net = net;
        //The cache lives for one invocation: its entries depend on the
        //dataset, so it cannot be shared across fits.
        let mut cache = ScoreCache::new(net.get_number_of_variables());
        self.climb(&mut net, dataset, Some(&mut cache))?;
        Ok(net)
    }
}
