//! Representations of discrete Bayesian networks and their random variables.

use std::collections::{BTreeSet, VecDeque};
use std::fmt;

use itertools::Itertools;
use ndarray::prelude::*;
use thiserror::Error;

/// Error types for the network
#[derive(Error, Debug, PartialEq, Eq)]
pub enum NetworkError {
    #[error("edge {0} -> {1} would introduce a cycle")]
    InvalidEdge(usize, usize),
    #[error("unknown variable {0}")]
    UnknownVariable(String),
    #[error("variable {0} is declared more than once")]
    DuplicateVariable(String),
}

/// A discrete random variable described by its label and an ordered domain.
///
/// The position of a value inside the domain is its **value index**, the
/// integer a [`Dataset`](crate::tools::Dataset) column stores in place of the
/// label. A variable is a plain immutable descriptor; all graph queries go
/// through the [`BayesianNetwork`] it belongs to, keyed by variable index.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Variable {
    label: String,
    domain: Vec<String>,
}

impl Variable {
    pub fn new(label: String, domain: Vec<String>) -> Variable {
        Variable { label, domain }
    }

    /// Return a reference to the associated label.
    pub fn get_label(&self) -> &str {
        &self.label
    }

    /// The ordered set of values the variable can take.
    pub fn get_domain(&self) -> &[String] {
        &self.domain
    }

    /// Number of values in the domain.
    pub fn get_cardinality(&self) -> usize {
        self.domain.len()
    }

    /// Position of `value` inside the domain, `None` when the value does not
    /// belong to it.
    pub fn value_index(&self, value: &str) -> Option<usize> {
        self.domain.iter().position(|v| v == value)
    }
}

/// A directed acyclic graph over a fixed, ordered tuple of [`Variable`]s.
///
/// Edges are stored as an adjacency matrix with one row per child:
/// `adj_matrix[[child, parent]]` is true iff `parent` belongs to the parent
/// set of `child`. The variable tuple is fixed at construction; the graph is
/// only mutated through [`add_edge`](Self::add_edge) and
/// [`remove_edge`](Self::remove_edge), which keep it acyclic at all times.
///
/// # Example
///
/// ```rust
/// use reBN::network::{BayesianNetwork, Variable};
///
/// let mut net = BayesianNetwork::new(vec![
///     Variable::new("A".to_string(), vec!["no".to_string(), "yes".to_string()]),
///     Variable::new("B".to_string(), vec!["no".to_string(), "yes".to_string()]),
///     Variable::new("C".to_string(), vec!["no".to_string(), "yes".to_string()]),
/// ])
/// .unwrap();
///
/// net.add_edge(0, 1).unwrap();
/// net.add_edge(0, 2).unwrap();
/// net.add_edge(1, 2).unwrap();
///
/// // The reverse of an existing arc closes a cycle.
/// assert!(net.add_edge(2, 0).is_err());
/// assert_eq!("[A][B|A][C|A:B]", net.to_string());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct BayesianNetwork {
    variables: Vec<Variable>,
    adj_matrix: Array2<bool>,
}

impl BayesianNetwork {
    /// Build a network over `variables` with every parent set empty.
    ///
    /// Labels must be unique within a network.
    pub fn new(variables: Vec<Variable>) -> Result<BayesianNetwork, NetworkError> {
        let mut seen = BTreeSet::new();
        for variable in &variables {
            if !seen.insert(variable.get_label()) {
                return Err(NetworkError::DuplicateVariable(
                    variable.get_label().to_string(),
                ));
            }
        }

        let n = variables.len();
        Ok(BayesianNetwork {
            variables,
            adj_matrix: Array2::from_elem((n, n), false),
        })
    }

    /// Get the number of variables contained in the network.
    pub fn get_number_of_variables(&self) -> usize {
        self.variables.len()
    }

    /// Get all the indices of the variables contained inside the network.
    pub fn get_variable_indices(&self) -> std::ops::Range<usize> {
        0..self.variables.len()
    }

    pub fn get_variable(&self, node: usize) -> &Variable {
        &self.variables[node]
    }

    /// Index of the variable labelled `label`.
    pub fn get_variable_index(&self, label: &str) -> Result<usize, NetworkError> {
        self.variables
            .iter()
            .position(|v| v.get_label() == label)
            .ok_or_else(|| NetworkError::UnknownVariable(label.to_string()))
    }

    /// True iff the arc `parent -> child` is present.
    pub fn has_edge(&self, parent: usize, child: usize) -> bool {
        self.adj_matrix[[child, parent]]
    }

    /// Add the arc `parent -> child`.
    ///
    /// Fails with [`NetworkError::InvalidEdge`] when `parent == child` or the
    /// arc would close a directed cycle. Adding an arc that is already
    /// present succeeds and leaves the graph unchanged.
    pub fn add_edge(&mut self, parent: usize, child: usize) -> Result<(), NetworkError> {
        if self.causes_cycle(parent, child, false) {
            return Err(NetworkError::InvalidEdge(parent, child));
        }

        self.adj_matrix[[child, parent]] = true;
        Ok(())
    }

    /// Remove the arc `parent -> child`. Removing an absent arc is a no-op.
    pub fn remove_edge(&mut self, parent: usize, child: usize) {
        self.adj_matrix[[child, parent]] = false;
    }

    /// Return whether adding the arc `parent -> child` would close a cycle.
    ///
    /// True iff `parent == child` or a directed path from `child` to `parent`
    /// already exists. The test walks the ancestors of `parent` breadth-first
    /// and looks for `child` among them.
    ///
    /// When `reversal` is true an existing arc `child -> parent` is ignored
    /// during the walk: the answer then tells whether that arc can be
    /// reversed into `parent -> child`.
    pub fn causes_cycle(&self, parent: usize, child: usize, reversal: bool) -> bool {
        if parent == child {
            return true;
        }

        let mut current = VecDeque::from(vec![parent]);
        let mut visited = BTreeSet::from([parent]);

        while let Some(node) = current.pop_front() {
            for ancestor in self.get_parent_set(node) {
                if reversal && node == parent && ancestor == child {
                    // The arc under reversal is about to be deleted.
                    continue;
                }
                if ancestor == child {
                    return true;
                }
                if visited.insert(ancestor) {
                    current.push_back(ancestor);
                }
            }
        }

        false
    }

    /// Get the **parent set** of a given variable.
    pub fn get_parent_set(&self, node: usize) -> BTreeSet<usize> {
        self.adj_matrix
            .row(node)
            .iter()
            .enumerate()
            .filter_map(|(idx, &is_parent)| if is_parent { Some(idx) } else { None })
            .collect()
    }

    /// Get the **children set** of a given variable.
    pub fn get_children_set(&self, node: usize) -> BTreeSet<usize> {
        self.adj_matrix
            .column(node)
            .iter()
            .enumerate()
            .filter_map(|(idx, &is_child)| if is_child { Some(idx) } else { None })
            .collect()
    }

    /// Every variable that is neither `node` itself nor one of its parents.
    pub fn get_non_parent_set(&self, node: usize) -> BTreeSet<usize> {
        self.adj_matrix
            .row(node)
            .iter()
            .enumerate()
            .filter_map(|(idx, &is_parent)| {
                if !is_parent && idx != node {
                    Some(idx)
                } else {
                    None
                }
            })
            .collect()
    }

    /// Degrees of freedom of the conditional probability table of `node`
    /// under `parent_set`: `(card(node) - 1) * prod(card(parent))`.
    pub fn dimension(&self, node: usize, parent_set: &BTreeSet<usize>) -> usize {
        let parent_configurations: usize = parent_set
            .iter()
            .map(|&parent| self.variables[parent].get_cardinality())
            .product();
        (self.variables[node].get_cardinality() - 1) * parent_configurations
    }

    /// Sum of the dimensions of all variables under the current parent sets.
    pub fn get_dimension(&self) -> usize {
        self.get_variable_indices()
            .map(|node| self.dimension(node, &self.get_parent_set(node)))
            .sum()
    }
}

/// The `bnlearn` textual form of the structure: `[A][B|A][C|A:B]`, with
/// parents listed in variable-index order.
impl fmt::Display for BayesianNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in self.get_variable_indices() {
            let parent_set = self.get_parent_set(node);
            if parent_set.is_empty() {
                write!(f, "[{}]", self.variables[node].get_label())?;
            } else {
                write!(
                    f,
                    "[{}|{}]",
                    self.variables[node].get_label(),
                    parent_set
                        .iter()
                        .map(|&parent| self.variables[parent].get_label())
                        .join(":")
                )?;
            }
        }
        Ok(())
    }
}
