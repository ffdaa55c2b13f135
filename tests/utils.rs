#![allow(dead_code)]

use ndarray::Array2;

use reBN::network::{BayesianNetwork, Variable};
use reBN::tools::Dataset;

pub fn generate_binary_variable(label: &str) -> Variable {
    Variable::new(
        String::from(label),
        vec![String::from("no"), String::from("yes")],
    )
}

/// Two binary variables observed to always take the same value, ten rows.
pub fn copy_network() -> BayesianNetwork {
    BayesianNetwork::new(vec![
        generate_binary_variable("a"),
        generate_binary_variable("b"),
    ])
    .unwrap()
}

pub fn copy_dataset() -> Dataset {
    let mut values: Vec<usize> = Vec::new();
    for value in 0..2 {
        for _ in 0..5 {
            values.push(value);
            values.push(value);
        }
    }
    Dataset::new(Array2::from_shape_vec((10, 2), values).unwrap())
}

/// Three binary variables x, y, z with no edges; the paired dataset observes
/// two fair independent coins and their exclusive or, 25 rows per (x, y)
/// combination. z is marginally independent of both inputs, so only the full
/// collider x -> z <- y explains the data.
pub fn xor_network() -> BayesianNetwork {
    BayesianNetwork::new(vec![
        generate_binary_variable("x"),
        generate_binary_variable("y"),
        generate_binary_variable("z"),
    ])
    .unwrap()
}

/// The eight binary variables of the Asia network with its canonical arcs,
/// wired up through name lookups.
pub fn asia_network() -> BayesianNetwork {
    let variables = [
        "VisitToAsia",
        "Smoker",
        "Tuberculosis",
        "LungCancer",
        "Bronchitis",
        "TuberculosisOrCancer",
        "X-ray",
        "Dyspnea",
    ];
    let mut net = BayesianNetwork::new(
        variables
            .into_iter()
            .map(generate_binary_variable)
            .collect(),
    )
    .unwrap();

    let arcs = [
        ("VisitToAsia", "Tuberculosis"),
        ("Smoker", "LungCancer"),
        ("Smoker", "Bronchitis"),
        ("Tuberculosis", "TuberculosisOrCancer"),
        ("LungCancer", "TuberculosisOrCancer"),
        ("TuberculosisOrCancer", "X-ray"),
        ("TuberculosisOrCancer", "Dyspnea"),
        ("Bronchitis", "Dyspnea"),
    ];
    for (parent, child) in arcs {
        let parent = net.get_variable_index(parent).unwrap();
        let child = net.get_variable_index(child).unwrap();
        net.add_edge(parent, child).unwrap();
    }

    net
}

pub fn xor_dataset() -> Dataset {
    let mut values: Vec<usize> = Vec::new();
    for x in 0..2 {
        for y in 0..2 {
            for _ in 0..25 {
                values.push(x);
                values.push(y);
                values.push(x ^ y);
            }
        }
    }
    Dataset::new(Array2::from_shape_vec((100, 3), values).unwrap())
}
