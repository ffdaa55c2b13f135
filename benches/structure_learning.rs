#![allow(non_snake_case)]

use std::time::Duration;

use criterion::{criterion_group, criterion_main, Criterion};

use reBN::network::{BayesianNetwork, Variable};
use reBN::structure_learning::score_based_algorithm::HillClimbing;
use reBN::structure_learning::score_function::BIC;
use reBN::structure_learning::StructureLearningAlgorithm;
use reBN::tools::{uniform_dataset_generator, Dataset, UniformGraphGenerator};

fn uniform_graph_and_dataset() -> (BayesianNetwork, Dataset) {
    let nodes_cardinality = 10;
    let domain_cardinality = 3;
    let variables = (0..nodes_cardinality)
        .map(|node| {
            // Create the domain for a discrete variable
            let domain = (0..domain_cardinality).map(|value| value.to_string()).collect();
            Variable::new(node.to_string(), domain)
        })
        .collect();
    let mut net = BayesianNetwork::new(variables).unwrap();

    // Initialize the Graph Generator using the one with an
    // uniform distribution
    let mut structure_generator = UniformGraphGenerator::new(1.0 / 3.0, Some(7641630759785120));

    // Generate the graph directly on the network
    structure_generator.generate_graph(&mut net);

    let dataset = uniform_dataset_generator(&net, 500, Some(30230423));

    return (net, dataset);
}

fn structure_learning_HillClimbing(net: BayesianNetwork, dataset: &Dataset) {
    let hc = HillClimbing::new(BIC::new(), None);
    // Learn the structure of the network starting from the generated graph
    hc.fit_transform(net, dataset).unwrap();
}

pub fn criterion_benchmark_hill_climbing(c: &mut Criterion) {
    let mut group = c.benchmark_group("structure_learning_HillClimbing");
    // Configure Criterion.rs to detect smaller differences and increase sample size to improve
    // precision and counteract the resulting noise.
    group.sample_size(10).measurement_time(Duration::from_secs(20));
    group.bench_function("HillClimbing", move |b| {
        b.iter_batched(
            || uniform_graph_and_dataset(),
            |(net, dataset)| structure_learning_HillClimbing(net, &dataset),
            criterion::BatchSize::PerIteration,
        )
    });
    group.finish();
}

criterion_group!(benches, criterion_benchmark_hill_climbing);
criterion_main!(benches);
