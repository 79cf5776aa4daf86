use biotope_lib::model::brain::{NetworkLogic, Node};
use biotope_lib::model::config::AppConfig;
use biotope_lib::model::state::{
    Connection, CreatureAction, CreatureInput, NeuralNetwork, NodeType,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;

prop_compose! {
    fn arb_node()(kind in 0..3u8, tag in 0..16usize, bias in -1.0f32..1.0f32) -> Node {
        match kind {
            0 => Node::input(CreatureInput::ALL[tag]),
            1 => Node::process(bias),
            _ => Node::output(CreatureAction::ALL[tag % CreatureAction::ALL.len()], bias),
        }
    }
}

prop_compose! {
    // Arbitrary endpoints, cycles and self loops included; every id exists.
    fn arb_network(max_nodes: usize, max_conns: usize)(
        nodes in prop::collection::vec(arb_node(), 1..max_nodes)
    )(
        connections in prop::collection::vec(
            (0..nodes.len(), 0..nodes.len(), -4.0f32..4.0f32),
            0..max_conns,
        ),
        nodes in Just(nodes),
    ) -> NeuralNetwork {
        let mut net = NeuralNetwork::new();
        for node in nodes {
            net.add_node(node);
        }
        net.connections = connections
            .into_iter()
            .map(|(source, target, weight)| Connection { source, target, weight })
            .collect();
        net
    }
}

proptest! {
    #[test]
    fn evaluate_never_fails_on_well_formed_networks(
        net in arb_network(20, 60),
        value in -1.0f32..1.0f32,
        default in 0.0f32..1.0f32,
    ) {
        let inputs: HashMap<CreatureInput, f32> =
            CreatureInput::ALL.iter().map(|&t| (t, value)).collect();
        let values = net.evaluate(&inputs, default).unwrap();
        for (id, v) in &values {
            prop_assert!(v.is_finite());
            if net.nodes[id].node_type != NodeType::Input {
                prop_assert!(*v >= 0.0);
            }
        }
        for id in net.ids_of_type(NodeType::Output) {
            prop_assert!(values.contains_key(&id));
        }
    }

    #[test]
    fn generated_connections_obey_count_and_bound(
        seed in any::<u64>(),
        min in 0usize..10,
        extra in 0usize..10,
        bound in 0.1f32..5.0f32,
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let net = NeuralNetwork::new_random_with_rng(&AppConfig::default(), &mut rng).unwrap();
        let connections = net
            .generate_random_connections(min, min + extra, bound, &mut rng)
            .unwrap();
        prop_assert!(connections.len() >= min && connections.len() <= min + extra);
        for c in connections {
            prop_assert!(c.weight.abs() <= bound);
            prop_assert!(net.nodes[&c.source].can_be_source());
            prop_assert!(net.nodes[&c.target].can_be_target());
        }
    }

    #[test]
    fn mutation_keeps_connections_valid(seed in any::<u64>(), rounds in 1usize..60) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let config = AppConfig::default();
        let mut net = NeuralNetwork::new_random_with_rng(&config, &mut rng).unwrap();
        for _ in 0..rounds {
            net.mutate_with_config(&config, &mut rng);
        }
        for c in &net.connections {
            prop_assert!(net.nodes.contains_key(&c.source));
            prop_assert!(net.nodes.contains_key(&c.target));
            prop_assert!(c.weight.abs() <= config.brain.weight_bound);
        }
        prop_assert!(net.process_node_count() <= config.brain.max_process_nodes);
    }
}
