use std::collections::HashSet;

use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;
use tessera_compiler::{AllocationKey, SynthOptions, Synthesizer, compute_logical_id};
use tessera_tree::{Declaration, NodeId, Tree};

/// A tree shape: each entry attaches `name` under an earlier node (index modulo the
/// number of nodes so far).
fn arb_shape() -> impl Strategy<Value = Vec<(usize, String)>> {
    let name = prop_oneof![
        4 => "[a-zA-Z][a-zA-Z0-9_-]{0,7}",
        1 => Just("Resource".to_string()),
        1 => Just("Default".to_string()),
    ];
    prop::collection::vec((any::<usize>(), name), 1..40)
}

fn build(shape: &[(usize, String)]) -> Tree {
    let mut tree = Tree::new();
    let mut ids = vec![tree.root()];
    for (parent, name) in shape {
        let parent = ids[parent % ids.len()];
        // duplicate siblings are rejected; the shape simply skips them
        if let Ok(id) = tree.scope(parent, name) {
            tree.add_resource(id, Declaration::new("Test::Thing")).unwrap();
            ids.push(id);
        }
    }
    tree
}

fn nodes(tree: &Tree) -> Vec<NodeId> {
    tree.walk(tree.root()).skip(1).map(|node| node.id()).collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        failure_persistence: None,
        .. ProptestConfig::default()
    })]

    #[test]
    fn ids_are_pairwise_distinct_and_well_formed(shape in arb_shape(), hash_len in 8usize..=16) {
        let options = SynthOptions::builder().hash_len(hash_len).max_id_len(40).build();
        let tree = build(&shape);
        let output = Synthesizer::new(options).unwrap().synthesize(&tree).unwrap();

        let ids: Vec<_> = output.template.logical_ids().collect();
        prop_assert_eq!(ids.len(), nodes(&tree).len());
        prop_assert_eq!(ids.iter().collect::<HashSet<_>>().len(), ids.len());
        for id in ids {
            prop_assert!(id.len() <= 40, "{} is too long", id);
            prop_assert!(id.chars().all(|c| c.is_ascii_alphanumeric()), "{}", id);
        }
    }

    #[test]
    fn ids_depend_only_on_paths(shape in arb_shape()) {
        let first = build(&shape);
        let second = build(&shape);
        let synth = Synthesizer::new(SynthOptions::default()).unwrap();

        let a = synth.synthesize(&first).unwrap();
        let b = synth.synthesize(&second).unwrap();
        prop_assert_eq!(&a.template, &b.template);

        for (node, id) in nodes(&first).into_iter().zip(a.template.logical_ids()) {
            let key = AllocationKey::node(first.path(node).clone());
            let expected = compute_logical_id(&key, 8, 255);
            prop_assert_eq!(expected.as_str(), id);
        }
    }
}
