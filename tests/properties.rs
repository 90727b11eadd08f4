//! Property tests over random, possibly cyclic, record graphs.
//!
//! Random families may make someone their own ancestor, marry a person to
//! themselves or list a child twice. The builder must terminate on all of
//! them and still respect its limits.

use std::collections::HashSet;

use proptest::collection::vec;
use proptest::option;
use proptest::prelude::*;

use gedcom2gtr::{
    build_index, build_tree, render, Family, GenerationLimit, Individual, Name, NodeRole,
    RecordGraph, RecordSet, RelationshipIndex, TreeConfig, Xref,
};

type FamilySpec = (Option<usize>, Option<usize>, Vec<usize>);

fn graph_strategy() -> impl Strategy<Value = (usize, Vec<FamilySpec>)> {
    (1usize..7).prop_flat_map(|n| {
        let family = (option::of(0..n), option::of(0..n), vec(0..n, 0..4));
        (Just(n), vec(family, 0..5))
    })
}

fn config_strategy() -> impl Strategy<Value = TreeConfig> {
    (any::<bool>(), any::<bool>(), -1i64..4, -1i64..4, any::<bool>()).prop_map(
        |(siblings, ancestor_siblings, ancestors, descendants, dynamic)| TreeConfig {
            include_siblings: siblings,
            include_ancestor_siblings: ancestor_siblings,
            dynamic_generation_limits: dynamic,
            ..TreeConfig::default()
                .with_generation_limits(ancestors, descendants)
                .unwrap()
        },
    )
}

fn make_graph(n: usize, families: &[FamilySpec]) -> RecordGraph {
    let mut records = RecordSet::new();
    for i in 0..n {
        records.add_individual(Individual::new(format!("I{i}"), Name::new(format!("P{i}"), "X")));
    }
    for (index, (husband, wife, children)) in families.iter().enumerate() {
        let mut family = Family::new(format!("F{index}"));
        family.husband = husband.map(|h| Xref::new(format!("I{h}")));
        family.wife = wife.map(|w| Xref::new(format!("I{w}")));
        family.children = children.iter().map(|c| Xref::new(format!("I{c}"))).collect();
        records.add_family(family);
    }
    build_index(records).unwrap()
}

fn within(limit: GenerationLimit, generations: u32) -> bool {
    match limit {
        GenerationLimit::Unlimited => true,
        GenerationLimit::Max(max) => generations <= max,
    }
}

proptest! {
    #[test]
    fn proptest_no_individual_repeats_on_a_path(
        (n, families) in graph_strategy(),
        root in 0usize..7,
        config in config_strategy(),
    ) {
        let graph = make_graph(n, &families);
        let root = Xref::new(format!("I{}", root % n));
        let tree = build_tree(&graph, &root, &config).unwrap();

        for path in tree.paths() {
            let unique: HashSet<_> = path.iter().collect();
            prop_assert_eq!(unique.len(), path.len(), "repeated id on path {:?}", path);
        }
    }

    #[test]
    fn proptest_static_limits_bound_the_tree(
        (n, families) in graph_strategy(),
        root in 0usize..7,
        config in config_strategy(),
    ) {
        let config = TreeConfig { dynamic_generation_limits: false, ..config };
        let graph = make_graph(n, &families);
        let tree = build_tree(&graph, &Xref::new(format!("I{}", root % n)), &config).unwrap();

        prop_assert!(within(config.max_ancestor_generations, tree.ancestor_generations()));
        prop_assert!(within(config.max_descendant_generations, tree.descendant_generations()));
    }

    #[test]
    fn proptest_sibling_switches_are_respected(
        (n, families) in graph_strategy(),
        root in 0usize..7,
    ) {
        let config = TreeConfig {
            include_siblings: false,
            include_ancestor_siblings: false,
            ..TreeConfig::default()
        };
        let graph = make_graph(n, &families);
        let tree = build_tree(&graph, &Xref::new(format!("I{}", root % n)), &config).unwrap();

        prop_assert_eq!(tree.iter().filter(|node| node.role == NodeRole::Sibling).count(), 0);
    }

    #[test]
    fn proptest_root_siblings_follow_family_order(
        (n, families) in graph_strategy(),
        root in 0usize..7,
    ) {
        let graph = make_graph(n, &families);
        let root = Xref::new(format!("I{}", root % n));
        let tree = build_tree(&graph, &root, &TreeConfig::default()).unwrap();

        let mut expected: Vec<&Xref> = Vec::new();
        for sibling in graph.siblings_of(&root) {
            if sibling.id != root && !expected.contains(&&sibling.id) {
                expected.push(&sibling.id);
            }
        }
        let actual: Vec<&Xref> = tree
            .children_with_role(NodeRole::Sibling)
            .map(|node| node.id())
            .collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn proptest_render_is_deterministic_and_balanced(
        (n, families) in graph_strategy(),
        root in 0usize..7,
        config in config_strategy(),
    ) {
        let root = Xref::new(format!("I{}", root % n));
        let first = make_graph(n, &families);
        let second = make_graph(n, &families);

        let a = render(&build_tree(&first, &root, &config).unwrap());
        let b = render(&build_tree(&second, &root, &config).unwrap());
        prop_assert_eq!(&a, &b);

        prop_assert!(a.starts_with("sandclock"));
        prop_assert_eq!(a.matches('{').count(), a.matches('}').count());
    }

    #[test]
    fn proptest_dangling_child_is_rejected(n in 1usize..7, missing in 7usize..20) {
        let mut records = RecordSet::new();
        for i in 0..n {
            records.add_individual(Individual::new(format!("I{i}"), Name::default()));
        }
        records.add_family(Family::new("F0").with_husband("I0").with_child(format!("I{missing}")));

        prop_assert!(build_index(records).is_err());
    }
}
