//! Integration tests for tree navigation

mod common;

use common::FixtureProject;
use para_store::{Catalog, TreeNode};
use pretty_assertions::assert_eq;

fn labels(nodes: &[TreeNode]) -> Vec<(String, bool)> {
    nodes
        .iter()
        .map(|n| (n.label().to_string(), n.is_expandable()))
        .collect()
}

fn open(fx: &FixtureProject) -> Catalog {
    let mut catalog = Catalog::new();
    catalog.open(fx.path()).unwrap();
    catalog
}

#[test]
fn test_root_nodes_hide_internal_types() {
    let fx = FixtureProject::plant();
    let catalog = open(&fx);

    let visible = catalog.root_nodes(false).unwrap();
    assert_eq!(
        labels(&visible),
        vec![
            ("ExampleDP_Float".to_string(), true),
            ("Pump".to_string(), true)
        ]
    );
    assert_eq!(catalog.root_nodes(true).unwrap().len(), 3);
}

#[test]
fn test_closed_catalog_renders_empty() {
    let catalog = Catalog::new();
    assert!(catalog.root_nodes(true).unwrap().is_empty());
    assert!(catalog.datapoint_nodes(true).unwrap().is_empty());
}

#[test]
fn test_expand_type_to_datapoints() {
    let fx = FixtureProject::plant();
    let catalog = open(&fx);

    let types = catalog.root_nodes(false).unwrap();
    let float_dps = catalog.expand(&types[0]).unwrap();
    // single-element type: nothing below the root
    assert_eq!(labels(&float_dps), vec![("ExampleDP_Arg1".to_string(), false)]);

    let pump_dps = catalog.expand(&types[1]).unwrap();
    assert_eq!(
        labels(&pump_dps),
        vec![
            ("Pump1".to_string(), true),
            ("Pump2".to_string(), true),
            ("_mp_Pump".to_string(), true)
        ]
    );
}

#[test]
fn test_expand_datapoint_and_elements() {
    let fx = FixtureProject::plant();
    let catalog = open(&fx);

    let pump1 = catalog
        .datapoint_nodes(false)
        .unwrap()
        .into_iter()
        .find(|n| n.label() == "Pump1")
        .unwrap();

    let top = catalog.expand(&pump1).unwrap();
    assert_eq!(
        labels(&top),
        vec![
            ("state".to_string(), true),
            ("cmd".to_string(), false),
            ("motor".to_string(), true)
        ]
    );

    let state = catalog.expand(&top[0]).unwrap();
    assert_eq!(
        labels(&state),
        vec![("running".to_string(), false), ("speed".to_string(), false)]
    );
    match &state[1] {
        TreeNode::Element { dp_id, element, .. } => {
            assert_eq!(*dp_id, 100);
            assert_eq!(element.el_id, 4);
        }
        other => panic!("unexpected node {other:?}"),
    }

    assert!(catalog.expand(&top[2]).unwrap().is_empty());
}

#[test]
fn test_expansion_sees_store_changes() {
    let fx = FixtureProject::plant();
    let catalog = open(&fx);

    let pump1 = catalog.datapoint_nodes(false).unwrap().remove(1);
    assert_eq!(pump1.label(), "Pump1");
    let before = catalog.expand(&pump1).unwrap();
    assert!(!before[1].is_expandable());

    fx.element(10, 7, 6, 5, 21, "sub");
    let after = catalog.expand(&pump1).unwrap();
    assert!(after[1].is_expandable());
    assert_eq!(labels(&catalog.expand(&after[1]).unwrap()), vec![("sub".to_string(), false)]);
}

#[test]
fn test_datapoint_nodes_filter_internal() {
    let fx = FixtureProject::plant();
    let catalog = open(&fx);
    let names: Vec<String> = labels(&catalog.datapoint_nodes(false).unwrap())
        .into_iter()
        .map(|(n, _)| n)
        .collect();
    assert_eq!(names, vec!["ExampleDP_Arg1", "Pump1", "Pump2"]);
}
