use std::cmp::Ordering;

use octopus::conflict::compare_conflicts;
use octopus::example::example_metro_map;
use octopus::{Axis, ConflictType, Element, MakeSpaceOptions, MetroMap};
use octopus_graph::SignatureKind;

fn map(edge_margin: f64) -> MetroMap {
    MetroMap::new(MakeSpaceOptions {
        edge_margin,
        ..Default::default()
    })
    .unwrap()
}

#[test]
fn touching_stations_are_not_in_conflict() {
    let mut m = map(0.0);
    m.create_node(0.0, 0.0, "A", SignatureKind::RectangleStation);
    m.create_node(20.0, 0.0, "B", SignatureKind::RectangleStation);
    assert!(m.evaluate_conflicts().is_empty());
}

#[test]
fn node_pairs_are_classified_by_their_connection() {
    let mut m = map(0.0);
    let a = m.create_node(0.0, 0.0, "A", SignatureKind::RectangleStation);
    let b = m.create_node(15.0, 0.0, "B", SignatureKind::RectangleStation);
    m.create_edge(a, b, &[]).unwrap();
    let conflicts = m.evaluate_conflicts();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].conflict_type(), ConflictType::AdjacentNodeNode);

    let mut m = map(0.0);
    let a = m.create_node(0.0, 0.0, "A", SignatureKind::RectangleStation);
    let b = m.create_node(10.0, 10.0, "B", SignatureKind::RectangleStation);
    m.create_edge(a, b, &[]).unwrap();
    let conflicts = m.evaluate_conflicts();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(
        conflicts[0].conflict_type(),
        ConflictType::AdjacentNodeNodeDiagonal
    );

    let mut m = map(0.0);
    m.create_node(0.0, 0.0, "A", SignatureKind::RectangleStation);
    m.create_node(15.0, 0.0, "B", SignatureKind::RectangleStation);
    let conflicts = m.evaluate_conflicts();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].conflict_type(), ConflictType::NodeNode);
    assert_eq!(conflicts[0].conflict_type().rank(), 40);
}

#[test]
fn best_axis_takes_the_smaller_projection() {
    let mut m = map(0.0);
    let a = m.create_node(0.0, 0.0, "A", SignatureKind::RectangleStation);
    let b = m.create_node(12.0, 6.0, "B", SignatureKind::RectangleStation);
    let conflicts = m.evaluate_conflicts();
    assert_eq!(conflicts.len(), 1);
    let c = &conflicts[0];
    assert_eq!(c.element_pair(), (Element::Node(a), Element::Node(b)));
    assert_eq!(c.best_displace_axis(), Axis::Y);
    assert_eq!(c.best_displace_distance(), 4);
    assert_eq!(c.displace_distance_along_x(), 8);
    assert_eq!(c.displace_distance_along_y(), 4);
}

#[test]
fn axis_parallel_overlap_is_pushed_along_the_overlap() {
    let mut m = map(0.0);
    m.create_node(0.0, 0.0, "A", SignatureKind::RectangleStation);
    m.create_node(15.0, 0.0, "B", SignatureKind::RectangleStation);
    let c = &m.evaluate_conflicts()[0];
    assert_eq!(c.best_displace_axis(), Axis::X);
    assert_eq!(c.best_displace_distance(), 5);
    assert!(!c.is_solved());
}

#[test]
fn station_on_a_foreign_edge_is_a_node_edge_conflict() {
    let mut m = map(5.0);
    let route = m.create_route(10.0, octopus_graph::Color::BLUE);
    let a = m.create_node(0.0, 0.0, "A", SignatureKind::RectangleStation);
    let b = m.create_node(200.0, 0.0, "B", SignatureKind::RectangleStation);
    let c = m.create_node(100.0, 10.0, "C", SignatureKind::RectangleStation);
    let d = m.create_node(100.0, 100.0, "D", SignatureKind::RectangleStation);
    let z = m.create_node(500.0, 500.0, "Z", SignatureKind::RectangleStation);
    let ab = m.create_edge(a, b, &[route]).unwrap();
    let cd = m.create_edge(c, d, &[route]).unwrap();

    let conflicts = m.evaluate_conflicts();
    assert_eq!(conflicts.len(), 2);

    let first = &conflicts[0];
    assert_eq!(first.conflict_type(), ConflictType::NodeEdge);
    assert_eq!(first.element_pair(), (Element::Node(c), Element::Edge(ab)));
    assert_eq!(first.best_displace_axis(), Axis::Y);
    assert_eq!(first.best_displace_distance(), 15);
    assert_eq!(first.nodes(), vec![c]);
    assert_eq!(first.edges(), vec![ab]);

    let graph = m.graph();
    assert!(first.is_conflict_related(graph, Element::Node(a)));
    assert!(first.is_conflict_related(graph, Element::Node(d)));
    assert!(first.is_conflict_related(graph, Element::Edge(cd)));
    assert!(!first.is_conflict_related(graph, Element::Node(z)));

    let second = &conflicts[1];
    assert_eq!(second.conflict_type(), ConflictType::EdgeEdge);
    assert_eq!(second.best_displace_distance(), 10);
}

#[test]
fn demo_map_conflicts_are_sorted() {
    let m = example_metro_map(MakeSpaceOptions::default()).unwrap();
    let conflicts = m.evaluate_conflicts();
    assert!(!conflicts.is_empty());
    assert!(
        conflicts
            .windows(2)
            .all(|w| compare_conflicts(&w[0], &w[1]) != Ordering::Greater)
    );
    assert!(
        conflicts
            .windows(2)
            .all(|w| w[0].conflict_type().rank() >= w[1].conflict_type().rank())
    );
    assert!(conflicts.iter().all(|c| !c.is_solved()));
}
