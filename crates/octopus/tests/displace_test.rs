use octopus::displace::{AdjustmentGuard, EdgeAdjuster, displace_nodes};
use octopus::{Axis, MakeSpaceOptions, MetroMap, Strategy, make_space};
use octopus_geom::point;
use octopus_graph::{Color, NodeId, OctilinearDirection, SignatureKind};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn station_on_a_track_is_lifted_off_it() {
    let mut map = MetroMap::new(MakeSpaceOptions {
        edge_margin: 5.0,
        route_margin: 5.0,
        ..Default::default()
    })
    .unwrap();
    let route = map.create_route(10.0, Color::BLUE);
    let a = map.create_node(0.0, 0.0, "A", SignatureKind::RectangleStation);
    let b = map.create_node(200.0, 0.0, "B", SignatureKind::RectangleStation);
    let c = map.create_node(100.0, 10.0, "C", SignatureKind::RectangleStation);
    let d = map.create_node(100.0, 100.0, "D", SignatureKind::RectangleStation);
    map.create_edge(a, b, &[route]).unwrap();
    map.create_edge(c, d, &[route]).unwrap();

    let report = make_space(&mut map, Strategy::Displace).unwrap();

    assert!(report.converged());
    assert_eq!(report.passes.len(), 2);
    assert_eq!(report.passes[0].name, "pass1");
    assert_eq!(report.passes[0].iterations, 1);
    assert_eq!(report.passes[1].iterations, 0);
    assert_eq!(report.non_octilinear_edges, 0);

    let graph = map.graph();
    assert_eq!(graph.node_count(), 4);
    assert_eq!(graph.node(a).position(), point(0.0, 0.0));
    assert_eq!(graph.node(b).position(), point(200.0, 0.0));
    assert_eq!(graph.node(c).position(), point(100.0, 25.0));
    assert_eq!(graph.node(d).position(), point(100.0, 115.0));
}

/// A diagonal `p -> q` crossed by the displacement line of a station pair further up.
fn skewed_diagonal() -> (MetroMap, NodeId, NodeId) {
    let mut map = MetroMap::new(MakeSpaceOptions {
        edge_margin: 0.0,
        ..Default::default()
    })
    .unwrap();
    let p = map.create_node(0.0, 0.0, "P", SignatureKind::RectangleStation);
    let q = map.create_node(100.0, 100.0, "Q", SignatureKind::RectangleStation);
    map.create_node(40.0, 200.0, "S1", SignatureKind::RectangleStation);
    map.create_node(55.0, 200.0, "S2", SignatureKind::RectangleStation);
    map.create_edge(p, q, &[]).unwrap();
    (map, p, q)
}

#[test]
fn displacement_moves_the_far_half_plane() {
    let (mut map, p, q) = skewed_diagonal();
    let mut conflicts = map.evaluate_conflicts();
    assert_eq!(conflicts.len(), 1);
    let conflict = conflicts.remove(0);

    let result = displace_nodes(&mut map, conflict, conflicts).unwrap();
    assert_eq!(result.axis(), Axis::X);
    assert_eq!(result.direction(), OctilinearDirection::East);
    assert!(approx(result.distance(), 5.0));
    assert_eq!(result.displaced_nodes().len(), 2);
    assert!(result.other_conflicts().is_empty());

    let graph = map.graph();
    assert_eq!(graph.node(p).position(), point(0.0, 0.0));
    assert_eq!(graph.node(q).position(), point(105.0, 100.0));
    assert_eq!(graph.non_octilinear_edges().len(), 1);
}

#[test]
fn leaf_endpoint_is_moved_back_onto_the_diagonal() {
    let (mut map, p, q) = skewed_diagonal();

    let report = make_space(&mut map, Strategy::Displace).unwrap();

    assert!(report.converged());
    assert_eq!(report.non_octilinear_edges, 0);
    let graph = map.graph();
    assert_eq!(graph.node_count(), 4);
    assert_eq!(graph.node(p).position(), point(0.0, 0.0));
    assert_eq!(graph.node(q).position(), point(105.0, 105.0));
    let pq = graph.edge_between(p, q).unwrap();
    assert_eq!(
        graph.edge(pq).direction().as_octilinear(),
        Some(OctilinearDirection::NorthEast)
    );
}

#[test]
fn revisits_and_far_side_nodes_cost_the_circle_penalty() {
    let (mut map, p, q) = skewed_diagonal();
    let mut conflicts = map.evaluate_conflicts();
    let conflict = conflicts.remove(0);
    let result = displace_nodes(&mut map, conflict, conflicts).unwrap();
    let edge = map.graph().edge_between(p, q).unwrap();

    let mut guard = AdjustmentGuard::new(map.graph(), &result, q);
    assert!(guard.is_moveable(q));
    assert!(guard.is_not_moveable(p));

    let adjuster = EdgeAdjuster::new(&mut map, &result);
    let north = OctilinearDirection::North;
    assert_eq!(adjuster.adjustment_costs(edge, q, &mut guard, north).unwrap(), 0);
    assert_eq!(adjuster.adjustment_costs(edge, q, &mut guard, north).unwrap(), 1000);
    assert_eq!(adjuster.adjustment_costs(edge, p, &mut guard, north).unwrap(), 1000);

    guard.reuse();
    assert!(!guard.has_visited(q));
}

#[test]
fn displaced_leaf_is_not_moved_back_against_the_push() {
    let mut map = MetroMap::new(MakeSpaceOptions {
        edge_margin: 0.0,
        ..Default::default()
    })
    .unwrap();
    let c = map.create_node(0.0, 0.0, "C", SignatureKind::RectangleStation);
    let l = map.create_node(40.0, 40.0, "L", SignatureKind::RectangleStation);
    map.create_node(-200.0, 20.0, "S1", SignatureKind::RectangleStation);
    map.create_node(-200.0, 30.0, "S2", SignatureKind::RectangleStation);
    let cl = map.create_edge(c, l, &[]).unwrap();

    let mut conflicts = map.evaluate_conflicts();
    assert_eq!(conflicts.len(), 1);
    let conflict = conflicts.remove(0);
    let result = displace_nodes(&mut map, conflict, conflicts).unwrap();
    assert_eq!(result.direction(), OctilinearDirection::North);
    assert!(approx(result.distance(), 10.0));
    assert_eq!(map.graph().node(l).position(), point(40.0, 50.0));

    let remaining = EdgeAdjuster::new(&mut map, &result)
        .correct_non_octilinear_edges()
        .unwrap();

    assert_eq!(remaining, 0);
    let graph = map.graph();
    assert_eq!(graph.node_count(), 4);
    assert_eq!(graph.node(c).position(), point(0.0, 0.0));
    assert_eq!(graph.node(l).position(), point(50.0, 50.0));
    assert_eq!(
        graph.edge(cl).direction().as_octilinear(),
        Some(OctilinearDirection::NorthEast)
    );
}

/// A skewed square with both diagonals, entirely inside the displaced half-plane.
fn braced_ring() -> (MetroMap, [NodeId; 4]) {
    let mut map = MetroMap::new(MakeSpaceOptions {
        edge_margin: 0.0,
        ..Default::default()
    })
    .unwrap();
    map.create_node(40.0, 200.0, "S1", SignatureKind::RectangleStation);
    map.create_node(55.0, 200.0, "S2", SignatureKind::RectangleStation);
    let a = map.create_node(100.0, -300.0, "A", SignatureKind::RectangleStation);
    let b = map.create_node(200.0, -300.0, "B", SignatureKind::RectangleStation);
    let c = map.create_node(200.0, -200.0, "C", SignatureKind::RectangleStation);
    let d = map.create_node(100.0, -180.0, "D", SignatureKind::RectangleStation);
    for (from, to) in [(a, b), (b, c), (c, d), (d, a), (a, c), (b, d)] {
        map.create_edge(from, to, &[]).unwrap();
    }
    (map, [a, b, c, d])
}

#[test]
fn ring_corrections_hit_the_circle_penalty_and_fall_back_to_bends() {
    let (mut map, [a, b, c, d]) = braced_ring();
    let mut conflicts = map.evaluate_conflicts();
    assert_eq!(conflicts.len(), 1);
    let conflict = conflicts.remove(0);
    let result = displace_nodes(&mut map, conflict, conflicts).unwrap();
    assert_eq!(result.displaced_nodes().len(), 5);

    let cd = map.graph().edge_between(c, d).unwrap();
    let bd = map.graph().edge_between(b, d).unwrap();
    let mut guard_c = AdjustmentGuard::new(map.graph(), &result, c);
    let mut guard_d = AdjustmentGuard::new(map.graph(), &result, d);
    let direction = result.correction_direction();

    let mut adjuster = EdgeAdjuster::new(&mut map, &result);
    assert!(adjuster.adjustment_costs(cd, c, &mut guard_c, direction).unwrap() >= 1000);
    assert!(adjuster.adjustment_costs(cd, d, &mut guard_d, direction).unwrap() >= 1000);

    let remaining = adjuster.correct_non_octilinear_edges().unwrap();

    assert_eq!(remaining, 0);
    let graph = map.graph();
    assert!(graph.edge(cd).is_deleted());
    assert!(graph.edge(bd).is_deleted());
    assert!(graph.node_count() >= 8);
    assert!(graph.nodes().filter(|n| n.signature().is_bend()).count() >= 2);
    assert_eq!(graph.node(a).position(), point(105.0, -300.0));
    assert_eq!(graph.node(b).position(), point(205.0, -300.0));
    assert_eq!(graph.node(c).position(), point(205.0, -200.0));
    assert_eq!(graph.node(d).position(), point(105.0, -180.0));
}

#[test]
fn capped_passes_report_the_conflicts_left() {
    let mut map = MetroMap::new(MakeSpaceOptions {
        edge_margin: 5.0,
        max_iterations_displace: 1,
        ..Default::default()
    })
    .unwrap();
    for (name, x, y) in [
        ("a", 0.0, 0.0),
        ("b", 10.0, 0.0),
        ("c", 100.0, 0.0),
        ("d", 100.0, 5.0),
        ("e", 300.0, 100.0),
        ("f", 310.0, 100.0),
    ] {
        map.create_node(x, y, name, SignatureKind::RectangleStation);
    }
    assert_eq!(map.evaluate_conflicts().len(), 3);

    let report = make_space(&mut map, Strategy::Displace).unwrap();

    assert!(!report.converged());
    assert_eq!(report.passes.len(), 2);
    for pass in &report.passes {
        assert_eq!(pass.iterations, 1);
        assert!(!pass.converged);
    }
    assert_eq!(report.remaining_conflicts.len(), 1);
    assert_eq!(report.remaining_conflicts[0].displace_distance, 20);
}

#[test]
fn skewed_routed_edge_without_conflicts_gets_a_bend() {
    let mut map = MetroMap::new(MakeSpaceOptions::default()).unwrap();
    let route = map.create_route(10.0, Color::RED);
    let a = map.create_node(0.0, 0.0, "A", SignatureKind::RectangleStation);
    let b = map.create_node(80.0, 30.0, "B", SignatureKind::RectangleStation);
    let ab = map.create_edge(a, b, &[route]).unwrap();

    let report = make_space(&mut map, Strategy::Displace).unwrap();

    assert!(report.passes.iter().all(|p| p.iterations == 0));
    assert_eq!(report.non_octilinear_edges, 0);
    let graph = map.graph();
    assert!(graph.edge(ab).is_deleted());
    assert_eq!(graph.node_count(), 3);
    let bend = graph.nodes().find(|n| n.signature().is_bend()).unwrap();
    assert_eq!(bend.position(), point(50.0, 0.0));
    assert_eq!(graph.node(a).position(), point(0.0, 0.0));
    assert_eq!(graph.node(b).position(), point(80.0, 30.0));
}
