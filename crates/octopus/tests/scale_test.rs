use octopus::{MakeSpaceOptions, MetroMap, ScaleHandler, Strategy, make_space};
use octopus_geom::point;
use octopus_graph::{NodeId, SignatureKind};

fn overlapping_pair(options: MakeSpaceOptions) -> (MetroMap, NodeId, NodeId) {
    let mut map = MetroMap::new(options).unwrap();
    let a = map.create_node(0.0, 0.0, "A", SignatureKind::RectangleStation);
    let b = map.create_node(15.0, 0.0, "B", SignatureKind::RectangleStation);
    (map, a, b)
}

fn tight() -> MakeSpaceOptions {
    MakeSpaceOptions {
        edge_margin: 0.0,
        ..Default::default()
    }
}

#[test]
fn scaling_pushes_overlapping_stations_apart() {
    let (mut map, a, b) = overlapping_pair(tight());
    let report = make_space(&mut map, Strategy::Scale).unwrap();

    assert!(report.converged());
    assert!(report.remaining_conflicts.is_empty());
    assert_eq!(report.passes.len(), 1);
    assert!(report.iterations() >= 1);
    assert_eq!(map.graph().node(a).position(), point(0.0, 0.0));
    let moved = map.graph().node(b).position();
    assert!(moved.x >= 20.0, "B ended at {moved:?}");
    assert_eq!(moved.y, 0.0);
}

#[test]
fn conflict_free_map_is_left_alone() {
    let mut map = MetroMap::new(tight()).unwrap();
    let a = map.create_node(0.0, 0.0, "A", SignatureKind::RectangleStation);
    let b = map.create_node(100.0, 0.0, "B", SignatureKind::RectangleStation);

    let report = make_space(&mut map, Strategy::Scale).unwrap();
    assert!(report.converged());
    assert_eq!(report.iterations(), 0);
    assert_eq!(map.graph().node(a).position(), point(0.0, 0.0));
    assert_eq!(map.graph().node(b).position(), point(100.0, 0.0));
}

#[test]
fn iteration_cap_stops_scaling() {
    let (mut map, _, _) = overlapping_pair(MakeSpaceOptions {
        max_iterations_scale: 1,
        ..tight()
    });
    let report = make_space(&mut map, Strategy::Scale).unwrap();
    assert!(!report.converged());
    assert_eq!(report.passes[0].iterations, 1);
    assert!(!report.passes[0].converged);
    assert_eq!(report.remaining_conflicts.len(), 1);
}

#[test]
fn scale_factor_covers_the_widest_conflict() {
    let (mut map, _, b) = overlapping_pair(tight());
    let conflicts = map.evaluate_conflicts();
    let mut handler = ScaleHandler::new(&mut map);
    // Envelope is 35 wide; the overlap needs 5 more.
    let factor = handler.evaluate_scale_factor(&conflicts);
    assert!((factor - 40.0 / 35.0).abs() < 1e-6);

    handler.scale(2.0).unwrap();
    assert_eq!(map.graph().node(b).position(), point(30.0, 0.0));
}
