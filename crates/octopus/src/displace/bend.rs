use octopus_geom::{Point, PrecisionModel, point, vector};
use octopus_graph::{
    Alignment, AnyDirection, EdgeId, Graph, NodeId, OctilinearDirection, SignatureKind,
};
use tracing::{debug, warn};

use crate::error::Result;

/// Bend points that turn the segment `a -> b` into octilinear pieces, in order from `a`.
///
/// One bend if either L-shape has a leg with the original alignment, two bends forming a
/// Z whose outer legs keep the original axis otherwise. Empty if the segment is already
/// octilinear.
pub fn octilinear_vertices(
    a: Point,
    b: Point,
    original: OctilinearDirection,
    precision: &PrecisionModel,
) -> Vec<Point> {
    let d = b - a;
    if precision.is_zero(d.length()) || AnyDirection::from_vector(d, precision).is_octilinear() {
        return Vec::new();
    }
    let (adx, ady) = (d.x.abs(), d.y.abs());
    let (sx, sy) = (d.x.signum(), d.y.signum());

    let (straight, straight_alignment, diagonal) = if adx > ady {
        (
            vector(sx * (adx - ady), 0.0),
            Alignment::Horizontal,
            vector(sx * ady, sy * ady),
        )
    } else {
        (
            vector(0.0, sy * (ady - adx)),
            Alignment::Vertical,
            vector(sx * adx, sy * adx),
        )
    };
    let diagonal_alignment = if sx == sy {
        Alignment::Diagonal45
    } else {
        Alignment::Diagonal135
    };

    let alignment = original.alignment();
    if alignment == straight_alignment {
        return vec![a + straight];
    }
    if alignment == diagonal_alignment {
        return vec![a + diagonal];
    }
    match alignment {
        Alignment::Horizontal => {
            let x = a.x + d.x / 2.0;
            vec![point(x, a.y), point(x, b.y)]
        }
        Alignment::Vertical => {
            let y = a.y + d.y / 2.0;
            vec![point(a.x, y), point(b.x, y)]
        }
        Alignment::Diagonal45 | Alignment::Diagonal135 => vec![a + straight],
    }
}

/// Replaces `edge` by an octilinear chain through new bend nodes carrying the same routes.
///
/// Returns `false` if no chain was needed or possible.
pub fn insert_bend_nodes(graph: &mut Graph, edge: EdgeId) -> Result<bool> {
    let e = graph.try_edge(edge)?;
    if e.is_deleted() {
        return Ok(false);
    }
    let (a, b) = (e.node_a(), e.node_b());
    let routes = e.routes().to_vec();
    let vertices = octilinear_vertices(
        graph.node(a).position(),
        graph.node(b).position(),
        e.original_direction(),
        graph.precision(),
    );
    if vertices.is_empty() {
        warn!(edge = %edge, "no octilinear edge created");
        return Ok(false);
    }

    let bends: Vec<NodeId> = vertices
        .iter()
        .map(|v| graph.create_node(v.x, v.y, None, SignatureKind::Bend))
        .collect();
    graph.delete_edge(edge)?;

    let chain: Vec<NodeId> = std::iter::once(a)
        .chain(bends.iter().copied())
        .chain(std::iter::once(b))
        .collect();
    for pair in chain.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        match graph.edge_between(from, to) {
            Some(existing) => graph.add_routes(existing, &routes)?,
            None => {
                graph.create_edge(from, to, &routes)?;
            }
        }
    }
    debug!(edge = %edge, bends = bends.len(), "inserted bend nodes");

    for bend in bends {
        let position = graph.node(bend).position();
        if let Some(fixed) = graph.node_at(position, bend) {
            merge_bend_nodes(graph, fixed, bend)?;
        }
    }
    Ok(true)
}

/// Folds `obsolete` into `fixed`. Edges are transferred and duplicates collapse into one
/// edge carrying the union of routes. At least one of the nodes has to be a bend.
pub fn merge_bend_nodes(graph: &mut Graph, fixed: NodeId, obsolete: NodeId) -> Result<bool> {
    let is_bend = |id: NodeId| graph.node(id).signature().is_bend();
    if fixed == obsolete || !(is_bend(fixed) || is_bend(obsolete)) {
        return Ok(false);
    }

    let transfers: Vec<(NodeId, Vec<_>)> = graph
        .node(obsolete)
        .adjacent_edges()
        .map(|e| {
            let edge = graph.edge(e);
            edge.other_node(obsolete)
                .map(|other| (other, edge.routes().to_vec()))
        })
        .collect::<std::result::Result<_, _>>()?;

    for (other, routes) in transfers {
        if other == fixed {
            continue;
        }
        match graph.edge_between(fixed, other) {
            Some(existing) => graph.add_routes(existing, &routes)?,
            None => {
                graph.create_edge(fixed, other, &routes)?;
            }
        }
    }
    graph.delete_node(obsolete)?;
    graph.remove_deleted();
    debug!(fixed = %fixed, obsolete = %obsolete, "merged bend nodes");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use OctilinearDirection::*;

    fn pm() -> PrecisionModel {
        PrecisionModel::default()
    }

    #[test]
    fn octilinear_segments_need_no_bends() {
        assert!(octilinear_vertices(point(0.0, 0.0), point(10.0, 10.0), East, &pm()).is_empty());
        assert!(octilinear_vertices(point(0.0, 0.0), point(0.0, -7.0), East, &pm()).is_empty());
    }

    #[test]
    fn horizontal_origin_gets_a_straight_first_l() {
        let v = octilinear_vertices(point(0.0, 0.0), point(80.0, 30.0), East, &pm());
        assert_eq!(v, vec![point(50.0, 0.0)]);
    }

    #[test]
    fn diagonal_origin_gets_a_diagonal_first_l() {
        let v = octilinear_vertices(point(0.0, 0.0), point(80.0, 30.0), NorthEast, &pm());
        assert_eq!(v, vec![point(30.0, 30.0)]);
    }

    #[test]
    fn crossing_alignment_gets_a_z() {
        let v = octilinear_vertices(point(0.0, 0.0), point(20.0, 60.0), East, &pm());
        assert_eq!(v, vec![point(10.0, 0.0), point(10.0, 60.0)]);
        let v = octilinear_vertices(point(0.0, 0.0), point(80.0, 30.0), North, &pm());
        assert_eq!(v, vec![point(0.0, 15.0), point(80.0, 15.0)]);
    }
}
