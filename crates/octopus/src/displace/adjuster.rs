use octopus_geom::Vector;
use octopus_graph::{Alignment, EdgeId, Graph, NodeId, OctilinearDirection};
use tracing::{debug, trace, warn};

use super::bend::insert_bend_nodes;
use super::{AdjustmentGuard, DisplaceResult};
use crate::buffer::Element;
use crate::error::Result;
use crate::map::MetroMap;

const SOLVE_EPS: f64 = 1e-9;

/// Restores octilinearity after a displacement, by moving endpoints where that is cheap and
/// by inserting bends where it is not.
pub struct EdgeAdjuster<'a> {
    map: &'a mut MetroMap,
    result: &'a DisplaceResult,
    max_costs: u32,
    circle_penalty: u32,
    shortening_guard: bool,
}

impl<'a> EdgeAdjuster<'a> {
    pub fn new(map: &'a mut MetroMap, result: &'a DisplaceResult) -> Self {
        let options = map.options();
        let (max_costs, circle_penalty, shortening_guard) = (
            options.max_adjustment_costs,
            options.correct_circle_penalty,
            options.shortening_guard,
        );
        Self {
            map,
            result,
            max_costs,
            circle_penalty,
            shortening_guard,
        }
    }

    /// Corrects every non-octilinear edge, worst first. Returns how many are left.
    pub fn correct_non_octilinear_edges(&mut self) -> Result<usize> {
        let graph = self.map.graph();
        let mut edges = graph.non_octilinear_edges();
        debug!(count = edges.len(), "non-octilinear edges");
        edges.sort_by(|&a, &b| {
            graph
                .edge(b)
                .misalignment()
                .total_cmp(&graph.edge(a).misalignment())
                .then_with(|| a.cmp(&b))
        });

        for edge in edges {
            let e = self.map.graph().edge(edge);
            if e.is_deleted() || e.is_octilinear() {
                continue;
            }
            self.correct_edge(edge)?;
        }

        let graph = self.map.graph();
        let remaining = graph.non_octilinear_edges();
        for &edge in &remaining {
            warn!(edge = %label(graph, edge), "uncorrected non-octilinear edge");
        }
        Ok(remaining.len())
    }

    pub fn correct_edge(&mut self, edge: EdgeId) -> Result<()> {
        let graph = self.map.graph();
        let (a, b) = (graph.edge(edge).node_a(), graph.edge(edge).node_b());
        debug!(edge = %label(graph, edge), "correcting edge");

        let mut guard_a = AdjustmentGuard::new(graph, self.result, a);
        let mut guard_b = AdjustmentGuard::new(graph, self.result, b);
        let direction = self.result.correction_direction();
        let cost_a = self.adjustment_costs(edge, a, &mut guard_a, direction)?;
        let cost_b = self.adjustment_costs(edge, b, &mut guard_b, direction)?;
        debug!(cost_a, cost_b, "adjustment costs");

        if cost_a > self.max_costs && cost_b > self.max_costs {
            debug!("adjustment costs too high, inserting bends");
            insert_bend_nodes(self.map.graph_mut(), edge)?;
            return Ok(());
        }

        let (node, guard) = if cost_a < cost_b {
            (a, &mut guard_a)
        } else {
            (b, &mut guard_b)
        };
        let displaced = self.result.direction();
        guard.reuse().set_last_move(displaced, self.result.distance());
        self.correct_by_moving_node(edge, node, displaced, guard)?;

        let e = self.map.graph().edge(edge);
        if !e.is_deleted() && !e.is_octilinear() {
            debug!(edge = %label(self.map.graph(), edge), "moving did not help, inserting bends");
            insert_bend_nodes(self.map.graph_mut(), edge)?;
        }
        Ok(())
    }

    /// Cost of making `edge` octilinear by moving `node`, including the edges that move drags
    /// along.
    pub fn adjustment_costs(
        &self,
        edge: EdgeId,
        node: NodeId,
        guard: &mut AdjustmentGuard,
        direction: OctilinearDirection,
    ) -> Result<u32> {
        if guard.is_not_moveable(node) || guard.has_visited(node) {
            return Ok(self.circle_penalty);
        }
        guard.visit(node);

        let graph = self.map.graph();
        if graph.node(node).degree() == 1 {
            return Ok(0);
        }

        let others = graph.other_adjacent_edges(node, edge);
        if is_simple_node(graph, edge, node)? {
            let keeps_alignment = match direction.alignment() {
                Alignment::Vertical => others.iter().all(|&e| graph.edge(e).is_vertical()),
                Alignment::Horizontal => others.iter().all(|&e| graph.edge(e).is_horizontal()),
                Alignment::Diagonal45 | Alignment::Diagonal135 => false,
            };
            return Ok(if keeps_alignment { 1 } else { 2 });
        }

        let mut costs = 2 + others.len() as u32;
        for other_edge in others {
            let other = graph.edge(other_edge).other_node(node)?;
            let cost = self.adjustment_costs(other_edge, other, guard, direction)?;
            costs = costs.saturating_add(cost);
        }
        Ok(costs)
    }

    fn correct_by_moving_node(
        &mut self,
        edge: EdgeId,
        node: NodeId,
        last_direction: OctilinearDirection,
        guard: &mut AdjustmentGuard,
    ) -> Result<()> {
        let label = self.map.graph().node(node).label();
        if guard.is_not_moveable(node) {
            warn!(node = %label, "node cannot be moved");
            return Ok(());
        }
        if guard.has_visited(node) {
            warn!(node = %label, "correction aborted on second visit");
            return Ok(());
        }
        guard.visit(node);

        let moved_direction = match self.plan_move(edge, node, last_direction)? {
            Some((direction, distance)) => {
                trace!(node = %label, %direction, distance, "moving node");
                self.map
                    .graph_mut()
                    .move_node_towards(node, direction, distance)?;
                guard.set_last_move(direction, distance);
                direction
            }
            None => last_direction,
        };

        let graph = self.map.graph();
        let next: Vec<EdgeId> = graph
            .node(node)
            .adjacent_edges()
            .filter(|&e| e != edge && !graph.edge(e).is_octilinear())
            .collect();
        for next_edge in next {
            let other = self.map.graph().edge(next_edge).other_node(node)?;
            self.correct_by_moving_node(next_edge, other, moved_direction, guard)?;
        }
        Ok(())
    }

    /// Direction and distance that make `edge` octilinear by moving `node`, if there is one.
    fn plan_move(
        &self,
        edge: EdgeId,
        node: NodeId,
        last_direction: OctilinearDirection,
    ) -> Result<Option<(OctilinearDirection, f64)>> {
        let graph = self.map.graph();
        let connection = graph.edge(edge);
        let other = connection.other_node(node)?;
        let original = connection.original_direction_from(node)?;
        let towards_other = graph.node(other).position() - graph.node(node).position();
        let reverting = self.reverting_direction(node);
        let keeps_displacement =
            |planned: &(OctilinearDirection, f64)| planned.0 != reverting;

        let planned = if graph.node(node).degree() == 1 {
            let preferred = single_node_move_direction(last_direction, original);
            [preferred, preferred.rotate(OctilinearDirection::East)]
                .into_iter()
                .find_map(|d| {
                    correction_distance(towards_other, d, original.alignment())
                        .filter(keeps_displacement)
                })
        } else if is_simple_node(graph, edge, node)? {
            let Some(&first) = graph.other_adjacent_edges(node, edge).first() else {
                return Ok(None);
            };
            let adjacent = graph.edge(first).original_direction_from(node)?;
            if adjacent.alignment() == original.alignment() {
                trace!("adjacent edge shares the original alignment, not moving");
                return Ok(None);
            }
            let alpha = adjacent.angle_to(connection.direction_from(node)?);
            let direction = simple_node_move_direction(adjacent, alpha);
            correction_distance(towards_other, direction, original.alignment())
                .filter(keeps_displacement)
        } else {
            None
        };

        let Some((direction, distance)) = planned else {
            return Ok(None);
        };
        if self.shortening_guard && shortens_past_neighbour(graph, edge, node, direction, distance)? {
            debug!(%direction, distance, "move would collapse an adjacent edge");
            return Ok(None);
        }
        Ok(Some((direction, distance)))
    }

    /// The move that would take `node` back across the displacement: against the push for
    /// displaced nodes, along it for the rest.
    fn reverting_direction(&self, node: NodeId) -> OctilinearDirection {
        let pushed = self.result.direction();
        if self.result.displaced_nodes().contains(&node) {
            pushed.opposite()
        } else {
            pushed
        }
    }
}

/// At most two other edges, none reversing the connection, and two only if they are opposite.
pub fn is_simple_node(graph: &Graph, edge: EdgeId, node: NodeId) -> Result<bool> {
    let connection = graph.edge(edge).direction_from(node)?.to_octilinear();
    let others = graph.other_adjacent_edges(node, edge);
    if others.len() > 2 {
        return Ok(false);
    }
    let mut directions = Vec::with_capacity(others.len());
    for e in others {
        directions.push(graph.edge(e).direction_from(node)?.to_octilinear());
    }
    if directions.iter().any(|d| d.is_opposite(connection)) {
        return Ok(false);
    }
    Ok(match directions.as_slice() {
        [first, second] => first.is_opposite(*second),
        _ => true,
    })
}

/// Which way along the adjacent edge's axis a simple node moves, given the clockwise angle
/// `alpha` from the adjacent edge to the connection edge.
pub fn simple_node_move_direction(
    adjacent: OctilinearDirection,
    alpha: f64,
) -> OctilinearDirection {
    use OctilinearDirection::*;
    let towards = match adjacent {
        South | North => alpha > 315.0 || alpha < 45.0,
        East | West => {
            (alpha > 45.0 && alpha < 90.0)
                || (alpha > 135.0 && alpha < 180.0)
                || (alpha > 225.0 && alpha < 270.0)
                || alpha > 335.0
        }
        _ => alpha < 45.0 || alpha > 90.0,
    };
    match adjacent {
        South | North | East | West if towards => adjacent.opposite(),
        South | North | East | West => adjacent,
        _ if towards => adjacent,
        _ => adjacent.opposite(),
    }
}

/// Move direction of a leaf node; it always moves across an orthogonal displacement.
pub fn single_node_move_direction(
    last: OctilinearDirection,
    connection: OctilinearDirection,
) -> OctilinearDirection {
    use OctilinearDirection::*;
    if last.is_diagonal() {
        return last;
    }
    let direction = match connection {
        NorthWest | SouthEast => North,
        _ => South,
    };
    if matches!(last, East | South) {
        direction.opposite()
    } else {
        direction
    }
}

/// Signed distance along `direction` after which `towards_other` (node to its neighbour)
/// becomes octilinear. The preferred alignment wins when reachable, then the shortest move
/// that goes the requested way, then the shortest move overall.
pub fn correction_distance(
    towards_other: Vector,
    direction: OctilinearDirection,
    preferred: Alignment,
) -> Option<(OctilinearDirection, f64)> {
    let u = direction.unit_vector();
    let e = towards_other;
    let solutions: Vec<(Alignment, f64)> = [
        (Alignment::Horizontal, e.y, u.y),
        (Alignment::Vertical, e.x, u.x),
        (Alignment::Diagonal45, e.x - e.y, u.x - u.y),
        (Alignment::Diagonal135, e.x + e.y, u.x + u.y),
    ]
    .into_iter()
    .filter(|&(_, _, den)| den.abs() > SOLVE_EPS)
    .map(|(alignment, num, den)| (alignment, num / den))
    .filter(|&(_, s)| (e - u * s).length() > SOLVE_EPS)
    .collect();

    let chosen = solutions
        .iter()
        .find(|(alignment, _)| *alignment == preferred)
        .or_else(|| {
            solutions
                .iter()
                .filter(|(_, s)| *s > 0.0)
                .min_by(|a, b| a.1.total_cmp(&b.1))
        })
        .or_else(|| solutions.iter().min_by(|a, b| a.1.abs().total_cmp(&b.1.abs())))?;

    let s = chosen.1;
    if s.abs() <= SOLVE_EPS {
        return None;
    }
    Some(if s < 0.0 {
        (direction.opposite(), -s)
    } else {
        (direction, s)
    })
}

/// True if moving `node` would pass the far end of another edge leaving the same way.
fn shortens_past_neighbour(
    graph: &Graph,
    edge: EdgeId,
    node: NodeId,
    direction: OctilinearDirection,
    distance: f64,
) -> Result<bool> {
    for e in graph.other_adjacent_edges(node, edge) {
        let other = graph.edge(e);
        if other.direction_from(node)?.to_octilinear() == direction && other.length() <= distance {
            return Ok(true);
        }
    }
    Ok(false)
}

fn label(graph: &Graph, edge: EdgeId) -> String {
    Element::Edge(edge).label(graph)
}
