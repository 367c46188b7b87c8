//! Space making by displacing half-planes, followed by octilinear repair.

mod adjuster;
mod bend;
mod guard;

pub use adjuster::EdgeAdjuster;
pub use bend::{insert_bend_nodes, merge_bend_nodes, octilinear_vertices};
pub use guard::AdjustmentGuard;

use octopus_geom::Point;
use octopus_graph::{NodeId, OctilinearDirection};
use tracing::{debug, info, warn};

use crate::buffer::Element;
use crate::conflict::{Axis, Conflict, ConflictFilter};
use crate::error::Result;
use crate::map::MetroMap;
use crate::report::PassReport;

/// One sweep over the conflict list with its own filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplacePass {
    pub name: &'static str,
    pub correction_factor: f64,
    pub major_misalignment_only: bool,
}

impl DisplacePass {
    pub fn filter(&self) -> ConflictFilter {
        ConflictFilter {
            correction_factor: self.correction_factor,
            major_misalignment_only: self.major_misalignment_only,
        }
    }
}

/// Large misalignments first, then everything that is left.
pub const PASSES: [DisplacePass; 2] = [
    DisplacePass {
        name: "pass1",
        correction_factor: 0.25,
        major_misalignment_only: true,
    },
    DisplacePass {
        name: "pass2",
        correction_factor: 1.0,
        major_misalignment_only: false,
    },
];

/// What a single displacement did to the map.
#[derive(Debug, Clone)]
pub struct DisplaceResult {
    conflict: Conflict,
    direction: OctilinearDirection,
    distance: f64,
    displaced_nodes: Vec<NodeId>,
    other_conflicts: Vec<Conflict>,
}

impl DisplaceResult {
    pub fn conflict(&self) -> &Conflict {
        &self.conflict
    }

    pub fn axis(&self) -> Axis {
        self.conflict.best_displace_axis()
    }

    pub fn displacement_origin(&self) -> Point {
        self.conflict.displacement_origin()
    }

    /// Direction the half-plane was pushed in.
    pub fn direction(&self) -> OctilinearDirection {
        self.direction
    }

    /// Repairs move nodes across the displacement, never along it.
    pub fn correction_direction(&self) -> OctilinearDirection {
        match self.axis() {
            Axis::X => OctilinearDirection::North,
            Axis::Y => OctilinearDirection::West,
        }
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn displaced_nodes(&self) -> &[NodeId] {
        &self.displaced_nodes
    }

    pub fn other_conflicts(&self) -> &[Conflict] {
        &self.other_conflicts
    }
}

/// Index of the conflict to solve next: the first one, unless it is the pair solved last
/// time and there is an alternative.
pub fn select_conflict(conflicts: &[Conflict], last: Option<(Element, Element)>) -> Option<usize> {
    let first = conflicts.first()?;
    if conflicts.len() > 1 && last == Some(first.element_pair()) {
        return Some(1);
    }
    Some(0)
}

/// Pushes every node beyond the conflict's displacement origin by its best distance.
pub fn displace_nodes(
    map: &mut MetroMap,
    conflict: Conflict,
    other_conflicts: Vec<Conflict>,
) -> Result<DisplaceResult> {
    let graph = map.graph_mut();
    graph.snapshot_directions();

    let axis = conflict.best_displace_axis();
    let origin = axis.coordinate(conflict.displacement_origin());
    let distance = f64::from(conflict.best_displace_distance());
    let step = axis.unit() * distance;

    let displaced_nodes: Vec<NodeId> = graph
        .nodes()
        .filter(|n| axis.coordinate(n.position()) > origin)
        .map(|n| n.id())
        .collect();
    for &id in &displaced_nodes {
        graph.translate_node(id, step.x, step.y)?;
    }
    debug!(
        axis = ?axis,
        distance,
        nodes = displaced_nodes.len(),
        "displaced half-plane"
    );

    Ok(DisplaceResult {
        direction: axis.direction(),
        conflict,
        distance,
        displaced_nodes,
        other_conflicts,
    })
}

pub struct DisplaceHandler<'a> {
    map: &'a mut MetroMap,
}

impl<'a> DisplaceHandler<'a> {
    pub fn new(map: &'a mut MetroMap) -> Self {
        Self { map }
    }

    pub fn make_space(&mut self) -> Result<Vec<PassReport>> {
        let mut reports = Vec::with_capacity(PASSES.len());
        for pass in PASSES {
            reports.push(self.run_pass(pass)?);
        }
        self.straighten_remaining_edges()?;
        for conflict in self.map.evaluate_conflicts() {
            warn!(conflict = %conflict.describe(self.map.graph()), "conflict not solved");
        }
        if let Some((width, height)) = self.map.size() {
            info!("Size: {width}x{height}");
        }
        Ok(reports)
    }

    /// Bends every routed edge that is still non-octilinear once no displacement is left to
    /// repair after. Edges that cannot be bent are logged and left as they are.
    pub fn straighten_remaining_edges(&mut self) -> Result<usize> {
        let edges = self.map.graph().non_octilinear_edges();
        let mut bent = 0;
        for edge in edges {
            let graph = self.map.graph();
            let e = graph.edge(edge);
            if e.is_deleted() || e.is_octilinear() {
                continue;
            }
            if !e.has_routes() {
                debug!(edge = %Element::Edge(edge).label(graph), "unrouted edge left skewed");
                continue;
            }
            if insert_bend_nodes(self.map.graph_mut(), edge)? {
                bent += 1;
            } else {
                warn!(
                    edge = %Element::Edge(edge).label(self.map.graph()),
                    "routed edge could not be made octilinear"
                );
            }
        }
        if bent > 0 {
            info!(edges = bent, "bent remaining non-octilinear edges");
        }
        Ok(bent)
    }

    pub fn run_pass(&mut self, pass: DisplacePass) -> Result<PassReport> {
        let max_iterations = self.map.options().max_iterations_displace;
        let filter = pass.filter();
        let mut last: Option<(Element, Element)> = None;
        let mut iterations = 0;
        loop {
            let mut conflicts = self.map.evaluate_conflicts_with(filter);
            info!(
                pass = pass.name,
                iteration = iterations,
                conflicts = conflicts.len(),
                "displace iteration"
            );
            let Some(index) = select_conflict(&conflicts, last) else {
                return Ok(PassReport::new(pass.name, iterations, true));
            };
            if iterations == max_iterations {
                warn!(
                    pass = pass.name,
                    max_iterations,
                    remaining = conflicts.len(),
                    "max number of displace iterations reached"
                );
                return Ok(PassReport::new(pass.name, iterations, false));
            }
            if index > 0 {
                debug!(
                    skipped = %conflicts[0].describe(self.map.graph()),
                    "conflict solved last time is still first, trying the next one"
                );
            }

            let conflict = conflicts.remove(index);
            debug!(conflict = %conflict.describe(self.map.graph()), "solving conflict");
            last = Some(conflict.element_pair());

            let result = displace_nodes(self.map, conflict, conflicts)?;
            EdgeAdjuster::new(self.map, &result).correct_non_octilinear_edges()?;
            iterations += 1;
        }
    }
}
