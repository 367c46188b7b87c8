use serde::Serialize;

use crate::buffer::Element;
use crate::conflict::{Conflict, ConflictType};
use crate::map::MetroMap;
use crate::options::Strategy;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassReport {
    pub name: String,
    /// Number of conflicts handled (scalings or displacements).
    pub iterations: usize,
    pub converged: bool,
}

impl PassReport {
    pub fn new(name: impl Into<String>, iterations: usize, converged: bool) -> Self {
        Self {
            name: name.into(),
            iterations,
            converged,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConflictSummary {
    pub conflict_type: ConflictType,
    pub element_a: Element,
    pub element_b: Element,
    pub displace_distance: u32,
}

impl From<&Conflict> for ConflictSummary {
    fn from(conflict: &Conflict) -> Self {
        let (element_a, element_b) = conflict.element_pair();
        Self {
            conflict_type: conflict.conflict_type(),
            element_a,
            element_b,
            displace_distance: conflict.best_displace_distance(),
        }
    }
}

/// Outcome of [`make_space`](crate::make_space). The map itself is changed in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MakeSpaceReport {
    pub strategy: Strategy,
    pub passes: Vec<PassReport>,
    pub remaining_conflicts: Vec<ConflictSummary>,
    pub non_octilinear_edges: usize,
    pub width: f64,
    pub height: f64,
}

impl MakeSpaceReport {
    pub(crate) fn collect(map: &MetroMap, strategy: Strategy, passes: Vec<PassReport>) -> Self {
        let remaining_conflicts = map
            .evaluate_conflicts()
            .iter()
            .map(ConflictSummary::from)
            .collect();
        let (width, height) = map
            .bounding_box()
            .map(|b| (b.width(), b.height()))
            .unwrap_or((0.0, 0.0));
        Self {
            strategy,
            passes,
            remaining_conflicts,
            non_octilinear_edges: map.count_non_octilinear_edges(),
            width,
            height,
        }
    }

    /// Every pass converged and nothing overlaps any more.
    pub fn converged(&self) -> bool {
        self.passes.iter().all(|p| p.converged) && self.remaining_conflicts.is_empty()
    }

    pub fn iterations(&self) -> usize {
        self.passes.iter().map(|p| p.iterations).sum()
    }
}
