#![forbid(unsafe_code)]

//! Makes room in schematic metro maps.
//!
//! Every station and track segment of a [`MetroMap`] is surrounded by a keep-out buffer.
//! Overlapping buffers are [`Conflict`]s, and [`make_space`] resolves them with one of two
//! strategies: uniformly scaling the whole map, or displacing half-planes and repairing the
//! octilinear edges the displacement bent out of shape.

pub mod buffer;
pub mod conflict;
pub mod displace;
pub mod error;
pub mod example;
pub mod map;
pub mod options;
pub mod report;
pub mod scale;

pub use buffer::{Element, ElementBuffer};
pub use conflict::{Axis, Conflict, ConflictFilter, ConflictFinder, ConflictType, MoveVector};
pub use displace::{DisplaceHandler, DisplaceResult};
pub use error::{Error, Result};
pub use map::MetroMap;
pub use options::{MakeSpaceOptions, Strategy};
pub use report::{ConflictSummary, MakeSpaceReport, PassReport};
pub use scale::ScaleHandler;

/// Runs `strategy` on `map` in place and reports what is left.
pub fn make_space(map: &mut MetroMap, strategy: Strategy) -> Result<MakeSpaceReport> {
    tracing::info!(%strategy, nodes = map.graph().node_count(), "make space");
    let passes = match strategy {
        Strategy::Scale => vec![ScaleHandler::new(map).make_space()?],
        Strategy::Displace => DisplaceHandler::new(map).make_space()?,
    };
    let report = MakeSpaceReport::collect(map, strategy, passes);
    tracing::info!(
        converged = report.converged(),
        remaining = report.remaining_conflicts.len(),
        non_octilinear = report.non_octilinear_edges,
        "make space done"
    );
    Ok(report)
}
