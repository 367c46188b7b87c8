#![forbid(unsafe_code)]

//! Metro-map graph model for the `octopus` layout engine.
//!
//! Stations and bends are [`Node`]s, track segments are [`Edge`]s carrying one or more
//! [`Route`]s. Positions are kept on the [`PrecisionModel`](octopus_geom::PrecisionModel)
//! grid of the owning [`Graph`].

pub mod direction;
pub mod error;
pub mod graph;
pub mod route;
pub mod signature;

pub use direction::{Alignment, AnyDirection, OctilinearDirection};
pub use error::{Error, Result};
pub use graph::{Edge, EdgeId, Graph, Node, NodeId};
pub use route::{Color, Route, RouteId};
pub use signature::{NodeSignature, SignatureKind};
