use crate::{EdgeId, NodeId};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("node {node} is not an endpoint of edge {edge}")]
    NotAnEndpoint { edge: EdgeId, node: NodeId },
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),
    #[error("unknown edge: {0}")]
    UnknownEdge(EdgeId),
    #[error("angle is not a finite number: {0}")]
    InvalidAngle(f64),
    #[error("edge would connect node {0} to itself")]
    SelfLoop(NodeId),
}

pub type Result<T> = std::result::Result<T, Error>;
