//! Network-specific error types.

use wf_core::{NodeId, SegmentId, WfError};

pub type GraphResult<T> = Result<T, GraphError>;

/// Network construction and validation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphError {
    /// The network has no nodes.
    Empty,

    /// Two nodes share the same id.
    DuplicateNode { node: NodeId },

    /// Two segments share the same id.
    DuplicateSegment { segment: SegmentId },

    /// A segment refers to a node that doesn't exist.
    InvalidNodeRef { segment: SegmentId, node: NodeId },

    /// A segment has non-physical geometry.
    InvalidGeometry {
        segment: SegmentId,
        what: &'static str,
        value: f64,
    },

    /// A node's role parameters are non-physical.
    InvalidRole { node: NodeId, what: &'static str },

    /// ID not found in index map.
    IdNotFound { what: &'static str },
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::Empty => write!(f, "Network has no nodes"),
            GraphError::DuplicateNode { node } => write!(f, "Duplicate node id {}", node),
            GraphError::DuplicateSegment { segment } => {
                write!(f, "Duplicate segment id {}", segment)
            }
            GraphError::InvalidNodeRef { segment, node } => {
                write!(f, "Segment {} refers to non-existent node {}", segment, node)
            }
            GraphError::InvalidGeometry {
                segment,
                what,
                value,
            } => {
                write!(f, "Segment {} has invalid {}: {}", segment, what, value)
            }
            GraphError::InvalidRole { node, what } => {
                write!(f, "Node {} has invalid {}", node, what)
            }
            GraphError::IdNotFound { what } => {
                write!(f, "{} not found in index map", what)
            }
        }
    }
}

impl std::error::Error for GraphError {}

impl From<GraphError> for WfError {
    fn from(err: GraphError) -> Self {
        WfError::InvalidArg {
            what: err.to_string(),
        }
    }
}
