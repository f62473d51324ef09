//! Stable indexing between caller ids and arena positions.
//!
//! Ids handed in through [`Network::from_specs`](crate::Network::from_specs)
//! need not be contiguous, so the solver never assumes `id.index()` is a
//! position. All lookups go through this map.

use wf_core::{NodeId, SegmentId};

use crate::error::{GraphError, GraphResult};
use crate::network::{NodeSpec, SegmentSpec};

/// O(1) lookup from ids to arena positions.
#[derive(Debug, Clone)]
pub struct IndexMap {
    /// Reverse lookup: NodeId -> position.
    /// Sized to max(NodeId.index) + 1; None if that ID doesn't exist.
    node_to_pos: Vec<Option<usize>>,

    /// Reverse lookup: SegmentId -> position.
    segment_to_pos: Vec<Option<usize>>,

    node_count: usize,
    segment_count: usize,
}

impl IndexMap {
    /// Build the map, rejecting duplicate ids.
    pub fn new(nodes: &[NodeSpec], segments: &[SegmentSpec]) -> GraphResult<Self> {
        let max_node = nodes.iter().map(|n| n.id.index()).max().unwrap_or(0);
        let max_seg = segments.iter().map(|s| s.id.index()).max().unwrap_or(0);

        let mut node_to_pos = vec![None; max_node + 1];
        for (pos, n) in nodes.iter().enumerate() {
            let slot = &mut node_to_pos[n.id.index()];
            if slot.is_some() {
                return Err(GraphError::DuplicateNode { node: n.id });
            }
            *slot = Some(pos);
        }

        let mut segment_to_pos = vec![None; max_seg + 1];
        for (pos, s) in segments.iter().enumerate() {
            let slot = &mut segment_to_pos[s.id.index()];
            if slot.is_some() {
                return Err(GraphError::DuplicateSegment { segment: s.id });
            }
            *slot = Some(pos);
        }

        Ok(Self {
            node_to_pos,
            segment_to_pos,
            node_count: nodes.len(),
            segment_count: segments.len(),
        })
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn segment_count(&self) -> usize {
        self.segment_count
    }

    /// Arena position of a node.
    pub fn node_pos(&self, id: NodeId) -> GraphResult<usize> {
        self.node_to_pos
            .get(id.index())
            .and_then(|&opt| opt)
            .ok_or(GraphError::IdNotFound { what: "NodeId" })
    }

    /// Arena position of a segment.
    pub fn segment_pos(&self, id: SegmentId) -> GraphResult<usize> {
        self.segment_to_pos
            .get(id.index())
            .and_then(|&opt| opt)
            .ok_or(GraphError::IdNotFound { what: "SegmentId" })
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.node_pos(id).is_ok()
    }
}
