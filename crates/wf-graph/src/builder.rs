//! Incremental network builder.

use wf_core::{NodeId, SegmentId};

use crate::error::GraphResult;
use crate::network::{Network, NodeRole, NodeSpec, SegmentGeometry, SegmentSpec};

/// Builder for constructing a network incrementally.
///
/// Use `add_node` and `add_segment` to build up the network,
/// then call `build()` to validate and freeze it into an immutable `Network`.
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    nodes: Vec<NodeSpec>,
    segments: Vec<SegmentSpec>,
    next_node_id: u32,
    next_segment_id: u32,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node and return its ID.
    pub fn add_node(&mut self, name: impl Into<String>, role: NodeRole) -> NodeId {
        let id = NodeId::from_index(self.next_node_id);
        self.next_node_id += 1;
        self.nodes.push(NodeSpec {
            id,
            name: name.into(),
            role,
        });
        id
    }

    /// Add a pipe segment carrying flow from `from` to `to`.
    ///
    /// References are checked in `build()`.
    pub fn add_segment(
        &mut self,
        name: impl Into<String>,
        from: NodeId,
        to: NodeId,
        geometry: SegmentGeometry,
    ) -> SegmentId {
        let id = SegmentId::from_index(self.next_segment_id);
        self.next_segment_id += 1;
        self.segments.push(SegmentSpec {
            id,
            name: name.into(),
            from,
            to,
            geometry,
        });
        id
    }

    /// Rename a node (useful for post-construction adjustments).
    pub fn rename_node(&mut self, node_id: NodeId, new_name: impl Into<String>) {
        if let Some(node) = self.nodes.iter_mut().find(|n| n.id == node_id) {
            node.name = new_name.into();
        }
    }

    /// Nodes added so far.
    pub fn nodes(&self) -> &[NodeSpec] {
        &self.nodes
    }

    /// Segments added so far.
    pub fn segments(&self) -> &[SegmentSpec] {
        &self.segments
    }

    /// Hand back the raw specs without validation.
    pub fn into_specs(self) -> (Vec<NodeSpec>, Vec<SegmentSpec>) {
        (self.nodes, self.segments)
    }

    /// Validate and build an immutable `Network`.
    pub fn build(self) -> GraphResult<Network> {
        Network::from_specs(self.nodes, self.segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;
    use wf_core::units::m;

    fn pipe() -> SegmentGeometry {
        SegmentGeometry::pipe(m(10.0), m(0.1), m(4.6e-5))
    }

    #[test]
    fn builder_basic() {
        let mut builder = NetworkBuilder::new();
        let n1 = builder.add_node("WH", NodeRole::Wellhead);
        let n2 = builder.add_node("SEP", NodeRole::Generic);
        let s1 = builder.add_segment("Flowline", n1, n2, pipe());

        assert_eq!(n1.index(), 0);
        assert_eq!(n2.index(), 1);
        assert_eq!(s1.index(), 0);
        assert_eq!(builder.nodes().len(), 2);
        assert_eq!(builder.segments().len(), 1);
    }

    #[test]
    fn builder_rename() {
        let mut builder = NetworkBuilder::new();
        let n1 = builder.add_node("Old", NodeRole::Generic);
        builder.rename_node(n1, "New");
        assert_eq!(builder.nodes()[0].name, "New");
    }

    #[test]
    fn builder_build_simple() {
        let mut builder = NetworkBuilder::new();
        let n1 = builder.add_node("N1", NodeRole::Wellhead);
        let n2 = builder.add_node("N2", NodeRole::Generic);
        let s1 = builder.add_segment("S1", n1, n2, pipe());

        let net = builder.build().unwrap();
        assert_eq!(net.nodes().len(), 2);
        assert_eq!(net.segments().len(), 1);
        assert_eq!(net.outgoing(n1), &[s1]);
        assert_eq!(net.node(n2).unwrap().name, "N2");
    }

    #[test]
    fn dangling_reference_rejected() {
        let mut builder = NetworkBuilder::new();
        let n1 = builder.add_node("N1", NodeRole::Wellhead);
        let ghost = NodeId::from_index(99);
        let s1 = builder.add_segment("S1", n1, ghost, pipe());

        assert_eq!(
            builder.build().unwrap_err(),
            GraphError::InvalidNodeRef {
                segment: s1,
                node: ghost
            }
        );
    }
}
