//! Flow path ordering.
//!
//! The solver walks a single chain from the source node to the terminal
//! node. Networks that are not a simple path still produce a chain (the
//! first outgoing segment is followed at every branch) and the deviations are
//! returned as [`TopologyIssue`]s so they surface in the results.

use std::fmt;

use wf_core::{NodeId, SegmentId};

use crate::network::Network;

/// A deviation from the single-simple-path assumption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopologyIssue {
    /// No node has the wellhead role; the source was inferred.
    NoWellhead { inferred: NodeId },
    /// More than one wellhead; the first declared one is used.
    MultipleWellheads { used: NodeId, ignored: Vec<NodeId> },
    /// A node has more than one outgoing segment.
    Branch {
        node: NodeId,
        followed: SegmentId,
        ignored: Vec<SegmentId>,
    },
    /// A node has more than one incoming segment.
    Merge { node: NodeId, inlets: usize },
    /// Following the path returned to an already visited node.
    Cycle { segment: SegmentId, node: NodeId },
    /// Segments not on the solved path.
    UnreachableSegments(Vec<SegmentId>),
    /// Nodes not on the solved path.
    UnreachableNodes(Vec<NodeId>),
}

impl fmt::Display for TopologyIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopologyIssue::NoWellhead { inferred } => {
                write!(f, "no wellhead node; using {} as the source", inferred)
            }
            TopologyIssue::MultipleWellheads { used, ignored } => {
                write!(f, "multiple wellheads; using {}, ignoring {:?}", used, ignored)
            }
            TopologyIssue::Branch {
                node,
                followed,
                ignored,
            } => write!(
                f,
                "branch at node {}: following {}, ignoring {:?}",
                node, followed, ignored
            ),
            TopologyIssue::Merge { node, inlets } => {
                write!(f, "node {} has {} inlet segments", node, inlets)
            }
            TopologyIssue::Cycle { segment, node } => {
                write!(f, "segment {} closes a cycle at node {}", segment, node)
            }
            TopologyIssue::UnreachableSegments(segs) => {
                write!(f, "segments not on the flow path: {:?}", segs)
            }
            TopologyIssue::UnreachableNodes(nodes) => {
                write!(f, "nodes not on the flow path: {:?}", nodes)
            }
        }
    }
}

/// Ordered chain from source to sink.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowPath {
    /// Nodes in flow order; `nodes[0]` is the source.
    pub nodes: Vec<NodeId>,
    /// `segments[i]` connects `nodes[i]` to `nodes[i + 1]`.
    pub segments: Vec<SegmentId>,
    pub issues: Vec<TopologyIssue>,
}

impl FlowPath {
    pub fn source(&self) -> NodeId {
        self.nodes[0]
    }

    pub fn terminal(&self) -> NodeId {
        self.nodes[self.nodes.len() - 1]
    }

    pub fn is_simple_chain(&self) -> bool {
        self.issues.is_empty()
    }
}

impl Network {
    /// Order the network into a single chain starting at the wellhead.
    pub fn flow_path(&self) -> FlowPath {
        let mut issues = Vec::new();
        let source = self.pick_source(&mut issues);

        let mut visited = vec![false; self.nodes.len()];
        let mut nodes = vec![source];
        let mut segments = Vec::new();
        let mut current = source;
        if let Ok(pos) = self.index.node_pos(source) {
            visited[pos] = true;
        }

        loop {
            let out = self.outgoing(current);
            let Some((&next_seg, rest)) = out.split_first() else {
                break;
            };
            if !rest.is_empty() {
                issues.push(TopologyIssue::Branch {
                    node: current,
                    followed: next_seg,
                    ignored: rest.to_vec(),
                });
            }
            let Some(seg) = self.segment(next_seg) else {
                break;
            };
            let Ok(next_pos) = self.index.node_pos(seg.to) else {
                break;
            };
            if visited[next_pos] {
                issues.push(TopologyIssue::Cycle {
                    segment: next_seg,
                    node: seg.to,
                });
                break;
            }
            visited[next_pos] = true;
            segments.push(next_seg);
            nodes.push(seg.to);
            current = seg.to;
        }

        for node in &self.nodes {
            let inlets = self.incoming_count(node.id);
            if inlets > 1 {
                issues.push(TopologyIssue::Merge {
                    node: node.id,
                    inlets,
                });
            }
        }

        let off_path_segments: Vec<SegmentId> = self
            .segments
            .iter()
            .map(|s| s.id)
            .filter(|id| !segments.contains(id))
            .collect();
        if !off_path_segments.is_empty() {
            issues.push(TopologyIssue::UnreachableSegments(off_path_segments));
        }

        let off_path_nodes: Vec<NodeId> = self
            .nodes
            .iter()
            .zip(&visited)
            .filter(|(_, seen)| !**seen)
            .map(|(n, _)| n.id)
            .collect();
        if !off_path_nodes.is_empty() {
            issues.push(TopologyIssue::UnreachableNodes(off_path_nodes));
        }

        FlowPath {
            nodes,
            segments,
            issues,
        }
    }

    /// First wellhead, else the first node with outlets but no inlets, else
    /// the first declared node.
    fn pick_source(&self, issues: &mut Vec<TopologyIssue>) -> NodeId {
        let wellheads: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|n| n.role.is_wellhead())
            .map(|n| n.id)
            .collect();

        if let Some((&used, ignored)) = wellheads.split_first() {
            if !ignored.is_empty() {
                issues.push(TopologyIssue::MultipleWellheads {
                    used,
                    ignored: ignored.to_vec(),
                });
            }
            return used;
        }

        let inferred = self
            .nodes
            .iter()
            .find(|n| self.incoming_count(n.id) == 0 && !self.outgoing(n.id).is_empty())
            .unwrap_or(&self.nodes[0])
            .id;
        issues.push(TopologyIssue::NoWellhead { inferred });
        inferred
    }
}
