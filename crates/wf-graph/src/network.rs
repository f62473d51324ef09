//! Core network data structures.

use wf_core::units::{Length, Pressure, m};
use wf_core::{NodeId, SegmentId};

use crate::error::{GraphError, GraphResult};
use crate::indexing::IndexMap;
use crate::validate;

/// How a choke's effective area follows its opening percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpeningLaw {
    /// Effective area = bore area * fraction open
    Linear,
    /// Effective area = bore area * fraction open^2
    Quadratic,
}

/// How the choke restriction is specified.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChokeOpening {
    /// Positive (fixed bean) choke: the full bore is the restriction.
    FixedBore,
    /// Adjustable choke set to a percentage of the full bore.
    PercentOpen { percent: f64, law: OpeningLaw },
}

/// Where the choke discharge coefficient comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum DischargeSource {
    /// Resolved value supplied by the caller.
    Fixed(f64),
    /// Default step table keyed on percent open.
    OpeningTable,
    /// Default step table keyed on bore diameter in millimetres.
    BoreTable,
    /// Caller supplied `(threshold, cd)` breakpoints, keyed on percent open
    /// for adjustable chokes and on bore millimetres for fixed ones.
    Custom(Vec<(f64, f64)>),
}

/// Resolved choke parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ChokeSettings {
    /// Full bore diameter of the restriction.
    pub bore: Length,
    pub opening: ChokeOpening,
    pub discharge: DischargeSource,
}

impl ChokeSettings {
    /// Fixed bean choke with a known discharge coefficient.
    pub fn fixed(bore: Length, cd: f64) -> Self {
        Self {
            bore,
            opening: ChokeOpening::FixedBore,
            discharge: DischargeSource::Fixed(cd),
        }
    }

    /// Adjustable choke with Cd from the default opening table.
    pub fn adjustable(bore: Length, percent: f64) -> Self {
        Self {
            bore,
            opening: ChokeOpening::PercentOpen {
                percent,
                law: OpeningLaw::Linear,
            },
            discharge: DischargeSource::OpeningTable,
        }
    }

    pub fn with_law(mut self, law: OpeningLaw) -> Self {
        if let ChokeOpening::PercentOpen { percent, .. } = self.opening {
            self.opening = ChokeOpening::PercentOpen { percent, law };
        }
        self
    }

    pub fn with_discharge(mut self, discharge: DischargeSource) -> Self {
        self.discharge = discharge;
        self
    }
}

/// Role a node plays in the production chain, with its equipment parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeRole {
    Wellhead,
    /// Emergency shutdown / safety valve, modelled as a lumped loss.
    SafetyValve { k_factor: f64 },
    /// Filter or strainer, modelled as a lumped loss.
    Filter { k_factor: f64 },
    Choke(ChokeSettings),
    Separator { max_operating_pressure: Option<Pressure> },
    Flare { max_operating_pressure: Option<Pressure> },
    Generic,
}

impl NodeRole {
    /// Short tag for reports.
    pub fn tag(&self) -> &'static str {
        match self {
            NodeRole::Wellhead => "wellhead",
            NodeRole::SafetyValve { .. } => "safety-valve",
            NodeRole::Filter { .. } => "filter",
            NodeRole::Choke(_) => "choke",
            NodeRole::Separator { .. } => "separator",
            NodeRole::Flare { .. } => "flare",
            NodeRole::Generic => "generic",
        }
    }

    pub fn is_wellhead(&self) -> bool {
        matches!(self, NodeRole::Wellhead)
    }
}

/// A node in the flow network (a piece of equipment or a junction point).
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSpec {
    pub id: NodeId,
    pub name: String,
    pub role: NodeRole,
}

/// Physical description of a pipe run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentGeometry {
    pub length: Length,
    /// Internal diameter.
    pub diameter: Length,
    /// Absolute wall roughness.
    pub roughness: Length,
    /// Lumped fittings loss coefficient (sum of K for bends, tees, ...).
    pub k_fittings: f64,
    /// Outlet elevation minus inlet elevation. Negative is downhill.
    pub elevation_change: Length,
}

impl SegmentGeometry {
    /// Horizontal pipe without fittings.
    pub fn pipe(length: Length, diameter: Length, roughness: Length) -> Self {
        Self {
            length,
            diameter,
            roughness,
            k_fittings: 0.0,
            elevation_change: m(0.0),
        }
    }

    pub fn with_fittings(mut self, k_fittings: f64) -> Self {
        self.k_fittings = k_fittings;
        self
    }

    pub fn with_elevation_change(mut self, dz: Length) -> Self {
        self.elevation_change = dz;
        self
    }
}

/// A pipe segment carrying flow from `from` to `to`.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentSpec {
    pub id: SegmentId,
    pub name: String,
    pub from: NodeId,
    pub to: NodeId,
    pub geometry: SegmentGeometry,
}

impl SegmentSpec {
    /// Flow cross-section πd²/4 in m².
    pub fn area_m2(&self) -> f64 {
        let d = self.geometry.diameter.value;
        std::f64::consts::PI * d * d / 4.0
    }
}

/// A validated, immutable network of nodes and segments.
///
/// Nodes and segments are stored in arenas in declaration order. Per-node
/// adjacency is kept in compact offset form:
/// node i's outgoing segments are `outgoing[out_offsets[i]..out_offsets[i+1]]`.
#[derive(Debug, Clone)]
pub struct Network {
    pub(crate) nodes: Vec<NodeSpec>,
    pub(crate) segments: Vec<SegmentSpec>,
    pub(crate) index: IndexMap,
    pub(crate) out_offsets: Vec<usize>,
    pub(crate) outgoing: Vec<SegmentId>,
    pub(crate) incoming_count: Vec<usize>,
}

impl Network {
    /// Validate caller supplied specs and build the network.
    ///
    /// Segment references must resolve and geometry must be physical.
    /// Topology shape (branches, cycles) is not an error here; see
    /// [`Network::flow_path`].
    pub fn from_specs(nodes: Vec<NodeSpec>, segments: Vec<SegmentSpec>) -> GraphResult<Self> {
        if nodes.is_empty() {
            return Err(GraphError::Empty);
        }
        let index = IndexMap::new(&nodes, &segments)?;
        validate::validate_references(&index, &segments)?;
        validate::validate_geometry(&segments)?;
        validate::validate_roles(&nodes)?;

        let mut per_node: Vec<Vec<SegmentId>> = vec![Vec::new(); nodes.len()];
        let mut incoming_count = vec![0; nodes.len()];
        for seg in &segments {
            per_node[index.node_pos(seg.from)?].push(seg.id);
            incoming_count[index.node_pos(seg.to)?] += 1;
        }

        let mut out_offsets = Vec::with_capacity(nodes.len() + 1);
        let mut outgoing = Vec::with_capacity(segments.len());
        out_offsets.push(0);
        for list in per_node {
            outgoing.extend(list);
            out_offsets.push(outgoing.len());
        }

        Ok(Self {
            nodes,
            segments,
            index,
            out_offsets,
            outgoing,
            incoming_count,
        })
    }

    /// All nodes in declaration order.
    pub fn nodes(&self) -> &[NodeSpec] {
        &self.nodes
    }

    /// All segments in declaration order.
    pub fn segments(&self) -> &[SegmentSpec] {
        &self.segments
    }

    pub fn index(&self) -> &IndexMap {
        &self.index
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeSpec> {
        let pos = self.index.node_pos(id).ok()?;
        self.nodes.get(pos)
    }

    pub fn segment(&self, id: SegmentId) -> Option<&SegmentSpec> {
        let pos = self.index.segment_pos(id).ok()?;
        self.segments.get(pos)
    }

    /// Segments leaving a node, in declaration order.
    pub fn outgoing(&self, id: NodeId) -> &[SegmentId] {
        match self.index.node_pos(id) {
            Ok(pos) => &self.outgoing[self.out_offsets[pos]..self.out_offsets[pos + 1]],
            Err(_) => &[],
        }
    }

    /// Number of segments entering a node.
    pub fn incoming_count(&self, id: NodeId) -> usize {
        self.index
            .node_pos(id)
            .map(|pos| self.incoming_count[pos])
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wf_core::units::m;

    fn node(i: u32, role: NodeRole) -> NodeSpec {
        NodeSpec {
            id: NodeId::from_index(i),
            name: format!("N{i}"),
            role,
        }
    }

    fn seg(i: u32, from: u32, to: u32) -> SegmentSpec {
        SegmentSpec {
            id: SegmentId::from_index(i),
            name: format!("S{i}"),
            from: NodeId::from_index(from),
            to: NodeId::from_index(to),
            geometry: SegmentGeometry::pipe(m(10.0), m(0.1), m(4.6e-5)),
        }
    }

    #[test]
    fn role_tags() {
        assert_eq!(NodeRole::Wellhead.tag(), "wellhead");
        assert_eq!(NodeRole::Filter { k_factor: 1.0 }.tag(), "filter");
        assert!(NodeRole::Wellhead.is_wellhead());
        assert!(!NodeRole::Generic.is_wellhead());
    }

    #[test]
    fn choke_settings_builders() {
        let c = ChokeSettings::adjustable(m(0.0254), 50.0).with_law(OpeningLaw::Quadratic);
        assert_eq!(
            c.opening,
            ChokeOpening::PercentOpen {
                percent: 50.0,
                law: OpeningLaw::Quadratic
            }
        );
        // Law is meaningless for a fixed bore.
        let f = ChokeSettings::fixed(m(0.0127), 0.85).with_law(OpeningLaw::Quadratic);
        assert_eq!(f.opening, ChokeOpening::FixedBore);
    }

    #[test]
    fn adjacency_from_specs() {
        let nodes = vec![
            node(0, NodeRole::Wellhead),
            node(1, NodeRole::Generic),
            node(2, NodeRole::Generic),
        ];
        let segments = vec![seg(0, 0, 1), seg(1, 1, 2)];
        let net = Network::from_specs(nodes, segments).unwrap();

        assert_eq!(net.outgoing(NodeId::from_index(0)), &[SegmentId::from_index(0)]);
        assert_eq!(net.outgoing(NodeId::from_index(2)), &[] as &[SegmentId]);
        assert_eq!(net.incoming_count(NodeId::from_index(0)), 0);
        assert_eq!(net.incoming_count(NodeId::from_index(2)), 1);
    }

    #[test]
    fn segment_area() {
        let s = seg(0, 0, 1);
        let expected = std::f64::consts::PI * 0.01 / 4.0;
        assert!((s.area_m2() - expected).abs() < 1e-15);
    }

    #[test]
    fn empty_network_rejected() {
        assert_eq!(
            Network::from_specs(vec![], vec![]).unwrap_err(),
            GraphError::Empty
        );
    }
}
