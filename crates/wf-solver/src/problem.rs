//! Chain problem: the network resolved into an ordered path of models.

use wf_components::{NodeEquipment, SegmentHydraulics, equipment_for};
use wf_fluids::FluidSpec;
use wf_graph::{Network, NodeSpec};

use crate::error::{SolverError, SolverResult};

/// A network laid out in flow order, ready for iteration.
///
/// `segments[i]` runs from `nodes[i]` to `nodes[i + 1]`; `equipment[i]` is
/// the model for `nodes[i]`.
pub struct ChainProblem<'a> {
    pub fluid: &'a FluidSpec,
    pub nodes: Vec<&'a NodeSpec>,
    pub segments: Vec<SegmentHydraulics>,
    pub equipment: Vec<Box<dyn NodeEquipment>>,
    /// Topology deviations, already rendered for the result.
    pub topology_warnings: Vec<String>,
}

impl<'a> ChainProblem<'a> {
    pub fn new(network: &'a Network, fluid: &'a FluidSpec) -> SolverResult<Self> {
        fluid.validate()?;
        let path = network.flow_path();

        let mut nodes = Vec::with_capacity(path.nodes.len());
        for id in &path.nodes {
            nodes.push(network.node(*id).ok_or_else(|| SolverError::ProblemSetup {
                what: format!("flow path references unknown node {id}"),
            })?);
        }

        let mut segments = Vec::with_capacity(path.segments.len());
        for id in &path.segments {
            let spec = network.segment(*id).ok_or_else(|| SolverError::ProblemSetup {
                what: format!("flow path references unknown segment {id}"),
            })?;
            segments.push(SegmentHydraulics::new(spec));
        }

        let equipment = nodes
            .iter()
            .map(|node| equipment_for(node))
            .collect::<Result<Vec<_>, _>>()?;

        let topology_warnings = path
            .issues
            .iter()
            .map(|issue| format!("topology: {issue}"))
            .collect();

        Ok(Self {
            fluid,
            nodes,
            segments,
            equipment,
            topology_warnings,
        })
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wf_core::units::{k, kpa, m};
    use wf_fluids::StandardRate;
    use wf_graph::{NetworkBuilder, NodeRole, SegmentGeometry};

    fn gas() -> FluidSpec {
        FluidSpec::gas(kpa(5000.0), k(333.0), 18.2, 1.3, 1.0, StandardRate::mscfd(10.0))
    }

    #[test]
    fn chain_in_flow_order() {
        let mut b = NetworkBuilder::new();
        // Declared out of order on purpose.
        let sep = b.add_node("SEP", NodeRole::Generic);
        let wh = b.add_node("WH", NodeRole::Wellhead);
        b.add_segment("L1", wh, sep, SegmentGeometry::pipe(m(10.0), m(0.1), m(4.6e-5)));
        let net = b.build().unwrap();
        let fluid = gas();

        let problem = ChainProblem::new(&net, &fluid).unwrap();
        assert_eq!(problem.node_count(), 2);
        assert_eq!(problem.nodes[0].name, "WH");
        assert_eq!(problem.equipment[1].name(), "SEP");
        assert_eq!(problem.segments[0].name(), "L1");
        assert!(problem.topology_warnings.is_empty());
    }

    #[test]
    fn invalid_fluid_rejected() {
        let mut b = NetworkBuilder::new();
        b.add_node("WH", NodeRole::Wellhead);
        let net = b.build().unwrap();
        let mut fluid = gas();
        fluid.molecular_weight = 0.0;
        assert!(matches!(
            ChainProblem::new(&net, &fluid),
            Err(SolverError::Fluid(_))
        ));
    }
}
