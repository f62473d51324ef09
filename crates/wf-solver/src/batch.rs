//! Independent scenarios solved in parallel.

use rayon::prelude::*;
use wf_fluids::FluidSpec;
use wf_graph::{NodeSpec, SegmentSpec};

use crate::error::SolverResult;
use crate::options::SolveOptions;
use crate::solution::NetworkSolution;
use crate::solve::solve;

/// One complete solve input.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub nodes: Vec<NodeSpec>,
    pub segments: Vec<SegmentSpec>,
    pub fluid: FluidSpec,
}

impl Scenario {
    pub fn solve(&self, options: &SolveOptions) -> SolverResult<NetworkSolution> {
        solve(&self.nodes, &self.segments, &self.fluid, options)
    }
}

/// Solve every scenario on the rayon pool. Results keep input order.
pub fn solve_batch(
    scenarios: &[Scenario],
    options: &SolveOptions,
) -> Vec<SolverResult<NetworkSolution>> {
    scenarios.par_iter().map(|s| s.solve(options)).collect()
}
