//! wf-graph: network model layer for wellflow.
//!
//! Provides:
//! - Node and segment specifications (equipment roles, pipe geometry)
//! - Incremental network builder with validation
//! - Flow path ordering with topology diagnostics
//! - Stable id-to-position indexing for the solver
//!
//! # Example
//!
//! ```
//! use wf_core::units::m;
//! use wf_graph::{NetworkBuilder, NodeRole, SegmentGeometry};
//!
//! let mut builder = NetworkBuilder::new();
//! let wh = builder.add_node("Wellhead", NodeRole::Wellhead);
//! let sep = builder.add_node("Separator", NodeRole::Separator { max_operating_pressure: None });
//! builder.add_segment("Flowline", wh, sep, SegmentGeometry::pipe(m(250.0), m(0.1023), m(4.6e-5)));
//! let network = builder.build().unwrap();
//!
//! let path = network.flow_path();
//! assert_eq!(path.nodes, vec![wh, sep]);
//! assert!(path.is_simple_chain());
//! ```

pub mod builder;
pub mod error;
pub mod indexing;
pub mod network;
pub mod path;
pub(crate) mod validate;

pub use builder::NetworkBuilder;
pub use error::{GraphError, GraphResult};
pub use indexing::IndexMap;
pub use network::{
    ChokeOpening, ChokeSettings, DischargeSource, Network, NodeRole, NodeSpec, OpeningLaw,
    SegmentGeometry, SegmentSpec,
};
pub use path::{FlowPath, TopologyIssue};
