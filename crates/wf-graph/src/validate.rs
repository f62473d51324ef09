//! Network validation logic.

use crate::error::{GraphError, GraphResult};
use crate::indexing::IndexMap;
use crate::network::{ChokeOpening, DischargeSource, NodeRole, NodeSpec, SegmentSpec};

/// Every segment endpoint must name an existing node.
pub(crate) fn validate_references(index: &IndexMap, segments: &[SegmentSpec]) -> GraphResult<()> {
    for seg in segments {
        for node in [seg.from, seg.to] {
            if !index.contains_node(node) {
                return Err(GraphError::InvalidNodeRef {
                    segment: seg.id,
                    node,
                });
            }
        }
    }
    Ok(())
}

/// Geometry must be finite; length and diameter strictly positive.
pub(crate) fn validate_geometry(segments: &[SegmentSpec]) -> GraphResult<()> {
    for seg in segments {
        let g = &seg.geometry;
        let checks = [
            ("length", g.length.value, g.length.value > 0.0),
            ("diameter", g.diameter.value, g.diameter.value > 0.0),
            ("roughness", g.roughness.value, g.roughness.value >= 0.0),
            ("fittings K", g.k_fittings, g.k_fittings >= 0.0),
            ("elevation change", g.elevation_change.value, true),
        ];
        for (what, value, ok) in checks {
            if !value.is_finite() || !ok {
                return Err(GraphError::InvalidGeometry {
                    segment: seg.id,
                    what,
                    value,
                });
            }
        }
    }
    Ok(())
}

/// Role parameters must be physical.
pub(crate) fn validate_roles(nodes: &[NodeSpec]) -> GraphResult<()> {
    for node in nodes {
        let bad = |what| GraphError::InvalidRole {
            node: node.id,
            what,
        };
        match &node.role {
            NodeRole::SafetyValve { k_factor } | NodeRole::Filter { k_factor } => {
                if !k_factor.is_finite() || *k_factor < 0.0 {
                    return Err(bad("loss coefficient"));
                }
            }
            NodeRole::Choke(choke) => {
                let bore = choke.bore.value;
                if !bore.is_finite() || bore <= 0.0 {
                    return Err(bad("choke bore"));
                }
                if let ChokeOpening::PercentOpen { percent, .. } = choke.opening {
                    if !percent.is_finite() || percent <= 0.0 || percent > 100.0 {
                        return Err(bad("choke opening percent"));
                    }
                }
                match &choke.discharge {
                    DischargeSource::Fixed(cd) if !cd.is_finite() || *cd <= 0.0 => {
                        return Err(bad("discharge coefficient"));
                    }
                    DischargeSource::Custom(points) if points.is_empty() => {
                        return Err(bad("discharge table"));
                    }
                    _ => {}
                }
            }
            NodeRole::Separator {
                max_operating_pressure: Some(p),
            }
            | NodeRole::Flare {
                max_operating_pressure: Some(p),
            } => {
                if !p.value.is_finite() || p.value <= 0.0 {
                    return Err(bad("maximum operating pressure"));
                }
            }
            _ => {}
        }
    }
    Ok(())
}
