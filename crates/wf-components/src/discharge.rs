//! Discharge coefficient lookup.
//!
//! The default tables are rounded step functions drawn from published choke
//! and orifice data. They are approximate: good enough to seed a study, not a
//! substitute for a vendor curve. Supply a fixed Cd or a custom table when
//! better data exists.

use wf_graph::{ChokeOpening, ChokeSettings, DischargeSource};

use crate::error::{ComponentError, ComponentResult};

/// Sorted step table mapping a threshold to a discharge coefficient.
///
/// `lookup(x)` returns the Cd of the largest threshold not above `x`; values
/// below the first threshold take the first entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CdTable {
    steps: Vec<(f64, f64)>,
}

impl CdTable {
    pub fn new(mut steps: Vec<(f64, f64)>) -> ComponentResult<Self> {
        if steps.is_empty() {
            return Err(ComponentError::InvalidArg {
                what: "discharge table has no entries",
            });
        }
        if steps
            .iter()
            .any(|&(x, cd)| !x.is_finite() || !cd.is_finite() || cd <= 0.0)
        {
            return Err(ComponentError::InvalidArg {
                what: "discharge table entries must be finite with positive Cd",
            });
        }
        steps.sort_by(|a, b| a.0.total_cmp(&b.0));
        Ok(Self { steps })
    }

    /// Cd keyed on percent open for adjustable chokes.
    pub fn default_opening() -> Self {
        Self {
            steps: vec![
                (0.0, 0.60),
                (20.0, 0.65),
                (40.0, 0.72),
                (60.0, 0.78),
                (80.0, 0.82),
                (100.0, 0.84),
            ],
        }
    }

    /// Cd keyed on bore diameter in millimetres for positive chokes.
    pub fn default_bore_mm() -> Self {
        Self {
            steps: vec![
                (0.0, 0.70),
                (6.35, 0.75),
                (12.7, 0.80),
                (19.05, 0.82),
                (25.4, 0.84),
                (38.1, 0.85),
            ],
        }
    }

    pub fn lookup(&self, x: f64) -> f64 {
        let idx = self.steps.partition_point(|&(threshold, _)| threshold <= x);
        self.steps[idx.saturating_sub(1)].1
    }

    pub fn steps(&self) -> &[(f64, f64)] {
        &self.steps
    }
}

/// Table key for a choke: percent open, or bore millimetres for a fixed bean.
fn table_key(settings: &ChokeSettings) -> f64 {
    match settings.opening {
        ChokeOpening::PercentOpen { percent, .. } => percent,
        ChokeOpening::FixedBore => settings.bore.value * 1000.0,
    }
}

/// Resolve the discharge coefficient for a choke.
pub fn resolve_cd(settings: &ChokeSettings) -> ComponentResult<f64> {
    let cd = match &settings.discharge {
        DischargeSource::Fixed(cd) => *cd,
        DischargeSource::OpeningTable => CdTable::default_opening().lookup(table_key(settings)),
        DischargeSource::BoreTable => {
            CdTable::default_bore_mm().lookup(settings.bore.value * 1000.0)
        }
        DischargeSource::Custom(steps) => CdTable::new(steps.clone())?.lookup(table_key(settings)),
    };
    if cd.is_finite() && cd > 0.0 {
        Ok(cd)
    } else {
        Err(ComponentError::NonPhysical {
            what: "discharge coefficient",
        })
    }
}
