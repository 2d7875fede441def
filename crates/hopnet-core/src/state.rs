//! Caller-owned buffers that a run mutates in place.

use crate::error::NetworkError;
use crate::id::NodeLayout;

/// Occupation every site starts from when a state is created or reset.
pub const INITIAL_OCCUPATION: f64 = 0.5;

/// Per-site occupation probabilities, per-electrode charge accumulators
/// and per-site energies.
///
/// The engine overwrites `site_energy` every hop, updates `occupation` and
/// `electrode_charge` in place, and zeroes `electrode_charge` at the start
/// of every non-empty run.
#[derive(Clone, Debug, PartialEq)]
pub struct ChargeState {
    /// Probability that each site holds a charge, nominally in `[0, 1]`.
    pub occupation: Vec<f64>,
    /// Net probability mass exchanged with each electrode since the last
    /// reset. Negative means the electrode supplied charge.
    pub electrode_charge: Vec<f64>,
    /// Last computed energy of each site.
    pub site_energy: Vec<f64>,
}

impl ChargeState {
    /// Fresh buffers for `layout`: every occupation at
    /// [`INITIAL_OCCUPATION`], accumulators and energies at zero.
    pub fn new(layout: NodeLayout) -> Self {
        Self {
            occupation: vec![INITIAL_OCCUPATION; layout.n_sites()],
            electrode_charge: vec![0.0; layout.n_electrodes()],
            site_energy: vec![0.0; layout.n_sites()],
        }
    }

    /// Start from explicit occupations.
    ///
    /// # Errors
    ///
    /// [`NetworkError::LengthMismatch`] unless there is one value per site.
    pub fn with_occupation(layout: NodeLayout, occupation: Vec<f64>) -> Result<Self, NetworkError> {
        if occupation.len() != layout.n_sites() {
            return Err(NetworkError::LengthMismatch {
                what: "occupation",
                expected: layout.n_sites(),
                actual: occupation.len(),
            });
        }
        Ok(Self {
            occupation,
            ..Self::new(layout)
        })
    }

    /// Restore the values [`new`](Self::new) would produce, keeping the
    /// allocations.
    pub fn reset(&mut self) {
        self.occupation.fill(INITIAL_OCCUPATION);
        self.electrode_charge.fill(0.0);
        self.site_energy.fill(0.0);
    }

    /// Whether the buffer lengths match `layout`.
    pub fn matches(&self, layout: NodeLayout) -> bool {
        self.occupation.len() == layout.n_sites()
            && self.site_energy.len() == layout.n_sites()
            && self.electrode_charge.len() == layout.n_electrodes()
    }

    /// Sum of all site occupations.
    pub fn site_mass(&self) -> f64 {
        self.occupation.iter().sum()
    }

    /// Sum of all electrode accumulators.
    pub fn electrode_mass(&self) -> f64 {
        self.electrode_charge.iter().sum()
    }

    /// Whether every buffer value is finite.
    pub fn is_finite(&self) -> bool {
        self.occupation
            .iter()
            .chain(&self.electrode_charge)
            .chain(&self.site_energy)
            .all(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_half_filled() {
        let s = ChargeState::new(NodeLayout::new(3, 2));
        assert_eq!(s.occupation, vec![0.5; 3]);
        assert_eq!(s.electrode_charge, vec![0.0; 2]);
        assert_eq!(s.site_mass(), 1.5);
        assert!(s.is_finite());
    }

    #[test]
    fn reset_restores_initial_values() {
        let layout = NodeLayout::new(2, 1);
        let mut s = ChargeState::with_occupation(layout, vec![0.1, 0.9]).unwrap();
        s.electrode_charge[0] = -3.0;
        s.site_energy[1] = 7.0;
        s.reset();
        assert_eq!(s, ChargeState::new(layout));
    }

    #[test]
    fn occupation_length_checked() {
        let err = ChargeState::with_occupation(NodeLayout::new(2, 1), vec![0.5]).unwrap_err();
        assert!(matches!(
            err,
            NetworkError::LengthMismatch {
                what: "occupation",
                ..
            }
        ));
    }

    #[test]
    fn matches_detects_foreign_layout() {
        let s = ChargeState::new(NodeLayout::new(2, 1));
        assert!(s.matches(NodeLayout::new(2, 1)));
        assert!(!s.matches(NodeLayout::new(2, 2)));
    }
}
