//! Immutable description of a hopping network.
//!
//! A [`Network`] bundles everything that stays fixed for a run: the node
//! layout, pairwise distances, per-site background energies, per-electrode
//! energies and the structural weight of every directed pair. Shapes are
//! checked once at construction; values are trusted.

use crate::error::NetworkError;
use crate::id::NodeLayout;
use crate::matrix::SquareMatrix;

/// The fixed inputs of a simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct Network {
    layout: NodeLayout,
    distances: SquareMatrix,
    background: Vec<f64>,
    electrode_energy: Vec<f64>,
    weights: SquareMatrix,
}

impl Network {
    /// Assemble a network from typed parts.
    ///
    /// Electrode energies start at zero; see
    /// [`with_electrode_energy`](Self::with_electrode_energy).
    ///
    /// # Errors
    ///
    /// [`NetworkError::LengthMismatch`] if a matrix is not `N×N` or
    /// `background` does not have one entry per site.
    pub fn new(
        layout: NodeLayout,
        distances: SquareMatrix,
        background: Vec<f64>,
        weights: SquareMatrix,
    ) -> Result<Self, NetworkError> {
        let n = layout.len();
        check_dim("distances", n, &distances)?;
        check_dim("weights", n, &weights)?;
        check_len("background energy", layout.n_sites(), background.len())?;
        Ok(Self {
            layout,
            distances,
            background,
            electrode_energy: vec![0.0; layout.n_electrodes()],
            weights,
        })
    }

    /// Assemble a network from flattened row-major buffers using the
    /// contiguous numbering (sites first, then electrodes).
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn from_row_major(
        n_sites: usize,
        n_electrodes: usize,
        distances: Vec<f64>,
        background: Vec<f64>,
        weights: Vec<f64>,
    ) -> Result<Self, NetworkError> {
        let layout = NodeLayout::new(n_sites, n_electrodes);
        let n = layout.len();
        Self::new(
            layout,
            SquareMatrix::from_row_major("distances", n, distances)?,
            background,
            SquareMatrix::from_row_major("weights", n, weights)?,
        )
    }

    /// Set a constant energy for each electrode.
    ///
    /// With all electrode energies equal no net current flows in steady
    /// state; a difference between two electrodes acts as a bias.
    ///
    /// # Errors
    ///
    /// [`NetworkError::LengthMismatch`] unless there is one value per
    /// electrode.
    pub fn with_electrode_energy(mut self, energy: Vec<f64>) -> Result<Self, NetworkError> {
        check_len("electrode energy", self.layout.n_electrodes(), energy.len())?;
        self.electrode_energy = energy;
        Ok(self)
    }

    /// Replace the structural weights.
    ///
    /// # Errors
    ///
    /// [`NetworkError::LengthMismatch`] if `weights` is not `N×N`.
    pub fn with_weights(mut self, weights: SquareMatrix) -> Result<Self, NetworkError> {
        check_dim("weights", self.layout.len(), &weights)?;
        self.weights = weights;
        Ok(self)
    }

    /// Node layout.
    pub fn layout(&self) -> NodeLayout {
        self.layout
    }

    /// Number of sites.
    pub fn n_sites(&self) -> usize {
        self.layout.n_sites()
    }

    /// Number of electrodes.
    pub fn n_electrodes(&self) -> usize {
        self.layout.n_electrodes()
    }

    /// Pairwise distances.
    pub fn distances(&self) -> &SquareMatrix {
        &self.distances
    }

    /// Per-site background energy.
    pub fn background(&self) -> &[f64] {
        &self.background
    }

    /// Per-electrode energy.
    pub fn electrode_energy(&self) -> &[f64] {
        &self.electrode_energy
    }

    /// Structural weight of every directed pair.
    pub fn weights(&self) -> &SquareMatrix {
        &self.weights
    }

    /// Directed pairs whose structural weight is negative, as
    /// `(from, to, weight)`.
    pub fn negative_weights(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.weights.entries().filter(|&(_, _, w)| w < 0.0)
    }
}

fn check_dim(what: &'static str, n: usize, m: &SquareMatrix) -> Result<(), NetworkError> {
    if m.dim() != n {
        return Err(NetworkError::LengthMismatch {
            what,
            expected: n * n,
            actual: m.dim() * m.dim(),
        });
    }
    Ok(())
}

fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<(), NetworkError> {
    if expected != actual {
        return Err(NetworkError::LengthMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_one() -> Network {
        Network::from_row_major(
            2,
            1,
            vec![0.0, 1.0, 1.0, 1.0, 0.0, 1.0, 1.0, 1.0, 0.0],
            vec![0.1, 0.2],
            vec![1.0; 9],
        )
        .unwrap()
    }

    #[test]
    fn from_row_major_builds_layout() {
        let net = two_by_one();
        assert_eq!(net.n_sites(), 2);
        assert_eq!(net.n_electrodes(), 1);
        assert_eq!(net.distances().dim(), 3);
        assert_eq!(net.electrode_energy(), &[0.0]);
    }

    #[test]
    fn background_length_checked() {
        let err = Network::from_row_major(2, 1, vec![1.0; 9], vec![0.0], vec![1.0; 9]).unwrap_err();
        assert_eq!(
            err,
            NetworkError::LengthMismatch {
                what: "background energy",
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn weight_shape_checked() {
        let err = Network::from_row_major(2, 1, vec![1.0; 9], vec![0.0; 2], vec![1.0; 4]).unwrap_err();
        assert!(matches!(
            err,
            NetworkError::LengthMismatch { what: "weights", .. }
        ));
    }

    #[test]
    fn electrode_energy_length_checked() {
        assert!(two_by_one().with_electrode_energy(vec![0.1, 0.2]).is_err());
        let net = two_by_one().with_electrode_energy(vec![0.3]).unwrap();
        assert_eq!(net.electrode_energy(), &[0.3]);
    }

    #[test]
    fn negative_weights_listed() {
        let mut w = SquareMatrix::filled(3, 1.0);
        w.set(0, 2, -0.5);
        let net = two_by_one().with_weights(w).unwrap();
        let negatives: Vec<_> = net.negative_weights().collect();
        assert_eq!(negatives, vec![(0, 2, -0.5)]);
    }
}
