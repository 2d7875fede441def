//! Reference networks shared by the engine tests and benches.
//!
//! - [`contact_pair`]: one site between two identical electrodes at a very
//!   high attempt frequency.
//! - [`symmetric_pair`]: two equivalent sites sharing one electrode.
//! - [`biased_chain`]: three sites in a line between a source and a drain.
//! - [`disconnected`]: any layout with every structural weight zero.

use hopnet_core::{HoppingParams, Network, NodeLayout, SquareMatrix};
use hopnet_engine::localized_weights;

/// Distance matrix for nodes on a line at `positions` (layout order).
pub fn line_distances(positions: &[f64]) -> SquareMatrix {
    SquareMatrix::from_fn(positions.len(), |i, j| (positions[i] - positions[j]).abs())
}

/// One site, two electrodes, `nu = 1e12`, `kT = 0.025`, `I0 = R = 1`.
///
/// Both electrodes sit at energy zero, so the half-filled site is already
/// balanced and must stay at `0.5`.
pub fn contact_pair() -> (Network, HoppingParams) {
    let layout = NodeLayout::new(1, 2);
    let distances = SquareMatrix::from_rows(vec![
        vec![1.0, 1.0, 1.0],
        vec![1.0, 1.0, 2.0],
        vec![1.0, 2.0, 1.0],
    ])
    .unwrap();
    let network = Network::new(
        layout,
        distances,
        vec![0.0],
        SquareMatrix::filled(3, 1.0),
    )
    .unwrap();
    let params = HoppingParams {
        nu: 1e12,
        kt: 0.025,
        i0: 1.0,
        r: 1.0,
    };
    (network, params)
}

/// Two sites with identical backgrounds, both at distance 1 from a single
/// electrode and 2 from each other. No Coulomb coupling, `nu = 0.1`.
///
/// By symmetry every start converges to `0.5` on each site.
pub fn symmetric_pair() -> (Network, HoppingParams) {
    let layout = NodeLayout::new(2, 1);
    let distances = SquareMatrix::from_rows(vec![
        vec![1.0, 2.0, 1.0],
        vec![2.0, 1.0, 1.0],
        vec![1.0, 1.0, 1.0],
    ])
    .unwrap();
    let network = Network::new(
        layout,
        distances,
        vec![0.0, 0.0],
        SquareMatrix::filled(3, 1.0),
    )
    .unwrap();
    let params = HoppingParams {
        nu: 0.1,
        kt: 0.025,
        i0: 0.0,
        r: 1.0,
    };
    (network, params)
}

/// Sites at `x = 1, 2, 3` between electrodes at `x = 0` (energy `+0.05`)
/// and `x = 4` (energy `−0.05`), overlap weights `exp(−2d)` (unit
/// localization length), `I0 = 0.1`.
///
/// Electrode 0 acts as the source and electrode 1 as the drain.
pub fn biased_chain() -> (Network, HoppingParams) {
    let layout = NodeLayout::new(3, 2);
    let distances = line_distances(&[1.0, 2.0, 3.0, 0.0, 4.0]);
    let weights = localized_weights(layout, &distances, 1.0).unwrap();
    let network = Network::new(layout, distances, vec![0.0; 3], weights)
        .unwrap()
        .with_electrode_energy(vec![0.05, -0.05])
        .unwrap();
    let params = HoppingParams {
        nu: 1.0,
        kt: 0.025,
        i0: 0.1,
        r: 1.0,
    };
    (network, params)
}

/// `n_sites` sites and `n_electrodes` electrodes with every weight zero.
pub fn disconnected(n_sites: usize, n_electrodes: usize) -> (Network, HoppingParams) {
    let layout = NodeLayout::new(n_sites, n_electrodes);
    let n = layout.len();
    let network = Network::new(
        layout,
        SquareMatrix::filled(n, 1.0),
        vec![0.0; n_sites],
        SquareMatrix::zeros(n),
    )
    .unwrap();
    (network, HoppingParams::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_have_expected_shapes() {
        assert_eq!(contact_pair().0.layout(), NodeLayout::new(1, 2));
        assert_eq!(symmetric_pair().0.layout(), NodeLayout::new(2, 1));
        assert_eq!(biased_chain().0.layout(), NodeLayout::new(3, 2));
        assert_eq!(disconnected(4, 2).0.weights().sum(), 0.0);
    }

    #[test]
    fn chain_weights_skip_electrode_pair() {
        let (network, _) = biased_chain();
        let w = network.weights();
        assert_eq!(w.get(3, 4), 0.0);
        assert_eq!(w.get(0, 0), 0.0);
        assert!((w.get(0, 3) - (-2.0f64).exp()).abs() < 1e-15);
        assert!(w.is_symmetric(0.0));
    }
}
