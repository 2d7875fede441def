//! Benchmark profiles and utilities for the hopnet simulation engine.
//!
//! Provides pre-built [`SimulationConfig`] profiles for benchmarks and
//! demos:
//!
//! - [`reference_profile`]: 30 sites and 8 electrodes in a 20×20 square
//! - [`stress_profile`]: 200 sites and 16 electrodes in a 50×50 square
//! - [`place_sites`]: deterministic site placement via seed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use hopnet_core::{HoppingParams, Network, NetworkError, NodeLayout, SquareMatrix};
use hopnet_engine::{localized_weights, SimulationConfig};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Bias applied to alternating electrodes, in units of energy.
pub const ELECTRODE_BIAS: f64 = 0.5;

/// Build the reference profile: 30 sites, 8 electrodes, side 20.
pub fn reference_profile(seed: u64) -> Result<SimulationConfig, NetworkError> {
    square_profile(30, 8, 20.0, seed)
}

/// Build the stress profile: 200 sites, 16 electrodes, side 50.
///
/// Same construction as [`reference_profile`] at roughly 30x the pair
/// count.
pub fn stress_profile(seed: u64) -> Result<SimulationConfig, NetworkError> {
    square_profile(200, 16, 50.0, seed)
}

/// `count` points drawn uniformly inside a `side × side` square.
pub fn place_sites(count: usize, side: f64, seed: u64) -> Vec<(f64, f64)> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| (rng.random::<f64>() * side, rng.random::<f64>() * side))
        .collect()
}

/// `count` points evenly spaced along the perimeter of the square.
pub fn place_electrodes(count: usize, side: f64) -> Vec<(f64, f64)> {
    let perimeter = 4.0 * side;
    (0..count)
        .map(|k| {
            let s = perimeter * (k as f64 + 0.5) / count as f64;
            match (s / side) as usize {
                0 => (s, 0.0),
                1 => (side, s - side),
                2 => (3.0 * side - s, side),
                _ => (0.0, 4.0 * side - s),
            }
        })
        .collect()
}

fn square_profile(
    n_sites: usize,
    n_electrodes: usize,
    side: f64,
    seed: u64,
) -> Result<SimulationConfig, NetworkError> {
    let layout = NodeLayout::new(n_sites, n_electrodes);
    let mut points = place_sites(n_sites, side, seed);
    points.extend(place_electrodes(n_electrodes, side));

    let distances = SquareMatrix::from_fn(layout.len(), |i, j| {
        let (dx, dy) = (points[i].0 - points[j].0, points[i].1 - points[j].1);
        dx.hypot(dy)
    });
    let weights = localized_weights(layout, &distances, 1.0)?;
    let bias = (0..n_electrodes)
        .map(|k| if k % 2 == 0 { ELECTRODE_BIAS } else { -ELECTRODE_BIAS })
        .collect();

    let network = Network::new(layout, distances, vec![0.0; n_sites], weights)?
        .with_electrode_energy(bias)?;
    let params = HoppingParams {
        nu: 1.0,
        kt: 0.1,
        i0: 0.5,
        r: 1.0,
    };
    Ok(SimulationConfig::new(network, params).seed(seed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_is_deterministic() {
        assert_eq!(place_sites(10, 5.0, 3), place_sites(10, 5.0, 3));
        assert_ne!(place_sites(10, 5.0, 3), place_sites(10, 5.0, 4));
    }

    #[test]
    fn electrodes_lie_on_perimeter() {
        for (x, y) in place_electrodes(8, 10.0) {
            let on_edge = x == 0.0 || x == 10.0 || y == 0.0 || y == 10.0;
            assert!(on_edge, "({x}, {y}) is inside the square");
        }
    }

    #[test]
    fn reference_profile_validates() {
        let config = reference_profile(42).unwrap();
        config.validate().unwrap();
        assert_eq!(config.network.layout(), NodeLayout::new(30, 8));
    }
}
