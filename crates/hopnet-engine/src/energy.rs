//! Mean-field site energies.
//!
//! Each site's energy is its background minus a Coulomb term proportional
//! to the expected number of *empty* neighbouring sites, weighted by
//! inverse distance. Exact pairwise interaction between discrete charges
//! is replaced by this expectation.

use hopnet_core::{HoppingParams, Network};

/// Recompute every site energy from scratch:
///
/// ```text
/// energy[i] = background[i] − I0·R · Σ_{j site, j≠i} (1 − occupation[j]) / distance[i][j]
/// ```
pub fn update_site_energies(
    network: &Network,
    params: &HoppingParams,
    occupation: &[f64],
    site_energy: &mut [f64],
) {
    let distances = network.distances();
    let coulomb = params.coulomb();
    for (i, (energy, &background)) in site_energy
        .iter_mut()
        .zip(network.background())
        .enumerate()
    {
        let mut empty_neighbours = 0.0;
        for (j, &occ) in occupation.iter().enumerate() {
            if j != i {
                empty_neighbours += (1.0 - occ) / distances.get(i, j);
            }
        }
        *energy = background - coulomb * empty_neighbours;
    }
}
