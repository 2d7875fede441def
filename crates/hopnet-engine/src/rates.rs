//! Transition rate calculator.
//!
//! [`RateTable`] owns the `N×N` rate matrix and the per-site flow scratch
//! vectors. It is sized once per simulator and rebuilt in place every hop.

use hopnet_core::{HoppingParams, Network, Node, PairKind, SquareMatrix};

use crate::gate::availability;

/// Directed transition rates for one hop, plus the aggregates the step
/// controller needs.
#[derive(Clone, Debug)]
pub struct RateTable {
    rates: SquareMatrix,
    net_flow: Vec<f64>,
    inflow: Vec<f64>,
    total: f64,
}

impl RateTable {
    /// Zeroed scratch for a network with `n_nodes` nodes and `n_sites`
    /// sites.
    pub fn new(n_nodes: usize, n_sites: usize) -> Self {
        Self {
            rates: SquareMatrix::zeros(n_nodes),
            net_flow: vec![0.0; n_sites],
            inflow: vec![0.0; n_sites],
            total: 0.0,
        }
    }

    /// Rebuild every rate from the current occupations and site energies.
    ///
    /// For each ordered pair that can transfer charge:
    ///
    /// ```text
    /// dE   = E[j] − E[i] − I0·R / d[i][j]   (site → site)
    /// dE   = E[j] − E[i]                     (otherwise; electrodes use their fixed energy)
    /// rate = gate · nu · exp(−dE / kT)       if dE > 0
    /// rate = gate · nu                       otherwise
    /// rate *= weight[i][j]
    /// ```
    ///
    /// Self pairs and electrode-electrode pairs get rate `0`. Returns the
    /// total rate.
    pub fn compute(
        &mut self,
        network: &Network,
        params: &HoppingParams,
        occupation: &[f64],
        site_energy: &[f64],
    ) -> f64 {
        let layout = network.layout();
        let distances = network.distances();
        let weights = network.weights();
        let electrode_energy = network.electrode_energy();
        let energy_of = |node: Node| match node {
            Node::Site(i) => site_energy[i],
            Node::Electrode(k) => electrode_energy[k],
        };
        let coulomb = params.coulomb();

        self.net_flow.fill(0.0);
        self.inflow.fill(0.0);
        self.total = 0.0;

        let n = layout.len();
        for i in 0..n {
            for j in 0..n {
                let kind = layout.pair(i, j);
                if !kind.transfers_charge() {
                    self.rates.set(i, j, 0.0);
                    continue;
                }

                let mut d_e = energy_of(layout.node(j)) - energy_of(layout.node(i));
                if let PairKind::SiteToSite { .. } = kind {
                    d_e -= coulomb / distances.get(i, j);
                }

                let gate = availability(kind, occupation);
                let mut rate = if d_e > 0.0 {
                    gate * params.nu * (-d_e / params.kt).exp()
                } else {
                    gate * params.nu
                };
                rate *= weights.get(i, j);

                self.rates.set(i, j, rate);
                self.total += rate;
                if let Node::Site(from) = layout.node(i) {
                    self.net_flow[from] -= rate;
                }
                if let Node::Site(to) = layout.node(j) {
                    self.net_flow[to] += rate;
                    self.inflow[to] += rate;
                }
            }
        }
        self.total
    }

    /// Rate of transition `from → to` from the last [`compute`](Self::compute).
    #[inline]
    pub fn rate(&self, from: usize, to: usize) -> f64 {
        self.rates.get(from, to)
    }

    /// The whole rate matrix.
    pub fn rates(&self) -> &SquareMatrix {
        &self.rates
    }

    /// Incoming minus outgoing rate for each site.
    pub fn net_flow(&self) -> &[f64] {
        &self.net_flow
    }

    /// Gross incoming rate for each site.
    pub fn inflow(&self) -> &[f64] {
        &self.inflow
    }

    /// Sum of all rates.
    pub fn total(&self) -> f64 {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hopnet_core::NodeLayout;
    use proptest::prelude::*;

    fn network(n_sites: usize, n_electrodes: usize, weight: f64) -> Network {
        let layout = NodeLayout::new(n_sites, n_electrodes);
        let n = layout.len();
        Network::new(
            layout,
            SquareMatrix::from_fn(n, |i, j| 1.0 + (i as f64 - j as f64).abs()),
            vec![0.0; n_sites],
            SquareMatrix::filled(n, weight),
        )
        .unwrap()
    }

    #[test]
    fn downhill_runs_at_attempt_frequency() {
        // One site below the electrode: electrode → site is downhill.
        let net = network(1, 1, 1.0).with_electrode_energy(vec![0.5]).unwrap();
        let params = HoppingParams {
            nu: 3.0,
            kt: 0.1,
            ..Default::default()
        };
        let mut table = RateTable::new(2, 1);
        table.compute(&net, &params, &[0.25], &[0.0]);
        assert_eq!(table.rate(1, 0), 0.75 * 3.0);
        let uphill = 0.25 * 3.0 * (-0.5f64 / 0.1).exp();
        assert!((table.rate(0, 1) - uphill).abs() < 1e-15);
    }

    #[test]
    fn site_pair_gap_includes_coulomb_correction() {
        let net = network(2, 0, 1.0);
        let params = HoppingParams {
            nu: 1.0,
            kt: 1.0,
            i0: 1.0,
            r: 1.0,
        };
        let mut table = RateTable::new(2, 2);
        // Energies 0 → 2 with correction 1/d = 1/2: dE = 1.5.
        table.compute(&net, &params, &[1.0, 0.0], &[0.0, 2.0]);
        assert!((table.rate(0, 1) - (-1.5f64).exp()).abs() < 1e-15);
        // Reverse direction is gated shut (source empty).
        assert_eq!(table.rate(1, 0), 0.0);
    }

    #[test]
    fn excluded_pairs_have_zero_rate() {
        let net = network(1, 2, 1.0);
        let mut table = RateTable::new(3, 1);
        table.compute(&net, &HoppingParams::default(), &[0.5], &[0.0]);
        for i in 0..3 {
            assert_eq!(table.rate(i, i), 0.0);
        }
        assert_eq!(table.rate(1, 2), 0.0);
        assert_eq!(table.rate(2, 1), 0.0);
    }

    #[test]
    fn zero_weights_give_zero_total() {
        let net = network(2, 2, 0.0);
        let mut table = RateTable::new(4, 2);
        let total = table.compute(&net, &HoppingParams::default(), &[0.5, 0.5], &[0.0, 0.0]);
        assert_eq!(total, 0.0);
        assert_eq!(table.net_flow(), &[0.0, 0.0]);
    }

    #[test]
    fn net_flow_balances_between_sites() {
        let net = network(3, 0, 1.0);
        let mut table = RateTable::new(3, 3);
        table.compute(
            &net,
            &HoppingParams::default(),
            &[0.9, 0.2, 0.5],
            &[0.0, 0.1, -0.1],
        );
        // With no electrodes, flow only moves between sites.
        let sum: f64 = table.net_flow().iter().sum();
        assert!(sum.abs() < 1e-12);
    }

    #[test]
    fn scratch_is_reset_between_calls() {
        let net = network(2, 1, 1.0);
        let mut table = RateTable::new(3, 2);
        let params = HoppingParams::default();
        let first = table.compute(&net, &params, &[0.3, 0.7], &[0.0, 0.0]);
        let flow = table.net_flow().to_vec();
        let second = table.compute(&net, &params, &[0.3, 0.7], &[0.0, 0.0]);
        assert_eq!(first, second);
        assert_eq!(flow, table.net_flow());
    }

    proptest! {
        #[test]
        fn total_is_non_negative(
            occ in proptest::collection::vec(0.0f64..=1.0, 3),
            energy in proptest::collection::vec(-1.0f64..1.0, 3),
            weight in 0.0f64..5.0,
            nu in 0.001f64..1e6,
        ) {
            let net = network(3, 2, weight);
            let params = HoppingParams { nu, kt: 0.05, i0: 0.3, r: 1.0 };
            let mut table = RateTable::new(5, 3);
            let total = table.compute(&net, &params, &occ, &energy);
            prop_assert!(total >= 0.0);
            prop_assert!(table.rates().as_slice().iter().all(|&r| r >= 0.0));
            for (&inflow, &net_flow) in table.inflow().iter().zip(table.net_flow()) {
                prop_assert!(inflow >= net_flow);
            }
        }
    }
}
