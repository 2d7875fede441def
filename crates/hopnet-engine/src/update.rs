//! State updater: apply one hop's scaled flows to the caller's buffers.

use hopnet_core::{ChargeState, Node, NodeLayout, SquareMatrix};

use crate::rates::RateTable;

/// Move probability mass along every pair that can transfer charge.
///
/// Pairs are visited in row-major order and applied immediately, so later
/// pairs see the occupations left by earlier ones. For each pair:
///
/// - `flow = rate · step`, capped at the source site's current occupation;
/// - the source site loses `flow`, or the source electrode's accumulator
///   is debited;
/// - the destination site gains `flow`, or the destination electrode's
///   accumulator is credited.
///
/// `flow_fraction` receives each electrode's signed share of the total
/// rate (independent of `step`). `traffic`, when given, accumulates the
/// applied flow per pair.
pub fn apply_flows(
    layout: NodeLayout,
    rates: &RateTable,
    step: f64,
    state: &mut ChargeState,
    flow_fraction: &mut [f64],
    mut traffic: Option<&mut SquareMatrix>,
) {
    let total = rates.total();
    flow_fraction.fill(0.0);

    let n = layout.len();
    for i in 0..n {
        for j in 0..n {
            if !layout.pair(i, j).transfers_charge() {
                continue;
            }
            let rate = rates.rate(i, j);
            let mut flow = rate * step;

            match layout.node(i) {
                Node::Site(site) => {
                    flow = flow.min(state.occupation[site]);
                    state.occupation[site] -= flow;
                }
                Node::Electrode(electrode) => {
                    state.electrode_charge[electrode] -= flow;
                    flow_fraction[electrode] -= rate / total;
                }
            }
            match layout.node(j) {
                Node::Site(site) => state.occupation[site] += flow,
                Node::Electrode(electrode) => {
                    state.electrode_charge[electrode] += flow;
                    flow_fraction[electrode] += rate / total;
                }
            }

            if let Some(traffic) = traffic.as_deref_mut() {
                traffic[(i, j)] += flow;
            }
        }
    }
}
