//! Per-hop records and end-of-run reports.

use hopnet_core::{ChargeState, SquareMatrix};

/// What happened during one hop, handed to a
/// [`HopObserver`](crate::HopObserver) after the flows are applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HopRecord {
    /// Zero-based hop index.
    pub hop: u64,
    /// Step size chosen by the controller.
    pub step: f64,
    /// Total rate of the hop.
    pub total_rate: f64,
    /// Waiting time drawn for the hop.
    pub dt: f64,
    /// Elapsed time after the hop.
    pub elapsed: f64,
    /// Damping factor after the hop.
    pub damping: f64,
    /// Whether the damping schedule fired after this hop.
    pub damping_fired: bool,
}

/// Summary of a finished run.
///
/// The occupations and electrode accumulators themselves stay in the
/// caller's [`ChargeState`].
#[derive(Clone, Debug, PartialEq)]
pub struct RunReport {
    /// Simulated time at which the run started.
    pub start_time: f64,
    /// Simulated time at the end of the run.
    pub elapsed_time: f64,
    /// Number of hops executed.
    pub hops: u64,
    /// Step size of the last hop (`0` if no hop ran).
    pub last_step: f64,
    /// Total rate of the last hop (`0` if no hop ran).
    pub last_total_rate: f64,
    /// Damping factor at the end of the run.
    pub damping: f64,
    /// Each electrode's signed share of the total rate during the last hop.
    /// Negative means the electrode was a net source.
    pub electrode_activity_share: Vec<f64>,
    /// Time-weighted mean occupation per site, if tracked.
    pub mean_occupation: Option<Vec<f64>>,
    /// Cumulative applied flow per directed pair, if recorded.
    pub traffic: Option<SquareMatrix>,
}

impl RunReport {
    /// Report of a run that executed no hops.
    pub(crate) fn idle(start_time: f64, n_electrodes: usize) -> Self {
        Self {
            start_time,
            elapsed_time: start_time,
            hops: 0,
            last_step: 0.0,
            last_total_rate: 0.0,
            damping: 1.0,
            electrode_activity_share: vec![0.0; n_electrodes],
            mean_occupation: None,
            traffic: None,
        }
    }

    /// Simulated time covered by the run.
    pub fn duration(&self) -> f64 {
        self.elapsed_time - self.start_time
    }

    /// Average current through each electrode: accumulated charge divided
    /// by [`duration`](Self::duration). All zeros when no time elapsed.
    pub fn currents(&self, state: &ChargeState) -> Vec<f64> {
        let duration = self.duration();
        if duration > 0.0 {
            state.electrode_charge.iter().map(|q| q / duration).collect()
        } else {
            vec![0.0; state.electrode_charge.len()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hopnet_core::NodeLayout;

    #[test]
    fn idle_report_has_zero_duration() {
        let report = RunReport::idle(2.5, 3);
        assert_eq!(report.duration(), 0.0);
        assert_eq!(report.electrode_activity_share, vec![0.0; 3]);
        let state = ChargeState::new(NodeLayout::new(1, 3));
        assert_eq!(report.currents(&state), vec![0.0; 3]);
    }

    #[test]
    fn currents_divide_by_duration() {
        let mut report = RunReport::idle(1.0, 2);
        report.elapsed_time = 5.0;
        let mut state = ChargeState::new(NodeLayout::new(1, 2));
        state.electrode_charge = vec![-2.0, 2.0];
        assert_eq!(report.currents(&state), vec![-0.5, 0.5]);
    }
}
