//! Simulation driver: the per-hop loop.
//!
//! A [`Simulator`] owns the network, the parameters, the rate scratch and
//! the run's random generator. The caller owns the [`ChargeState`]; each
//! hop mutates it in place in this order:
//!
//! 1. recompute site energies from the current occupations;
//! 2. rebuild the rate table;
//! 3. choose the step size;
//! 4. draw the waiting time and advance the clock;
//! 5. apply the scaled flows;
//! 6. advance the damping schedule.

use std::error::Error;
use std::fmt;

use hopnet_core::{ChargeState, HoppingParams, Network, NodeLayout, SquareMatrix};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::{ConfigError, RunOptions, SimulationConfig};
use crate::energy::update_site_energies;
use crate::rates::RateTable;
use crate::report::{HopRecord, RunReport};
use crate::step::{exponential_draw, step_size, Damping, StepConfig};
use crate::update::apply_flows;

// ── SimulationError ────────────────────────────────────────────────

/// Errors that abort a run.
///
/// On [`Stalled`](Self::Stalled) and [`NonFiniteRate`](Self::NonFiniteRate)
/// the caller's buffers hold the state left by the last completed hop.
#[derive(Clone, Debug, PartialEq)]
pub enum SimulationError {
    /// Configuration rejected at construction.
    Config(ConfigError),
    /// The state buffers do not match the network's layout.
    StateMismatch {
        /// Expected `(sites, electrodes)`.
        expected: (usize, usize),
        /// Actual `(occupation.len(), electrode_charge.len())`.
        actual: (usize, usize),
    },
    /// The total rate was zero: no transition can happen.
    Stalled {
        /// Hop at which the stall was detected.
        hop: u64,
        /// Elapsed time when it was detected.
        elapsed: f64,
    },
    /// The total rate was NaN or infinite.
    NonFiniteRate {
        /// Hop at which it was detected.
        hop: u64,
        /// The offending total.
        total: f64,
    },
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::StateMismatch { expected, actual } => write!(
                f,
                "state shape mismatch: expected {} sites and {} electrodes, got {} and {}",
                expected.0, expected.1, actual.0, actual.1
            ),
            Self::Stalled { hop, elapsed } => {
                write!(f, "total rate is zero at hop {hop} (t = {elapsed})")
            }
            Self::NonFiniteRate { hop, total } => {
                write!(f, "total rate {total} is not finite at hop {hop}")
            }
        }
    }
}

impl Error for SimulationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for SimulationError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ── HopObserver ────────────────────────────────────────────────────

/// Receives a [`HopRecord`] after every completed hop.
pub trait HopObserver {
    /// Called after the flows of a hop are applied.
    fn on_hop(&mut self, record: &HopRecord, state: &ChargeState);
}

impl<F: FnMut(&HopRecord, &ChargeState)> HopObserver for F {
    fn on_hop(&mut self, record: &HopRecord, state: &ChargeState) {
        self(record, state)
    }
}

struct NoObserver;

impl HopObserver for NoObserver {
    fn on_hop(&mut self, _record: &HopRecord, _state: &ChargeState) {}
}

// ── Simulator ──────────────────────────────────────────────────────

/// Runs the mean-field hopping loop over a fixed network.
///
/// # Examples
///
/// ```
/// use hopnet_core::{ChargeState, HoppingParams, Network, NodeLayout, SquareMatrix};
/// use hopnet_engine::{SimulationConfig, Simulator};
///
/// let layout = NodeLayout::new(1, 2);
/// let network = Network::new(
///     layout,
///     SquareMatrix::from_rows(vec![
///         vec![1.0, 1.0, 1.0],
///         vec![1.0, 1.0, 2.0],
///         vec![1.0, 2.0, 1.0],
///     ])
///     .unwrap(),
///     vec![0.0],
///     SquareMatrix::filled(3, 1.0),
/// )
/// .unwrap();
/// let params = HoppingParams { nu: 1e12, kt: 0.025, i0: 1.0, r: 1.0 };
///
/// let mut sim = Simulator::new(SimulationConfig::new(network, params)).unwrap();
/// let mut state = ChargeState::new(layout);
/// let report = sim.run(&mut state, 100).unwrap();
/// assert!(report.elapsed_time > 0.0);
/// assert!((state.occupation[0] - 0.5).abs() < 1e-12);
/// ```
#[derive(Debug)]
pub struct Simulator {
    network: Network,
    params: HoppingParams,
    step: StepConfig,
    options: RunOptions,
    rates: RateTable,
    flow_fraction: Vec<f64>,
    rng: ChaCha8Rng,
}

impl Simulator {
    /// Validate `config` and allocate the per-run scratch.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if [`SimulationConfig::validate()`] fails.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let layout = config.network.layout();
        Ok(Self {
            rates: RateTable::new(layout.len(), layout.n_sites()),
            flow_fraction: vec![0.0; layout.n_electrodes()],
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            network: config.network,
            params: config.params,
            step: config.step,
            options: config.options,
        })
    }

    /// The network being simulated.
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// The hopping parameters.
    pub fn params(&self) -> &HoppingParams {
        &self.params
    }

    /// The network's node layout.
    pub fn layout(&self) -> NodeLayout {
        self.network.layout()
    }

    /// Rate table from the most recent hop.
    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// Restart the waiting-time generator from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    /// Run `hops` hops starting at time `0`.
    ///
    /// # Errors
    ///
    /// See [`run_from`](Self::run_from).
    pub fn run(&mut self, state: &mut ChargeState, hops: u64) -> Result<RunReport, SimulationError> {
        self.run_from(state, hops, 0.0, &mut NoObserver)
    }

    /// Run `hops` hops starting at `start_time`, reporting each hop to
    /// `observer`.
    ///
    /// `hops == 0` returns immediately with `elapsed_time == start_time`
    /// and leaves every buffer untouched. Otherwise the electrode
    /// accumulators are zeroed first.
    ///
    /// # Errors
    ///
    /// - [`SimulationError::StateMismatch`] if `state` was built for a
    ///   different layout;
    /// - [`SimulationError::Stalled`] if the total rate is zero at any hop;
    /// - [`SimulationError::NonFiniteRate`] if it is NaN or infinite.
    pub fn run_from<O: HopObserver + ?Sized>(
        &mut self,
        state: &mut ChargeState,
        hops: u64,
        start_time: f64,
        observer: &mut O,
    ) -> Result<RunReport, SimulationError> {
        let layout = self.network.layout();
        if !state.matches(layout) {
            return Err(SimulationError::StateMismatch {
                expected: (layout.n_sites(), layout.n_electrodes()),
                actual: (state.occupation.len(), state.electrode_charge.len()),
            });
        }
        let mut report = RunReport::idle(start_time, layout.n_electrodes());
        if hops == 0 {
            return Ok(report);
        }

        self.warn_negative_weights();
        state.electrode_charge.fill(0.0);

        let mut damping = Damping::new(self.step.damping);
        let mut elapsed = start_time;
        let mut traffic = self
            .options
            .record_traffic
            .then(|| SquareMatrix::zeros(layout.len()));
        let mut occupation_time = self
            .options
            .track_mean_occupation
            .then(|| vec![0.0; layout.n_sites()]);

        tracing::trace!(
            sites = layout.n_sites(),
            electrodes = layout.n_electrodes(),
            hops,
            "run started"
        );

        for hop in 0..hops {
            update_site_energies(
                &self.network,
                &self.params,
                &state.occupation,
                &mut state.site_energy,
            );
            let total =
                self.rates
                    .compute(&self.network, &self.params, &state.occupation, &state.site_energy);
            if total == 0.0 {
                return Err(SimulationError::Stalled { hop, elapsed });
            }
            if !total.is_finite() {
                return Err(SimulationError::NonFiniteRate { hop, total });
            }

            let step = step_size(
                &self.step,
                total,
                &state.occupation,
                self.rates.net_flow(),
                self.rates.inflow(),
                damping.value(),
            );
            let dt = exponential_draw(&mut self.rng) * step;
            if let Some(acc) = occupation_time.as_mut() {
                for (a, &occ) in acc.iter_mut().zip(&state.occupation) {
                    *a += occ * dt;
                }
            }
            elapsed += dt;

            apply_flows(
                layout,
                &self.rates,
                step,
                state,
                &mut self.flow_fraction,
                traffic.as_mut(),
            );

            let fired = damping.after_hop(hop);
            if fired {
                tracing::debug!(
                    hop,
                    step,
                    total_rate = total,
                    elapsed,
                    damping = damping.value(),
                    "damping increased"
                );
            }

            report.hops = hop + 1;
            report.last_step = step;
            report.last_total_rate = total;
            observer.on_hop(
                &HopRecord {
                    hop,
                    step,
                    total_rate: total,
                    dt,
                    elapsed,
                    damping: damping.value(),
                    damping_fired: fired,
                },
                state,
            );
        }

        report.elapsed_time = elapsed;
        report.damping = damping.value();
        report.electrode_activity_share = self.flow_fraction.clone();
        report.traffic = traffic;
        report.mean_occupation = occupation_time.map(|acc| {
            let duration = elapsed - start_time;
            if duration > 0.0 {
                acc.into_iter().map(|a| a / duration).collect()
            } else {
                state.occupation.clone()
            }
        });
        Ok(report)
    }

    fn warn_negative_weights(&self) {
        let mut negative = self.network.negative_weights();
        if let Some((from, to, weight)) = negative.next() {
            let count = 1 + negative.count();
            tracing::warn!(
                count,
                from,
                to,
                weight,
                "negative structural weights; rates may be negative"
            );
        }
    }
}

/// Build a [`Simulator`] from `config` and run `hops` hops from time `0`.
///
/// # Errors
///
/// [`SimulationError::Config`] if the configuration is rejected, otherwise
/// as for [`Simulator::run_from`].
pub fn simulate(
    config: SimulationConfig,
    state: &mut ChargeState,
    hops: u64,
) -> Result<RunReport, SimulationError> {
    Simulator::new(config)?.run(state, hops)
}
