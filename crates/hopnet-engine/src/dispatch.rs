//! Fire-and-forget runs on worker threads.
//!
//! Each job gets its own named thread and a `bounded(1)` reply channel.
//! There is no pool, no backpressure, no cancellation and no timeout:
//! [`Dispatcher::wait`] blocks until the job's single result arrives.
//!
//! ```text
//! caller                         worker "hopnet-run-N"
//!   |--start(job)---------------->| Simulator::run()
//!   |<--RunHandle                 |
//!   |                             | reply_tx.send(result)
//!   |--wait(handle)               |
//!   |   reply_rx.recv() <---------|
//!   |   handle removed            x
//! ```

use std::error::Error;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use crossbeam_channel::Receiver;
use hopnet_core::ChargeState;

use crate::config::{ConfigError, SimulationConfig};
use crate::driver::{SimulationError, Simulator};
use crate::handle::{RunHandle, RunTable};
use crate::report::RunReport;

// ── Error types ────────────────────────────────────────────────────

/// Errors from starting or waiting on a dispatched run.
#[derive(Clone, Debug, PartialEq)]
pub enum DispatchError {
    /// The handle was never issued or has already been waited on.
    UnknownHandle(RunHandle),
    /// The worker exited without delivering a result.
    WorkerLost,
    /// The worker thread could not be spawned.
    Spawn {
        /// OS error text.
        reason: String,
    },
    /// The job's configuration was rejected.
    Config(ConfigError),
    /// The run itself failed.
    Simulation(SimulationError),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownHandle(h) => write!(f, "unknown or already consumed handle: {h}"),
            Self::WorkerLost => write!(f, "worker exited without a result"),
            Self::Spawn { reason } => write!(f, "failed to spawn worker thread: {reason}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Simulation(e) => write!(f, "simulation: {e}"),
        }
    }
}

impl Error for DispatchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Simulation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for DispatchError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<SimulationError> for DispatchError {
    fn from(e: SimulationError) -> Self {
        Self::Simulation(e)
    }
}

// ── Jobs and results ───────────────────────────────────────────────

/// One run to execute on a worker thread.
#[derive(Clone, Debug)]
pub struct RunJob {
    /// Network, parameters, seed and options.
    pub config: SimulationConfig,
    /// Number of hops.
    pub hops: u64,
    state: ChargeState,
}

impl RunJob {
    /// A job with a fresh state for `config`'s network.
    pub fn new(config: SimulationConfig, hops: u64) -> Self {
        let state = ChargeState::new(config.network.layout());
        Self { config, hops, state }
    }

    /// Reuse `state`'s allocations. It is reset before the run starts.
    pub fn with_state(mut self, state: ChargeState) -> Self {
        self.state = state;
        self
    }
}

/// What a successful worker hands back.
#[derive(Clone, Debug, PartialEq)]
pub struct Completed {
    /// The run's report.
    pub report: RunReport,
    /// Final occupations, accumulators and site energies.
    pub state: ChargeState,
}

type Reply = Result<Completed, SimulationError>;

/// A run in flight, owned directly by the caller.
///
/// Consuming [`wait`](Self::wait) makes a second wait impossible.
#[derive(Debug)]
pub struct PendingRun {
    reply: Receiver<Reply>,
    thread: JoinHandle<()>,
}

impl PendingRun {
    /// Validate the job and start it on a new thread named `name`.
    ///
    /// # Errors
    ///
    /// [`DispatchError::Config`] if the config is rejected,
    /// [`DispatchError::Spawn`] if the OS refuses the thread.
    pub fn spawn(job: RunJob, name: String) -> Result<Self, DispatchError> {
        let RunJob {
            config,
            hops,
            mut state,
        } = job;
        let mut sim = Simulator::new(config)?;
        if state.matches(sim.layout()) {
            state.reset();
        } else {
            state = ChargeState::new(sim.layout());
        }

        let (reply_tx, reply_rx) = crossbeam_channel::bounded(1);
        let thread = thread::Builder::new()
            .name(name)
            .spawn(move || {
                let result = sim
                    .run(&mut state, hops)
                    .map(|report| Completed { report, state });
                // The receiver may be gone if the caller dropped the run.
                let _ = reply_tx.send(result);
            })
            .map_err(|e| DispatchError::Spawn {
                reason: e.to_string(),
            })?;
        Ok(Self {
            reply: reply_rx,
            thread,
        })
    }

    /// Block until the run finishes.
    ///
    /// # Errors
    ///
    /// [`DispatchError::Simulation`] if the run failed,
    /// [`DispatchError::WorkerLost`] if the worker died before replying.
    pub fn wait(self) -> Result<Completed, DispatchError> {
        let reply = self.reply.recv();
        let _ = self.thread.join();
        match reply {
            Ok(result) => result.map_err(DispatchError::from),
            Err(_) => Err(DispatchError::WorkerLost),
        }
    }

    /// Whether the result is ready, so [`wait`](Self::wait) will not block.
    pub fn is_finished(&self) -> bool {
        !self.reply.is_empty() || self.thread.is_finished()
    }
}

// ── Dispatcher ─────────────────────────────────────────────────────

/// Starts runs and hands out integer handles for their results.
///
/// `Dispatcher` is `Sync`; several threads may start and wait on runs
/// concurrently. Dropping a dispatcher detaches any runs not yet waited on.
#[derive(Default)]
pub struct Dispatcher {
    runs: Mutex<RunTable<PendingRun>>,
    started: AtomicU64,
}

impl Dispatcher {
    /// An empty dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Launch `job` on a new worker thread and return its handle.
    ///
    /// The job's state is reset to the uniform initial occupation first.
    ///
    /// # Errors
    ///
    /// [`DispatchError::Config`] or [`DispatchError::Spawn`]; no handle is
    /// issued in either case.
    pub fn start(&self, job: RunJob) -> Result<RunHandle, DispatchError> {
        let n = self.started.fetch_add(1, Ordering::Relaxed);
        let hops = job.hops;
        let pending = PendingRun::spawn(job, format!("hopnet-run-{n}"))?;
        let handle = self.table().insert(pending);
        tracing::trace!(%handle, hops, "run dispatched");
        Ok(handle)
    }

    /// Block until the run behind `handle` finishes and return its result.
    ///
    /// The handle is consumed whether the run succeeded or not.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::UnknownHandle`] if `handle` was never issued by
    ///   this dispatcher or was already waited on;
    /// - [`DispatchError::Simulation`] if the run failed;
    /// - [`DispatchError::WorkerLost`] if the worker died before replying.
    pub fn wait(&self, handle: RunHandle) -> Result<Completed, DispatchError> {
        // Release the lock before blocking so other handles stay usable.
        let pending = self
            .table()
            .take(handle)
            .ok_or(DispatchError::UnknownHandle(handle))?;
        let result = pending.wait();
        tracing::trace!(%handle, ok = result.is_ok(), "run collected");
        result
    }

    /// Whether `handle` refers to a run that has not been waited on.
    pub fn is_pending(&self, handle: RunHandle) -> bool {
        self.table().contains(handle)
    }

    /// Number of runs not yet waited on.
    pub fn in_flight(&self) -> usize {
        self.table().len()
    }

    fn table(&self) -> std::sync::MutexGuard<'_, RunTable<PendingRun>> {
        // The table holds no invariant a panicking holder could break.
        self.runs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("in_flight", &self.in_flight())
            .field("started", &self.started.load(Ordering::Relaxed))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hopnet_core::{HoppingParams, Network, NodeLayout, SquareMatrix};

    fn config(nu: f64) -> SimulationConfig {
        let layout = NodeLayout::new(1, 1);
        let network = Network::new(
            layout,
            SquareMatrix::filled(2, 1.0),
            vec![0.0],
            SquareMatrix::filled(2, 1.0),
        )
        .unwrap();
        SimulationConfig::new(
            network,
            HoppingParams {
                nu,
                ..Default::default()
            },
        )
    }

    #[test]
    fn second_wait_is_unknown_handle() {
        let dispatcher = Dispatcher::new();
        let handle = dispatcher.start(RunJob::new(config(1.0), 10)).unwrap();
        assert!(dispatcher.is_pending(handle));
        let done = dispatcher.wait(handle).unwrap();
        assert_eq!(done.report.hops, 10);
        assert_eq!(
            dispatcher.wait(handle).unwrap_err(),
            DispatchError::UnknownHandle(handle)
        );
        assert_eq!(dispatcher.in_flight(), 0);
    }

    #[test]
    fn bad_config_issues_no_handle() {
        let dispatcher = Dispatcher::new();
        let err = dispatcher.start(RunJob::new(config(-1.0), 10)).unwrap_err();
        assert!(matches!(err, DispatchError::Config(_)));
        assert_eq!(dispatcher.in_flight(), 0);
    }

    #[test]
    fn reused_state_is_reset() {
        let mut dirty = ChargeState::new(NodeLayout::new(1, 1));
        dirty.occupation[0] = 0.9;
        dirty.electrode_charge[0] = 5.0;
        let job = RunJob::new(config(1.0), 0).with_state(dirty);
        let done = PendingRun::spawn(job, "reset-test".into())
            .unwrap()
            .wait()
            .unwrap();
        assert_eq!(done.state.occupation, vec![0.5]);
        assert_eq!(done.state.electrode_charge, vec![0.0]);
    }

    #[test]
    fn run_failure_is_delivered() {
        let mut cfg = config(1.0);
        cfg.network = cfg
            .network
            .with_weights(SquareMatrix::zeros(2))
            .unwrap();
        let dispatcher = Dispatcher::new();
        let handle = dispatcher.start(RunJob::new(cfg, 3)).unwrap();
        assert!(matches!(
            dispatcher.wait(handle),
            Err(DispatchError::Simulation(SimulationError::Stalled { hop: 0, .. }))
        ));
        assert!(!dispatcher.is_pending(handle));
    }
}
