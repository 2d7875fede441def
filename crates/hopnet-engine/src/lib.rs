//! Mean-field kinetic Monte Carlo engine for hopping networks.
//!
//! Sites carry a fractional occupation in `[0, 1]`; electrodes are
//! reservoirs whose accumulators record net charge exchanged. Every hop
//! moves probability mass along all pairs at once, scaled by a single
//! adaptive step size, and advances simulated time by an exponential
//! waiting time.
//!
//! Use [`Simulator`] for synchronous runs on caller-owned buffers, or
//! [`Dispatcher`] to run jobs on worker threads and collect each result
//! exactly once.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod connectivity;
pub mod dispatch;
pub mod driver;
pub mod energy;
pub mod gate;
pub(crate) mod handle;
pub mod rates;
pub mod report;
pub mod step;
pub mod update;

pub use config::{ConfigError, RunOptions, SimulationConfig};
pub use connectivity::localized_weights;
pub use dispatch::{Completed, DispatchError, Dispatcher, PendingRun, RunJob};
pub use driver::{simulate, HopObserver, SimulationError, Simulator};
pub use handle::RunHandle;
pub use rates::RateTable;
pub use report::{HopRecord, RunReport};
pub use step::{ClampPolicy, Damping, DampingSchedule, StepConfig};
