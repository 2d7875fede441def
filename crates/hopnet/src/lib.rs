//! Hopnet: mean-field kinetic Monte Carlo for hopping networks.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the hopnet sub-crates. For most users, adding `hopnet` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use hopnet::prelude::*;
//!
//! // Two sites between a source (x = 0) and a drain (x = 3).
//! let layout = NodeLayout::new(2, 2);
//! let xs = [1.0f64, 2.0, 0.0, 3.0];
//! let distances = SquareMatrix::from_fn(4, |i, j| (xs[i] - xs[j]).abs());
//! let weights = localized_weights(layout, &distances, 1.0).unwrap();
//! let network = Network::new(layout, distances, vec![0.0, 0.0], weights)
//!     .unwrap()
//!     .with_electrode_energy(vec![0.1, -0.1])
//!     .unwrap();
//! let params = HoppingParams { nu: 1.0, kt: 0.025, i0: 0.0, r: 1.0 };
//!
//! let mut state = ChargeState::new(layout);
//! let report = simulate(SimulationConfig::new(network, params), &mut state, 200).unwrap();
//! let currents = report.currents(&state);
//! assert!(currents[0] < 0.0 && currents[1] > 0.0);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `hopnet-core` | Node layout, matrices, network, parameters, state buffers |
//! | [`engine`] | `hopnet-engine` | Rates, step control, the simulation loop, dispatch |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types (`hopnet-core`).
///
/// Contains the [`types::NodeLayout`], [`types::SquareMatrix`],
/// [`types::Network`] and the caller-owned [`types::ChargeState`].
pub use hopnet_core as types;

/// Simulation engine (`hopnet-engine`).
///
/// [`engine::Simulator`] for synchronous runs, [`engine::Dispatcher`] for
/// runs on worker threads.
pub use hopnet_engine as engine;

/// Common imports for typical hopnet usage.
///
/// ```rust
/// use hopnet::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use hopnet_core::{
        ChargeState, HoppingParams, Network, Node, NodeLayout, SquareMatrix, INITIAL_OCCUPATION,
    };

    // Errors
    pub use hopnet_core::NetworkError;
    pub use hopnet_engine::{ConfigError, DispatchError, SimulationError};

    // Engine
    pub use hopnet_engine::{
        localized_weights, simulate, ClampPolicy, Completed, DampingSchedule, Dispatcher,
        HopObserver, HopRecord, PendingRun, RunHandle, RunJob, RunOptions, RunReport,
        SimulationConfig, Simulator, StepConfig,
    };
}
