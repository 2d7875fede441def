//! Core types for the hopnet simulation workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! node layout (sites vs electrodes), the row-major square matrices used for
//! all pairwise inputs, the immutable [`Network`] description, hopping
//! parameters, and the caller-owned [`ChargeState`] buffers that the engine
//! mutates in place.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod matrix;
pub mod network;
pub mod params;
pub mod state;

pub use error::NetworkError;
pub use id::{Node, NodeLayout, PairKind};
pub use matrix::SquareMatrix;
pub use network::Network;
pub use params::HoppingParams;
pub use state::{ChargeState, INITIAL_OCCUPATION};
