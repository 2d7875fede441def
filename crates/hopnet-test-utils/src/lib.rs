//! Reference networks and assertion helpers for hopnet development.
//!
//! [`fixtures`] builds the small networks the engine tests share. The
//! helpers here compare floating-point buffers with a tolerance and check
//! charge bookkeeping across a run.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use hopnet_core::ChargeState;

/// Site mass plus electrode accumulators.
///
/// Each hop moves mass between sites and electrodes without creating any,
/// so `total_charge(after) - total_charge(before)` should stay near zero
/// once the accumulators are reset at the start of the run.
pub fn total_charge(state: &ChargeState) -> f64 {
    state.site_mass() + state.electrode_mass()
}

/// Tolerance for conservation checks that scales with the accumulators.
pub fn conservation_tolerance(state: &ChargeState) -> f64 {
    let largest = state
        .electrode_charge
        .iter()
        .fold(0.0f64, |m, q| m.max(q.abs()));
    1e-9 * (1.0 + largest)
}

/// Assert every element of `actual` is within `tol` of `expected`.
#[track_caller]
pub fn assert_all_close(actual: &[f64], expected: &[f64], tol: f64) {
    assert_eq!(actual.len(), expected.len(), "length mismatch");
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!(
            (a - e).abs() <= tol,
            "element {i}: {a} differs from {e} by more than {tol}"
        );
    }
}

/// Assert every site occupation lies in `[0, 1]`, allowing a few ulps of
/// rounding at the upper edge when a step lands exactly on the boundary.
#[track_caller]
pub fn assert_occupation_bounded(state: &ChargeState) {
    for (i, &occ) in state.occupation.iter().enumerate() {
        assert!(
            (0.0..=1.0 + 1e-12).contains(&occ),
            "site {i} occupation {occ} outside [0, 1]"
        );
    }
}
