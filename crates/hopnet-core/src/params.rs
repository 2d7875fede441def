//! Physical parameters of the hopping law.

use crate::error::NetworkError;

/// Parameters shared by every pair in a run.
///
/// Units are whatever the caller uses consistently; no conversion is
/// performed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HoppingParams {
    /// Attempt frequency `nu`. Must be positive.
    pub nu: f64,
    /// Thermal energy `kT`. Must be positive.
    pub kt: f64,
    /// Coulomb interaction prefactor `I0`.
    pub i0: f64,
    /// Coulomb length scale `R`.
    pub r: f64,
}

impl HoppingParams {
    /// Coulomb strength `I0·R` used by both the mean-field site energy and
    /// the site-to-site gap correction.
    pub fn coulomb(&self) -> f64 {
        self.i0 * self.r
    }

    /// Check that `nu` and `kT` are finite and positive.
    ///
    /// # Errors
    ///
    /// [`NetworkError::InvalidParameter`] naming the first bad value.
    pub fn validate(&self) -> Result<(), NetworkError> {
        if !(self.nu.is_finite() && self.nu > 0.0) {
            return Err(NetworkError::InvalidParameter {
                name: "nu",
                value: self.nu,
            });
        }
        if !(self.kt.is_finite() && self.kt > 0.0) {
            return Err(NetworkError::InvalidParameter {
                name: "kT",
                value: self.kt,
            });
        }
        Ok(())
    }
}

impl Default for HoppingParams {
    fn default() -> Self {
        Self {
            nu: 1.0,
            kt: 1.0,
            i0: 0.0,
            r: 1.0,
        }
    }
}
