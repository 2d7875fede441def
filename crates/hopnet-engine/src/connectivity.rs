//! Structural weights from geometry.

use hopnet_core::{NetworkError, NodeLayout, SquareMatrix};

/// Wavefunction-overlap weights `exp(−2·d/a)` for localization length `a`.
///
/// Pairs that cannot transfer charge (the diagonal and electrode pairs)
/// get weight `0`.
///
/// # Errors
///
/// - [`NetworkError::InvalidParameter`] if `a` is not finite and positive;
/// - [`NetworkError::LengthMismatch`] if `distances` is not `N×N`.
pub fn localized_weights(
    layout: NodeLayout,
    distances: &SquareMatrix,
    localization_length: f64,
) -> Result<SquareMatrix, NetworkError> {
    if !(localization_length.is_finite() && localization_length > 0.0) {
        return Err(NetworkError::InvalidParameter {
            name: "localization_length",
            value: localization_length,
        });
    }
    if distances.dim() != layout.len() {
        return Err(NetworkError::LengthMismatch {
            what: "distances",
            expected: layout.len(),
            actual: distances.dim(),
        });
    }
    Ok(SquareMatrix::from_fn(layout.len(), |i, j| {
        if layout.pair(i, j).transfers_charge() {
            (-2.0 * distances.get(i, j) / localization_length).exp()
        } else {
            0.0
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_decays_with_distance() {
        let layout = NodeLayout::new(2, 1);
        let xs = [0.0f64, 1.0, 3.0];
        let d = SquareMatrix::from_fn(3, |i, j| (xs[i] - xs[j]).abs());
        let w = localized_weights(layout, &d, 0.5).unwrap();
        assert_eq!(w.get(0, 0), 0.0);
        assert!((w.get(0, 1) - (-4.0f64).exp()).abs() < 1e-15);
        assert!(w.get(0, 1) > w.get(0, 2));
        assert!(w.is_symmetric(0.0));
    }

    #[test]
    fn electrode_pairs_are_disconnected() {
        let layout = NodeLayout::new(1, 2);
        let w = localized_weights(layout, &SquareMatrix::filled(3, 1.0), 1.0).unwrap();
        assert_eq!(w.get(1, 2), 0.0);
        assert_eq!(w.get(2, 1), 0.0);
        assert!(w.get(0, 1) > 0.0);
    }

    #[test]
    fn rejects_bad_length() {
        let layout = NodeLayout::new(1, 1);
        let d = SquareMatrix::filled(2, 1.0);
        assert!(localized_weights(layout, &d, 0.0).is_err());
        assert!(localized_weights(layout, &d, f64::NAN).is_err());
        assert!(localized_weights(NodeLayout::new(2, 1), &d, 1.0).is_err());
    }
}
