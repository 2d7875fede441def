//! Availability gate: how open a directed transition is given the current
//! occupations.

use hopnet_core::PairKind;

/// Weight in `[0, 1]` for transition `kind` under `occupation`.
///
/// - electrode → electrode and self pairs: `0`;
/// - electrode → site `j`: `1 − occupation[j]` (supply is unconditional);
/// - site `i` → electrode: `occupation[i]` (electrodes always accept);
/// - site `i` → site `j`: `occupation[i] · (1 − occupation[j])`.
#[inline]
pub fn availability(kind: PairKind, occupation: &[f64]) -> f64 {
    match kind {
        PairKind::SelfPair | PairKind::ElectrodeToElectrode => 0.0,
        PairKind::ElectrodeToSite { site, .. } => 1.0 - occupation[site],
        PairKind::SiteToElectrode { site, .. } => occupation[site],
        PairKind::SiteToSite { from, to } => occupation[from] * (1.0 - occupation[to]),
    }
}
