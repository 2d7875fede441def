//! Adaptive step controller.
//!
//! Each hop uses one global step size. The baseline is inversely
//! proportional to the total rate (never below 1); it is then clamped so
//! that no site's occupation is pushed past 0 or 1, and the clamp is
//! divided by a damping factor that grows on a geometric schedule.
//! By default the step is further bounded by each site's gross inflow, so
//! the pairwise update cannot overfill a site whose net flow is balanced;
//! [`StepConfig::legacy`] drops that bound.
//! Elapsed time advances by an exponential waiting time scaled to the
//! chosen step.

use rand::Rng;

/// How the boundary clamp combines violating sites.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClampPolicy {
    /// Test every site against the baseline step and take the smallest
    /// boundary step among violators. Independent of site order.
    #[default]
    Minimum,
    /// Sweep sites in index order, testing each against the step left by
    /// the previous sites; the last violator sets the step.
    Sequential,
}

/// Geometric schedule for the damping factor.
///
/// Damping starts at `1.0`. After the flows of hop `h` are applied, if
/// `h` is a multiple of the current threshold the threshold is multiplied
/// by `threshold_growth` and damping by `factor`. With the defaults the
/// triggers fall on hops 0, 32, 256, 2048, …
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DampingSchedule {
    /// First trigger threshold. Default: 4.
    pub initial_threshold: u64,
    /// Threshold multiplier per trigger. Default: 8.
    pub threshold_growth: u64,
    /// Damping multiplier per trigger. Default: 2.
    pub factor: u32,
}

impl Default for DampingSchedule {
    fn default() -> Self {
        Self {
            initial_threshold: 4,
            threshold_growth: 8,
            factor: 2,
        }
    }
}

impl DampingSchedule {
    /// Set the first trigger threshold.
    pub fn initial_threshold(mut self, threshold: u64) -> Self {
        self.initial_threshold = threshold;
        self
    }

    /// Set the threshold multiplier.
    pub fn threshold_growth(mut self, growth: u64) -> Self {
        self.threshold_growth = growth;
        self
    }

    /// Set the damping multiplier.
    pub fn factor(mut self, factor: u32) -> Self {
        self.factor = factor;
        self
    }

    /// A schedule whose damping never changes.
    pub fn disabled() -> Self {
        Self {
            factor: 1,
            ..Self::default()
        }
    }
}

/// Runtime damping state for one run.
#[derive(Clone, Debug)]
pub struct Damping {
    schedule: DampingSchedule,
    value: f64,
    threshold: u64,
}

impl Damping {
    /// Start a schedule at damping `1.0`.
    pub fn new(schedule: DampingSchedule) -> Self {
        Self {
            schedule,
            value: 1.0,
            threshold: schedule.initial_threshold,
        }
    }

    /// Current damping factor.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Current trigger threshold.
    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    /// Advance after hop `hop`. Returns `true` if the schedule fired.
    pub fn after_hop(&mut self, hop: u64) -> bool {
        if hop % self.threshold != 0 {
            return false;
        }
        self.threshold = self
            .threshold
            .saturating_mul(self.schedule.threshold_growth);
        self.value *= f64::from(self.schedule.factor);
        true
    }
}

/// Step controller configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepConfig {
    /// Boundary clamp policy. Default: [`ClampPolicy::Minimum`].
    pub clamp: ClampPolicy,
    /// Also bound the step by each site's gross inflow. Default: `true`.
    ///
    /// Flows are applied pair by pair, so a site can receive all of its
    /// gross inflow before any outflow is subtracted. The net-flow clamp
    /// alone does not bound that, and with a large total rate occupations
    /// leave `[0, 1]`. With this guard the step never exceeds
    /// `(1 − occupation[i]) / inflow[i]` for any site.
    pub inflow_guard: bool,
    /// Damping schedule.
    pub damping: DampingSchedule,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            clamp: ClampPolicy::default(),
            inflow_guard: true,
            damping: DampingSchedule::default(),
        }
    }
}

impl StepConfig {
    /// Net-flow clamp with the sequential sweep, no inflow guard.
    pub fn legacy() -> Self {
        Self {
            clamp: ClampPolicy::Sequential,
            inflow_guard: false,
            damping: DampingSchedule::default(),
        }
    }
}

/// `max(1, 1 / total_rate)`. Infinite when the total rate is zero.
pub fn baseline_step(total_rate: f64) -> f64 {
    (1.0 / total_rate).max(1.0)
}

/// Step that carries a site exactly to the boundary it is moving toward,
/// divided by `damping`. `None` if `step` keeps it in `[0, 1]`.
fn boundary_step(occupation: f64, net_flow: f64, step: f64, damping: f64) -> Option<f64> {
    let projected = occupation + step * net_flow;
    if projected < 0.0 {
        Some(occupation / -net_flow / damping)
    } else if projected > 1.0 {
        Some((1.0 - occupation) / net_flow / damping)
    } else {
        None
    }
}

/// Choose this hop's step size.
///
/// `net_flow` and `inflow` are per-site rates from the rate calculator.
pub fn step_size(
    config: &StepConfig,
    total_rate: f64,
    occupation: &[f64],
    net_flow: &[f64],
    inflow: &[f64],
    damping: f64,
) -> f64 {
    let baseline = baseline_step(total_rate);
    let mut step = baseline;
    match config.clamp {
        ClampPolicy::Minimum => {
            for (&occ, &flow) in occupation.iter().zip(net_flow) {
                if let Some(limit) = boundary_step(occ, flow, baseline, damping) {
                    step = step.min(limit);
                }
            }
        }
        ClampPolicy::Sequential => {
            for (&occ, &flow) in occupation.iter().zip(net_flow) {
                if let Some(limit) = boundary_step(occ, flow, step, damping) {
                    step = limit;
                }
            }
        }
    }
    if config.inflow_guard {
        for (&occ, &gross) in occupation.iter().zip(inflow) {
            if gross > 0.0 {
                step = step.min((1.0 - occ) / gross);
            }
        }
    }
    step
}

/// Exponentially distributed waiting time with unit rate, by inverse
/// transform. `1 − u` lies in `(0, 1]`, so the log is finite.
pub fn exponential_draw<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u: f64 = rng.random();
    -(1.0 - u).ln()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn baseline_never_below_one() {
        assert_eq!(baseline_step(10.0), 1.0);
        assert_eq!(baseline_step(0.25), 4.0);
        assert_eq!(baseline_step(0.0), f64::INFINITY);
    }

    #[test]
    fn clamp_toward_zero() {
        let cfg = StepConfig {
            inflow_guard: false,
            ..Default::default()
        };
        // Baseline 1; site would drop to -0.5.
        let step = step_size(&cfg, 2.0, &[0.5], &[-1.0], &[0.0], 1.0);
        assert_eq!(step, 0.5);
    }

    #[test]
    fn clamp_toward_one_with_damping() {
        let cfg = StepConfig {
            inflow_guard: false,
            ..Default::default()
        };
        let step = step_size(&cfg, 2.0, &[0.8], &[0.4], &[0.4], 2.0);
        assert!((step - 0.25).abs() < 1e-15);
    }

    #[test]
    fn minimum_policy_takes_smallest_violator() {
        let cfg = StepConfig {
            inflow_guard: false,
            ..Default::default()
        };
        // Boundary steps: 0.5 and 0.2. Damping 2 → 0.25 and 0.1.
        let occ = [0.5, 0.2];
        let flow = [-1.0, -1.0];
        assert!((step_size(&cfg, 2.0, &occ, &flow, &[0.0, 0.0], 2.0) - 0.1).abs() < 1e-15);
        let reversed = step_size(&cfg, 2.0, &[0.2, 0.5], &flow, &[0.0, 0.0], 2.0);
        assert!((reversed - 0.1).abs() < 1e-15);
    }

    #[test]
    fn sequential_policy_depends_on_order() {
        let cfg = StepConfig {
            clamp: ClampPolicy::Sequential,
            inflow_guard: false,
            ..Default::default()
        };
        let flow = [-1.0, -1.0];
        // Site 0 clamps to 0.5 / 2 = 0.25; site 1 (boundary 0.4) is then
        // safe, so the larger value survives.
        let step = step_size(&cfg, 2.0, &[0.5, 0.4], &flow, &[0.0, 0.0], 2.0);
        assert!((step - 0.25).abs() < 1e-15);
        // Reversed order: 0.4 / 2 = 0.2 first, then 0.5 is safe.
        let step = step_size(&cfg, 2.0, &[0.4, 0.5], &flow, &[0.0, 0.0], 2.0);
        assert!((step - 0.2).abs() < 1e-15);
    }

    #[test]
    fn inflow_guard_bounds_gross_filling() {
        let cfg = StepConfig::default();
        // Net flow zero (balanced), gross inflow 10: room 0.5 / 10.
        let step = step_size(&cfg, 20.0, &[0.5], &[0.0], &[10.0], 1.0);
        assert!((step - 0.05).abs() < 1e-15);
        let legacy = step_size(&StepConfig::legacy(), 20.0, &[0.5], &[0.0], &[10.0], 1.0);
        assert_eq!(legacy, 1.0);
    }

    #[test]
    fn zero_rate_step_is_unbounded() {
        let step = step_size(&StepConfig::default(), 0.0, &[0.5], &[0.0], &[0.0], 1.0);
        assert!(step.is_infinite());
    }

    #[test]
    fn damping_fires_on_schedule() {
        let mut damping = Damping::new(DampingSchedule::default());
        let fired: Vec<u64> = (0..3000).filter(|&h| damping.after_hop(h)).collect();
        assert_eq!(fired, vec![0, 32, 256, 2048]);
        assert_eq!(damping.value(), 16.0);
        assert_eq!(damping.threshold(), 4 * 8 * 8 * 8 * 8);
    }

    #[test]
    fn disabled_schedule_keeps_unit_damping() {
        let mut damping = Damping::new(DampingSchedule::disabled());
        for hop in 0..100 {
            damping.after_hop(hop);
        }
        assert_eq!(damping.value(), 1.0);
    }

    #[test]
    fn exponential_draw_has_unit_mean() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let n = 20_000;
        let mean = (0..n).map(|_| exponential_draw(&mut rng)).sum::<f64>() / n as f64;
        assert!((mean - 1.0).abs() < 0.05, "mean {mean}");
    }

    #[test]
    fn exponential_draw_is_seeded() {
        let mut a = ChaCha8Rng::seed_from_u64(1);
        let mut b = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..10 {
            assert_eq!(exponential_draw(&mut a), exponential_draw(&mut b));
        }
    }
}
