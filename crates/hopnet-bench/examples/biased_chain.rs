//! Biased-chain demo.
//!
//! Demonstrates: build a network → run synchronously with a hop observer →
//! read currents → dispatch a seed sweep on worker threads → collect.
//!
//! Set `RUST_LOG=hopnet_engine=debug` to see damping progress records.

use hopnet_core::ChargeState;
use hopnet_engine::{Dispatcher, HopRecord, RunJob, RunOptions, SimulationConfig, Simulator};
use hopnet_test_utils::fixtures::biased_chain;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    println!("=== hopnet biased chain ===\n");

    let (network, params) = biased_chain();
    let layout = network.layout();
    let config = SimulationConfig::new(network, params)
        .seed(42)
        .options(RunOptions::default().track_mean_occupation(true));

    // --- Synchronous run with an observer ---
    let mut sim = Simulator::new(config.clone()).unwrap();
    let mut state = ChargeState::new(layout);
    let mut observer = |r: &HopRecord, s: &ChargeState| {
        if r.hop % 100 == 0 {
            println!(
                "  hop {:4}  t = {:9.3}  step = {:.3e}  occupation = {:.4?}",
                r.hop, r.elapsed, r.step, s.occupation
            );
        }
    };
    let report = sim.run_from(&mut state, 500, 0.0, &mut observer).unwrap();

    println!("\nAfter {} hops (t = {:.3}):", report.hops, report.elapsed_time);
    println!("  occupation      = {:.4?}", state.occupation);
    println!(
        "  mean occupation = {:.4?}",
        report.mean_occupation.as_deref().unwrap_or_default()
    );
    println!("  currents        = {:.5?}", report.currents(&state));
    println!("  activity share  = {:.4?}", report.electrode_activity_share);

    // --- Seed sweep on worker threads ---
    println!("\nSeed sweep (dispatched):");
    let dispatcher = Dispatcher::new();
    let handles: Vec<_> = (0..4u64)
        .map(|seed| {
            let job = RunJob::new(config.clone().seed(seed), 500);
            (seed, dispatcher.start(job).unwrap())
        })
        .collect();
    for (seed, handle) in handles {
        let done = dispatcher.wait(handle).unwrap();
        println!(
            "  seed {seed}: t = {:9.3}  currents = {:.5?}",
            done.report.elapsed_time,
            done.report.currents(&done.state)
        );
    }
}
