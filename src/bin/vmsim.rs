use clap::Parser;
use log::{info, LevelFilter};

use vmsim::{
    config::{SimConfig, SimParams},
    report::emit_report,
    trace::{open_trace, TraceReader},
    utils::init_logger,
    vm::prelude::{Simulator, VmStatus},
};

fn run(params: &SimParams) -> Result<(), VmStatus> {
    let config = SimConfig::try_from(params)?;
    info!("Configuration:\n{}", config);

    let mut sim = Simulator::new(&config)?;
    let num_refs = {
        let input = open_trace(config.input_file.as_deref())?;
        sim.run(TraceReader::new(input))?
    };
    info!(
        "Simulation done: {} references, {} hit rate {:.4}",
        num_refs,
        sim.policy_kind(),
        sim.stats().hit_rate().unwrap_or(0.0)
    );
    sim.dump();

    emit_report(&config, sim.stats())?;
    Ok(())
}

fn main() {
    let params = SimParams::parse();
    init_logger(if params.verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    });

    if let Err(e) = run(&params) {
        eprintln!("vmsim: {}", e);
        std::process::exit(1);
    }
}
