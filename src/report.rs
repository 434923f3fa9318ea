use std::{
    fs::OpenOptions,
    io::{self, Write},
};

use crate::{config::SimConfig, vm::stats::VmStats};

/// Write the parameter block followed by one `label: code,load,store;  total`
/// line per statistic.
pub fn write_report<W: Write>(out: &mut W, config: &SimConfig, stats: &VmStats) -> io::Result<()> {
    write!(out, "\n\n Simulation Parameters:")?;
    writeln!(out, "\n    phys_pages, pagesize, input_file, fault_handler, ref_limit")?;
    writeln!(
        out,
        "     {},  {},  {},  {},  {}",
        config.num_frames,
        config.page_size,
        config.input_name(),
        config.policy,
        config.limit
    )?;

    write!(out, "\n Simulation Results:")?;
    writeln!(out, "\n\tStat Type: code,load,store;   total")?;
    for (label, counts) in stats.rows().iter() {
        writeln!(
            out,
            "\t{}: {},{},{};  {}",
            label,
            counts[0],
            counts[1],
            counts[2],
            counts.iter().sum::<u64>()
        )?;
    }
    out.flush()
}

/// Append the report to the configured output file, or print it to stdout.
pub fn emit_report(config: &SimConfig, stats: &VmStats) -> io::Result<()> {
    match &config.output_file {
        Some(path) => {
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            write_report(&mut file, config, stats)
        }
        None => write_report(&mut io::stdout().lock(), config, stats),
    }
}
