use std::io::Write;

use log::LevelFilter;

fn format_record(buf: &mut env_logger::fmt::Formatter, record: &log::Record) -> std::io::Result<()> {
    writeln!(
        buf,
        "{} [{}] - {}:{} - {}",
        record.level(),
        record.target(),
        record.file().unwrap_or("<unknown>"),
        record.line().unwrap_or(0),
        record.args()
    )
}

/// Install the process logger. `RUST_LOG` overrides `level` when set.
pub fn init_logger(level: LevelFilter) {
    let _ = env_logger::builder()
        .filter_level(level)
        .parse_default_env()
        .format(format_record)
        .try_init();
}

#[allow(dead_code)]
#[cfg(test)]
pub fn init_test_logger() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Info)
        .filter_module("vmsim::vm::simulator", log::LevelFilter::Debug) // Per module debugging
        .filter_module("vmsim::vm::eviction_policy", log::LevelFilter::Debug)
        .format(format_record)
        .try_init();
}
