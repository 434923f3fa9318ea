pub mod bits;
pub mod config;
pub mod random;
pub mod report;
pub mod trace;
pub mod utils;
pub mod vm;

pub use log;

/// Debug-level message; always compiled in, filtered at runtime.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::log::debug!($($arg)*)
    };
}

/// Trace-level message for the per-reference hot path.
/// Expands to nothing unless the `log_trace` feature is enabled.
#[cfg(feature = "log_trace")]
#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {
        $crate::log::trace!($($arg)*)
    };
}

#[cfg(not(feature = "log_trace"))]
#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {{}};
}
