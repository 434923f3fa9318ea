/*
 * trace.rs
 *
 * Reads memory traces: one `pid, mode, hexaddr` record per line, where mode
 * `R` is a load, `W` a store and anything else an instruction fetch.
 */

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use log::warn;

use crate::vm::types::{RefKind, TraceRecord, VmStatus};

/// Parse one trace line. Whitespace around fields is ignored and the
/// address may carry a `0x` prefix.
pub fn parse_line(line: &str) -> Option<TraceRecord> {
    let mut fields = line.splitn(3, ',').map(str::trim);
    let pid = fields.next()?.parse().ok()?;
    let mut mode = fields.next()?.chars();
    let kind = RefKind::from_mode(mode.next()?);
    if mode.next().is_some() {
        return None;
    }
    let addr = fields.next()?;
    let addr = addr
        .strip_prefix("0x")
        .or_else(|| addr.strip_prefix("0X"))
        .unwrap_or(addr);
    let vaddr = u32::from_str_radix(addr, 16).ok()?;
    Some(TraceRecord::new(pid, kind, vaddr))
}

/// Iterator over the records of a trace. Blank lines are skipped; the
/// first malformed line or read error ends the trace.
pub struct TraceReader<R: BufRead> {
    input: R,
    line: String,
    line_no: usize,
    done: bool,
}

impl<R: BufRead> TraceReader<R> {
    pub fn new(input: R) -> Self {
        TraceReader {
            input,
            line: String::new(),
            line_no: 0,
            done: false,
        }
    }

    /// Lines consumed so far.
    pub fn line_no(&self) -> usize {
        self.line_no
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = TraceRecord;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            self.line.clear();
            match self.input.read_line(&mut self.line) {
                Ok(0) => self.done = true,
                Ok(_) => {
                    self.line_no += 1;
                    if self.line.trim().is_empty() {
                        continue;
                    }
                    match parse_line(&self.line) {
                        Some(record) => return Some(record),
                        None => {
                            warn!(
                                "Malformed trace line {}: {:?}, stopping",
                                self.line_no,
                                self.line.trim_end()
                            );
                            self.done = true;
                        }
                    }
                }
                Err(e) => {
                    warn!("Trace read error after line {}: {}, stopping", self.line_no, e);
                    self.done = true;
                }
            }
        }
        None
    }
}

impl<R: BufRead> std::iter::FusedIterator for TraceReader<R> {}

/// Open `path` for reading, or stdin when it is `None` or `-`.
pub fn open_trace(path: Option<&Path>) -> Result<Box<dyn BufRead>, VmStatus> {
    match path {
        Some(path) if path.as_os_str() != "-" => {
            let file = File::open(path)
                .map_err(|e| VmStatus::Io(format!("{}: {}", path.display(), e)))?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}
