use std::path::PathBuf;

use clap::Parser;

use crate::{
    bits::pow_2,
    vm::{
        eviction_policy::{PolicyKind, DEFAULT_SEED},
        page_table::{check_geometry, DEFAULT_ADDRESS_BITS},
        physical_memory::MIN_PHYS_PAGES,
        types::VmStatus,
    },
};

pub const DEFAULT_PHYS_PAGES: usize = 128;
pub const DEFAULT_PAGE_SIZE: u32 = 1024;

#[derive(Debug, Parser)]
#[clap(
    name = "vmsim",
    version,
    about = "Replays a memory trace through a paged virtual memory and reports fault statistics"
)]
pub struct SimParams {
    /// Replacement algorithm: random, lru, fifo, lfu, mfu, clock or second.
    #[clap(value_name = "ALGORITHM")]
    pub algorithm: String,
    /// Trace file of `pid, mode, hexaddr` lines. `-` or absent reads stdin.
    #[clap(value_name = "TRACEFILE")]
    pub trace_file: Option<PathBuf>,
    /// Number of physical frames.
    #[clap(short = 'p', long = "pages", default_value = "128")]
    pub pages: usize,
    /// Page size in bytes. Power of two, at least 16.
    #[clap(short = 's', long = "size", default_value = "1024")]
    pub page_size: u32,
    /// Stop after this many references. 0 runs the whole trace.
    #[clap(short = 'l', long = "limit", default_value = "0")]
    pub limit: u64,
    /// Append the report to FILE instead of printing it.
    #[clap(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,
    /// Width of a virtual address in bits.
    #[clap(short = 'a', long = "address-bits", default_value = "16")]
    pub address_bits: u32,
    /// Seed for the random replacement algorithm.
    #[clap(long = "seed", default_value = "1234567")]
    pub seed: u64,
    /// Log configuration and progress.
    #[clap(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// A validated simulation setup.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub policy: PolicyKind,
    pub num_frames: usize,
    pub page_size: u32,
    pub address_bits: u32,
    pub limit: u64,
    pub seed: u64,
    pub input_file: Option<PathBuf>,
    pub output_file: Option<PathBuf>,
    pub verbose: bool,
}

impl SimConfig {
    /// Configuration with the default address width, no limit, stdin input
    /// and stdout output.
    pub fn new(policy: PolicyKind, num_frames: usize, page_size: u32) -> Result<Self, VmStatus> {
        let config = SimConfig {
            policy,
            num_frames,
            page_size,
            address_bits: DEFAULT_ADDRESS_BITS,
            limit: 0,
            seed: DEFAULT_SEED,
            input_file: None,
            output_file: None,
            verbose: false,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_address_bits(mut self, address_bits: u32) -> Result<Self, VmStatus> {
        self.address_bits = address_bits;
        self.validate()?;
        Ok(self)
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_input_file(mut self, path: Option<PathBuf>) -> Self {
        self.input_file = path;
        self
    }

    pub fn with_output_file(mut self, path: Option<PathBuf>) -> Self {
        self.output_file = path;
        self
    }

    pub fn validate(&self) -> Result<(), VmStatus> {
        if self.num_frames < MIN_PHYS_PAGES {
            return Err(VmStatus::TooFewFrames {
                frames: self.num_frames,
                min: MIN_PHYS_PAGES,
            });
        }
        check_geometry(self.address_bits, self.page_size)?;
        Ok(())
    }

    /// Number of distinct virtual pages in the address space.
    pub fn num_virtual_pages(&self) -> u64 {
        pow_2(self.address_bits) / u64::from(self.page_size)
    }

    /// How the trace source is named in the report.
    pub fn input_name(&self) -> String {
        match &self.input_file {
            Some(path) => path.display().to_string(),
            None => "stdin".to_string(),
        }
    }
}

impl TryFrom<&SimParams> for SimConfig {
    type Error = VmStatus;

    fn try_from(params: &SimParams) -> Result<Self, Self::Error> {
        let policy = params.algorithm.parse::<PolicyKind>()?;
        let input_file = params
            .trace_file
            .as_ref()
            .filter(|path| path.as_os_str() != "-")
            .cloned();
        let mut config = SimConfig::new(policy, params.pages, params.page_size)?
            .with_address_bits(params.address_bits)?
            .with_limit(params.limit)
            .with_seed(params.seed)
            .with_input_file(input_file)
            .with_output_file(params.output.clone());
        config.verbose = params.verbose;
        Ok(config)
    }
}

impl std::fmt::Display for SimConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut result = String::new();
        result.push_str(&format!("{:<20}: {}\n", "algorithm", self.policy));
        result.push_str(&format!("{:<20}: {}\n", "phys_pages", self.num_frames));
        result.push_str(&format!("{:<20}: {}\n", "pagesize", self.page_size));
        result.push_str(&format!("{:<20}: {}\n", "address_bits", self.address_bits));
        result.push_str(&format!("{:<20}: {}\n", "ref_limit", self.limit));
        result.push_str(&format!("{:<20}: {}\n", "seed", self.seed));
        result.push_str(&format!("{:<20}: {}\n", "input_file", self.input_name()));
        let output = match &self.output_file {
            Some(path) => path.display().to_string(),
            None => "stdout".to_string(),
        };
        result.push_str(&format!("{:<20}: {}\n", "output_file", output));
        write!(f, "{}", result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> SimParams {
        SimParams::try_parse_from(std::iter::once("vmsim").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_params_defaults() {
        let params = parse(&["lru"]);
        assert_eq!(params.pages, DEFAULT_PHYS_PAGES);
        assert_eq!(params.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(params.limit, 0);
        assert_eq!(params.address_bits, DEFAULT_ADDRESS_BITS);
        assert_eq!(params.seed, DEFAULT_SEED);
        assert!(params.trace_file.is_none());

        let config = SimConfig::try_from(&params).unwrap();
        assert_eq!(config.policy, PolicyKind::Lru);
        assert_eq!(config.num_frames, 128);
        assert_eq!(config.input_file, None);
        assert_eq!(config.input_name(), "stdin");
        assert_eq!(config.num_virtual_pages(), 64);
    }

    #[test]
    fn test_params_all_options() {
        let params = parse(&[
            "-p", "16", "-s", "64", "-l", "500", "-o", "out.txt", "-a", "32", "--seed", "7", "-v",
            "second", "trace.txt",
        ]);
        let config = SimConfig::try_from(&params).unwrap();
        assert_eq!(config.policy, PolicyKind::SecondChance);
        assert_eq!(config.num_frames, 16);
        assert_eq!(config.page_size, 64);
        assert_eq!(config.limit, 500);
        assert_eq!(config.address_bits, 32);
        assert_eq!(config.seed, 7);
        assert!(config.verbose);
        assert_eq!(config.input_file, Some(PathBuf::from("trace.txt")));
        assert_eq!(config.output_file, Some(PathBuf::from("out.txt")));
    }

    #[test]
    fn test_dash_reads_stdin() {
        let config = SimConfig::try_from(&parse(&["fifo", "-"])).unwrap();
        assert_eq!(config.input_file, None);
    }

    #[test]
    fn test_config_errors() {
        assert_eq!(
            SimConfig::try_from(&parse(&["optimal"])).err(),
            Some(VmStatus::UnknownPolicy("optimal".to_string()))
        );
        assert_eq!(
            SimConfig::try_from(&parse(&["-p", "2", "lru"])).err(),
            Some(VmStatus::TooFewFrames { frames: 2, min: 3 })
        );
        assert_eq!(
            SimConfig::try_from(&parse(&["-s", "8", "lru"])).err(),
            Some(VmStatus::PageSizeTooSmall { size: 8, min: 16 })
        );
        assert_eq!(
            SimConfig::try_from(&parse(&["-s", "1000", "lru"])).err(),
            Some(VmStatus::PageSizeNotPowerOfTwo(1000))
        );
        assert!(matches!(
            SimConfig::try_from(&parse(&["-a", "40", "lru"])),
            Err(VmStatus::AddressBitsOutOfRange { .. })
        ));
        assert!(SimParams::try_parse_from(["vmsim"]).is_err());
        assert!(SimParams::try_parse_from(["vmsim", "-p", "many", "lru"]).is_err());
    }

    #[test]
    fn test_config_display() {
        let config = SimConfig::new(PolicyKind::Clock, 4, 256).unwrap();
        let out = config.to_string();
        assert!(out.contains("algorithm           : clock"));
        assert!(out.contains("phys_pages          : 4"));
        assert!(out.contains("input_file          : stdin"));
    }
}
