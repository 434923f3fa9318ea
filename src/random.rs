use rand::distributions::uniform::SampleUniform;
use rand::{
    distributions::{Distribution, Uniform},
    rngs::StdRng,
    Rng, SeedableRng,
};

use crate::vm::types::{RefKind, TraceRecord, Vfn};

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Generates a random integer within a specified range.
///
/// # Arguments
///
/// * `rng` - Source of randomness.
/// * `min` - The minimum value of the integer (inclusive).
/// * `max` - The maximum value of the integer (inclusive).
pub fn gen_random_int<T, R>(rng: &mut R, min: T, max: T) -> T
where
    T: SampleUniform,
    R: Rng,
{
    rng.sample(Uniform::new_inclusive(min, max))
}

/// Synthetic memory trace over virtual pages `0..num_pages`.
///
/// Roughly half of the references are instruction fetches, the rest split
/// between loads and stores. Addresses land anywhere inside their page.
#[derive(Debug, Clone)]
pub struct RandomTrace {
    records: Vec<TraceRecord>,
}

impl RandomTrace {
    /// Uniformly distributed pages.
    pub fn new(num_refs: usize, num_pages: u32, page_size: u32, seed: u64) -> Self {
        Self::with_locality(num_refs, num_pages, page_size, num_pages, 1.0, seed)
    }

    /// A fraction `hot_ratio` of references go to the first `hot_pages`
    /// pages, the rest anywhere.
    pub fn with_locality(
        num_refs: usize,
        num_pages: u32,
        page_size: u32,
        hot_pages: u32,
        hot_ratio: f64,
        seed: u64,
    ) -> Self {
        assert!(num_pages > 0 && hot_pages > 0 && hot_pages <= num_pages);
        let mut rng = seeded_rng(seed);
        let all = Uniform::new(0, num_pages);
        let hot = Uniform::new(0, hot_pages);
        let records = (0..num_refs)
            .map(|_| {
                let vfn: Vfn = if rng.gen_bool(hot_ratio) {
                    hot.sample(&mut rng)
                } else {
                    all.sample(&mut rng)
                };
                let offset = gen_random_int(&mut rng, 0, page_size - 1);
                let kind = match gen_random_int(&mut rng, 0u8, 3) {
                    0 => RefKind::Load,
                    1 => RefKind::Store,
                    _ => RefKind::Code,
                };
                let pid = gen_random_int(&mut rng, 1, 4);
                TraceRecord::new(pid, kind, vfn * page_size + offset)
            })
            .collect();
        RandomTrace { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TraceRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[TraceRecord] {
        &self.records
    }
}

impl std::ops::Index<usize> for RandomTrace {
    type Output = TraceRecord;

    fn index(&self, index: usize) -> &Self::Output {
        &self.records[index]
    }
}
