use rayon::prelude::*;

use crate::check::check_sector_with;
use crate::io::RawImageReader;
use crate::observer::SectorObserver;
use crate::report::VerificationSummary;
use crate::sector::{classify, RAW_SECTOR_SIZE};

pub struct ParallelProcessor {
    num_workers: usize,
    chunk_size: usize,
}

impl ParallelProcessor {
    pub fn new(num_workers: Option<usize>) -> Self {
        let num_workers = num_workers.unwrap_or_else(|| {
            let cpus = num_cpus::get();
            cpus.min(8)
        });

        Self {
            num_workers: num_workers.max(1),
            chunk_size: 64,
        }
    }

    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Verifies every sector of `reader`, calling `on_chunk` with the number
    /// of sectors finished after each chunk.
    pub fn verify_image<O, F>(
        &self,
        reader: &RawImageReader,
        observer: &O,
        on_chunk: F,
    ) -> anyhow::Result<VerificationSummary>
    where
        O: SectorObserver + Sync + ?Sized,
        F: Fn(usize) + Sync,
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.num_workers)
            .build()?;

        let total = reader.total_sectors();
        let chunk_size = self.chunk_size;
        let chunks = total.div_ceil(chunk_size);

        let summary = pool.install(|| {
            (0..chunks)
                .into_par_iter()
                .map(|chunk| {
                    let start = chunk * chunk_size;
                    let end = (start + chunk_size).min(total);
                    let mut partial = VerificationSummary::default();

                    for index in start..end {
                        if let Some(sector) = reader.read_sector(index) {
                            let kind = classify(&sector[..RAW_SECTOR_SIZE]);
                            let verdict = check_sector_with(sector, observer);
                            partial.record(index, kind, verdict);
                        }
                    }

                    on_chunk(end - start);
                    partial
                })
                .reduce(VerificationSummary::default, VerificationSummary::merge)
        });

        Ok(summary)
    }
}
