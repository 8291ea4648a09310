//! Batch dataset generation
//!
//! Samples are independent: each one owns a `StdRng` seeded from the batch
//! seed and its index, so a batch is reproducible whatever the worker count.

use crate::composer::UtteranceComposer;
use crate::config::GeneratorConfig;
use crate::error::{Result, SynthError};
use crate::record::{emit_contextual, emit_flat, Record};
use crate::sampling::sample_seed;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::thread;
use std::time::Instant;

/// Which record layout to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetVariant {
    /// History + latest input + newline-joined response
    Contextual,
    /// Single input + list of primitive calls
    Flat,
}

impl fmt::Display for DatasetVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetVariant::Contextual => f.write_str("contextual"),
            DatasetVariant::Flat => f.write_str("flat"),
        }
    }
}

impl FromStr for DatasetVariant {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "contextual" | "context" => Ok(DatasetVariant::Contextual),
            "flat" => Ok(DatasetVariant::Flat),
            other => Err(SynthError::Config(format!("unknown dataset variant: {other}"))),
        }
    }
}

pub struct DatasetGenerator {
    composer: UtteranceComposer,
}

impl DatasetGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        Ok(Self {
            composer: UtteranceComposer::new(config)?,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        self.composer.config()
    }

    /// Generate the record of a single seed.
    pub fn sample(&self, variant: DatasetVariant, seed: u64) -> Result<Record> {
        let mut rng = StdRng::seed_from_u64(seed);
        match variant {
            DatasetVariant::Contextual => {
                let sample = self.composer.compose_contextual(&mut rng)?;
                Ok(Record::Contextual(emit_contextual(&sample)))
            }
            DatasetVariant::Flat => {
                let sample = self.composer.compose_flat(&mut rng)?;
                Ok(Record::Flat(emit_flat(&sample)))
            }
        }
    }

    /// Generate `samples` records in index order. The first failing sample
    /// stops the batch.
    pub fn generate(
        &self,
        variant: DatasetVariant,
        samples: usize,
        base_seed: u64,
        workers: usize,
    ) -> Result<Vec<Record>> {
        let workers = workers.clamp(1, samples.max(1));
        let chunk = samples.div_ceil(workers).max(1);
        let started = Instant::now();
        tracing::info!(%variant, samples, base_seed, workers, "generating dataset");

        let chunks: Vec<Result<Vec<Record>>> = thread::scope(|scope| {
            let handles: Vec<_> = (0..samples)
                .step_by(chunk)
                .map(|first| {
                    let last = (first + chunk).min(samples);
                    scope.spawn(move || self.generate_range(variant, first..last, base_seed))
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|_| Err(SynthError::Worker("worker panicked".to_string())))
                })
                .collect()
        });

        let mut records = Vec::with_capacity(samples);
        for chunk in chunks {
            records.extend(chunk?);
        }
        tracing::info!(
            records = records.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "dataset generated"
        );
        Ok(records)
    }

    fn generate_range(
        &self,
        variant: DatasetVariant,
        indices: std::ops::Range<usize>,
        base_seed: u64,
    ) -> Result<Vec<Record>> {
        indices
            .map(|index| {
                let seed = sample_seed(base_seed, index as u64);
                tracing::debug!(index, seed, "generating sample");
                self.sample(variant, seed).inspect_err(|e| {
                    tracing::error!(index, seed, error = %e, "sample generation failed");
                })
            })
            .collect()
    }
}
