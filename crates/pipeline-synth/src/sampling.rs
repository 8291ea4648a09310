//! Random-draw helpers shared by the grammar, generators and composer

use crate::error::{Result, SynthError};
use crate::registry::CommandKind;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Explicit `(value, weight)` table with a prebuilt sampler.
///
/// Weights must be finite, non-negative and sum to 1.
#[derive(Debug, Clone)]
pub struct WeightedTable<T> {
    values: Vec<T>,
    weights: Vec<f64>,
    index: WeightedIndex<f64>,
}

impl<T> WeightedTable<T> {
    pub fn new(name: &'static str, entries: Vec<(T, f64)>) -> Result<Self> {
        let invalid = |reason: String| SynthError::InvalidWeights {
            table: name,
            reason,
        };

        if entries.is_empty() {
            return Err(invalid("table is empty".to_string()));
        }
        if let Some((_, w)) = entries.iter().find(|(_, w)| !w.is_finite() || *w < 0.0) {
            return Err(invalid(format!("weight {w} is not a finite non-negative number")));
        }
        let total: f64 = entries.iter().map(|(_, w)| w).sum();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(invalid(format!("weights sum to {total}, expected 1")));
        }

        let (values, weights): (Vec<T>, Vec<f64>) = entries.into_iter().unzip();
        let index = WeightedIndex::new(&weights).map_err(|e| invalid(e.to_string()))?;
        Ok(Self {
            values,
            weights,
            index,
        })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> &T {
        &self.values[self.index.sample(rng)]
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

/// Uniform choice from a list that must not be empty.
pub fn pick<'a, T, R: Rng + ?Sized>(
    items: &'a [T],
    rng: &mut R,
    command: CommandKind,
    list: &'static str,
) -> Result<&'a T> {
    items
        .choose(rng)
        .ok_or(SynthError::EmptyList { command, list })
}

/// Bernoulli draw. `p` is validated by the config layer.
pub fn coin<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    rng.gen_bool(p.clamp(0.0, 1.0))
}

/// Seed of sample `index` in a batch started from `base`.
///
/// SplitMix64 finalizer over `base + index * golden`, so neighbouring indices
/// get uncorrelated streams and the result does not depend on which worker
/// runs the sample.
pub fn sample_seed(base: u64, index: u64) -> u64 {
    let mut z = base.wrapping_add(index.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    #[test]
    fn test_weighted_table_distribution() {
        let table = WeightedTable::new("counts", vec![(1, 0.2), (2, 0.8)]).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let mut hits: HashMap<i32, usize> = HashMap::new();
        for _ in 0..10_000 {
            *hits.entry(*table.sample(&mut rng)).or_default() += 1;
        }
        let ones = hits[&1] as f64 / 10_000.0;
        assert!((ones - 0.2).abs() < 0.03, "{ones}");
    }

    #[test]
    fn test_weighted_table_rejects_bad_weights() {
        assert!(WeightedTable::<u8>::new("empty", vec![]).is_err());
        assert!(WeightedTable::new("short", vec![(1, 0.2), (2, 0.3)]).is_err());
        assert!(WeightedTable::new("negative", vec![(1, -0.5), (2, 1.5)]).is_err());
        assert!(WeightedTable::new("nan", vec![(1, f64::NAN), (2, 1.0)]).is_err());
        // float noise from decimal weights is tolerated
        assert!(WeightedTable::new(
            "counts",
            vec![(1, 0.2), (2, 0.25), (3, 0.25), (4, 0.15), (5, 0.15)]
        )
        .is_ok());
    }

    #[test]
    fn test_pick_on_empty_list_fails() {
        let mut rng = StdRng::seed_from_u64(1);
        let empty: [&str; 0] = [];
        let err = pick(&empty, &mut rng, CommandKind::Home, "synonym").unwrap_err();
        assert!(err.to_string().contains("home"));
    }

    #[test]
    fn test_sample_seed_spreads_indices() {
        let seeds: Vec<u64> = (0..1000).map(|i| sample_seed(42, i)).collect();
        let mut unique = seeds.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), seeds.len());
        assert_eq!(sample_seed(42, 3), sample_seed(42, 3));
        assert_ne!(sample_seed(42, 3), sample_seed(43, 3));
    }
}
