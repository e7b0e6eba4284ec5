use rand::SeedableRng;
use rand::distr::uniform::{self, SampleUniform};
use rand::distr::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RandomError {
    #[error("invalid range: min {min} is greater than max {max}")]
    InvalidRange { min: String, max: String },
    #[error("cannot build distribution: {0}")]
    Distribution(#[from] uniform::Error),
}

/// Uniform sampler over the closed range `[min, max]`.
///
/// Works for every integer and float type `rand` can sample uniformly.
pub struct RandomGenerator<T: SampleUniform> {
    rng: StdRng,
    distribution: Uniform<T>,
}

impl<T> RandomGenerator<T>
where
    T: SampleUniform + PartialOrd + Copy + std::fmt::Display,
{
    pub fn new(min: T, max: T) -> Result<Self, RandomError> {
        Self::with_rng(min, max, StdRng::from_os_rng())
    }

    /// Reproducible generator: the same seed yields the same sequence.
    pub fn with_seed(min: T, max: T, seed: u64) -> Result<Self, RandomError> {
        Self::with_rng(min, max, StdRng::seed_from_u64(seed))
    }

    fn with_rng(min: T, max: T, rng: StdRng) -> Result<Self, RandomError> {
        if min > max {
            return Err(RandomError::InvalidRange {
                min: min.to_string(),
                max: max.to_string(),
            });
        }
        let distribution = Uniform::new_inclusive(min, max)?;
        Ok(Self { rng, distribution })
    }

    pub fn next_value(&mut self) -> T {
        self.distribution.sample(&mut self.rng)
    }

    pub fn take(&mut self, count: usize) -> Vec<T> {
        (0..count).map(|_| self.next_value()).collect()
    }
}

pub fn shuffle<T>(items: &mut [T]) {
    items.shuffle(&mut StdRng::from_os_rng());
}

pub fn shuffle_with_seed<T>(items: &mut [T], seed: u64) {
    items.shuffle(&mut StdRng::seed_from_u64(seed));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_values_stay_in_closed_range() {
        let mut generator = RandomGenerator::new(-3_i32, 3).unwrap();
        for value in generator.take(500) {
            assert!((-3..=3).contains(&value));
        }
    }

    #[test]
    fn real_values_stay_in_range() {
        let mut generator = RandomGenerator::new(0.5_f64, 1.5).unwrap();
        for value in generator.take(500) {
            assert!((0.5..=1.5).contains(&value));
        }
    }

    #[test]
    fn degenerate_range_always_yields_bound() {
        let mut ints = RandomGenerator::new(7_u8, 7).unwrap();
        assert!(ints.take(20).iter().all(|v| *v == 7));
        let mut reals = RandomGenerator::new(2.0_f32, 2.0).unwrap();
        assert!(reals.take(20).iter().all(|v| *v == 2.0));
    }

    #[test]
    fn full_i64_range_is_accepted() {
        let mut generator = RandomGenerator::new(i64::MIN, i64::MAX).unwrap();
        let _ = generator.next_value();
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = RandomGenerator::new(10_i64, 1).err().unwrap();
        assert!(matches!(err, RandomError::InvalidRange { .. }));
        assert_eq!(
            err.to_string(),
            "invalid range: min 10 is greater than max 1"
        );
    }

    #[test]
    fn non_finite_bounds_are_rejected() {
        let err = RandomGenerator::new(0.0_f64, f64::INFINITY).err().unwrap();
        assert!(matches!(err, RandomError::Distribution(_)));
    }

    #[test]
    fn seeded_generators_repeat() {
        let a = RandomGenerator::with_seed(0_u32, 1000, 42).unwrap().take(10);
        let b = RandomGenerator::with_seed(0_u32, 1000, 42).unwrap().take(10);
        assert_eq!(a, b);
    }

    #[test]
    fn shuffle_keeps_elements() {
        let mut items: Vec<u32> = (0..50).collect();
        shuffle(&mut items);
        items.sort_unstable();
        assert_eq!(items, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn seeded_shuffle_is_reproducible() {
        let mut a: Vec<u32> = (0..20).collect();
        let mut b = a.clone();
        shuffle_with_seed(&mut a, 7);
        shuffle_with_seed(&mut b, 7);
        assert_eq!(a, b);
    }
}
