// Copyright (c) 2026 rezky_nightky

use rand::{
    distr::{Distribution, StandardUniform},
    rngs::StdRng,
    SeedableRng,
};

/// Source of uniform draws in `[0, 1)` for spawn decisions.
pub trait RandomSource {
    fn next_unit(&mut self) -> f32;
}

pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self { rng }
    }
}

impl RandomSource for StdRandom {
    fn next_unit(&mut self) -> f32 {
        StandardUniform.sample(&mut self.rng)
    }
}

/// Replays a fixed list of draws, then repeats `fallback` forever.
#[cfg(test)]
pub struct SequenceRandom {
    draws: std::collections::VecDeque<f32>,
    fallback: f32,
}

#[cfg(test)]
impl SequenceRandom {
    pub fn new(draws: &[f32], fallback: f32) -> Self {
        Self {
            draws: draws.iter().copied().collect(),
            fallback,
        }
    }

    /// Never spawns.
    pub fn dry() -> Self {
        Self::new(&[], 1.0)
    }

    pub fn push(&mut self, draws: &[f32]) {
        self.draws.extend(draws.iter().copied());
    }
}

#[cfg(test)]
impl RandomSource for SequenceRandom {
    fn next_unit(&mut self) -> f32 {
        self.draws.pop_front().unwrap_or(self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn std_random_stays_in_unit_interval() {
        let mut r = StdRandom::new(Some(7));
        for _ in 0..10_000 {
            let v = r.next_unit();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn seeded_sources_repeat() {
        let mut a = StdRandom::new(Some(42));
        let mut b = StdRandom::new(Some(42));
        for _ in 0..64 {
            assert_eq!(a.next_unit(), b.next_unit());
        }
    }

    #[test]
    fn sequence_falls_back_when_drained() {
        let mut r = SequenceRandom::new(&[0.1, 0.2], 0.9);
        assert_eq!(r.next_unit(), 0.1);
        assert_eq!(r.next_unit(), 0.2);
        assert_eq!(r.next_unit(), 0.9);
        r.push(&[0.0]);
        assert_eq!(r.next_unit(), 0.0);
    }
}
