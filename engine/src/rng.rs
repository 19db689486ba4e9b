use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform floats in `[0, 1)`.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

/// `floor(r * len)`, clamped so an `r` of exactly 1.0 still lands in range.
pub fn pick_index(rng: &mut impl RandomSource, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let index = (rng.next_f64() * len as f64).floor() as usize;
    index.min(len - 1)
}

pub struct SessionRng {
    rng: StdRng,
    seed: u64,
}

impl SessionRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn from_random() -> Self {
        let seed: u64 = rand::rng().random();
        Self::new(seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SessionRng {
    fn next_f64(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}
