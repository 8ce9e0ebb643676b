//! Fund-name selection for investments made without an explicit entity.

use finlit_core::FUND_NAMES;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Chooses a fund name from [`FUND_NAMES`].
pub trait FundPicker {
    fn pick(&mut self) -> &'static str;
}

/// Uniform pick driven by a ChaCha8 stream.
#[derive(Clone, Debug)]
pub struct SeededFundPicker {
    rng: ChaCha8Rng,
}

impl SeededFundPicker {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Seeded when `seed` is set, otherwise from OS entropy.
    pub fn from_config(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::new)
    }
}

impl FundPicker for SeededFundPicker {
    fn pick(&mut self) -> &'static str {
        FUND_NAMES[self.rng.gen_range(0..FUND_NAMES.len())]
    }
}

/// Any selector closure works as a picker.
impl<F> FundPicker for F
where
    F: FnMut() -> &'static str,
{
    fn pick(&mut self) -> &'static str {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_picks_repeat() {
        let mut a = SeededFundPicker::new(42);
        let mut b = SeededFundPicker::new(42);
        let xs: Vec<_> = (0..20).map(|_| a.pick()).collect();
        let ys: Vec<_> = (0..20).map(|_| b.pick()).collect();
        assert_eq!(xs, ys);
        assert!(xs.iter().all(|n| FUND_NAMES.contains(n)));
    }

    #[test]
    fn closure_selector() {
        let mut p = || FUND_NAMES[3];
        assert_eq!(p.pick(), "Central Secure Investment Board");
    }
}
