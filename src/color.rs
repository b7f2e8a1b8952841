//! Trunk and leaf colours

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub type Rgb = [u8; 3];

/// Per-channel jitter applied around a base colour
const JITTER: u8 = 5;

/// How a colour is drawn each time a render command is produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColorSpec {
    Fixed(Rgb),
    JitterAround(Rgb),
    /// Pick one base colour, then jitter it
    Palette(Vec<Rgb>),
}

impl ColorSpec {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Rgb {
        match self {
            ColorSpec::Fixed(rgb) => *rgb,
            ColorSpec::JitterAround(base) => similar_color(*base, rng),
            ColorSpec::Palette(bases) => match bases.choose(rng) {
                Some(base) => similar_color(*base, rng),
                None => [0, 0, 0],
            },
        }
    }
}

/// Random colour within ±5 of `base` on every channel, clamped to [0, 255]
pub fn similar_color<R: Rng + ?Sized>(base: Rgb, rng: &mut R) -> Rgb {
    base.map(|c| rng.gen_range(c.saturating_sub(JITTER)..=c.saturating_add(JITTER)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_jitter_stays_close() {
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..500 {
            let [r, g, b] = similar_color([100, 0, 255], &mut rng);
            assert!((95..=105).contains(&r));
            assert!(g <= 5);
            assert!(b >= 250);
        }
    }

    #[test]
    fn test_fixed_is_exact() {
        let mut rng = StdRng::seed_from_u64(4);
        assert_eq!(ColorSpec::Fixed([1, 2, 3]).sample(&mut rng), [1, 2, 3]);
    }

    #[test]
    fn test_palette_draws_near_a_member() {
        let mut rng = StdRng::seed_from_u64(4);
        let spec = ColorSpec::Palette(vec![[250, 215, 5], [180, 125, 220]]);
        for _ in 0..100 {
            let [r, _, _] = spec.sample(&mut rng);
            assert!((245..=255).contains(&r) || (175..=185).contains(&r));
        }
    }
}
