//! Random selection helpers
//!
//! - Weighted discrete choice over rule candidates and mutation kinds
//! - Uniform picks among the positions of a symbol class in a string
//!
//! Every helper takes the random source explicitly so callers can seed it.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::error::{PlantError, Result};

/// Draw an index with probability proportional to its weight.
///
/// Zero-weight entries are never drawn. Empty, negative, non-finite or
/// all-zero weights fail instead of falling back to index 0.
pub fn weighted_index<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> Result<usize> {
    let dist = WeightedIndex::new(weights)
        .map_err(|e| PlantError::DegenerateWeights(format!("{weights:?}: {e}")))?;
    Ok(dist.sample(rng))
}

/// Byte offsets of every character of `s` that belongs to `characters`.
pub fn occurrences(s: &str, characters: &str) -> Vec<usize> {
    s.char_indices()
        .filter(|(_, c)| characters.contains(*c))
        .map(|(i, _)| i)
        .collect()
}

/// Uniformly pick one occurrence of any of `characters` in `s`.
///
/// Samples the index list directly, so sparse symbols are as likely as
/// dense ones and the pick always terminates.
pub fn random_occurrence<R: Rng + ?Sized>(s: &str, characters: &str, rng: &mut R) -> Result<usize> {
    let candidates = occurrences(s, characters);
    if candidates.is_empty() {
        return Err(PlantError::EmptyCandidateSet {
            characters: characters.to_string(),
        });
    }
    Ok(candidates[rng.gen_range(0..candidates.len())])
}

/// Uniform insertion point in `s`, both ends included.
pub fn random_insertion_point<R: Rng + ?Sized>(s: &str, rng: &mut R) -> usize {
    let slots = s.chars().count() + 1;
    let nth = rng.gen_range(0..slots);
    s.char_indices().nth(nth).map(|(i, _)| i).unwrap_or(s.len())
}
