//! L-System Engine - parallel string rewriting
//!
//! Every symbol of the current state is replaced at once per step.
//! Symbols without a rule are terminal and copy through unchanged.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::sampling::weighted_index;

/// Production for a single symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleBody {
    Fixed(String),
    /// Candidate replacements with non-negative weights
    Weighted(Vec<(String, f64)>),
}

impl RuleBody {
    pub fn fixed(replacement: impl Into<String>) -> Self {
        RuleBody::Fixed(replacement.into())
    }

    pub fn weighted<S: Into<String>>(candidates: impl IntoIterator<Item = (S, f64)>) -> Self {
        RuleBody::Weighted(candidates.into_iter().map(|(s, w)| (s.into(), w)).collect())
    }

    /// Pick the replacement for one occurrence of the symbol
    pub fn expand<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&str> {
        match self {
            RuleBody::Fixed(s) => Ok(s),
            RuleBody::Weighted(candidates) => {
                let weights: Vec<f64> = candidates.iter().map(|(_, w)| *w).collect();
                let i = weighted_index(&weights, rng)?;
                Ok(&candidates[i].0)
            }
        }
    }
}

pub type Rules = BTreeMap<char, RuleBody>;

#[derive(Debug, Clone)]
pub struct LSystem {
    pub alphabet: String,
    pub rules: Rules,
    pub axiom: String,
    pub state: String,
}

impl LSystem {
    pub fn new(alphabet: impl Into<String>, rules: Rules, axiom: impl Into<String>) -> Self {
        let axiom = axiom.into();
        Self {
            alphabet: alphabet.into(),
            rules,
            state: axiom.clone(),
            axiom,
        }
    }

    pub fn reset(&mut self) {
        self.state = self.axiom.clone();
    }

    /// Apply `n` rewriting steps.
    ///
    /// Each step reads the whole previous state before the new one replaces
    /// it. Growth is unbounded; callers keep `n` small.
    pub fn step<R: Rng + ?Sized>(&mut self, n: usize, rng: &mut R) -> Result<()> {
        for generation in 0..n {
            let mut next = String::with_capacity(self.state.len() * 2);
            for symbol in self.state.chars() {
                match self.rules.get(&symbol) {
                    Some(rule) => next.push_str(rule.expand(rng)?),
                    None => next.push(symbol),
                }
            }
            tracing::trace!(generation, len = next.len(), "rewrite step");
            self.state = next;
        }
        Ok(())
    }

    /// Symbols in the current state that are neither in the alphabet nor whitespace
    pub fn foreign_symbols(&self) -> usize {
        self.state
            .chars()
            .filter(|c| !c.is_whitespace() && !self.alphabet.contains(*c))
            .count()
    }
}

impl std::fmt::Display for LSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.state)
    }
}
