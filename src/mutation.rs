//! Mutation Engine - structural edits on branch rules
//!
//! A branch rule is the replacement string of the `X` production. Each call to
//! [`mutate`] applies one weighted, precondition-gated edit and always returns
//! a string with balanced brackets over the plant alphabet.
//!
//! | Kind | Base weight | Enabled when |
//! |------|-------------|--------------|
//! | add rotation | 4 | `+` or `-` present |
//! | remove rotation | 4 | `+` or `-` present |
//! | `F` -> `f` | 4 | `F` present |
//! | `f` -> `F` | 4 | `f` present |
//! | remove `f` | 3 | `f` present |
//! | insert branch | 3 | any of `F f + -` present, at most 4 `X` |
//! | `X` -> `x` | 2 | `X` present |
//! | `x` -> `X` | 3 | `x` present, at most 4 `X` |
//! | remove branch | 3 | `[` present |
//! | add `F`/`f` | 2 | always |

use std::fmt;

use rand::Rng;

use crate::error::{PlantError, Result};
use crate::sampling::{random_insertion_point, random_occurrence, weighted_index};

/// Above this many major leaves, edits that add one are disabled
pub const MAX_LEAVES: usize = 4;

const ROTATIONS: &str = "+-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    AddRotation,
    RemoveRotation,
    LowercaseForward,
    UppercaseForward,
    RemoveMinorForward,
    InsertBranch,
    LowercaseLeaf,
    UppercaseLeaf,
    RemoveBranch,
    AddForward,
}

impl MutationKind {
    pub const ALL: [MutationKind; 10] = [
        MutationKind::AddRotation,
        MutationKind::RemoveRotation,
        MutationKind::LowercaseForward,
        MutationKind::UppercaseForward,
        MutationKind::RemoveMinorForward,
        MutationKind::InsertBranch,
        MutationKind::LowercaseLeaf,
        MutationKind::UppercaseLeaf,
        MutationKind::RemoveBranch,
        MutationKind::AddForward,
    ];

    pub fn base_weight(self) -> f64 {
        match self {
            MutationKind::AddRotation => 4.0,
            MutationKind::RemoveRotation => 4.0,
            MutationKind::LowercaseForward => 4.0,
            MutationKind::UppercaseForward => 4.0,
            MutationKind::RemoveMinorForward => 3.0,
            MutationKind::InsertBranch => 3.0,
            MutationKind::LowercaseLeaf => 2.0,
            MutationKind::UppercaseLeaf => 3.0,
            MutationKind::RemoveBranch => 3.0,
            MutationKind::AddForward => 2.0,
        }
    }

    pub fn is_eligible(self, branch: &str) -> bool {
        let has = |c: char| branch.contains(c);
        let leaves = branch.matches('X').count();
        match self {
            MutationKind::AddRotation | MutationKind::RemoveRotation => has('+') || has('-'),
            MutationKind::LowercaseForward => has('F'),
            MutationKind::UppercaseForward | MutationKind::RemoveMinorForward => has('f'),
            MutationKind::InsertBranch => {
                branch.contains(&['F', 'f', '+', '-'][..]) && leaves <= MAX_LEAVES
            }
            MutationKind::LowercaseLeaf => has('X'),
            MutationKind::UppercaseLeaf => has('x') && leaves <= MAX_LEAVES,
            MutationKind::RemoveBranch => has('['),
            MutationKind::AddForward => true,
        }
    }

    /// Selection weight for `branch`, zero when the precondition fails
    pub fn weight(self, branch: &str) -> f64 {
        if self.is_eligible(branch) {
            self.base_weight()
        } else {
            0.0
        }
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MutationKind::AddRotation => "add rotation",
            MutationKind::RemoveRotation => "remove rotation",
            MutationKind::LowercaseForward => "lowercase F",
            MutationKind::UppercaseForward => "uppercase f",
            MutationKind::RemoveMinorForward => "remove f",
            MutationKind::InsertBranch => "insert branch",
            MutationKind::LowercaseLeaf => "lowercase X",
            MutationKind::UppercaseLeaf => "uppercase x",
            MutationKind::RemoveBranch => "remove branch",
            MutationKind::AddForward => "add f/F",
        };
        f.write_str(name)
    }
}

/// Apply one randomly chosen eligible edit to `branch`
pub fn mutate<R: Rng + ?Sized>(branch: &str, rng: &mut R) -> Result<String> {
    let weights: Vec<f64> = MutationKind::ALL.iter().map(|k| k.weight(branch)).collect();
    let kind = MutationKind::ALL[weighted_index(&weights, rng)?];
    let mutated = apply(branch, kind, rng)?;
    tracing::debug!(%kind, before = branch, after = %mutated, "branch mutated");
    Ok(mutated)
}

/// Apply a specific edit. Fails if its precondition does not hold.
pub fn apply<R: Rng + ?Sized>(branch: &str, kind: MutationKind, rng: &mut R) -> Result<String> {
    if !kind.is_eligible(branch) {
        return Err(PlantError::Precondition { kind });
    }

    let mutated = match kind {
        MutationKind::AddRotation => {
            let i = random_occurrence(branch, ROTATIONS, rng)?;
            let copies = branch[i..i + 1].repeat(rng.gen_range(1..=2));
            splice(branch, i, 0, &copies)
        }
        MutationKind::RemoveRotation => {
            let i = random_occurrence(branch, ROTATIONS, rng)?;
            splice(branch, i, 1, "")
        }
        MutationKind::LowercaseForward => replace_one(branch, 'F', "f", rng)?,
        MutationKind::UppercaseForward => replace_one(branch, 'f', "F", rng)?,
        MutationKind::RemoveMinorForward => replace_one(branch, 'f', "", rng)?,
        MutationKind::InsertBranch => {
            let i = random_occurrence(branch, "Ff+-", rng)?;
            splice(branch, i, 0, &random_sub_branch(rng))
        }
        MutationKind::LowercaseLeaf => replace_one(branch, 'X', "x", rng)?,
        MutationKind::UppercaseLeaf => replace_one(branch, 'x', "X", rng)?,
        MutationKind::RemoveBranch => {
            let (open, close) = random_bracket_span(branch, rng)?;
            splice(branch, open, close + 1 - open, "")
        }
        MutationKind::AddForward => {
            let i = random_insertion_point(branch, rng);
            let symbol = ["F", "f", "f"][rng.gen_range(0..3)];
            splice(branch, i, 0, symbol)
        }
    };

    Ok(mutated)
}

/// Bracketed side branch with exactly one leaf, e.g. `[--F-X]`
pub fn random_sub_branch<R: Rng + ?Sized>(rng: &mut R) -> String {
    let sign = if rng.gen_bool(0.5) { '+' } else { '-' };
    let mut run: String = std::iter::repeat(sign).take(rng.gen_range(1..=4)).collect();

    if rng.gen_bool(0.75) {
        let i = rng.gen_range(1..=run.len());
        run.insert(i, 'F');
    }

    format!("[{run}X]")
}

fn splice(s: &str, at: usize, remove: usize, insert: &str) -> String {
    let mut out = String::with_capacity(s.len() + insert.len());
    out.push_str(&s[..at]);
    out.push_str(insert);
    out.push_str(&s[at + remove..]);
    out
}

fn replace_one<R: Rng + ?Sized>(s: &str, target: char, with: &str, rng: &mut R) -> Result<String> {
    let i = random_occurrence(s, target.encode_utf8(&mut [0; 4]), rng)?;
    Ok(splice(s, i, target.len_utf8(), with))
}

/// Span of a random bracket pair, inclusive.
///
/// Starting at a random `[`, scans forward remembering the last `[` seen; the
/// first `]` closes that innermost open bracket.
fn random_bracket_span<R: Rng + ?Sized>(s: &str, rng: &mut R) -> Result<(usize, usize)> {
    let picked = random_occurrence(s, "[", rng)?;
    let mut open = picked;
    for (offset, byte) in s.as_bytes()[picked..].iter().enumerate() {
        match byte {
            b'[' => open = picked + offset,
            b']' => return Ok((open, picked + offset)),
            _ => {}
        }
    }
    Err(PlantError::UnmatchedBracket { index: picked })
}
