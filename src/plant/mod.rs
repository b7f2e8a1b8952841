//! Plants - the L-system specialised to branching growth
//!
//! A plant owns its grammar, a length factor driving the `F` production and
//! the draw settings used to interpret the grown string. Plants are never
//! edited after construction: mutation always builds a new one.

pub mod presets;

pub use presets::Preset;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{PlantError, Result};
use crate::lsystem::{LSystem, RuleBody, Rules};
use crate::mutation::mutate;
use crate::turtle::{interpret, DrawSettings, RenderCommand};

pub const ALPHABET: &str = "FfXx[]+-";

/// Rewriting steps applied to the axiom on every regrow
pub const GROWTH_STEPS: usize = 4;

pub const DEFAULT_LENGTH: f64 = 1.5;
pub const MIN_LENGTH: f64 = 0.5;
pub const MAX_LENGTH: f64 = 2.5;
const LENGTH_DRIFT: f64 = 0.35;

const WEIGHT_DRIFT: f64 = 0.15;
const MIN_BRANCH_WEIGHT: f64 = 0.1;

/// Chance of a second edit on each mutated branch
const REMUTATE_CHANCE: f64 = 0.25;

/// Replacements for `F`, indexed by whole length units
const FORWARD_CANDIDATES: [&str; 4] = ["F", "Ff", "FF", "FfF"];

const RANDOM_TOKENS: [&str; 29] = [
    "F", "f", "fF", "Ff", "ff", "-F", "-f", "+F", "+f", "-", "-", "--", "---", "--f-", "--F-", "+",
    "+", "++", "+++", "++f+", "++F+", "[-fX]", "[-f-X]", "[+fX]", "[+f+X]", "[-fx]", "[-f-x]",
    "[+fx]", "[+f+x]",
];

#[derive(Debug, Clone)]
pub struct Plant {
    lsystem: LSystem,
    length: f64,
    draw_settings: DrawSettings,
    commands: Vec<RenderCommand>,
}

impl Plant {
    /// Build and grow a plant.
    ///
    /// The `F` production is derived from `length`; an `F` entry in
    /// `growth_rules` takes precedence over it.
    pub fn new<R: Rng + ?Sized>(
        growth_rules: Rules,
        axiom: &str,
        draw_settings: DrawSettings,
        length: f64,
        rng: &mut R,
    ) -> Result<Self> {
        let mut rules = Rules::from([('F', length_rule(length)?)]);
        rules.extend(growth_rules);

        let mut plant = Plant {
            lsystem: LSystem::new(ALPHABET, rules, axiom),
            length,
            draw_settings,
            commands: Vec::new(),
        };
        plant.regrow(rng)?;
        Ok(plant)
    }

    pub fn from_preset<R: Rng + ?Sized>(preset: Preset, rng: &mut R) -> Result<Self> {
        Plant::new(
            preset.growth_rules(),
            preset.axiom(),
            preset.draw_settings(),
            DEFAULT_LENGTH,
            rng,
        )
    }

    /// Plant grown from `X` with random rules and random draw settings
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Result<Self> {
        let (length, rules) = random_rules(rng)?;
        let draw_settings = DrawSettings::random(rng);
        Plant::new(rules, "X", draw_settings, length, rng)
    }

    pub fn regrow<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        self.lsystem.reset();
        self.lsystem.step(GROWTH_STEPS, rng)?;
        tracing::debug!(len = self.lsystem.state.len(), "plant grown");
        let foreign = self.lsystem.foreign_symbols();
        if foreign > 0 {
            tracing::warn!(foreign, "grown state has symbols outside the plant alphabet");
        }
        self.update_draw_settings(self.draw_settings.clone(), rng)
    }

    /// Re-interpret the grown string with new settings
    pub fn update_draw_settings<R: Rng + ?Sized>(
        &mut self,
        draw_settings: DrawSettings,
        rng: &mut R,
    ) -> Result<()> {
        self.commands = interpret(&self.lsystem.state, &draw_settings, rng)?;
        self.draw_settings = draw_settings;
        Ok(())
    }

    pub fn axiom(&self) -> &str {
        &self.lsystem.axiom
    }

    pub fn state(&self) -> &str {
        &self.lsystem.state
    }

    pub fn rules(&self) -> &Rules {
        &self.lsystem.rules
    }

    pub fn growth_rule(&self) -> Option<&RuleBody> {
        self.lsystem.rules.get(&'X')
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn draw_settings(&self) -> &DrawSettings {
        &self.draw_settings
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Child plant with perturbed branch rule(s), weights and length
    pub fn get_mutation<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Plant> {
        let growth = self.growth_rule().ok_or(PlantError::MissingRule('X'))?;

        let mutated = match growth {
            RuleBody::Fixed(branch) => RuleBody::Fixed(mutate_branch(branch, rng)?),
            RuleBody::Weighted(candidates) => {
                let mut branches = Vec::with_capacity(candidates.len());
                for (branch, _) in candidates {
                    branches.push(mutate_branch(branch, rng)?);
                }
                let weights = candidates.iter().map(|(_, w)| drift_weight(*w, rng));
                RuleBody::Weighted(branches.into_iter().zip(weights).collect())
            }
        };

        let mut growth_rules = self.lsystem.rules.clone();
        growth_rules.remove(&'F');
        growth_rules.insert('X', mutated);

        Plant::new(
            growth_rules,
            self.axiom(),
            self.draw_settings.clone(),
            drift_length(self.length, rng),
            rng,
        )
    }

    /// The plant itself followed by `size` independent mutations.
    ///
    /// A failed mutation is logged and replaced by a copy of the parent.
    pub fn brood<R: Rng + ?Sized>(&self, size: usize, rng: &mut R) -> Vec<Plant> {
        let mut plants = Vec::with_capacity(size + 1);
        plants.push(self.clone());
        for _ in 0..size {
            match self.get_mutation(rng) {
                Ok(child) => plants.push(child),
                Err(e) => {
                    tracing::warn!(error = %e, "mutation failed, keeping parent");
                    plants.push(self.clone());
                }
            }
        }
        plants
    }
}

/// `F` production for a length in `[0, 3)`.
///
/// The weight is split linearly between the two neighbouring candidates of
/// `F`, `Ff`, `FF`, `FfF`; 1.5 gives `Ff` and `FF` half each.
pub fn length_rule(length: f64) -> Result<RuleBody> {
    if !(0.0..(FORWARD_CANDIDATES.len() - 1) as f64).contains(&length) {
        return Err(PlantError::LengthOutOfRange(length));
    }

    let mut weights = [0.0; 4];
    let a = length.floor() as usize;
    let b = a + 1;
    weights[a] = b as f64 - length;
    weights[b] = length - a as f64;

    Ok(RuleBody::weighted(FORWARD_CANDIDATES.into_iter().zip(weights)))
}

/// Fresh random grammar: the length it was built for, and its `F` and `X` rules.
///
/// The two `X` branches are correlated: the second is the first with a few
/// more edits.
pub fn random_rules<R: Rng + ?Sized>(rng: &mut R) -> Result<(f64, Rules)> {
    let length = rng.gen_range(1.0..2.0);

    let mut first = String::from("F");
    for _ in 0..rng.gen_range(10..=15) {
        if let Some(token) = RANDOM_TOKENS.choose(rng) {
            first.push_str(token);
        }
    }
    for _ in 0..rng.gen_range(7..=10) {
        first = mutate(&first, rng)?;
    }

    let mut second = first.clone();
    for _ in 0..rng.gen_range(2..=4) {
        second = mutate(&second, rng)?;
    }

    let rules = Rules::from([
        ('F', length_rule(length)?),
        ('X', RuleBody::weighted([(first, 0.5), (second, 0.5)])),
    ]);
    Ok((length, rules))
}

fn mutate_branch<R: Rng + ?Sized>(branch: &str, rng: &mut R) -> Result<String> {
    let mut mutated = mutate(branch, rng)?;
    if rng.gen_bool(REMUTATE_CHANCE) {
        mutated = mutate(&mutated, rng)?;
    }
    Ok(mutated)
}

/// New length within 0.35 of the old one, kept inside `[0.5, 2.5]`
pub fn drift_length<R: Rng + ?Sized>(length: f64, rng: &mut R) -> f64 {
    let low = (length - LENGTH_DRIFT).max(MIN_LENGTH);
    let high = (length + LENGTH_DRIFT).min(MAX_LENGTH);
    if low >= high {
        return low.min(MAX_LENGTH);
    }
    rng.gen_range(low..=high)
}

fn drift_weight<R: Rng + ?Sized>(weight: f64, rng: &mut R) -> f64 {
    let low = (weight - WEIGHT_DRIFT).max(MIN_BRANCH_WEIGHT);
    let high = (weight + WEIGHT_DRIFT).max(low);
    rng.gen_range(low..=high)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn balanced(s: &str) -> bool {
        let mut depth = 0i64;
        for c in s.chars() {
            match c {
                '[' => depth += 1,
                ']' if depth == 0 => return false,
                ']' => depth -= 1,
                _ => {}
            }
        }
        depth == 0
    }

    fn branches(rule: &RuleBody) -> Vec<&str> {
        match rule {
            RuleBody::Fixed(s) => vec![s.as_str()],
            RuleBody::Weighted(c) => c.iter().map(|(s, _)| s.as_str()).collect(),
        }
    }

    #[test]
    fn test_length_rule_splits_between_neighbours() {
        let rule = length_rule(1.5).unwrap();
        assert_eq!(
            rule,
            RuleBody::weighted([("F", 0.0), ("Ff", 0.5), ("FF", 0.5), ("FfF", 0.0)])
        );
    }

    #[test]
    fn test_length_rule_whole_and_fractional() {
        assert_eq!(
            length_rule(1.0).unwrap(),
            RuleBody::weighted([("F", 0.0), ("Ff", 1.0), ("FF", 0.0), ("FfF", 0.0)])
        );
        match length_rule(2.5).unwrap() {
            RuleBody::Weighted(c) => {
                assert!((c[2].1 - 0.5).abs() < 1e-12);
                assert!((c[3].1 - 0.5).abs() < 1e-12);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_length_rule_rejects_out_of_range() {
        assert_eq!(length_rule(3.0).unwrap_err(), PlantError::LengthOutOfRange(3.0));
        assert!(length_rule(-0.1).is_err());
        assert!(length_rule(f64::NAN).is_err());
    }

    #[test]
    fn test_length_drift_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..10_000 {
            let start = rng.gen_range(MIN_LENGTH..=MAX_LENGTH);
            let next = drift_length(start, &mut rng);
            assert!((MIN_LENGTH..=MAX_LENGTH).contains(&next), "{start} -> {next}");
            assert!((next - start).abs() <= LENGTH_DRIFT + 1e-12);
        }
    }

    #[test]
    fn test_presets_grow() {
        let mut rng = StdRng::seed_from_u64(1);
        for preset in Preset::ALL {
            let plant = Plant::from_preset(preset, &mut rng).unwrap();
            assert_eq!(plant.axiom(), preset.axiom());
            assert!(plant.state().len() > plant.axiom().len());
            assert!(balanced(plant.state()));
            assert!(!plant.commands().is_empty(), "{preset}");
            assert_eq!(plant.length(), DEFAULT_LENGTH);
        }
    }

    #[test]
    fn test_preset_mutations_never_fail() {
        let mut rng = StdRng::seed_from_u64(2);
        for preset in Preset::ALL {
            let parent = Plant::from_preset(preset, &mut rng).unwrap();
            for _ in 0..100 {
                let child = parent.get_mutation(&mut rng).unwrap();
                assert_eq!(child.axiom(), parent.axiom());
                assert_eq!(child.draw_settings(), parent.draw_settings());
                assert!((MIN_LENGTH..=MAX_LENGTH).contains(&child.length()));
                for branch in branches(child.growth_rule().unwrap()) {
                    assert!(balanced(branch), "{branch}");
                }
            }
        }
    }

    #[test]
    fn test_fixed_rule_stays_fixed() {
        let mut rng = StdRng::seed_from_u64(3);
        let fern = Plant::from_preset(Preset::Fern, &mut rng).unwrap();
        let child = fern.get_mutation(&mut rng).unwrap();
        assert!(matches!(child.growth_rule(), Some(RuleBody::Fixed(_))));
    }

    #[test]
    fn test_weighted_rule_weights_drift() {
        let mut rng = StdRng::seed_from_u64(4);
        let aspen = Plant::from_preset(Preset::Aspen, &mut rng).unwrap();
        for _ in 0..200 {
            let child = aspen.get_mutation(&mut rng).unwrap();
            match child.growth_rule() {
                Some(RuleBody::Weighted(c)) => {
                    assert_eq!(c.len(), 2);
                    for (_, w) in c {
                        assert!((0.35..=0.65).contains(w), "{w}");
                    }
                }
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn test_weight_floor() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..1000 {
            assert!(drift_weight(0.12, &mut rng) >= MIN_BRANCH_WEIGHT);
        }
    }

    #[test]
    fn test_mutation_uses_new_length_rule() {
        let mut rng = StdRng::seed_from_u64(6);
        let bush = Plant::from_preset(Preset::Bush, &mut rng).unwrap();
        let child = bush.get_mutation(&mut rng).unwrap();
        assert_eq!(child.rules()[&'F'], length_rule(child.length()).unwrap());
    }

    #[test]
    fn test_missing_growth_rule() {
        let mut rng = StdRng::seed_from_u64(7);
        let bare = Plant::new(
            Rules::new(),
            "FF",
            Preset::Aspen.draw_settings(),
            DEFAULT_LENGTH,
            &mut rng,
        )
        .unwrap();
        assert_eq!(bare.get_mutation(&mut rng).unwrap_err(), PlantError::MissingRule('X'));
        // brood falls back to copies of the parent
        let brood = bare.brood(3, &mut rng);
        assert_eq!(brood.len(), 4);
        assert!(brood.iter().all(|p| p.state() == bare.state()));
    }

    #[test]
    fn test_brood_starts_with_parent() {
        let mut rng = StdRng::seed_from_u64(8);
        let spooky = Plant::from_preset(Preset::Spooky, &mut rng).unwrap();
        let brood = spooky.brood(5, &mut rng);
        assert_eq!(brood.len(), 6);
        assert_eq!(brood[0].growth_rule(), spooky.growth_rule());
        assert!(brood[1..].iter().all(|p| p.growth_rule() != spooky.growth_rule()));
    }

    #[test]
    fn test_random_rules_shape() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..50 {
            let (length, rules) = random_rules(&mut rng).unwrap();
            assert!((1.0..2.0).contains(&length));
            assert_eq!(rules[&'F'], length_rule(length).unwrap());
            match &rules[&'X'] {
                RuleBody::Weighted(c) => {
                    assert_eq!(c.len(), 2);
                    assert_eq!((c[0].1, c[1].1), (0.5, 0.5));
                    for (branch, _) in c {
                        assert!(balanced(branch), "{branch}");
                        assert!(branch.chars().all(|ch| ALPHABET.contains(ch)));
                    }
                }
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn test_random_plants_grow() {
        let mut rng = StdRng::seed_from_u64(10);
        for _ in 0..20 {
            let plant = Plant::random(&mut rng).unwrap();
            assert_eq!(plant.axiom(), "X");
            assert!(balanced(plant.state()));
            plant.get_mutation(&mut rng).unwrap();
        }
    }

    #[test]
    fn test_update_draw_settings_reinterprets() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut plant = Plant::from_preset(Preset::Aspen, &mut rng).unwrap();
        let state = plant.state().to_string();
        let mut settings = plant.draw_settings().clone();
        settings.trunk_segment_length *= 2.0;
        plant.update_draw_settings(settings.clone(), &mut rng).unwrap();
        assert_eq!(plant.state(), state);
        assert_eq!(plant.draw_settings(), &settings);
    }
}
