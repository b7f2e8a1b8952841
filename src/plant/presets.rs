//! Built-in plant grammars

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::ColorSpec;
use crate::error::PlantError;
use crate::lsystem::{RuleBody, Rules};
use crate::turtle::{DrawSettings, LeafShape};

const BARK: [u8; 3] = [195, 185, 175];
const WOOD: [u8; 3] = [88, 57, 39];

const LORAX_LEAF_COLORS: [[u8; 3]; 4] = [
    [250, 215, 5],
    [250, 175, 25],
    [250, 135, 175],
    [180, 125, 220],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Aspen,
    Fern,
    Lorax,
    Bush,
    Spooky,
}

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::Aspen,
        Preset::Fern,
        Preset::Lorax,
        Preset::Bush,
        Preset::Spooky,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Aspen => "aspen",
            Preset::Fern => "fern",
            Preset::Lorax => "lorax",
            Preset::Bush => "bush",
            Preset::Spooky => "spooky",
        }
    }

    pub fn axiom(self) -> &'static str {
        match self {
            Preset::Aspen | Preset::Spooky => "FX",
            Preset::Fern => "ffX",
            Preset::Lorax => "fF-F+f+F[ffX]--[ffX]--[ffX]--[ffX]--[ffX]--[ffX]--[ffX]--[ffX]--[ffX]",
            Preset::Bush => "[--X][++X]",
        }
    }

    /// The `X` production; the `F` production comes from the plant length
    pub fn growth_rule(self) -> RuleBody {
        match self {
            Preset::Aspen => {
                RuleBody::weighted([("F[---X]+f-F[++++X]-X", 0.5), ("F[+++X]-F+f[----X]+X", 0.5)])
            }
            Preset::Fern => RuleBody::fixed("F[+[X]++X][----X]Ff-X"),
            Preset::Lorax => RuleBody::weighted([("+xf+f+X", 0.5), ("-fxfX", 0.5)]),
            Preset::Bush => {
                RuleBody::weighted([("fF[---FX]f[++F+X]FX", 0.5), ("fF[++F+X]f[-F--X]FX", 0.5)])
            }
            Preset::Spooky => RuleBody::weighted([
                ("-F[---X]+F-ff[+++f+X]-X", 0.5),
                ("+F[+++X]-ff+F[-f---X]+fX", 0.5),
            ]),
        }
    }

    pub fn growth_rules(self) -> Rules {
        Rules::from([('X', self.growth_rule())])
    }

    pub fn draw_settings(self) -> DrawSettings {
        match self {
            Preset::Aspen => DrawSettings {
                angle: 15.0,
                trunk_segment_length: 3.0,
                trunk_width: 2.0,
                trunk_color: ColorSpec::JitterAround(BARK),
                leaf_radius: 3.0,
                leaf_shape: LeafShape::Circle,
                leaf_color: ColorSpec::JitterAround([22, 180, 80]),
            },
            Preset::Fern => DrawSettings {
                angle: 15.0,
                trunk_segment_length: 3.0,
                trunk_width: 2.0,
                trunk_color: ColorSpec::JitterAround([10, 187, 63]),
                leaf_radius: 5.0,
                leaf_shape: LeafShape::Hidden,
                leaf_color: ColorSpec::Fixed([0, 0, 0]),
            },
            Preset::Lorax => DrawSettings {
                angle: 20.0,
                trunk_segment_length: 4.0,
                trunk_width: 2.0,
                trunk_color: ColorSpec::JitterAround(BARK),
                leaf_radius: 5.0,
                leaf_shape: LeafShape::Circle,
                leaf_color: ColorSpec::Palette(LORAX_LEAF_COLORS.to_vec()),
            },
            Preset::Bush => DrawSettings {
                angle: 15.0,
                trunk_segment_length: 2.0,
                trunk_width: 2.0,
                trunk_color: ColorSpec::JitterAround(WOOD),
                leaf_radius: 3.0,
                leaf_shape: LeafShape::Circle,
                leaf_color: ColorSpec::JitterAround([10, 137, 63]),
            },
            Preset::Spooky => DrawSettings {
                angle: 12.0,
                trunk_segment_length: 3.0,
                trunk_width: 2.0,
                trunk_color: ColorSpec::JitterAround(WOOD),
                leaf_radius: 0.0,
                leaf_shape: LeafShape::Hidden,
                leaf_color: ColorSpec::Fixed([0, 0, 0]),
            },
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = PlantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| PlantError::UnknownPreset(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("Aspen".parse::<Preset>().unwrap(), Preset::Aspen);
        assert_eq!("spooky".parse::<Preset>().unwrap(), Preset::Spooky);
        assert_eq!(
            "oak".parse::<Preset>().unwrap_err(),
            PlantError::UnknownPreset("oak".to_string())
        );
        for preset in Preset::ALL {
            assert_eq!(preset.to_string().parse::<Preset>().unwrap(), preset);
        }
    }

    #[test]
    fn test_preset_strings_use_plant_alphabet() {
        for preset in Preset::ALL {
            assert!(preset.axiom().chars().all(|c| "FfXx[]+-".contains(c)));
            let branches: Vec<String> = match preset.growth_rule() {
                RuleBody::Fixed(s) => vec![s],
                RuleBody::Weighted(c) => c.into_iter().map(|(s, _)| s).collect(),
            };
            for branch in branches {
                assert!(branch.chars().all(|c| "FfXx[]+-".contains(c)), "{branch}");
                assert_eq!(branch.matches('[').count(), branch.matches(']').count());
            }
        }
    }

    #[test]
    fn test_lorax_has_nine_branches() {
        assert_eq!(Preset::Lorax.axiom().matches("[ffX]").count(), 9);
    }
}
