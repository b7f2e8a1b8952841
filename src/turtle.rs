//! Turtle 2D Interpreter
//!
//! Walks a grown plant string and emits render commands in screen space
//! (y grows downward).
//! - `F` / `f`: move forward; consecutive moves collapse into one trunk segment
//! - `X` / `x`: leaf at the current position and heading
//! - `+` / `-`: turn left / right by the configured angle
//! - `[` / `]`: save / restore position and heading

use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::color::{ColorSpec, Rgb};
use crate::error::{PlantError, Result};

/// Heading at the start of every pass, in degrees (straight up)
pub const START_HEADING: f64 = 90.0;

pub type Point = [f64; 2];

/// Leaf marker drawn at the tip of `X` / `x`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeafShape {
    Circle,
    /// Three splayed short strokes
    Fronds,
    /// One stroke across the heading
    Bar,
    Hidden,
}

impl LeafShape {
    pub const ALL: [LeafShape; 4] = [
        LeafShape::Circle,
        LeafShape::Fronds,
        LeafShape::Bar,
        LeafShape::Hidden,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawSettings {
    /// Turn increment in degrees
    pub angle: f64,
    pub trunk_segment_length: f64,
    pub trunk_width: f64,
    pub trunk_color: ColorSpec,
    pub leaf_radius: f64,
    pub leaf_shape: LeafShape,
    pub leaf_color: ColorSpec,
}

impl DrawSettings {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let base = |rng: &mut R| -> Rgb {
            [
                rng.gen_range(100..=250),
                rng.gen_range(100..=250),
                rng.gen_range(100..=250),
            ]
        };
        let trunk = base(rng);
        let leaf = base(rng);

        DrawSettings {
            angle: rng.gen_range(10.0..=20.0),
            trunk_segment_length: rng.gen_range(2.5..=4.0),
            trunk_width: rng.gen_range(2.0..=3.0),
            trunk_color: ColorSpec::JitterAround(trunk),
            leaf_radius: rng.gen_range(2.0..=4.0),
            leaf_shape: LeafShape::ALL[rng.gen_range(0..LeafShape::ALL.len())],
            leaf_color: ColorSpec::JitterAround(leaf),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrunkSegment {
    pub start: Point,
    pub end: Point,
    /// Stroke width in pixels
    pub width: u32,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leaf {
    pub shape: LeafShape,
    pub center: Point,
    pub angle: f64,
    pub radius: f64,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderCommand {
    Trunk(TrunkSegment),
    Leaf(Leaf),
}

/// Unit vector for a heading in degrees, screen convention (cos, -sin)
pub fn heading_vector(angle: f64) -> Point {
    let radians = angle.to_radians();
    [radians.cos(), -radians.sin()]
}

fn advance(pos: Point, angle: f64, distance: f64) -> Point {
    let [dx, dy] = heading_vector(angle);
    [pos[0] + dx * distance, pos[1] + dy * distance]
}

/// Interpret `state` into render commands.
///
/// Trunk segments are pushed to the front, so they come out in reverse scan
/// order. Leaves are appended in scan order after every trunk segment.
/// Colours are sampled once per command.
pub fn interpret<R: Rng + ?Sized>(
    state: &str,
    settings: &DrawSettings,
    rng: &mut R,
) -> Result<Vec<RenderCommand>> {
    let mut commands = VecDeque::new();
    let mut stack: Vec<(Point, f64)> = Vec::new();
    let mut pos: Point = [0.0, 0.0];
    let mut angle = START_HEADING;
    let mut run = 0usize;

    let mut symbols = state.chars().enumerate().peekable();
    while let Some((index, symbol)) = symbols.next() {
        match symbol {
            'F' | 'f' => {
                run += 1;
                if !matches!(symbols.peek(), Some((_, 'F' | 'f'))) {
                    let end = advance(pos, angle, run as f64 * settings.trunk_segment_length);
                    commands.push_front(RenderCommand::Trunk(TrunkSegment {
                        start: pos,
                        end,
                        width: settings.trunk_width as u32,
                        color: settings.trunk_color.sample(rng),
                    }));
                    pos = end;
                    run = 0;
                }
            }
            'X' | 'x' => commands.push_back(RenderCommand::Leaf(Leaf {
                shape: settings.leaf_shape,
                center: pos,
                angle,
                radius: settings.leaf_radius,
                color: settings.leaf_color.sample(rng),
            })),
            '+' => angle += settings.angle,
            '-' => angle -= settings.angle,
            '[' => stack.push((pos, angle)),
            ']' => {
                (pos, angle) = stack.pop().ok_or(PlantError::UnbalancedPop { index })?;
            }
            _ => {}
        }
    }

    Ok(commands.into())
}

/// Axis-aligned bounds `(min, max)` of everything the commands draw
pub fn bounds(commands: &[RenderCommand]) -> Option<(Point, Point)> {
    let mut min = [f64::INFINITY; 2];
    let mut max = [f64::NEG_INFINITY; 2];
    let mut include = |p: Point, pad: f64| {
        for axis in 0..2 {
            min[axis] = min[axis].min(p[axis] - pad);
            max[axis] = max[axis].max(p[axis] + pad);
        }
    };

    for command in commands {
        match command {
            RenderCommand::Trunk(seg) => {
                include(seg.start, 0.0);
                include(seg.end, 0.0);
            }
            RenderCommand::Leaf(leaf) => include(leaf.center, leaf.radius),
        }
    }

    if commands.is_empty() {
        None
    } else {
        Some((min, max))
    }
}
