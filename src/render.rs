//! Rendering boundary
//!
//! [`render`] turns render commands into line and circle primitives through a
//! [`Renderer`], mapping every point through a [`Camera`]. [`AsciiCanvas`] is a
//! terminal renderer used by the `preview` command.

use std::fmt;

use crate::camera::Camera;
use crate::color::Rgb;
use crate::turtle::{heading_vector, LeafShape, Point, RenderCommand};

/// Drawing primitives in device coordinates
pub trait Renderer {
    fn line(&mut self, from: Point, to: Point, width: f64, color: Rgb);
    fn circle(&mut self, center: Point, radius: f64, color: Rgb);
}

/// Frond strokes are splayed this many degrees either side of the heading
const FROND_SPREAD: f64 = 30.0;

pub fn render<T: Renderer + ?Sized>(commands: &[RenderCommand], camera: &Camera, target: &mut T) {
    for command in commands {
        match command {
            RenderCommand::Trunk(seg) => target.line(
                camera.transform(seg.start),
                camera.transform(seg.end),
                camera.scale(seg.width as f64),
                seg.color,
            ),
            RenderCommand::Leaf(leaf) => {
                let [cx, cy] = leaf.center;
                match leaf.shape {
                    LeafShape::Circle => target.circle(
                        camera.transform(leaf.center),
                        camera.scale(leaf.radius),
                        leaf.color,
                    ),
                    LeafShape::Fronds => {
                        for spread in [-FROND_SPREAD, 0.0, FROND_SPREAD] {
                            let [dx, dy] = heading_vector(leaf.angle + spread);
                            let (dx, dy) = (dx * leaf.radius, dy * leaf.radius);
                            target.line(
                                camera.transform([cx - dx, cy - dy]),
                                camera.transform([cx + dx * 3.0, cy + dy * 3.0]),
                                camera.scale(1.0),
                                leaf.color,
                            );
                        }
                    }
                    LeafShape::Bar => {
                        let [dx, dy] = heading_vector(leaf.angle);
                        let (rx, ry) = (-dy * leaf.radius * 2.0, dx * leaf.radius * 2.0);
                        target.line(
                            camera.transform([cx + rx, cy + ry]),
                            camera.transform([cx - rx, cy - ry]),
                            camera.scale(leaf.radius.trunc()),
                            leaf.color,
                        );
                    }
                    LeafShape::Hidden => {}
                }
            }
        }
    }
}

/// Brightness ramp for line glyphs, dark to light
const RAMP: &[u8] = b"@%#*+=-:.";

const LEAF_GLYPH: char = 'o';

/// Character grid renderer; row 0 is the top of the screen
pub struct AsciiCanvas {
    width: usize,
    height: usize,
    cells: Vec<char>,
}

impl AsciiCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![' '; width * height],
        }
    }

    #[cfg(test)]
    fn get(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.cells[y * self.width + x])
    }

    fn plot(&mut self, p: Point, glyph: char) {
        let (x, y) = (p[0].round(), p[1].round());
        if x < 0.0 || y < 0.0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = glyph;
        }
    }
}

fn glyph_for(color: Rgb) -> char {
    let luma = (color[0] as u32 * 299 + color[1] as u32 * 587 + color[2] as u32 * 114) / 1000;
    let i = (luma as usize * RAMP.len() / 256).min(RAMP.len() - 1);
    RAMP[i] as char
}

impl Renderer for AsciiCanvas {
    fn line(&mut self, from: Point, to: Point, _width: f64, color: Rgb) {
        let glyph = glyph_for(color);
        let steps = (to[0] - from[0]).abs().max((to[1] - from[1]).abs()).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            self.plot(
                [
                    from[0] + (to[0] - from[0]) * t,
                    from[1] + (to[1] - from[1]) * t,
                ],
                glyph,
            );
        }
    }

    fn circle(&mut self, center: Point, radius: f64, _color: Rgb) {
        let r = radius.max(0.0);
        let reach = r.ceil() as i64;
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                if ((dx * dx + dy * dy) as f64) <= r * r {
                    self.plot([center[0] + dx as f64, center[1] + dy as f64], LEAF_GLYPH);
                }
            }
        }
    }
}

impl fmt::Display for AsciiCanvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width.max(1)) {
            let line: String = row.iter().collect();
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::turtle::{Leaf, TrunkSegment};

    #[derive(Default)]
    struct Recorder {
        lines: Vec<(Point, Point, f64)>,
        circles: Vec<(Point, f64)>,
    }

    impl Renderer for Recorder {
        fn line(&mut self, from: Point, to: Point, width: f64, _color: Rgb) {
            self.lines.push((from, to, width));
        }

        fn circle(&mut self, center: Point, radius: f64, _color: Rgb) {
            self.circles.push((center, radius));
        }
    }

    fn leaf(shape: LeafShape) -> RenderCommand {
        RenderCommand::Leaf(Leaf {
            shape,
            center: [1.0, 1.0],
            angle: 90.0,
            radius: 2.0,
            color: [0, 0, 0],
        })
    }

    #[test]
    fn test_trunk_goes_through_camera() {
        let camera = Camera::new([1.0, 1.0], 2.0);
        let commands = [RenderCommand::Trunk(TrunkSegment {
            start: [0.0, 0.0],
            end: [0.0, -1.0],
            width: 3,
            color: [0, 0, 0],
        })];
        let mut rec = Recorder::default();
        render(&commands, &camera, &mut rec);
        assert_eq!(rec.lines, vec![([2.0, 2.0], [2.0, 0.0], 6.0)]);
    }

    #[test]
    fn test_leaf_shapes() {
        let camera = Camera::default();
        let mut rec = Recorder::default();
        render(&[leaf(LeafShape::Circle)], &camera, &mut rec);
        assert_eq!(rec.circles, vec![([1.0, 1.0], 2.0)]);

        let mut rec = Recorder::default();
        render(&[leaf(LeafShape::Fronds)], &camera, &mut rec);
        assert_eq!(rec.lines.len(), 3);

        let mut rec = Recorder::default();
        render(&[leaf(LeafShape::Bar)], &camera, &mut rec);
        assert_eq!(rec.lines.len(), 1);
        let (from, to, width) = rec.lines[0];
        // heading is straight up, so the bar is horizontal
        assert!((from[1] - to[1]).abs() < 1e-9);
        assert!(((from[0] - to[0]).abs() - 8.0).abs() < 1e-9);
        assert_eq!(width, 2.0);

        let mut rec = Recorder::default();
        render(&[leaf(LeafShape::Hidden)], &camera, &mut rec);
        assert!(rec.lines.is_empty() && rec.circles.is_empty());
    }

    #[test]
    fn test_ascii_canvas_draws_vertical_line() {
        let mut canvas = AsciiCanvas::new(5, 5);
        canvas.line([2.0, 0.0], [2.0, 4.0], 1.0, [0, 0, 0]);
        for y in 0..5 {
            assert_eq!(canvas.get(2, y), Some('@'));
        }
        assert_eq!(canvas.get(0, 0), Some(' '));
        assert_eq!(canvas.get(5, 0), None);
    }

    #[test]
    fn test_ascii_canvas_clips() {
        let mut canvas = AsciiCanvas::new(3, 3);
        canvas.circle([0.0, 0.0], 1.0, [0, 0, 0]);
        assert_eq!(canvas.get(0, 0), Some('o'));
        assert_eq!(canvas.get(1, 0), Some('o'));
        assert_eq!(canvas.get(1, 1), Some(' '));
        assert_eq!(canvas.to_string(), "oo\no\n\n");
    }
}
