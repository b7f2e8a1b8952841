//! Logical-to-device coordinate mapping

use crate::turtle::Point;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    offset: Point,
    zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: [0.0, 0.0],
            zoom: 1.0,
        }
    }
}

impl Camera {
    pub fn new(offset: Point, zoom: f64) -> Self {
        Self { offset, zoom }
    }

    /// Offset, then uniform scale
    pub fn transform(&self, point: Point) -> Point {
        [
            (point[0] + self.offset[0]) * self.zoom,
            (point[1] + self.offset[1]) * self.zoom,
        ]
    }

    /// Map a logical length (width, radius) to device units
    pub fn scale(&self, value: f64) -> f64 {
        value * self.zoom
    }

    /// Camera that centres `bounds` in a `width` x `height` viewport with
    /// `margin` device units left free on every side
    pub fn fit(bounds: (Point, Point), width: f64, height: f64, margin: f64) -> Self {
        let (min, max) = bounds;
        let extent = [(max[0] - min[0]).max(1e-6), (max[1] - min[1]).max(1e-6)];
        let usable = [(width - 2.0 * margin).max(1.0), (height - 2.0 * margin).max(1.0)];
        let zoom = (usable[0] / extent[0]).min(usable[1] / extent[1]);

        let center = [(min[0] + max[0]) * 0.5, (min[1] + max[1]) * 0.5];
        let offset = [
            width / (2.0 * zoom) - center[0],
            height / (2.0 * zoom) - center[1],
        ];
        Self { offset, zoom }
    }
}
