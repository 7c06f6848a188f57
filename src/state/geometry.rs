// Rectangle math for floating widgets
use serde::{Deserialize, Serialize};

use super::pointer::PointerSample;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, delta: PointerSample) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Geometry {
    pub position: Position,
    pub size: Size,
}

impl Geometry {
    pub const fn new(position: Position, size: Size) -> Self {
        Self { position, size }
    }

    /// Position moved by `delta` and kept inside `viewport`.
    pub fn dragged(self, delta: PointerSample, viewport: Viewport) -> Self {
        Self {
            position: clamp_position(self.position.offset(delta), self.size, viewport),
            size: self.size,
        }
    }

    /// Size grown by `delta`, never below `min`. No upper bound.
    pub fn resized(self, delta: PointerSample, min: Size) -> Self {
        Self {
            position: self.position,
            size: Size::new(
                (self.size.width + delta.x).max(min.width),
                (self.size.height + delta.y).max(min.height),
            ),
        }
    }
}

/// Pixel dimensions of the browser window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

impl Viewport {
    #[cfg(test)]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Reads `innerWidth`/`innerHeight` at call time.
    pub fn current() -> Self {
        let fallback = Self::default();
        let Some(win) = web_sys::window() else {
            return fallback;
        };
        let width = win
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(fallback.width);
        let height = win
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(fallback.height);
        Self { width, height }
    }
}

/// Clamp each axis to `[0, viewport - size]`. A footprint larger than the
/// viewport pins that axis to 0.
pub fn clamp_position(pos: Position, size: Size, viewport: Viewport) -> Position {
    Position::new(
        clamp_axis(pos.x, viewport.width - size.width),
        clamp_axis(pos.y, viewport.height - size.height),
    )
}

fn clamp_axis(value: f64, max: f64) -> f64 {
    value.min(max).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_keeps_inside() {
        let vp = Viewport::new(1000.0, 700.0);
        let size = Size::new(400.0, 300.0);
        assert_eq!(
            clamp_position(Position::new(-50.0, 900.0), size, vp),
            Position::new(0.0, 400.0)
        );
        assert_eq!(
            clamp_position(Position::new(120.0, 80.0), size, vp),
            Position::new(120.0, 80.0)
        );
    }

    #[test]
    fn oversized_footprint_pins_to_origin() {
        let vp = Viewport::new(300.0, 200.0);
        let pos = clamp_position(Position::new(50.0, 50.0), Size::new(450.0, 280.0), vp);
        assert_eq!(pos, Position::new(0.0, 0.0));
    }

    #[test]
    fn resize_respects_minimum() {
        let g = Geometry::new(Position::new(10.0, 10.0), Size::new(400.0, 300.0));
        let shrunk = g.resized(PointerSample::new(-500.0, -20.0), Size::new(340.0, 180.0));
        assert_eq!(shrunk.size, Size::new(340.0, 280.0));
        assert_eq!(shrunk.position, g.position);
    }
}
