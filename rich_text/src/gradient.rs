// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linear gradient fills and their bounds dependent geometry.
//!
//! A gradient fill is declared without knowing the size of the text it covers.
//! Its start and end points are only resolved once a first measurement pass
//! has produced the final bounds, see [`measure`](crate::measure).

use peniko::kurbo::{Point, Size};
use peniko::{Color, Extend, Gradient};

/// Direction of a linear gradient, mirroring the CSS `linear-gradient` forms.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum GradientDirection {
    /// Bottom edge to top edge.
    ToTop,
    /// Top edge to bottom edge.
    #[default]
    ToBottom,
    /// Right edge to left edge.
    ToLeft,
    /// Left edge to right edge.
    ToRight,
    /// Bottom-right corner to top-left corner.
    ToTopLeft,
    /// Bottom-left corner to top-right corner.
    ToTopRight,
    /// Top-right corner to bottom-left corner.
    ToBottomLeft,
    /// Top-left corner to bottom-right corner.
    ToBottomRight,
    /// CSS angle in degrees, `0` pointing up and increasing clockwise.
    Angle(f32),
}

/// A color stop, `offset` in `0..=1` along the gradient line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    /// Position along the gradient line.
    pub offset: f32,
    /// Color at this position.
    pub color: Color,
}

/// A declared (bounds independent) linear gradient.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearGradient {
    /// Direction of the gradient line.
    pub direction: GradientDirection,
    /// Ordered color stops.
    pub stops: Vec<ColorStop>,
}

/// A gradient resolved against concrete bounds, in device units.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearShader {
    /// Start of the gradient line.
    pub start: Point,
    /// End of the gradient line.
    pub end: Point,
    /// Color stops; the last one is pinned to offset `1.0`.
    pub stops: Vec<(f32, Color)>,
}

impl LinearGradient {
    /// Creates a gradient from a direction and its stops.
    pub fn new(direction: GradientDirection, stops: Vec<ColorStop>) -> Self {
        Self { direction, stops }
    }

    /// The first stop color, used to paint the text before bounds are known.
    pub fn fallback_color(&self) -> Option<Color> {
        self.stops.first().map(|stop| stop.color)
    }

    /// Start and end of the gradient line for a box of `bounds` at the origin.
    pub fn endpoints(&self, bounds: Size) -> (Point, Point) {
        let (w, h) = (bounds.width, bounds.height);
        match self.direction {
            GradientDirection::ToTop => (Point::new(0.0, h), Point::new(0.0, 0.0)),
            GradientDirection::ToBottom => (Point::new(0.0, 0.0), Point::new(0.0, h)),
            GradientDirection::ToLeft => (Point::new(w, 0.0), Point::new(0.0, 0.0)),
            GradientDirection::ToRight => (Point::new(0.0, 0.0), Point::new(w, 0.0)),
            GradientDirection::ToTopLeft => (Point::new(w, h), Point::new(0.0, 0.0)),
            GradientDirection::ToTopRight => (Point::new(0.0, h), Point::new(w, 0.0)),
            GradientDirection::ToBottomLeft => (Point::new(w, 0.0), Point::new(0.0, h)),
            GradientDirection::ToBottomRight => (Point::new(0.0, 0.0), Point::new(w, h)),
            GradientDirection::Angle(degrees) => {
                let radians = f64::from(degrees).to_radians();
                let (sin, cos) = radians.sin_cos();
                let half = (w * sin.abs() + h * cos.abs()) / 2.0;
                let center = Point::new(w / 2.0, h / 2.0);
                let dx = sin * half;
                let dy = -cos * half;
                (
                    Point::new(center.x - dx, center.y - dy),
                    Point::new(center.x + dx, center.y + dy),
                )
            }
        }
    }

    /// Resolves the gradient against `bounds` (device units).
    ///
    /// Returns `None` for empty bounds or a gradient without stops.
    pub fn resolve(&self, bounds: Size) -> Option<LinearShader> {
        if bounds.width <= 0.0 || bounds.height <= 0.0 || self.stops.is_empty() {
            return None;
        }
        let (start, end) = self.endpoints(bounds);
        let last = self.stops.len() - 1;
        let stops = self
            .stops
            .iter()
            .enumerate()
            .map(|(i, stop)| {
                let offset = if i == last { 1.0 } else { stop.offset };
                (offset, stop.color)
            })
            .collect();
        Some(LinearShader { start, end, stops })
    }
}

impl LinearShader {
    /// Lowers the shader to a clamped [`peniko::Gradient`] for painting.
    pub fn to_gradient(&self) -> Gradient {
        Gradient::new_linear(self.start, self.end)
            .with_extend(Extend::Pad)
            .with_stops(self.stops.as_slice())
    }
}
