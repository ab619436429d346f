//! Pens and brushes.

use embedded_graphics::pixelcolor::Rgb565;
use micromath::F32;

use super::transform::{PointF, Transform};
use crate::colors::{BLACK, lerp_rgb565};

// =============================================================================
// Pen
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PenStyle {
    Solid,
    /// Dashes of four pen widths separated by gaps of two.
    Dashed,
}

/// Outline and text settings. A zero width draws no outlines, and
/// [`Pen::NONE`] suppresses text as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pen {
    pub width: u32,
    pub color: Rgb565,
    pub style: PenStyle,
    pub visible: bool,
}

impl Pen {
    pub const NONE: Self = Self { width: 0, color: BLACK, style: PenStyle::Solid, visible: false };

    pub const fn new(
        width: u32,
        color: Rgb565,
    ) -> Self {
        Self { width, color, style: PenStyle::Solid, visible: true }
    }

    pub const fn dashed(
        width: u32,
        color: Rgb565,
    ) -> Self {
        Self { width, color, style: PenStyle::Dashed, visible: true }
    }

    #[inline]
    pub const fn strokes(&self) -> bool { self.visible && self.width > 0 }
}

// =============================================================================
// Brush
// =============================================================================

/// Fill settings as given by the drawing code, in local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Brush {
    None,
    Solid(Rgb565),
    /// Every other pixel in a checkerboard. Stands in for a half-transparent
    /// fill on a display without alpha.
    Shade(Rgb565),
    /// Color runs from `from` at `start` to `to` at `end` and is held past
    /// either end.
    Linear {
        start: PointF,
        end: PointF,
        from: Rgb565,
        to: Rgb565,
    },
    /// Color runs from `inner` at `center` to `outer` at `radius`.
    Radial {
        center: PointF,
        radius: f32,
        inner: Rgb565,
        outer: Rgb565,
    },
}

/// A brush with its gradient geometry resolved to device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Fill {
    None,
    Solid(Rgb565),
    Shade(Rgb565),
    Linear {
        origin: PointF,
        /// Gradient axis divided by its squared length.
        axis: PointF,
        from: Rgb565,
        to: Rgb565,
    },
    Radial {
        center: PointF,
        radius: f32,
        inner: Rgb565,
        outer: Rgb565,
    },
}

impl Fill {
    /// Resolve `brush` through the transform active when it was set.
    pub(crate) fn resolve(
        brush: Brush,
        transform: &Transform,
    ) -> Self {
        match brush {
            Brush::None => Self::None,
            Brush::Solid(color) => Self::Solid(color),
            Brush::Shade(color) => Self::Shade(color),
            Brush::Linear { start, end, from, to } => {
                let origin = transform.apply(start);
                let end = transform.apply(end);
                let dx = end.x - origin.x;
                let dy = end.y - origin.y;
                let len_sq = dx * dx + dy * dy;
                if len_sq == 0.0 || !len_sq.is_finite() || !origin.is_finite() {
                    return Self::Solid(from);
                }
                Self::Linear { origin, axis: PointF::new(dx / len_sq, dy / len_sq), from, to }
            }
            Brush::Radial { center, radius, inner, outer } => {
                let center = transform.apply(center);
                if radius <= 0.0 || !radius.is_finite() || !center.is_finite() {
                    return Self::Solid(outer);
                }
                Self::Radial { center, radius, inner, outer }
            }
        }
    }

    /// Color at the center of device pixel `(x, y)`, or `None` where the
    /// brush leaves the pixel untouched.
    pub(crate) fn sample(
        &self,
        x: i32,
        y: i32,
    ) -> Option<Rgb565> {
        let px = x as f32 + 0.5;
        let py = y as f32 + 0.5;
        match *self {
            Self::None => None,
            Self::Solid(color) => Some(color),
            Self::Shade(color) => ((x + y).rem_euclid(2) == 0).then_some(color),
            Self::Linear { origin, axis, from, to } => {
                let t = (px - origin.x) * axis.x + (py - origin.y) * axis.y;
                Some(lerp_rgb565(from, to, t))
            }
            Self::Radial { center, radius, inner, outer } => {
                let dx = px - center.x;
                let dy = py - center.y;
                let dist = F32(dx * dx + dy * dy).sqrt().0;
                Some(lerp_rgb565(inner, outer, dist / radius))
            }
        }
    }

    /// Uniform color, if the brush paints every pixel the same.
    pub(crate) const fn uniform(&self) -> Option<Rgb565> {
        match *self {
            Self::Solid(color) => Some(color),
            _ => None,
        }
    }
}
