//! 2D affine transforms in the painter convention.
//!
//! A [`Transform`] maps local drawing coordinates to device pixels:
//!
//! ```text
//! x' = a·x + c·y + tx
//! y' = b·x + d·y + ty
//! ```
//!
//! `translated` and `rotated` compose on the local side, so the most recent
//! operation applies first to the points being drawn. Positive rotations turn
//! clockwise on a y-down screen.

use micromath::F32;

/// A point in local or device coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointF {
    pub x: f32,
    pub y: f32,
}

impl PointF {
    pub const fn new(
        x: f32,
        y: f32,
    ) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn is_finite(self) -> bool { self.x.is_finite() && self.y.is_finite() }
}

/// Shorthand for [`PointF::new`], used heavily by the instrument outlines.
#[inline]
pub const fn pt(
    x: f32,
    y: f32,
) -> PointF {
    PointF::new(x, y)
}

/// Axis-aligned rectangle in local coordinates. Negative sizes are allowed
/// and describe the rectangle extending left or up from `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RectF {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl RectF {
    pub const fn new(
        x: f32,
        y: f32,
        w: f32,
        h: f32,
    ) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle with the sign of the size folded into the origin.
    pub fn normalized(self) -> Self {
        let (x, w) = if self.w < 0.0 { (self.x + self.w, -self.w) } else { (self.x, self.w) };
        let (y, h) = if self.h < 0.0 { (self.y + self.h, -self.h) } else { (self.y, self.h) };
        Self { x, y, w, h }
    }

    pub fn corners(self) -> [PointF; 4] {
        [
            pt(self.x, self.y),
            pt(self.x + self.w, self.y),
            pt(self.x + self.w, self.y + self.h),
            pt(self.x, self.y + self.h),
        ]
    }
}

/// Sine and cosine of an angle in degrees. Quarter turns are exact so axis
/// aligned layouts stay on whole pixels.
pub fn sin_cos_deg(deg: f32) -> (f32, f32) {
    if !deg.is_finite() {
        return (0.0, 1.0);
    }
    let wrapped = deg % 360.0;
    let wrapped = if wrapped < 0.0 { wrapped + 360.0 } else { wrapped };
    if wrapped == 0.0 || wrapped == 360.0 {
        return (0.0, 1.0);
    }
    if wrapped == 90.0 {
        return (1.0, 0.0);
    }
    if wrapped == 180.0 {
        return (0.0, -1.0);
    }
    if wrapped == 270.0 {
        return (-1.0, 0.0);
    }
    let rad = wrapped.to_radians();
    (F32(rad).sin().0, F32(rad).cos().0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Transform {
    pub const IDENTITY: Self = Self { a: 1.0, b: 0.0, c: 0.0, d: 1.0, tx: 0.0, ty: 0.0 };

    /// Map a local point to device coordinates.
    #[inline]
    pub fn apply(
        &self,
        p: PointF,
    ) -> PointF {
        PointF {
            x: self.a * p.x + self.c * p.y + self.tx,
            y: self.b * p.x + self.d * p.y + self.ty,
        }
    }

    /// Move the local origin by `(dx, dy)` local units.
    pub fn translated(
        &self,
        dx: f32,
        dy: f32,
    ) -> Self {
        Self {
            tx: self.a * dx + self.c * dy + self.tx,
            ty: self.b * dx + self.d * dy + self.ty,
            ..*self
        }
    }

    /// Turn the local axes by `deg` degrees around the local origin.
    pub fn rotated(
        &self,
        deg: f32,
    ) -> Self {
        let (sin, cos) = sin_cos_deg(deg);
        Self {
            a: self.a * cos + self.c * sin,
            b: self.b * cos + self.d * sin,
            c: -self.a * sin + self.c * cos,
            d: -self.b * sin + self.d * cos,
            tx: self.tx,
            ty: self.ty,
        }
    }

    /// Inverse mapping, or `None` for a singular matrix.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.a * self.d - self.b * self.c;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let a = self.d / det;
        let b = -self.b / det;
        let c = -self.c / det;
        let d = self.a / det;
        Some(Self {
            a,
            b,
            c,
            d,
            tx: -(a * self.tx + c * self.ty),
            ty: -(b * self.tx + d * self.ty),
        })
    }
}

impl Default for Transform {
    fn default() -> Self { Self::IDENTITY }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(
        p: PointF,
        x: f32,
        y: f32,
    ) -> bool {
        // micromath trig is good to roughly 1e-3
        (p.x - x).abs() < 0.5 && (p.y - y).abs() < 0.5
    }

    #[test]
    fn test_translate_then_rotate() {
        let t = Transform::IDENTITY.translated(240.0, 190.0).rotated(90.0);
        // Local +x points down the screen after a quarter turn
        assert!(close(t.apply(pt(10.0, 0.0)), 240.0, 200.0));
        assert!(close(t.apply(pt(0.0, 10.0)), 230.0, 190.0));
    }

    #[test]
    fn test_rotate_then_translate() {
        let t = Transform::IDENTITY.rotated(-90.0).translated(0.0, -120.0);
        // Moving "up" after a quarter turn left lands on the -x axis
        assert!(close(t.apply(pt(0.0, 0.0)), -120.0, 0.0));
    }

    #[test]
    fn test_rotation_inverts() {
        let base = Transform::IDENTITY.translated(240.0, 190.0);
        for deg in [0.0f32, 12.5, 45.0, 90.0, 137.0, 270.0, 359.0] {
            let t = base.rotated(deg).rotated(-deg);
            let p = t.apply(pt(33.0, -71.0));
            assert!(close(p, 273.0, 119.0), "{deg}: {p:?}");
        }
    }

    #[test]
    fn test_label_sequence_round_trip() {
        // translate / rotate / rotate back / translate back is the identity
        let base = Transform::IDENTITY.translated(240.0, 190.0).rotated(-37.0);
        let t = base.translated(0.0, -120.0).rotated(37.0 - 30.0).rotated(-37.0 + 30.0).translated(0.0, 120.0);
        let p = t.apply(pt(5.0, 5.0));
        let q = base.apply(pt(5.0, 5.0));
        assert!(close(p, q.x, q.y));
    }

    #[test]
    fn test_inverse() {
        let t = Transform::IDENTITY.translated(10.0, 20.0).rotated(33.0).translated(-4.0, 7.0);
        let inv = t.inverse().unwrap();
        let p = inv.apply(t.apply(pt(12.0, -3.0)));
        assert!(close(p, 12.0, -3.0));
    }

    #[test]
    fn test_quarter_turns_exact() {
        assert_eq!(sin_cos_deg(90.0), (1.0, 0.0));
        assert_eq!(sin_cos_deg(-90.0), (-1.0, 0.0));
        assert_eq!(sin_cos_deg(540.0), (0.0, -1.0));
        assert_eq!(sin_cos_deg(f32::NAN), (0.0, 1.0));
    }

    #[test]
    fn test_rect_normalized() {
        let r = RectF::new(480.0, 360.0, -105.0, -30.0).normalized();
        assert_eq!(r, RectF::new(375.0, 330.0, 105.0, 30.0));
    }
}
