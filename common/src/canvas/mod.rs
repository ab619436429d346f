//! Immediate-mode drawing surface with a transform stack.
//!
//! [`Canvas`] wraps any `embedded-graphics` [`DrawTarget`] and adds what the
//! instrument layouts are written against: a current pen and brush, an
//! affine transform with save/restore, filled polygons, gradient fills and
//! aligned text.
//!
//! # Transform discipline
//!
//! Every instrument section that rotates or translates does so inside
//! [`Canvas::scoped`], which restores the transform on exit. The save depth
//! is checked when the paint pass ends ([`Canvas::finish`]), so a section
//! that leaks a transform is caught in debug builds.
//!
//! ```ignore
//! let mut canvas = Canvas::new(&mut display);
//! canvas.scoped(|c| {
//!     c.translate(240.0, 190.0);
//!     c.rotate(-heading);
//!     c.line(pt(0.0, 140.0), pt(0.0, 160.0));
//! });
//! canvas.finish();
//! ```

mod paint;
mod raster;
mod transform;

use embedded_graphics::{
    mono_font::{MonoFont, MonoTextStyle},
    pixelcolor::Rgb565,
    prelude::*,
    primitives::Rectangle,
    text::Text,
};
use heapless::Vec;
pub use paint::{Brush, Pen, PenStyle};
use paint::Fill;
pub use transform::{PointF, RectF, Transform, pt, sin_cos_deg};

use crate::styles::{FontSize, HAlign, VAlign, text_style};

/// Deepest nesting of [`Canvas::save`] calls.
pub const MAX_SAVE_DEPTH: usize = 8;

/// Most vertices in one polygon or polyline after flattening.
pub const MAX_POINTS: usize = 128;

/// Text anchors further than this outside the target are skipped.
const TEXT_MARGIN: i32 = 200;

pub struct Canvas<'a, D> {
    target: &'a mut D,
    clip: Rectangle,
    transform: Transform,
    stack: Vec<Transform, MAX_SAVE_DEPTH>,
    pen: Pen,
    fill: Fill,
    font: &'static MonoFont<'static>,
}

impl<'a, D> Canvas<'a, D>
where
    D: DrawTarget<Color = Rgb565>,
{
    pub fn new(target: &'a mut D) -> Self {
        let clip = target.bounding_box();
        Self {
            target,
            clip,
            transform: Transform::IDENTITY,
            stack: Vec::new(),
            pen: Pen::new(1, crate::colors::WHITE),
            fill: Fill::None,
            font: FontSize::Normal.font(false),
        }
    }

    /// End the paint pass.
    ///
    /// # Panics
    /// In debug builds, if a `save` was never restored.
    pub fn finish(self) {
        debug_assert_eq!(self.stack.len(), 0, "transform stack not unwound at end of paint");
    }

    // -------------------------------------------------------------------------
    // State
    // -------------------------------------------------------------------------

    #[inline]
    pub fn set_pen(
        &mut self,
        pen: Pen,
    ) {
        self.pen = pen;
    }

    #[inline]
    pub const fn pen(&self) -> Pen { self.pen }

    /// Set the fill. Gradient geometry is fixed through the current
    /// transform, so later rotations do not move it.
    pub fn set_brush(
        &mut self,
        brush: Brush,
    ) {
        self.fill = Fill::resolve(brush, &self.transform);
    }

    pub fn set_font(
        &mut self,
        size: FontSize,
        bold: bool,
    ) {
        self.font = size.font(bold);
    }

    // -------------------------------------------------------------------------
    // Transform
    // -------------------------------------------------------------------------

    #[inline]
    pub fn translate(
        &mut self,
        dx: f32,
        dy: f32,
    ) {
        self.transform = self.transform.translated(dx, dy);
    }

    /// Rotate the local axes clockwise by `deg` degrees.
    #[inline]
    pub fn rotate(
        &mut self,
        deg: f32,
    ) {
        self.transform = self.transform.rotated(deg);
    }

    /// Back to device coordinates. Saved transforms are kept.
    #[inline]
    pub fn reset(&mut self) { self.transform = Transform::IDENTITY; }

    #[inline]
    pub const fn transform(&self) -> Transform { self.transform }

    pub fn save(&mut self) {
        let pushed = self.stack.push(self.transform).is_ok();
        debug_assert!(pushed, "transform stack overflow");
    }

    pub fn restore(&mut self) {
        let popped = self.stack.pop();
        debug_assert!(popped.is_some(), "restore without save");
        if let Some(t) = popped {
            self.transform = t;
        }
    }

    /// Run `f` and restore the transform afterwards.
    pub fn scoped<R>(
        &mut self,
        f: impl FnOnce(&mut Self) -> R,
    ) -> R {
        self.save();
        let result = f(self);
        self.restore();
        result
    }

    /// Current save depth.
    #[inline]
    pub fn depth(&self) -> usize { self.stack.len() }

    // -------------------------------------------------------------------------
    // Primitives
    // -------------------------------------------------------------------------

    /// Paint the whole target with `color`, ignoring the transform.
    pub fn clear(
        &mut self,
        color: Rgb565,
    ) {
        self.target.clear(color).ok();
    }

    pub fn line(
        &mut self,
        from: PointF,
        to: PointF,
    ) {
        let a = self.transform.apply(from);
        let b = self.transform.apply(to);
        raster::stroke_segment(self.target, &self.clip, a, b, &self.pen);
    }

    /// Open polyline through `points`.
    pub fn polyline(
        &mut self,
        points: &[PointF],
    ) {
        for pair in points.windows(2) {
            self.line(pair[0], pair[1]);
        }
    }

    /// Fill with the brush, then outline with the pen.
    pub fn polygon(
        &mut self,
        points: &[PointF],
    ) {
        let mut device: Vec<PointF, MAX_POINTS> = Vec::new();
        for &p in points {
            if device.push(self.transform.apply(p)).is_err() {
                break;
            }
        }
        raster::fill_polygon(self.target, &self.clip, &device, &self.fill);
        self.outline(&device);
    }

    pub fn rect(
        &mut self,
        rect: RectF,
    ) {
        self.polygon(&rect.corners());
    }

    pub fn ellipse(
        &mut self,
        center: PointF,
        rx: f32,
        ry: f32,
    ) {
        if !(rx.is_finite() && ry.is_finite()) || rx <= 0.0 || ry <= 0.0 {
            return;
        }
        let segments = segments_for(rx.max(ry), 360.0);
        let mut points: Vec<PointF, MAX_POINTS> = Vec::new();
        for i in 0..segments {
            let (sin, cos) = sin_cos_deg(i as f32 * 360.0 / segments as f32);
            points.push(pt(center.x + rx * cos, center.y + ry * sin)).ok();
        }
        self.polygon(&points);
    }

    pub fn circle(
        &mut self,
        center: PointF,
        radius: f32,
    ) {
        self.ellipse(center, radius, radius);
    }

    /// Outline of a circular arc. Angles are in degrees, counter-clockwise
    /// from three o'clock.
    pub fn arc(
        &mut self,
        center: PointF,
        radius: f32,
        start_deg: f32,
        span_deg: f32,
    ) {
        if !(radius.is_finite() && start_deg.is_finite() && span_deg.is_finite()) || radius <= 0.0 {
            return;
        }
        let segments = segments_for(radius, span_deg.abs());
        let mut points: Vec<PointF, MAX_POINTS> = Vec::new();
        for i in 0..=segments {
            let angle = start_deg + span_deg * i as f32 / segments as f32;
            let (sin, cos) = sin_cos_deg(angle);
            points.push(pt(center.x + radius * cos, center.y - radius * sin)).ok();
        }
        self.polyline(&points);
    }

    /// Text aligned inside `rect`, drawn in the pen color.
    pub fn text_in(
        &mut self,
        rect: RectF,
        h: HAlign,
        v: VAlign,
        text: &str,
    ) {
        let r = rect.normalized();
        let x = match h {
            HAlign::Left => r.x,
            HAlign::Center => r.x + r.w / 2.0,
            HAlign::Right => r.x + r.w,
        };
        let y = match v {
            VAlign::Top => r.y,
            VAlign::Middle => r.y + r.h / 2.0,
            VAlign::Bottom | VAlign::Baseline => r.y + r.h,
        };
        self.text_at(pt(x, y), h, v, text);
    }

    /// Text anchored at `anchor`. The glyphs stay upright whatever the
    /// current rotation; only the anchor is transformed.
    /// Rolled pitch-ladder labels therefore stay level instead of banking
    /// with the ladder.
    pub fn text_at(
        &mut self,
        anchor: PointF,
        h: HAlign,
        v: VAlign,
        text: &str,
    ) {
        if !self.pen.visible || text.is_empty() {
            return;
        }
        let p = self.transform.apply(anchor);
        if !p.is_finite() {
            return;
        }
        let Some(bottom_right) = self.clip.bottom_right() else {
            return;
        };
        let (x, y) = (micromath::F32(p.x).round().0, micromath::F32(p.y).round().0);
        let (lo_x, lo_y) = ((self.clip.top_left.x - TEXT_MARGIN) as f32, (self.clip.top_left.y - TEXT_MARGIN) as f32);
        let (hi_x, hi_y) = ((bottom_right.x + TEXT_MARGIN) as f32, (bottom_right.y + TEXT_MARGIN) as f32);
        if x < lo_x || x > hi_x || y < lo_y || y > hi_y {
            return;
        }

        let style = MonoTextStyle::new(self.font, self.pen.color);
        Text::with_text_style(text, Point::new(x as i32, y as i32), style, text_style(h, v))
            .draw(self.target)
            .ok();
    }

    fn outline(
        &mut self,
        device: &[PointF],
    ) {
        if !self.pen.strokes() || device.len() < 2 {
            return;
        }
        let mut prev = device[device.len() - 1];
        for &p in device {
            raster::stroke_segment(self.target, &self.clip, prev, p, &self.pen);
            prev = p;
        }
    }
}

/// Polyline segment count for a curve of `radius` covering `span_deg`.
fn segments_for(
    radius: f32,
    span_deg: f32,
) -> usize {
    let full = (radius * 0.75).clamp(16.0, (MAX_POINTS - 1) as f32);
    ((full * span_deg / 360.0) as usize).clamp(4, MAX_POINTS - 1)
}

// =============================================================================
// Tests
// =============================================================================
