//! Rasterization of device-space shapes.
//!
//! Polygons are filled by scanline with the even-odd rule, sampling at pixel
//! centers. Lines are clipped to the target before they reach
//! `embedded-graphics`, so far off-screen geometry (a ground plane at 90°
//! pitch, a needle pinned past its stop) never costs more than the visible
//! part.

use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{Line, PrimitiveStyle, Rectangle},
};
use heapless::Vec;
use micromath::F32;

use super::paint::{Fill, Pen, PenStyle};
use super::transform::PointF;

/// Most edge crossings a single scanline can hold.
const MAX_CROSSINGS: usize = 64;

#[inline]
fn round_i32(v: f32) -> i32 { F32(v).round().0 as i32 }

#[inline]
fn ceil_i32(v: f32) -> i32 { F32(v).ceil().0 as i32 }

// =============================================================================
// Polygon Fill
// =============================================================================

/// Fill a closed device-space polygon with `fill`, clipped to `clip`.
pub(crate) fn fill_polygon<D>(
    target: &mut D,
    clip: &Rectangle,
    points: &[PointF],
    fill: &Fill,
) where
    D: DrawTarget<Color = Rgb565>,
{
    if points.len() < 3 || matches!(fill, Fill::None) || points.iter().any(|p| !p.is_finite()) {
        return;
    }
    let Some(bottom_right) = clip.bottom_right() else {
        return;
    };

    let (mut min_y, mut max_y) = (f32::MAX, f32::MIN);
    for p in points {
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }

    // Rows whose centers fall inside the polygon's vertical extent
    let row_start = ceil_i32(min_y - 0.5).max(clip.top_left.y);
    let row_end = ceil_i32(max_y - 0.5).min(bottom_right.y + 1);

    let mut crossings: Vec<f32, MAX_CROSSINGS> = Vec::new();
    for row in row_start..row_end {
        let sample_y = row as f32 + 0.5;
        crossings.clear();

        let mut prev = points[points.len() - 1];
        for &p in points {
            let (lo, hi) = if prev.y < p.y { (prev, p) } else { (p, prev) };
            // Half-open in y so a shared vertex is counted once
            if lo.y <= sample_y && sample_y < hi.y {
                let x = lo.x + (sample_y - lo.y) / (hi.y - lo.y) * (hi.x - lo.x);
                if crossings.push(x).is_err() {
                    break;
                }
            }
            prev = p;
        }

        crossings.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(core::cmp::Ordering::Equal));

        for pair in crossings.chunks_exact(2) {
            let x_start = ceil_i32(pair[0] - 0.5).max(clip.top_left.x);
            let x_end = ceil_i32(pair[1] - 0.5).min(bottom_right.x + 1);
            if x_end > x_start {
                fill_span(target, row, x_start, x_end, fill);
            }
        }
    }
}

/// Paint pixels `x_start..x_end` of `row`.
fn fill_span<D>(
    target: &mut D,
    row: i32,
    x_start: i32,
    x_end: i32,
    fill: &Fill,
) where
    D: DrawTarget<Color = Rgb565>,
{
    if let Some(color) = fill.uniform() {
        let span = Rectangle::new(Point::new(x_start, row), Size::new((x_end - x_start) as u32, 1));
        target.fill_solid(&span, color).ok();
        return;
    }
    let pixels = (x_start..x_end).filter_map(|x| fill.sample(x, row).map(|c| Pixel(Point::new(x, row), c)));
    target.draw_iter(pixels).ok();
}

// =============================================================================
// Lines
// =============================================================================

/// Liang-Barsky clip of segment `p0-p1` to the box `[x0, x1] × [y0, y1]`.
pub(crate) fn clip_segment(
    p0: PointF,
    p1: PointF,
    (x0, y0, x1, y1): (f32, f32, f32, f32),
) -> Option<(PointF, PointF)> {
    if !p0.is_finite() || !p1.is_finite() {
        return None;
    }
    let dx = p1.x - p0.x;
    let dy = p1.y - p0.y;
    let mut t0 = 0.0f32;
    let mut t1 = 1.0f32;

    for (p, q) in [(-dx, p0.x - x0), (dx, x1 - p0.x), (-dy, p0.y - y0), (dy, y1 - p0.y)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    Some((
        PointF::new(p0.x + t0 * dx, p0.y + t0 * dy),
        PointF::new(p0.x + t1 * dx, p0.y + t1 * dy),
    ))
}

/// Stroke a device-space segment with `pen`.
pub(crate) fn stroke_segment<D>(
    target: &mut D,
    clip: &Rectangle,
    p0: PointF,
    p1: PointF,
    pen: &Pen,
) where
    D: DrawTarget<Color = Rgb565>,
{
    if !pen.strokes() {
        return;
    }
    let Some(bottom_right) = clip.bottom_right() else {
        return;
    };
    let margin = pen.width as f32;
    let bounds = (
        clip.top_left.x as f32 - margin,
        clip.top_left.y as f32 - margin,
        bottom_right.x as f32 + margin,
        bottom_right.y as f32 + margin,
    );
    let Some((a, b)) = clip_segment(p0, p1, bounds) else {
        return;
    };

    match pen.style {
        PenStyle::Solid => draw_line(target, a, b, pen),
        PenStyle::Dashed => {
            let dx = b.x - a.x;
            let dy = b.y - a.y;
            let length = F32(dx * dx + dy * dy).sqrt().0;
            if length == 0.0 {
                return;
            }
            let dash = 4.0 * pen.width as f32;
            let period = 6.0 * pen.width as f32;
            let mut along = 0.0f32;
            while along < length {
                let end = (along + dash).min(length);
                let s = PointF::new(a.x + dx * along / length, a.y + dy * along / length);
                let e = PointF::new(a.x + dx * end / length, a.y + dy * end / length);
                draw_line(target, s, e, pen);
                along += period;
            }
        }
    }
}

fn draw_line<D>(
    target: &mut D,
    a: PointF,
    b: PointF,
    pen: &Pen,
) where
    D: DrawTarget<Color = Rgb565>,
{
    Line::new(
        Point::new(round_i32(a.x), round_i32(a.y)),
        Point::new(round_i32(b.x), round_i32(b.y)),
    )
    .into_styled(PrimitiveStyle::with_stroke(pen.color, pen.width))
    .draw(target)
    .ok();
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::transform::pt;
    use crate::colors::{BLACK, RED, WHITE};
    use crate::testing::{Framebuffer, Inspect, framebuffer};

    fn full(fb: &Framebuffer) -> Rectangle { fb.bounding_box() }

    #[test]
    fn test_fill_square_exact() {
        let mut fb = framebuffer();
        let clip = full(&fb);
        fill_polygon(
            &mut fb,
            &clip,
            &[pt(10.0, 10.0), pt(20.0, 10.0), pt(20.0, 20.0), pt(10.0, 20.0)],
            &Fill::Solid(RED),
        );
        assert_eq!(fb.count(RED), 100);
        assert_eq!(fb.pixel(10, 10), RED);
        assert_eq!(fb.pixel(19, 19), RED);
        assert_eq!(fb.pixel(20, 20), BLACK);
    }

    #[test]
    fn test_fill_winding_independent() {
        let mut a = framebuffer();
        let mut b = framebuffer();
        let clip = full(&a);
        let tri = [pt(100.0, 50.0), pt(150.0, 120.0), pt(60.0, 110.0)];
        let rev = [tri[2], tri[1], tri[0]];
        fill_polygon(&mut a, &clip, &tri, &Fill::Solid(WHITE));
        fill_polygon(&mut b, &clip, &rev, &Fill::Solid(WHITE));
        assert_eq!(a.count(WHITE), b.count(WHITE));
        assert!(a.count(WHITE) > 0);
    }

    #[test]
    fn test_fill_clipped_offscreen() {
        let mut fb = framebuffer();
        let clip = full(&fb);
        // A huge quad covering far more than the target
        fill_polygon(
            &mut fb,
            &clip,
            &[pt(-600.0, -600.0), pt(1200.0, -600.0), pt(1200.0, 1200.0), pt(-600.0, 1200.0)],
            &Fill::Solid(WHITE),
        );
        assert_eq!(fb.count(WHITE), fb.area());
    }

    #[test]
    fn test_fill_rejects_non_finite() {
        let mut fb = framebuffer();
        let clip = full(&fb);
        fill_polygon(&mut fb, &clip, &[pt(0.0, 0.0), pt(f32::NAN, 5.0), pt(5.0, 5.0)], &Fill::Solid(WHITE));
        assert_eq!(fb.count(WHITE), 0);
    }

    #[test]
    fn test_shade_fill_is_half() {
        let mut fb = framebuffer();
        let clip = full(&fb);
        fill_polygon(
            &mut fb,
            &clip,
            &[pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0), pt(0.0, 10.0)],
            &Fill::Shade(WHITE),
        );
        assert_eq!(fb.count(WHITE), 50);
    }

    #[test]
    fn test_clip_segment() {
        let bounds = (0.0, 0.0, 100.0, 100.0);
        let (a, b) = clip_segment(pt(-50.0, 50.0), pt(150.0, 50.0), bounds).unwrap();
        assert!((a.x - 0.0).abs() < 1e-4 && (b.x - 100.0).abs() < 1e-4);
        assert!(clip_segment(pt(-50.0, -1.0), pt(150.0, -1.0), bounds).is_none());
        assert!(clip_segment(pt(0.0, 0.0), pt(f32::INFINITY, 0.0), bounds).is_none());
        let (a, b) = clip_segment(pt(10.0, 10.0), pt(20.0, 30.0), bounds).unwrap();
        assert_eq!((a, b), (pt(10.0, 10.0), pt(20.0, 30.0)));
    }

    #[test]
    fn test_dashed_line_has_gaps() {
        let mut solid = framebuffer();
        let mut dashed = framebuffer();
        let clip = full(&solid);
        stroke_segment(&mut solid, &clip, pt(10.0, 10.0), pt(130.0, 10.0), &Pen::new(1, WHITE));
        stroke_segment(&mut dashed, &clip, pt(10.0, 10.0), pt(130.0, 10.0), &Pen::dashed(1, WHITE));
        assert!(dashed.count(WHITE) > 0);
        assert!(dashed.count(WHITE) < solid.count(WHITE));
    }

    #[test]
    fn test_invisible_pen_draws_nothing() {
        let mut fb = framebuffer();
        let clip = full(&fb);
        stroke_segment(&mut fb, &clip, pt(0.0, 0.0), pt(100.0, 100.0), &Pen::NONE);
        assert_eq!(fb.count(BLACK), fb.area());
    }
}
