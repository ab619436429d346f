//! Vertical guidance ladder shared by both instruments.
//!
//! The attitude display shows it next to the altitude tape, the HSI at its
//! right edge. Both go through [`draw_glideslope`] with their own
//! [`GlideslopeSlot`], so the diamond behaves the same on either screen.

use embedded_graphics::{pixelcolor::Rgb565, prelude::*};

use crate::canvas::{Brush, Canvas, Pen, RectF, pt};
use crate::colors::BLACK;
use crate::config::WIDTH;
use crate::nav::NavBundle;
use crate::scale::{GLIDESLOPE_REFERENCE_DEFLECTION, clamp_normalized, finite_or_zero};
use crate::styles::{FontSize, HAlign, VAlign};

/// Reference circles, in pixels from the ladder center.
pub const CIRCLE_OFFSETS: [f32; 4] = [-70.0, -35.0, 35.0, 70.0];

const CIRCLE_RADIUS: f32 = 5.0;
const BADGE_HEIGHT: f32 = 15.0;

/// Size and placement of one glideslope ladder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlideslopeSlot {
    pub width: f32,
    pub height: f32,
    /// Gap between the ladder's right edge and the canvas edge.
    pub right_offset: f32,
    pub frame_color: Rgb565,
    pub center_y: f32,
}

impl GlideslopeSlot {
    /// Left edge of the ladder.
    #[inline]
    pub fn left(&self) -> f32 { WIDTH - self.right_offset - self.width }

    /// Vertical diamond offset from the ladder center. Deviation is pinned
    /// to the reference deflection, which lands on the ladder ends.
    pub fn diamond_offset(
        &self,
        deviation: f32,
    ) -> f32 {
        let d = clamp_normalized(finite_or_zero(deviation), GLIDESLOPE_REFERENCE_DEFLECTION);
        d / GLIDESLOPE_REFERENCE_DEFLECTION * self.height / 2.0
    }
}

/// Draw the ladder for `nav`. Nothing is drawn without vertical guidance.
pub fn draw_glideslope<D>(
    canvas: &mut Canvas<'_, D>,
    slot: &GlideslopeSlot,
    nav: &NavBundle,
) where
    D: DrawTarget<Color = Rgb565>,
{
    if !nav.glideslope_available {
        return;
    }
    let nav_color = nav.color.rgb();
    let left = slot.left();
    let top = slot.center_y - slot.height / 2.0;

    // Source badge
    let badge = RectF::new(left, top - BADGE_HEIGHT, slot.width, BADGE_HEIGHT);
    canvas.set_font(FontSize::Small, false);
    canvas.set_pen(Pen::new(1, nav_color));
    canvas.text_in(badge, HAlign::Center, VAlign::Middle, nav.vertical_source.badge());

    canvas.set_pen(Pen::new(2, slot.frame_color));
    canvas.set_brush(Brush::None);
    canvas.rect(badge);
    canvas.rect(RectF::new(left, top, slot.width, slot.height));
    canvas.line(pt(left, slot.center_y), pt(left + slot.width, slot.center_y));

    for offset in CIRCLE_OFFSETS {
        canvas.circle(pt(left + slot.width / 2.0, slot.center_y + offset), CIRCLE_RADIUS);
    }

    canvas.set_pen(Pen::new(1, BLACK));
    canvas.set_brush(Brush::Solid(nav_color));
    let half = slot.width / 2.0;
    canvas.scoped(|c| {
        c.translate(left, slot.center_y + slot.diamond_offset(nav.glideslope_deviation));
        c.polygon(&[pt(0.0, 0.0), pt(half, half), pt(slot.width, 0.0), pt(half, -half)]);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{GREEN, GREY, MAGENTA};
    use crate::debug_log::NullLog;
    use crate::nav::derive_nav_bundle;
    use crate::parameters::FlightState;
    use crate::testing::{Framebuffer, Inspect, framebuffer};

    const SLOT: GlideslopeSlot =
        GlideslopeSlot { width: 16.0, height: 192.0, right_offset: 20.0, frame_color: GREY, center_y: 190.0 };

    fn paint(state: &FlightState) -> Framebuffer {
        let mut fb = framebuffer();
        let nav = derive_nav_bundle(state, &mut NullLog);
        let mut canvas = Canvas::new(&mut fb);
        draw_glideslope(&mut canvas, &SLOT, &nav);
        canvas.finish();
        fb
    }

    #[test]
    fn test_diamond_offset_scaling() {
        assert!(SLOT.diamond_offset(0.0).abs() < f32::EPSILON);
        assert!((SLOT.diamond_offset(2.5) - 96.0).abs() < 1e-4);
        assert!((SLOT.diamond_offset(-1.25) + 48.0).abs() < 1e-4);
        // Pinned at the ends of the ladder
        assert!((SLOT.diamond_offset(40.0) - 96.0).abs() < 1e-4);
        assert!(SLOT.diamond_offset(f32::NAN).abs() < f32::EPSILON);
    }

    #[test]
    fn test_nothing_without_guidance() {
        let fb = paint(&FlightState::new());
        assert_eq!(fb.count(BLACK), fb.area());
    }

    #[test]
    fn test_diamond_tracks_deviation() {
        let mut state = FlightState::new();
        state.nav1.glideslope_available = true;
        state.nav1.glideslope_deviation = 1.25;
        let fb = paint(&state);
        // Diamond center sits 48 px below the ladder center
        assert_eq!(fb.pixel(452, 238), GREEN);
        assert_ne!(fb.pixel(452, 142), GREEN);
    }

    #[test]
    fn test_gps_vnav_colors() {
        let mut state = FlightState::new();
        state.hsi_source = 2;
        state.gps_vnav_available = 1.0;
        let fb = paint(&state);
        assert!(fb.count(MAGENTA) > 0);
        assert_eq!(fb.count(GREEN), 0);
    }
}
