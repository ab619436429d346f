//! Horizontal situation indicator screen.
//!
//! The compass rose turns with magnetic heading; the heading bug and the
//! course deviation indicator ride on it, so both are drawn in the rose frame
//! by stacking rotations:
//!
//! | Element       | Rotation (clockwise)         |
//! |---------------|------------------------------|
//! | Rose          | `-heading`                   |
//! | Heading bug   | rose `+ 180 + bug`           |
//! | CDI           | bug `+ 90 - bug + course`    |
//! | Deviation dots| CDI `+ 90`                   |
//!
//! Readout boxes (wind, heading, bug, course, distance) are drawn afterwards
//! in device coordinates.

use embedded_graphics::{pixelcolor::Rgb565, prelude::*};

use super::{readout, whole};
use crate::canvas::{Brush, Canvas, Pen, RectF, pt};
use crate::colors::{BLACK, CYAN, GREY, MAGENTA, WHITE};
use crate::config::{CENTER_X, HEIGHT, MS_TO_KT, WIDTH};
use crate::debug_log::LogSink;
use crate::nav::{FromTo, NavBundle, NavSource, derive_nav_bundle};
use crate::parameters::FlightState;
use crate::scale::{CDI, CDI_DEFLECTION_BOUND, angular_to_screen, clamp_normalized, finite_or_zero, normalize_deg};
use crate::styles::{FontSize, HAlign, VAlign};
use crate::widgets::{GlideslopeSlot, draw_box, draw_glideslope, draw_powered_off};

// =============================================================================
// Layout
// =============================================================================

/// Vertical center of the rose.
pub const HSI_CENTER_Y: f32 = 190.0;

/// Outer radius of the rotating rose.
const ROSE_RADIUS: f32 = 160.0;
/// Fixed inner circle, also the inner end of the CDI needle.
const INNER_RADIUS: f32 = 90.0;
/// Radius of the cardinal and numeric rose labels.
const LABEL_RADIUS: f32 = 120.0;
const GROUND_TRACK_SIZE: f32 = 7.0;

/// Fixed bezel marks, degrees from the lubber line.
const BEZEL_MARKS: [f32; 6] = [45.0, 90.0, 135.0, 225.0, 270.0, 315.0];

const BOX_WIDTH: f32 = 105.0;
const HEADING_BOX_HALF_WIDTH: f32 = 25.0;
const HEADING_BOX_HEIGHT: f32 = 22.0;
const DOT_RADIUS: f32 = 6.0;

/// Glideslope ladder placement at the right edge of the rose.
pub const HSI_GLIDESLOPE: GlideslopeSlot =
    GlideslopeSlot { width: 16.0, height: 192.0, right_offset: 20.0, frame_color: GREY, center_y: HSI_CENTER_Y };

const _: () = assert!(INNER_RADIUS < LABEL_RADIUS && LABEL_RADIUS < ROSE_RADIUS);
const _: () = assert!(HSI_CENTER_Y + ROSE_RADIUS <= HEIGHT);

// =============================================================================
// Paint Pass
// =============================================================================

/// Paint the HSI for `state` onto `target`.
pub fn paint_hsi<D, L>(
    target: &mut D,
    state: &FlightState,
    log: &mut L,
) where
    D: DrawTarget<Color = Rgb565>,
    L: LogSink + ?Sized,
{
    let mut canvas = Canvas::new(target);

    if !state.avionics_powered {
        draw_powered_off(&mut canvas);
        canvas.finish();
        return;
    }

    let nav = derive_nav_bundle(state, log);

    canvas.clear(BLACK);
    draw_rose(&mut canvas, state, &nav);
    draw_source_labels(&mut canvas, &nav);
    draw_bug_box(&mut canvas, state);
    if nav.source == NavSource::Gps {
        draw_distance_box(&mut canvas, state, &nav);
    }
    draw_wind_box(&mut canvas, state);
    draw_heading_box(&mut canvas, state);
    draw_ground_track(&mut canvas, state);
    draw_aircraft(&mut canvas);
    draw_glideslope(&mut canvas, &HSI_GLIDESLOPE, &nav);
    draw_course_box(&mut canvas, &nav);

    canvas.finish();
}

// =============================================================================
// Rose, Heading Bug and CDI
// =============================================================================

fn draw_rose<D>(
    canvas: &mut Canvas<'_, D>,
    state: &FlightState,
    nav: &NavBundle,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let heading = normalize_deg(state.mag_heading_deg);
    let bug = normalize_deg(state.heading_bug_deg);
    let course = normalize_deg(nav.course_deg);

    canvas.scoped(|c| {
        c.translate(CENTER_X, HSI_CENTER_Y);

        c.set_pen(Pen::new(2, GREY));
        c.set_brush(Brush::None);
        c.circle(pt(0.0, 0.0), INNER_RADIUS);

        c.set_pen(Pen::new(2, WHITE));
        for mark in BEZEL_MARKS {
            c.scoped(|c| {
                c.rotate(-mark);
                c.line(pt(0.0, 170.0), pt(0.0, 185.0));
            });
        }

        c.rotate(angular_to_screen(heading));

        c.set_font(FontSize::Large, true);
        for head in (0..360).step_by(5) {
            let length = if head % 90 == 0 {
                20.0
            } else if head % 10 == 0 {
                15.0
            } else {
                10.0
            };
            c.scoped(|c| {
                c.rotate(head as f32);
                c.line(pt(0.0, -ROSE_RADIUS + length), pt(0.0, -ROSE_RADIUS));

                let label = match head {
                    0 => readout(format_args!("N")),
                    90 => readout(format_args!("E")),
                    180 => readout(format_args!("S")),
                    270 => readout(format_args!("W")),
                    h if h % 30 == 0 => readout(format_args!("{}", h / 10)),
                    _ => return,
                };
                c.translate(0.0, -LABEL_RADIUS);
                c.rotate(heading - head as f32);
                c.text_at(pt(0.0, 0.0), HAlign::Center, VAlign::Middle, &label);
            });
        }

        c.set_pen(Pen::new(1, CYAN));
        c.set_brush(Brush::Solid(CYAN));
        c.rotate(180.0 + bug);
        let r = ROSE_RADIUS;
        c.polygon(&[
            pt(-9.0, r - 1.0),
            pt(9.0, r - 1.0),
            pt(9.0, r + 6.0),
            pt(6.0, r + 6.0),
            pt(0.0, r + 1.0),
            pt(-6.0, r + 6.0),
            pt(-9.0, r + 6.0),
        ]);

        c.rotate(90.0 - bug + course);
        draw_cdi(c, nav);
    });
}

/// Course pointer, deviation bar and dots, in the CDI frame: +x along the
/// selected course, +y toward a right deviation.
fn draw_cdi<D>(
    canvas: &mut Canvas<'_, D>,
    nav: &NavBundle,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let (outer, inner) = (ROSE_RADIUS, INNER_RADIUS);

    canvas.set_pen(Pen::new(1, BLACK));
    canvas.set_brush(Brush::Solid(nav.color.rgb()));
    canvas.polygon(&[
        pt(outer - 10.0, 0.0),
        pt(outer - 40.0, -20.0),
        pt(outer - 33.0, -3.0),
        pt(inner - 10.0, -3.0),
        pt(inner - 10.0, 3.0),
        pt(outer - 33.0, 3.0),
        pt(outer - 40.0, 20.0),
    ]);
    canvas.rect(RectF::new(-outer + 10.0, -3.0, outer - inner, 6.0));

    if nav.from_to != FromTo::Off {
        let deviation = clamp_normalized(finite_or_zero(nav.deviation), CDI_DEFLECTION_BOUND);
        let y = CDI.offset(deviation, 0.0);
        canvas.rect(RectF::new(-inner + 10.0, y - 3.0, 2.0 * (inner - 10.0), 6.0));

        canvas.scoped(|c| {
            if nav.from_to == FromTo::From {
                c.rotate(180.0);
            }
            c.polygon(&[pt(55.0, 0.0), pt(25.0, -20.0), pt(35.0, 0.0), pt(25.0, 20.0)]);
        });
    }

    canvas.scoped(|c| {
        c.rotate(90.0);
        c.set_pen(Pen::new(2, WHITE));
        c.set_brush(Brush::Solid(BLACK));
        for dot in [-2.0, -1.0, 1.0, 2.0] {
            c.circle(pt(CDI.offset(dot, 0.0), 0.0), DOT_RADIUS);
        }
    });
}

// =============================================================================
// Readouts
// =============================================================================

fn draw_source_labels<D>(
    canvas: &mut Canvas<'_, D>,
    nav: &NavBundle,
) where
    D: DrawTarget<Color = Rgb565>,
{
    canvas.set_font(FontSize::Medium, false);
    canvas.set_pen(Pen::new(2, nav.color.rgb()));
    let top = HSI_CENTER_Y - 50.0;
    canvas.text_in(RectF::new(CENTER_X - 70.0, top, 65.0, 18.0), HAlign::Left, VAlign::Middle, &nav.label);
    canvas.text_in(RectF::new(CENTER_X + 25.0, top, 65.0, 18.0), HAlign::Left, VAlign::Middle, nav.annunciator);
}

fn draw_bug_box<D>(
    canvas: &mut Canvas<'_, D>,
    state: &FlightState,
) where
    D: DrawTarget<Color = Rgb565>,
{
    draw_box(canvas, RectF::new(WIDTH, HEIGHT, -BOX_WIDTH, -30.0), CYAN);

    canvas.set_pen(Pen::new(1, CYAN));
    canvas.set_brush(Brush::Solid(CYAN));
    canvas.polygon(&[
        pt(381.0, 336.0),
        pt(381.0, 354.0),
        pt(387.0, 354.0),
        pt(387.0, 349.0),
        pt(382.0, 346.0),
        pt(382.0, 344.0),
        pt(387.0, 341.0),
        pt(387.0, 336.0),
    ]);
    canvas.text_in(
        RectF::new(412.0, 336.0, 65.0, 18.0),
        HAlign::Left,
        VAlign::Middle,
        &readout(format_args!("{:03}", whole(normalize_deg(state.heading_bug_deg)))),
    );
}

fn draw_distance_box<D>(
    canvas: &mut Canvas<'_, D>,
    state: &FlightState,
    nav: &NavBundle,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let rect = RectF::new(WIDTH - BOX_WIDTH, 0.0, BOX_WIDTH, 45.0);
    canvas.set_font(FontSize::Small, false);
    draw_box(canvas, rect, GREY);
    canvas.text_in(rect, HAlign::Center, VAlign::Top, "Dist NM");

    canvas.set_font(FontSize::Large, true);
    canvas.set_pen(Pen::new(1, nav.color.rgb()));
    canvas.text_in(
        RectF::new(rect.x, 12.0, BOX_WIDTH, 33.0),
        HAlign::Center,
        VAlign::Middle,
        &readout(format_args!("{:.1}", finite_or_zero(state.gps_distance_nm))),
    );
}

fn draw_wind_box<D>(
    canvas: &mut Canvas<'_, D>,
    state: &FlightState,
) where
    D: DrawTarget<Color = Rgb565>,
{
    canvas.set_font(FontSize::Large, true);
    draw_box(canvas, RectF::new(0.0, 0.0, BOX_WIDTH, 45.0), GREY);

    // Arrow points the way the wind blows, relative to the nose
    let wind = normalize_deg(state.wind_direction_deg);
    canvas.set_pen(Pen::new(1, WHITE));
    canvas.set_brush(Brush::Solid(WHITE));
    canvas.scoped(|c| {
        c.translate(25.0, 25.0);
        c.rotate(180.0 + angular_to_screen(state.mag_heading_deg) + wind);
        c.polygon(&[
            pt(-5.0, 0.0),
            pt(0.0, -10.0),
            pt(5.0, 0.0),
            pt(2.0, 0.0),
            pt(2.0, 10.0),
            pt(-2.0, 10.0),
            pt(-2.0, 0.0),
        ]);
    });

    canvas.text_in(
        RectF::new(50.0, 2.0, 50.0, 20.0),
        HAlign::Left,
        VAlign::Middle,
        &readout(format_args!("{:03}", whole(wind))),
    );
    canvas.text_in(
        RectF::new(50.0, 22.0, 50.0, 20.0),
        HAlign::Left,
        VAlign::Middle,
        &readout(format_args!("{:02}kt", whole(state.wind_speed_ms * MS_TO_KT))),
    );
}

fn draw_heading_box<D>(
    canvas: &mut Canvas<'_, D>,
    state: &FlightState,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let (cx, w, h) = (CENTER_X, HEADING_BOX_HALF_WIDTH, HEADING_BOX_HEIGHT);
    canvas.set_pen(Pen::new(2, GREY));
    canvas.set_brush(Brush::Solid(BLACK));
    canvas.polygon(&[
        pt(cx - w, 1.0),
        pt(cx - w, h),
        pt(cx - 6.0, h),
        pt(cx, h + 8.0),
        pt(cx + 6.0, h),
        pt(cx + w, h),
        pt(cx + w, 1.0),
    ]);
    canvas.text_in(
        RectF::new(cx - w, 1.0, 2.0 * w, h),
        HAlign::Center,
        VAlign::Middle,
        &readout(format_args!("{:03}", whole(normalize_deg(state.mag_heading_deg)))),
    );
}

fn draw_ground_track<D>(
    canvas: &mut Canvas<'_, D>,
    state: &FlightState,
) where
    D: DrawTarget<Color = Rgb565>,
{
    canvas.scoped(|c| {
        c.translate(CENTER_X, HSI_CENTER_Y);
        c.rotate(angular_to_screen(state.mag_heading_deg) + normalize_deg(state.ground_track_deg));

        c.set_pen(Pen::NONE);
        c.set_brush(Brush::Solid(MAGENTA));
        let (r, s) = (ROSE_RADIUS, GROUND_TRACK_SIZE);
        c.polygon(&[pt(-s, -r - s), pt(s, -r - s), pt(0.0, -r)]);

        c.set_pen(Pen::dashed(3, GREY));
        c.line(pt(0.0, 0.0), pt(0.0, -r));
    });
}

/// Fixed aircraft silhouette at the rose center.
fn draw_aircraft<D>(canvas: &mut Canvas<'_, D>)
where
    D: DrawTarget<Color = Rgb565>,
{
    canvas.set_pen(Pen::new(1, WHITE));
    canvas.set_brush(Brush::Solid(WHITE));
    canvas.polygon(&[
        pt(240.0, 163.0),
        pt(235.0, 169.0),
        pt(235.0, 180.0),
        pt(215.0, 195.0),
        pt(215.0, 200.0),
        pt(235.0, 195.0),
        pt(235.0, 205.0),
        pt(227.0, 213.0),
        pt(227.0, 217.0),
        pt(240.0, 213.0),
        pt(253.0, 217.0),
        pt(253.0, 213.0),
        pt(245.0, 205.0),
        pt(245.0, 195.0),
        pt(265.0, 200.0),
        pt(265.0, 195.0),
        pt(245.0, 180.0),
        pt(245.0, 169.0),
    ]);
}

fn draw_course_box<D>(
    canvas: &mut Canvas<'_, D>,
    nav: &NavBundle,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let top = HEIGHT - 30.0;
    draw_box(canvas, RectF::new(0.0, top, BOX_WIDTH, 30.0), GREY);

    canvas.set_pen(Pen::new(1, WHITE));
    canvas.set_font(FontSize::Medium, false);
    canvas.text_in(RectF::new(1.0, top + 1.0, BOX_WIDTH - 2.0, 28.0), HAlign::Left, VAlign::Bottom, "CRS");

    canvas.set_pen(Pen::new(1, nav.color.rgb()));
    canvas.set_font(FontSize::XLarge, false);
    canvas.text_in(
        RectF::new(40.0, top + 1.0, 65.0, 28.0),
        HAlign::Left,
        VAlign::Middle,
        &readout(format_args!("{:03}", whole(normalize_deg(nav.course_deg)))),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::GREEN;
    use crate::debug_log::{DebugLog, NullLog};
    use crate::nav::NavColor;
    use crate::testing::{Framebuffer, Inspect, framebuffer};

    fn powered() -> FlightState {
        let mut state = FlightState::new();
        state.avionics_powered = true;
        state
    }

    fn paint(state: &FlightState) -> Framebuffer {
        let mut fb = framebuffer();
        paint_hsi(&mut fb, state, &mut NullLog);
        fb
    }

    fn vor_from(course: f32) -> FlightState {
        let mut state = powered();
        state.nav1.nav_type = 3;
        state.nav1.course_deg = course;
        state.nav1.deviation = 0.5;
        state.nav1.from_to = 2;
        state
    }

    #[test]
    fn test_powered_off_draws_only_cross() {
        let fb = paint(&FlightState::new());
        assert!(fb.only_colors(&[BLACK, WHITE]));
        assert_eq!(fb.pixel(0, 0), WHITE);
    }

    #[test]
    fn test_powered_off_ignores_other_fields() {
        let mut state = FlightState::new();
        state.hsi_source = 99;
        state.nav1.nav_type = 7;
        state.nav1.glideslope_available = true;
        state.heading_bug_deg = f32::NAN;
        state.roll_deg = 1e30;
        let mut log = DebugLog::new();
        let mut fb = framebuffer();
        paint_hsi(&mut fb, &state, &mut log);
        assert!(fb.only_colors(&[BLACK, WHITE]));
        assert!(fb.same_pixels(&paint(&FlightState::new())));
        assert!(log.is_empty());
    }

    #[test]
    fn test_vor_deflection_bar_west_course() {
        let state = vor_from(270.0);
        let nav = derive_nav_bundle(&state, &mut NullLog);
        assert_eq!(nav.label.as_str(), "VOR1");
        assert_eq!(nav.color, NavColor::Green);
        assert!((CDI.offset(nav.deviation, 0.0) - 18.75).abs() < 1e-4);

        // Course line runs east-west, right deviation sits north of center
        let fb = paint(&state);
        assert_eq!(fb.pixel(300, 171), GREEN);
        assert_ne!(fb.pixel(300, 209), GREEN);
    }

    #[test]
    fn test_vor_deflection_bar_north_course() {
        let fb = paint(&vor_from(0.0));
        assert_eq!(fb.pixel(258, 240), GREEN);
        assert_ne!(fb.pixel(222, 240), GREEN);
    }

    #[test]
    fn test_no_deflection_bar_when_flag_off() {
        let mut state = vor_from(0.0);
        state.nav1.from_to = 0;
        let fb = paint(&state);
        assert_ne!(fb.pixel(258, 240), GREEN);
    }

    #[test]
    fn test_deflection_pinned_inside_rose() {
        let mut state = vor_from(0.0);
        state.nav1.deviation = 50.0;
        let fb = paint(&state);
        // Bound keeps the bar on the inner circle: 240 + 90
        assert_eq!(fb.pixel(329, 240), GREEN);
        assert_ne!(fb.pixel(336, 240), GREEN);
    }

    #[test]
    fn test_heading_bug_tracks_rose() {
        let mut state = powered();
        state.heading_bug_deg = 90.0;
        let fb = paint(&state);
        // East on the rose at heading 0 is the right edge of the ring
        assert_eq!(fb.pixel(402, 183), CYAN);

        state.mag_heading_deg = 90.0;
        let fb = paint(&state);
        assert_eq!(fb.pixel(233, 28), CYAN);
    }

    #[test]
    fn test_gps_source_shows_distance_box() {
        let mut state = powered();
        state.hsi_source = 2;
        state.gps_distance_nm = 12.34;
        let fb = paint(&state);
        assert_eq!(fb.pixel(WIDTH as u32 - 50, 40), BLACK);
        assert!((375..480).any(|x| (12..45).any(|y| fb.pixel(x, y) == MAGENTA)));

        state.hsi_source = 0;
        let fb = paint(&state);
        assert!(!(375..480).any(|x| (12..45).any(|y| fb.pixel(x, y) == MAGENTA)));
    }

    #[test]
    fn test_unknown_nav_type_logged() {
        let mut state = powered();
        state.nav1.nav_type = 2;
        let mut log = DebugLog::new();
        paint_hsi(&mut framebuffer(), &state, &mut log);
        assert_eq!(log.last(), Some("failed to decode nav type 2"));
    }

    #[test]
    fn test_extreme_values_paint_without_panic() {
        for value in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY, 1e9, -1e9] {
            let mut state = powered();
            state.mag_heading_deg = value;
            state.heading_bug_deg = value;
            state.ground_track_deg = value;
            state.wind_direction_deg = value;
            state.wind_speed_ms = value;
            state.gps_distance_nm = value;
            state.hsi_source = 2;
            state.gps.course_deg = value;
            state.gps.deviation = value;
            state.gps.from_to = 1;
            state.gps_hsi_sensitivity_nm = value;
            state.gps.glideslope_deviation = value;
            state.gps_vnav_available = value;
            paint_hsi(&mut framebuffer(), &state, &mut NullLog);
        }
    }
}
