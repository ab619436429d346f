//! Attitude indicator screen.
//!
//! Layers, back to front: sky, roll-rotated ground and pitch ladder with the
//! roll scale, fixed aircraft symbol, airspeed tape, altitude and vertical
//! speed tape, glideslope, turn coordinator and slip ball.
//!
//! # Usage
//!
//! ```ignore
//! let state = store.state();
//! paint_attitude(&mut display, state, &mut log);
//! ```

use embedded_graphics::{pixelcolor::Rgb565, prelude::*};

use super::{readout, whole};
use crate::canvas::{Brush, Canvas, Pen, RectF, pt, sin_cos_deg};
use crate::colors::{
    BALL_HIGHLIGHT, BALL_RIM, BLACK, CYAN, GREY, GROUND_FAR, GROUND_NEAR, MAGENTA, SKY_HIGH, SKY_LOW,
    SLIP_MARKER, SYMBOL_SHADE, TURN_SCALE, TURN_STOP, WHITE, YELLOW,
};
use crate::config::{CENTER_X, CENTER_Y, DIAGONAL, HEIGHT, MS_TO_KT, WIDTH};
use crate::debug_log::LogSink;
use crate::nav::derive_nav_bundle;
use crate::parameters::FlightState;
use crate::scale::{
    ALTITUDE_TAPE, SLIP, SPEED_TAPE, SPEED_TREND_SECONDS, TURN_RATE, TURN_RATE_LIMIT, VERTICAL_SPEED_TAPE,
    clamp_normalized, finite_or_zero,
};
use crate::styles::{FontSize, HAlign, VAlign};
use crate::widgets::tapes::{ROLL_ARC_RADIUS, ROLL_TICKS, graduations, horizon_y, pitch_ladder, speed_bands, speed_y};
use crate::widgets::{GlideslopeSlot, draw_box, draw_glideslope, draw_powered_off, fill_shape};

// =============================================================================
// Layout
// =============================================================================

/// Airspeed tape width, from the left edge.
const SPEED_TAPE_WIDTH: f32 = 97.0;
/// Left edge of the altitude tape.
const ALT_TAPE_LEFT: f32 = 383.0;
/// Left edge of the altitude labels and readout.
const ALT_LABEL_LEFT: f32 = 398.0;
const ALT_READOUT_RIGHT: f32 = 473.0;
/// Height of the readout boxes at the top and bottom of the tapes.
const FOOTER_HEIGHT: f32 = 30.0;

/// Vertical speed scale marks, in hundreds of fpm, top (+1500) to bottom.
const VS_MARKS: i32 = 30;

const TURN_TOP: f32 = 345.0;
const SLIP_TOP: f32 = 305.0;
const SLIP_HEIGHT: f32 = 30.0;
const BALL_RADIUS: f32 = 15.0;

/// Glideslope ladder placement, just left of the altitude tape.
pub const AI_GLIDESLOPE: GlideslopeSlot =
    GlideslopeSlot { width: 16.0, height: 192.0, right_offset: 103.0, frame_color: GREY, center_y: CENTER_Y };

const _: () = assert!(SPEED_TAPE_WIDTH < ALT_TAPE_LEFT);
const _: () = assert!(WIDTH - AI_GLIDESLOPE.right_offset <= ALT_TAPE_LEFT);

// =============================================================================
// Paint Pass
// =============================================================================

/// Paint the attitude indicator for `state` onto `target`.
pub fn paint_attitude<D, L>(
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

    draw_horizon(&mut canvas, state);
    draw_aircraft_symbol(&mut canvas);
    draw_speed_tape(&mut canvas, state);
    draw_altitude_tape(&mut canvas, state);
    draw_glideslope(&mut canvas, &AI_GLIDESLOPE, &nav);
    draw_turn_coordinator(&mut canvas, state);
    draw_slip_ball(&mut canvas, state);

    canvas.finish();
}

// =============================================================================
// Horizon and Roll Scale
// =============================================================================

fn draw_horizon<D>(
    canvas: &mut Canvas<'_, D>,
    state: &FlightState,
) where
    D: DrawTarget<Color = Rgb565>,
{
    canvas.set_pen(Pen::new(1, WHITE));
    canvas.set_brush(Brush::Linear { start: pt(CENTER_X, HEIGHT), end: pt(CENTER_X, 0.0), from: SKY_LOW, to: SKY_HIGH });
    canvas.rect(RectF::new(0.0, 0.0, WIDTH, HEIGHT));

    let pitch = state.pitch_deg;
    let roll = finite_or_zero(state.roll_deg);

    canvas.scoped(|c| {
        c.translate(CENTER_X, CENTER_Y);
        c.rotate(-roll);

        // Ground plane, outlined so its top edge is the horizon line
        let horizon = horizon_y(pitch);
        if horizon < DIAGONAL {
            c.set_brush(Brush::Linear {
                start: pt(0.0, horizon),
                end: pt(0.0, DIAGONAL),
                from: GROUND_NEAR,
                to: GROUND_FAR,
            });
            c.rect(RectF::new(-DIAGONAL, horizon, 2.0 * DIAGONAL, DIAGONAL - horizon));
        }

        c.set_font(FontSize::Small, true);
        for rung in pitch_ladder(pitch) {
            c.line(pt(-rung.half_width, rung.y), pt(rung.half_width, rung.y));
            if let Some(deg) = rung.label {
                let text = readout(format_args!("{deg}"));
                c.text_at(pt(33.0, rung.y + 2.0), HAlign::Left, VAlign::Baseline, &text);
                c.text_at(pt(-40.0, rung.y + 2.0), HAlign::Left, VAlign::Baseline, &text);
            }
        }

        c.set_pen(Pen::new(3, WHITE));
        c.arc(pt(0.0, 0.0), ROLL_ARC_RADIUS, 30.0, 120.0);

        c.set_pen(Pen::new(2, WHITE));
        for (angle, length) in ROLL_TICKS {
            let (sin, cos) = sin_cos_deg(angle);
            let outer = ROLL_ARC_RADIUS + length;
            c.line(pt(ROLL_ARC_RADIUS * cos, ROLL_ARC_RADIUS * sin), pt(outer * cos, outer * sin));
        }

        // Roll pointer turns with the sky
        c.set_pen(Pen::new(1, WHITE));
        c.set_brush(Brush::Solid(WHITE));
        let r = ROLL_ARC_RADIUS;
        c.polygon(&[pt(0.0, -r - 2.0), pt(-7.0, -r - 14.0), pt(7.0, -r - 14.0)]);
    });

    // Fixed zero-bank index
    let r = ROLL_ARC_RADIUS;
    canvas.polygon(&[
        pt(CENTER_X, CENTER_Y - r + 2.0),
        pt(CENTER_X + 7.0, CENTER_Y - r + 14.0),
        pt(CENTER_X - 7.0, CENTER_Y - r + 14.0),
    ]);
}

// =============================================================================
// Aircraft Symbol
// =============================================================================

fn draw_aircraft_symbol<D>(canvas: &mut Canvas<'_, D>)
where
    D: DrawTarget<Color = Rgb565>,
{
    let (cx, cy) = (CENTER_X, CENTER_Y);

    canvas.set_pen(Pen::new(1, BLACK));
    canvas.set_brush(Brush::Solid(YELLOW));
    for side in [-1.0f32, 1.0] {
        canvas.polygon(&[pt(cx + side, cy + 1.0), pt(cx + side * 75.0, cy + 38.0), pt(cx + side * 54.0, cy + 38.0)]);
    }
    canvas.polygon(&[pt(120.0, cy - 5.0), pt(155.0, cy - 5.0), pt(160.0, cy), pt(155.0, cy + 5.0), pt(120.0, cy + 5.0)]);
    canvas.polygon(&[pt(360.0, cy - 5.0), pt(325.0, cy - 5.0), pt(320.0, cy), pt(325.0, cy + 5.0), pt(360.0, cy + 5.0)]);

    // Shaded lower halves
    canvas.set_brush(Brush::Solid(SYMBOL_SHADE));
    for side in [-1.0f32, 1.0] {
        canvas.polygon(&[
            pt(cx + side * 2.0, cy + 2.0),
            pt(cx + side * 33.0, cy + 38.0),
            pt(cx + side * 54.0, cy + 38.0),
        ]);
    }
    fill_shape(canvas, &[pt(120.0, cy), pt(160.0, cy), pt(155.0, cy + 5.0), pt(120.0, cy + 5.0)], SYMBOL_SHADE);
    fill_shape(canvas, &[pt(360.0, cy), pt(320.0, cy), pt(325.0, cy + 5.0), pt(360.0, cy + 5.0)], SYMBOL_SHADE);
}

// =============================================================================
// Airspeed Tape
// =============================================================================

fn draw_speed_tape<D>(
    canvas: &mut Canvas<'_, D>,
    state: &FlightState,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let kias = finite_or_zero(state.kias);
    let cy = CENTER_Y;

    canvas.set_pen(Pen::NONE);
    canvas.set_brush(Brush::Shade(BLACK));
    canvas.rect(RectF::new(0.0, 0.0, SPEED_TAPE_WIDTH, HEIGHT));

    for band in speed_bands(state) {
        fill_shape(canvas, &RectF::new(band.x, band.y_top, band.width, band.y_bottom - band.y_top).corners(), band.color);
    }

    canvas.set_pen(Pen::new(2, WHITE));
    canvas.set_font(FontSize::XLarge, false);
    for mark in graduations(kias, SPEED_TAPE.span / 2.0, 5, Some(0.0)) {
        let y = speed_y(mark as f32, kias);
        if mark % 10 == 0 {
            canvas.line(pt(87.0, y), pt(SPEED_TAPE_WIDTH, y));
            let label = readout(format_args!("{mark}"));
            canvas.text_in(RectF::new(7.0, y - 25.0, 75.0, 50.0), HAlign::Right, VAlign::Middle, &label);
        } else {
            canvas.line(pt(90.0, y), pt(SPEED_TAPE_WIDTH, y));
        }
    }

    // Current speed pointer box
    canvas.set_brush(Brush::Solid(BLACK));
    canvas.polygon(&[
        pt(7.0, cy + 25.0),
        pt(82.0, cy + 25.0),
        pt(82.0, cy + 10.0),
        pt(92.0, cy),
        pt(82.0, cy - 10.0),
        pt(82.0, cy - 25.0),
        pt(7.0, cy - 25.0),
    ]);
    canvas.set_font(FontSize::Huge, false);
    canvas.text_in(
        RectF::new(7.0, cy - 25.0, 75.0, 50.0),
        HAlign::Center,
        VAlign::Middle,
        &readout(format_args!("{:03}", whole(kias))),
    );

    canvas.set_font(FontSize::Normal, true);
    draw_box(canvas, RectF::new(0.0, 0.0, SPEED_TAPE_WIDTH, FOOTER_HEIGHT), WHITE);
    canvas.text_in(
        RectF::new(0.0, 0.0, SPEED_TAPE_WIDTH, FOOTER_HEIGHT),
        HAlign::Center,
        VAlign::Middle,
        &readout(format_args!("TAS {:03} kt", whole(state.ktas))),
    );

    let footer = RectF::new(0.0, HEIGHT - FOOTER_HEIGHT, SPEED_TAPE_WIDTH, FOOTER_HEIGHT);
    draw_box(canvas, footer, WHITE);
    let inner = RectF::new(footer.x + 3.0, footer.y, footer.w - 6.0, footer.h);
    canvas.text_in(inner, HAlign::Left, VAlign::Middle, "GS");
    canvas.set_pen(Pen::new(1, MAGENTA));
    canvas.text_in(
        inner,
        HAlign::Right,
        VAlign::Middle,
        &readout(format_args!("{:03} kt", whole(state.ground_speed_ms * MS_TO_KT))),
    );

    // Where the speed will be in ten seconds at the current trend
    let trend = SPEED_TAPE.offset(finite_or_zero(state.kias_delta) * SPEED_TREND_SECONDS, 0.0);
    canvas.set_brush(Brush::Solid(MAGENTA));
    canvas.rect(RectF::new(SPEED_TAPE_WIDTH, cy, 4.0, -trend));
}

// =============================================================================
// Altitude and Vertical Speed Tapes
// =============================================================================

fn draw_altitude_tape<D>(
    canvas: &mut Canvas<'_, D>,
    state: &FlightState,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let alt = finite_or_zero(state.altitude_ft);
    let cy = CENTER_Y;

    canvas.set_pen(Pen::NONE);
    canvas.set_brush(Brush::Shade(BLACK));
    canvas.rect(RectF::new(ALT_TAPE_LEFT, 0.0, WIDTH - ALT_TAPE_LEFT, HEIGHT));

    // Vertical speed scale, labelled in hundreds of fpm
    canvas.set_pen(Pen::new(2, WHITE));
    canvas.set_font(FontSize::Tiny, false);
    for mark in (0..=VS_MARKS).rev() {
        let fpm = (mark - VS_MARKS / 2) as f32 * 100.0;
        let y = cy - VERTICAL_SPEED_TAPE.offset(fpm, 0.0);
        if mark % 5 == 0 {
            canvas.line(pt(470.0, y), pt(WIDTH, y));
            let label = readout(format_args!("{}", (mark - VS_MARKS / 2).abs()));
            canvas.text_in(RectF::new(450.0, y - 5.0, 15.0, 10.0), HAlign::Right, VAlign::Middle, &label);
        } else {
            canvas.line(pt(473.0, y), pt(WIDTH, y));
        }
    }

    let vs = VERTICAL_SPEED_TAPE.offset(finite_or_zero(state.vertical_speed_fpm), 0.0);
    fill_shape(canvas, &RectF::new(WIDTH, cy, -7.0, -vs).corners(), MAGENTA);

    canvas.set_pen(Pen::new(2, WHITE));
    canvas.set_font(FontSize::Large, false);
    for mark in graduations(alt, ALTITUDE_TAPE.span / 2.0, 20, None) {
        let y = ALTITUDE_TAPE.tape_y(mark as f32, alt, cy);
        canvas.line(pt(ALT_TAPE_LEFT, y), pt(ALT_TAPE_LEFT + 10.0, y));
        if mark % 100 == 0 {
            let label = readout(format_args!("{mark}"));
            canvas.text_in(RectF::new(ALT_LABEL_LEFT, y - 25.0, 75.0, 50.0), HAlign::Left, VAlign::Middle, &label);
        }
    }

    canvas.set_brush(Brush::Solid(BLACK));
    canvas.polygon(&[
        pt(ALT_READOUT_RIGHT, cy - 15.0),
        pt(ALT_LABEL_LEFT, cy - 15.0),
        pt(ALT_LABEL_LEFT, cy - 10.0),
        pt(ALT_LABEL_LEFT - 10.0, cy),
        pt(ALT_LABEL_LEFT, cy + 10.0),
        pt(ALT_LABEL_LEFT, cy + 15.0),
        pt(ALT_READOUT_RIGHT, cy + 15.0),
    ]);
    canvas.set_font(FontSize::Large, true);
    canvas.text_in(
        RectF::new(ALT_LABEL_LEFT, cy - 15.0, ALT_READOUT_RIGHT - ALT_LABEL_LEFT, 30.0),
        HAlign::Center,
        VAlign::Middle,
        &readout(format_args!("{:05}", whole(alt))),
    );

    // Altimeter setting
    let footer = RectF::new(ALT_TAPE_LEFT, HEIGHT - FOOTER_HEIGHT, WIDTH - ALT_TAPE_LEFT, FOOTER_HEIGHT);
    draw_box(canvas, footer, CYAN);
    canvas.text_in(
        footer,
        HAlign::Center,
        VAlign::Middle,
        &readout(format_args!("{:.2}", finite_or_zero(state.alt_setting_inhg))),
    );
}

// =============================================================================
// Turn Coordinator
// =============================================================================

fn draw_turn_coordinator<D>(
    canvas: &mut Canvas<'_, D>,
    state: &FlightState,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let cx = CENTER_X;
    let stop = TURN_RATE.pixels;

    canvas.set_pen(Pen::new(1, TURN_SCALE));
    canvas.line(pt(cx, TURN_TOP), pt(cx, HEIGHT));
    canvas.line(pt(cx - stop, TURN_TOP), pt(cx + stop, TURN_TOP));

    let rate = clamp_normalized(finite_or_zero(state.turn_rate), TURN_RATE_LIMIT);
    fill_shape(canvas, &RectF::new(cx, TURN_TOP + 1.0, TURN_RATE.offset(rate, 0.0), 13.0).corners(), MAGENTA);

    // Standard rate marks
    canvas.set_pen(Pen::new(1, TURN_STOP));
    canvas.line(pt(cx - stop, TURN_TOP), pt(cx - stop, HEIGHT));
    canvas.line(pt(cx + stop, TURN_TOP), pt(cx + stop, HEIGHT));
}

fn draw_slip_ball<D>(
    canvas: &mut Canvas<'_, D>,
    state: &FlightState,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let cx = CENTER_X;
    let half = SLIP.pixels;

    canvas.set_pen(Pen::new(2, TURN_SCALE));
    canvas.set_brush(Brush::Solid(SLIP_MARKER));
    canvas.rect(RectF::new(cx - half, SLIP_TOP, -6.0, SLIP_HEIGHT));
    canvas.rect(RectF::new(cx + half, SLIP_TOP, 6.0, SLIP_HEIGHT));

    // Ball moves against the slip value, one ball width per unit
    let center = pt(cx - SLIP.offset(finite_or_zero(state.slip), 0.0), SLIP_TOP + SLIP_HEIGHT / 2.0);
    canvas.set_brush(Brush::Radial { center, radius: BALL_RADIUS, inner: BALL_HIGHLIGHT, outer: BALL_RIM });
    canvas.circle(center, BALL_RADIUS);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::GREEN;
    use crate::debug_log::{DebugLog, NullLog};
    use crate::testing::{Framebuffer, Inspect, framebuffer};

    fn powered() -> FlightState {
        let mut state = FlightState::new();
        state.avionics_powered = true;
        state
    }

    fn paint(state: &FlightState) -> Framebuffer {
        let mut fb = framebuffer();
        paint_attitude(&mut fb, state, &mut NullLog);
        fb
    }

    #[test]
    fn test_powered_off_draws_only_cross() {
        let fb = paint(&FlightState::new());
        assert!(fb.only_colors(&[BLACK, WHITE]));
        assert_eq!(fb.pixel(240, 180), WHITE);
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
        paint_attitude(&mut fb, &state, &mut log);
        assert!(fb.only_colors(&[BLACK, WHITE]));
        assert!(fb.same_pixels(&paint(&FlightState::new())));
        assert!(log.is_empty());
    }

    #[test]
    fn test_level_flight_sky_and_ground() {
        let fb = paint(&powered());
        let sky = fb.pixel(120, 60);
        let ground = fb.pixel(150, 300);
        assert!(sky.b() > sky.r(), "sky {sky:?}");
        assert!(ground.r() > ground.b(), "ground {ground:?}");
    }

    #[test]
    fn test_nose_down_shows_ground_above_center() {
        let mut state = powered();
        state.pitch_deg = -20.0;
        let fb = paint(&state);
        // Horizon sits 144 px above center, so row 100 is ground
        let p = fb.pixel(150, 100);
        assert!(p.r() > p.b(), "{p:?}");
    }

    #[test]
    fn test_full_dive_is_all_ground() {
        let mut state = powered();
        state.pitch_deg = -120.0;
        let fb = paint(&state);
        let p = fb.pixel(150, 20);
        assert!(p.r() > p.b(), "{p:?}");
    }

    #[test]
    fn test_airspeed_bands_visible_in_range() {
        let mut state = powered();
        state.kias = 100.0;
        let fb = paint(&state);
        // 100 kt at center: green band below 118 kt, yellow above it
        assert_eq!(fb.pixel(91, 200), GREEN);
        assert_eq!(fb.pixel(91, 42), YELLOW);
    }

    #[test]
    fn test_turn_rate_bar_direction() {
        let mut state = powered();
        state.turn_rate = 32.0;
        let fb = paint(&state);
        assert_eq!(fb.pixel(270, 352), MAGENTA);
        assert_ne!(fb.pixel(210, 352), MAGENTA);

        state.turn_rate = -TURN_RATE_LIMIT;
        let pinned = paint(&state).count(MAGENTA);
        state.turn_rate = -500.0;
        let fb = paint(&state);
        assert_eq!(fb.pixel(120, 352), MAGENTA);
        assert_eq!(fb.count(MAGENTA), pinned);
    }

    #[test]
    fn test_glideslope_only_with_guidance() {
        let mut state = powered();
        let before = paint(&state);
        state.nav1.glideslope_available = true;
        let after = paint(&state);
        assert_ne!(before.pixel(368, 182), GREEN);
        assert_eq!(after.pixel(368, 182), GREEN);
    }

    #[test]
    fn test_extreme_values_paint_without_panic() {
        for value in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY, 1e9, -1e9, 1e30] {
            let mut state = powered();
            state.roll_deg = value;
            state.pitch_deg = value;
            state.kias = value;
            state.kias_delta = value;
            state.ktas = value;
            state.altitude_ft = value;
            state.vertical_speed_fpm = value;
            state.turn_rate = value;
            state.slip = value;
            state.ground_speed_ms = value;
            state.alt_setting_inhg = value;
            state.nav1.glideslope_available = true;
            state.nav1.glideslope_deviation = value;
            let mut log = DebugLog::new();
            paint_attitude(&mut framebuffer(), &state, &mut log);
        }
    }

    #[test]
    fn test_paint_leaves_no_saved_transforms() {
        let mut fb = framebuffer();
        let mut canvas = Canvas::new(&mut fb);
        let state = powered();
        draw_horizon(&mut canvas, &state);
        draw_speed_tape(&mut canvas, &state);
        assert_eq!(canvas.depth(), 0);
        canvas.finish();
    }
}
