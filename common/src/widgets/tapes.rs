//! Layout of the scrolling tapes and the pitch ladder.
//!
//! These functions only compute positions; the attitude screen draws them.
//! Every position goes through the scale constants in [`crate::scale`], the
//! same ones the moving pointers use.

use embedded_graphics::pixelcolor::Rgb565;
use heapless::Vec;

use crate::colors::{GREEN, RED, WHITE, YELLOW};
use crate::config::{CENTER_Y, HEIGHT};
use crate::parameters::FlightState;
use crate::scale::{PITCH, PITCH_LIMIT, SPEED_TAPE, clamp_normalized, finite_or_zero};

// =============================================================================
// Airspeed Bands
// =============================================================================

/// Left edge of the main airspeed bands.
pub const BAND_X: f32 = 90.0;
pub const BAND_WIDTH: f32 = 8.0;
/// Flap band sits on the right half of the main bands.
pub const FLAP_BAND_X: f32 = 95.0;
pub const FLAP_BAND_WIDTH: f32 = 3.0;

/// One colored airspeed range, already clipped to the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub color: Rgb565,
    pub x: f32,
    pub width: f32,
    pub y_top: f32,
    pub y_bottom: f32,
}

/// Screen y of `speed` on the airspeed tape centered on `kias`.
#[inline]
pub fn speed_y(
    speed: f32,
    kias: f32,
) -> f32 {
    SPEED_TAPE.tape_y(speed, kias, CENTER_Y)
}

/// Colored ranges visible at the current airspeed, in drawing order:
/// never-exceed, caution, normal, flaps. Ranges outside the tape window are
/// dropped, partly visible ones are cut at the canvas edge.
pub fn speed_bands(state: &FlightState) -> Vec<Band, 4> {
    let kias = finite_or_zero(state.kias);
    let y = |speed: f32| speed_y(finite_or_zero(speed), kias);

    let ranges = [
        (RED, BAND_X, BAND_WIDTH, f32::NEG_INFINITY, y(state.v_never_exceed)),
        (YELLOW, BAND_X, BAND_WIDTH, y(state.v_never_exceed), y(state.v_normal_operating)),
        (GREEN, BAND_X, BAND_WIDTH, y(state.v_normal_operating), y(state.v_stall)),
        (WHITE, FLAP_BAND_X, FLAP_BAND_WIDTH, y(state.v_flaps_extended), y(state.v_stall_landing)),
    ];

    let mut bands = Vec::new();
    for (color, x, width, top, bottom) in ranges {
        let y_top = top.max(0.0);
        let y_bottom = bottom.min(HEIGHT);
        if y_bottom > y_top {
            bands.push(Band { color, x, width, y_top, y_bottom }).ok();
        }
    }
    bands
}

// =============================================================================
// Tape Graduations
// =============================================================================

/// Most graduation marks a tape window can hold.
pub const MAX_MARKS: usize = 32;

/// Multiples of `step` inside the tape window `(center - half_span,
/// center + half_span]`, top first. Marks at or below `floor` are left out.
pub fn graduations(
    center: f32,
    half_span: f32,
    step: i32,
    floor: Option<f32>,
) -> Vec<i32, MAX_MARKS> {
    let mut marks = Vec::new();
    if step <= 0 || !center.is_finite() {
        return marks;
    }
    let mut lower = center - half_span;
    if let Some(floor) = floor {
        lower = lower.max(floor);
    }
    let top = (center + half_span) as i32;
    let mut v = top.saturating_sub(top.rem_euclid(step));
    while v as f32 > lower {
        if marks.push(v).is_err() {
            break;
        }
        v = v.saturating_sub(step);
    }
    marks
}

// =============================================================================
// Pitch Ladder
// =============================================================================

/// Rung spacing in degrees of pitch.
pub const RUNG_STEP: f32 = 2.5;

/// Half-widths cycle through this pattern moving away from the horizon;
/// the widest rung lands on every 10° and carries a label.
pub const RUNG_HALF_WIDTHS: [f32; 4] = [10.0, 20.0, 10.0, 30.0];

/// Rungs stop this far inside the roll arc on the ground side.
pub const LADDER_LOWER_LIMIT: f32 = ROLL_ARC_RADIUS - 40.0;

/// Rungs stop this far inside the roll arc on the sky side.
pub const LADDER_UPPER_LIMIT: f32 = ROLL_ARC_RADIUS - 30.0;

/// Pitch ladder rung in the roll-rotated frame (origin at the canvas center).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rung {
    pub y: f32,
    pub half_width: f32,
    /// Degrees printed on both sides of the long rungs.
    pub label: Option<i32>,
}

/// Ground-side y of the horizon for the displayed pitch.
#[inline]
pub fn horizon_y(pitch_deg: f32) -> f32 { PITCH.offset(display_pitch(pitch_deg), 0.0) }

/// Pitch as displayed: non-finite reads level, beyond ±90° is pinned.
#[inline]
pub fn display_pitch(pitch_deg: f32) -> f32 { clamp_normalized(finite_or_zero(pitch_deg), PITCH_LIMIT) }

/// Rungs for `pitch_deg`, walking outward from the horizon in both
/// directions until one passes the ladder limit. The last rung on each side
/// may lie past the limit, matching the instrument.
pub fn pitch_ladder(pitch_deg: f32) -> Vec<Rung, 128> {
    let pitch = display_pitch(pitch_deg);
    let mut rungs = Vec::new();

    for direction in [1.0f32, -1.0] {
        let limit = if direction > 0.0 { LADDER_LOWER_LIMIT } else { -LADDER_UPPER_LIMIT };
        let mut step = 0.0f32;
        let mut y = 0.0f32;
        let mut mode = 0;
        while (direction > 0.0 && y < limit) || (direction < 0.0 && y > limit) {
            step += direction * RUNG_STEP;
            y = PITCH.offset(step, -pitch);
            let half_width = RUNG_HALF_WIDTHS[mode];
            let label = (mode == 3).then_some((step as i32).abs());
            if rungs.push(Rung { y, half_width, label }).is_err() {
                break;
            }
            mode = (mode + 1) % RUNG_HALF_WIDTHS.len();
        }
    }
    rungs
}

// =============================================================================
// Roll Scale
// =============================================================================

/// Roll arc radius (80% of the half height).
pub const ROLL_ARC_RADIUS: f32 = CENTER_Y * 0.8;

/// Roll scale marks as (angle in degrees, length in pixels), angles measured
/// clockwise from three o'clock, so -90 is straight up.
pub const ROLL_TICKS: [(f32, f32); 10] = [
    (-30.0, 10.0),
    (-45.0, 5.0),
    (-135.0, 5.0),
    (-150.0, 10.0),
    (-60.0, 10.0),
    (-70.0, 5.0),
    (-80.0, 5.0),
    (-100.0, 5.0),
    (-110.0, 5.0),
    (-120.0, 10.0),
];

const _: () = assert!(LADDER_LOWER_LIMIT > 0.0 && LADDER_UPPER_LIMIT > 0.0);
