//! Scale mapping from instrument quantities to screen space.
//!
//! Every tape, ladder and needle places itself through [`linear_offset`]
//! (usually via a [`LinearScale`] constant). The moving indicator and the
//! graduation marks behind it must use the same scale, otherwise a needle
//! drifts off its own markings.
//!
//! # Compile-Time Validation
//!
//! Scale windows are `const` and checked with `const` assertions, so a zero
//! span is a build failure rather than a NaN drawn at runtime.

use crate::config::{CENTER_Y, HEIGHT};

// =============================================================================
// Linear Scales
// =============================================================================

/// A linear window: `span` units of the quantity cover `pixels` on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub span: f32,
    pub pixels: f32,
}

impl LinearScale {
    pub const fn new(
        span: f32,
        pixels: f32,
    ) -> Self {
        Self { span, pixels }
    }

    /// Pixel offset of `value` from `reference` on this scale.
    #[inline]
    pub fn offset(
        &self,
        value: f32,
        reference: f32,
    ) -> f32 {
        linear_offset(value, reference, self.span, self.pixels)
    }

    /// Screen y of `value` on a vertical tape whose `reference` sits at
    /// `center_y`; larger values are drawn higher.
    #[inline]
    pub fn tape_y(
        &self,
        value: f32,
        reference: f32,
        center_y: f32,
    ) -> f32 {
        center_y - self.offset(value, reference)
    }
}

/// Pitch ladder: 25° from the horizon reaches the canvas edge.
pub const PITCH: LinearScale = LinearScale::new(25.0, CENTER_Y);

/// Airspeed tape: 50 kt across the full canvas height.
pub const SPEED_TAPE: LinearScale = LinearScale::new(50.0, HEIGHT);

/// Altitude tape: 300 ft across the full canvas height.
pub const ALTITUDE_TAPE: LinearScale = LinearScale::new(300.0, HEIGHT);

/// Vertical speed tape: 3000 fpm across the full canvas height.
pub const VERTICAL_SPEED_TAPE: LinearScale = LinearScale::new(3000.0, HEIGHT);

/// Seconds of airspeed trend projected by the trend bar.
pub const SPEED_TREND_SECONDS: f32 = 10.0;

/// Turn coordinator: 32 units of turn rate move the bar 62 px.
pub const TURN_RATE: LinearScale = LinearScale::new(32.0, 62.0);

/// Turn rate beyond this is pinned.
pub const TURN_RATE_LIMIT: f32 = 73.0;

/// Slip ball: full slip moves the ball 15 px.
pub const SLIP: LinearScale = LinearScale::new(1.0, 15.0);

/// CDI deflection: 2 dots of deviation cover 75 px.
pub const CDI: LinearScale = LinearScale::new(2.0, 75.0);

/// CDI full-scale deflection in deviation units (bar stops at the inner circle).
pub const CDI_DEFLECTION_BOUND: f32 = 90.0 / 75.0 * 2.0;

/// Glideslope deviation that puts the diamond at the end of its ladder.
pub const GLIDESLOPE_REFERENCE_DEFLECTION: f32 = 2.5;

/// Displayed pitch is pinned to this band.
pub const PITCH_LIMIT: f32 = 90.0;

const _: () = assert!(PITCH.span > 0.0 && PITCH.pixels > 0.0);
const _: () = assert!(SPEED_TAPE.span > 0.0 && SPEED_TAPE.pixels > 0.0);
const _: () = assert!(ALTITUDE_TAPE.span > 0.0 && ALTITUDE_TAPE.pixels > 0.0);
const _: () = assert!(VERTICAL_SPEED_TAPE.span > 0.0 && VERTICAL_SPEED_TAPE.pixels > 0.0);
const _: () = assert!(TURN_RATE.span > 0.0 && TURN_RATE_LIMIT > 0.0);
const _: () = assert!(SLIP.span > 0.0);
const _: () = assert!(CDI.span > 0.0 && CDI_DEFLECTION_BOUND > 0.0);
const _: () = assert!(GLIDESLOPE_REFERENCE_DEFLECTION > 0.0);

// =============================================================================
// Mapping Functions
// =============================================================================

/// `(value - reference) / full_scale_span * pixels_per_full_scale`.
///
/// # Panics
/// A zero or non-finite span is a configuration error and panics instead of
/// producing NaN geometry.
#[inline]
pub fn linear_offset(
    value: f32,
    reference: f32,
    full_scale_span: f32,
    pixels_per_full_scale: f32,
) -> f32 {
    assert!(
        full_scale_span != 0.0 && full_scale_span.is_finite(),
        "degenerate scale span {full_scale_span}"
    );
    (value - reference) / full_scale_span * pixels_per_full_scale
}

/// Wrap an angle in degrees into `[0, 360)`. Non-finite input maps to 0.
pub fn normalize_deg(deg: f32) -> f32 {
    if !deg.is_finite() {
        return 0.0;
    }
    let wrapped = deg % 360.0;
    let wrapped = if wrapped < 0.0 { wrapped + 360.0 } else { wrapped };
    // -1e-6 % 360 + 360 rounds up to exactly 360
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Canvas rotation for a compass bearing.
///
/// Compass bearings grow clockwise from north, canvas rotations are applied
/// to the drawing frame, so the rose is turned by the negated bearing.
#[inline]
pub fn angular_to_screen(bearing_deg: f32) -> f32 {
    -normalize_deg(bearing_deg)
}

/// Compass bearing for a canvas rotation; inverse of [`angular_to_screen`].
#[inline]
pub fn screen_to_angular(rotation_deg: f32) -> f32 {
    normalize_deg(-rotation_deg)
}

/// Pin `x` into `[-bound, bound]`. NaN maps to 0.
#[inline]
pub fn clamp_normalized(
    x: f32,
    bound: f32,
) -> f32 {
    let bound = bound.abs();
    if x.is_nan() { 0.0 } else { x.clamp(-bound, bound) }
}

/// Finite value or 0, for fields fed straight into layout.
#[inline]
pub fn finite_or_zero(x: f32) -> f32 {
    if x.is_finite() { x } else { 0.0 }
}

// =============================================================================
// Unit Tests
// =============================================================================
