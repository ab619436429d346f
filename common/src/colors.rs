//! Color palette for both instruments.
//!
//! Standard colors come from the `RgbColor` trait constants. Instrument
//! specific shades are given as 8-bit RGB and packed to Rgb565 at compile
//! time with [`rgb`].

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

/// Pack 8-bit RGB components into Rgb565 (5-6-5 bits).
pub const fn rgb(
    r: u8,
    g: u8,
    b: u8,
) -> Rgb565 {
    Rgb565::new(r >> 3, g >> 2, b >> 3)
}

// =============================================================================
// Standard Colors
// =============================================================================

pub const BLACK: Rgb565 = Rgb565::BLACK;
pub const WHITE: Rgb565 = Rgb565::WHITE;
pub const RED: Rgb565 = Rgb565::RED;
pub const GREEN: Rgb565 = Rgb565::GREEN;
pub const YELLOW: Rgb565 = Rgb565::YELLOW;
pub const CYAN: Rgb565 = Rgb565::CYAN;

/// GPS navigation color, also used for trend and turn-rate bars.
pub const MAGENTA: Rgb565 = Rgb565::MAGENTA;

// =============================================================================
// Instrument Colors
// =============================================================================

/// Box frames, the inner HSI circle and the glideslope ladder.
pub const GREY: Rgb565 = rgb(128, 128, 128);

/// Sky at the top of the attitude display.
pub const SKY_HIGH: Rgb565 = rgb(0, 50, 200);

/// Sky at the bottom of the attitude display.
pub const SKY_LOW: Rgb565 = rgb(0, 255, 255);

/// Ground right at the horizon line.
pub const GROUND_NEAR: Rgb565 = rgb(152, 103, 45);

/// Ground far below the horizon.
pub const GROUND_FAR: Rgb565 = rgb(255, 222, 173);

/// Darker half of the aircraft symbol.
pub const SYMBOL_SHADE: Rgb565 = rgb(0x7E, 0x7E, 0x34);

/// Turn-rate scale lines (black at half opacity over the sky).
pub const TURN_SCALE: Rgb565 = rgb(64, 64, 64);

/// Turn-rate end stops (white at half opacity).
pub const TURN_STOP: Rgb565 = rgb(190, 190, 190);

/// Slip indicator reference markers.
pub const SLIP_MARKER: Rgb565 = rgb(220, 220, 220);

/// Slip ball highlight (gradient center).
pub const BALL_HIGHLIGHT: Rgb565 = rgb(255, 255, 255);

/// Slip ball rim (gradient edge).
pub const BALL_RIM: Rgb565 = rgb(160, 160, 160);

// =============================================================================
// Color Interpolation
// =============================================================================

/// Linear interpolation between two Rgb565 colors, `t` in `[0, 1]`.
///
/// Works on the raw 5-6-5 components with 8-bit fixed-point weights, so the
/// result never leaves the channel range. `t` outside `[0, 1]` is clamped and
/// NaN is treated as 0.
pub fn lerp_rgb565(
    from: Rgb565,
    to: Rgb565,
    t: f32,
) -> Rgb565 {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let t_fixed = (t * 256.0) as i32;

    let mix = |a: u8, b: u8| -> u8 {
        let a = i32::from(a);
        let b = i32::from(b);
        (a + (((b - a) * t_fixed) >> 8)) as u8
    };

    Rgb565::new(mix(from.r(), to.r()), mix(from.g(), to.g()), mix(from.b(), to.b()))
}
