//! Display geometry and unit conversion constants.
//!
//! Each instrument paints into a fixed 480×360 logical canvas. The desktop
//! host stacks the two canvases vertically with no spacing.

/// Instrument canvas width in logical pixels.
pub const G5_WIDTH: u32 = 480;

/// Instrument canvas height in logical pixels.
pub const G5_HEIGHT: u32 = 360;

/// Height of the attitude-over-HSI stacked view.
pub const STACK_HEIGHT: u32 = G5_HEIGHT * 2;

/// Canvas width as `f32` for layout arithmetic.
pub const WIDTH: f32 = G5_WIDTH as f32;

/// Canvas height as `f32` for layout arithmetic.
pub const HEIGHT: f32 = G5_HEIGHT as f32;

/// Horizontal canvas center.
pub const CENTER_X: f32 = WIDTH / 2.0;

/// Vertical canvas center.
pub const CENTER_Y: f32 = HEIGHT / 2.0;

/// Canvas diagonal (exactly 600 for 480×360). Used to size the ground plane
/// so it covers the canvas at any roll angle.
pub const DIAGONAL: f32 = 600.0;

/// Meters per second to knots.
pub const MS_TO_KT: f32 = 1.943_84;

const _: () = assert!(DIAGONAL * DIAGONAL == WIDTH * WIDTH + HEIGHT * HEIGHT);
const _: () = assert!(STACK_HEIGHT == 720);
