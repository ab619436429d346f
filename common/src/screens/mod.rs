//! Instrument screens.
//!
//! # Paint Passes
//!
//! - **Attitude** ([`paint_attitude`]): horizon, pitch ladder, roll scale,
//!   airspeed/altitude/vertical-speed tapes, turn coordinator and slip ball
//! - **HSI** ([`paint_hsi`]): compass rose, heading bug, CDI, readout boxes
//!
//! Each pass redraws the full 480×360 canvas from the [`FlightState`]
//! snapshot it is given; nothing is carried over between frames. With the
//! avionics switched off both passes draw only the powered-off screen.
//!
//! [`FlightState`]: crate::parameters::FlightState

mod attitude;
mod hsi;

use core::fmt::{self, Write};

use heapless::String;

pub use attitude::{AI_GLIDESLOPE, paint_attitude};
pub use hsi::{HSI_CENTER_Y, HSI_GLIDESLOPE, paint_hsi};

/// Longest readout string ("TAS 120 kt").
pub(crate) const READOUT_LENGTH: usize = 16;

/// Format a readout into a fixed buffer. Text that does not fit is cut.
pub(crate) fn readout(args: fmt::Arguments<'_>) -> String<READOUT_LENGTH> {
    let mut s = String::new();
    s.write_fmt(args).ok();
    s
}

/// Whole-unit value for a readout, truncated toward zero like the
/// instrument. Non-finite values read 0.
#[inline]
pub(crate) fn whole(v: f32) -> i32 { if v.is_finite() { v as i32 } else { 0 } }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readout_formats() {
        assert_eq!(readout(format_args!("{:03}", whole(7.9))).as_str(), "007");
        assert_eq!(readout(format_args!("{:05}", whole(-35.2))).as_str(), "-0035");
        assert_eq!(readout(format_args!("{:.2}", 29.92f32)).as_str(), "29.92");
        assert_eq!(whole(f32::NAN), 0);
    }

    #[test]
    fn test_readout_truncates_on_overflow() {
        // write_fmt stops at the first segment that does not fit
        let s = readout(format_args!("{}", "0123456789abcdefXYZ"));
        assert!(s.len() <= READOUT_LENGTH);
    }
}
