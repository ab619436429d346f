//! Navigation source selection.
//!
//! [`derive_nav_bundle`] picks nav1, nav2 or GPS according to the HSI source
//! selector and collects everything the CDI, the source label and the
//! glideslope ladder need into one [`NavBundle`]. Both renderers call it at
//! the start of every paint pass; the bundle is never stored.

use core::fmt;

use embedded_graphics::pixelcolor::Rgb565;
use heapless::String;

use crate::colors::{GREEN, MAGENTA};
use crate::debug_log::{LogSink, log_fmt};
use crate::parameters::{FlightState, NavRadio, VNAV_UNAVAILABLE};

/// Longest source label ("VOR1", "LOC2", "GPS").
pub const LABEL_LENGTH: usize = 8;

// =============================================================================
// Decoded Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavSource {
    Nav1,
    Nav2,
    Gps,
}

impl NavSource {
    /// Decode the `hsiSource` selector. Anything but 1 or 2 selects nav1.
    pub const fn from_index(index: i32) -> Self {
        match index {
            2 => Self::Gps,
            1 => Self::Nav2,
            _ => Self::Nav1,
        }
    }

    pub const fn index(self) -> i32 {
        match self {
            Self::Nav1 => 0,
            Self::Nav2 => 1,
            Self::Gps => 2,
        }
    }

    /// Next source in the nav1 → nav2 → GPS cycle.
    pub const fn next(self) -> Self {
        match self {
            Self::Nav1 => Self::Nav2,
            Self::Nav2 => Self::Gps,
            Self::Gps => Self::Nav1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavColor {
    Green,
    Magenta,
}

impl NavColor {
    pub const fn rgb(self) -> Rgb565 {
        match self {
            Self::Green => GREEN,
            Self::Magenta => MAGENTA,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FromTo {
    Off,
    To,
    From,
}

impl FromTo {
    /// Decode the raw flag: 1 to, 2 from, anything else off.
    pub const fn from_code(code: i32) -> Self {
        match code {
            1 => Self::To,
            2 => Self::From,
            _ => Self::Off,
        }
    }
}

/// Badge shown above the glideslope ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalSource {
    Glideslope,
    Vnav,
}

impl VerticalSource {
    pub const fn badge(self) -> &'static str {
        match self {
            Self::Glideslope => "G",
            Self::Vnav => "V",
        }
    }
}

/// A nav receiver type code outside the known set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavDecodeError {
    pub nav_type: i32,
}

impl fmt::Display for NavDecodeError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "failed to decode nav type {}", self.nav_type)
    }
}

// =============================================================================
// Nav Bundle
// =============================================================================

/// Active navigation data for one paint pass.
#[derive(Debug, Clone, PartialEq)]
pub struct NavBundle {
    pub source: NavSource,
    pub label: String<LABEL_LENGTH>,
    pub color: NavColor,
    pub course_deg: f32,
    pub deviation: f32,
    pub from_to: FromTo,
    pub glideslope_available: bool,
    pub glideslope_deviation: f32,
    pub vertical_source: VerticalSource,
    /// GPS sensitivity mode, empty for radio sources.
    pub annunciator: &'static str,
}

/// Select the active source and build its bundle. Never fails; an unknown
/// nav type is logged and shown with an empty label.
pub fn derive_nav_bundle<L: LogSink + ?Sized>(
    state: &FlightState,
    log: &mut L,
) -> NavBundle {
    let source = NavSource::from_index(state.hsi_source);
    match source {
        NavSource::Gps => {
            let gps = &state.gps;
            let mut label = String::new();
            label.push_str("GPS").ok();
            NavBundle {
                source,
                label,
                color: NavColor::Magenta,
                course_deg: gps.course_deg,
                deviation: gps.deviation,
                from_to: FromTo::from_code(gps.from_to),
                glideslope_available: state.gps_vnav_available != VNAV_UNAVAILABLE || gps.glideslope_available,
                glideslope_deviation: gps.glideslope_deviation,
                vertical_source: if gps.glideslope_available {
                    VerticalSource::Glideslope
                } else {
                    VerticalSource::Vnav
                },
                annunciator: annunciator(state.gps_hsi_sensitivity_nm),
            }
        }
        NavSource::Nav2 => radio_bundle(source, &state.nav2, '2', log),
        NavSource::Nav1 => radio_bundle(source, &state.nav1, '1', log),
    }
}

fn radio_bundle<L: LogSink + ?Sized>(
    source: NavSource,
    radio: &NavRadio,
    index: char,
    log: &mut L,
) -> NavBundle {
    let label = match nav_type_label(radio.nav_type, index) {
        Ok(label) => label,
        Err(e) => {
            log_fmt(log, format_args!("{e}"));
            String::new()
        }
    };
    NavBundle {
        source,
        label,
        color: NavColor::Green,
        course_deg: radio.course_deg,
        deviation: radio.deviation,
        from_to: FromTo::from_code(radio.from_to),
        glideslope_available: radio.glideslope_available,
        glideslope_deviation: radio.glideslope_deviation,
        vertical_source: VerticalSource::Glideslope,
        annunciator: "",
    }
}

/// Source label for a receiver type: 0 none, 3 VOR, 4 and above localizer.
pub fn nav_type_label(
    nav_type: i32,
    index: char,
) -> Result<String<LABEL_LENGTH>, NavDecodeError> {
    let prefix = match nav_type {
        0 => return Ok(String::new()),
        3 => "VOR",
        t if t >= 4 => "LOC",
        _ => return Err(NavDecodeError { nav_type }),
    };
    let mut label = String::new();
    label.push_str(prefix).ok();
    label.push(index).ok();
    Ok(label)
}

/// GPS sensitivity annunciator.
///
/// Matching is exact on the rounded sensitivity. Hundredths are checked for
/// the 0.12 NM departure mode, tenths for the others.
/// Anything rounding to 0.12 (0.115 to 0.125 NM) reads DEPT ahead of LNAV.
pub fn annunciator(hsi_sensitivity_nm: f32) -> &'static str {
    if !hsi_sensitivity_nm.is_finite() {
        return "";
    }
    let hundredths = micromath::F32(hsi_sensitivity_nm * 100.0).round().0 as i32;
    let tenths = micromath::F32(hsi_sensitivity_nm * 10.0).round().0 as i32;
    if hundredths == 12 {
        "DEPT"
    } else if tenths <= 1 {
        "LNAV"
    } else if tenths == 4 {
        "TERM"
    } else if tenths == 8 {
        "ENR"
    } else {
        ""
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debug_log::{DebugLog, NullLog};

    #[test]
    fn test_annunciator_thresholds() {
        assert_eq!(annunciator(0.05), "LNAV");
        assert_eq!(annunciator(0.1), "LNAV");
        assert_eq!(annunciator(0.12), "DEPT");
        assert_eq!(annunciator(0.4), "TERM");
        assert_eq!(annunciator(0.8), "ENR");
        assert_eq!(annunciator(0.25), "");
        assert_eq!(annunciator(1.0), "");
        assert_eq!(annunciator(f32::NAN), "");
    }

    #[test]
    fn test_annunciator_band_edges() {
        // DEPT owns 0.115..0.125, the rest of the 0.1 tenth stays LNAV
        assert_eq!(annunciator(0.11), "LNAV");
        assert_eq!(annunciator(0.114), "LNAV");
        assert_eq!(annunciator(0.116), "DEPT");
        assert_eq!(annunciator(0.124), "DEPT");
        assert_eq!(annunciator(0.126), "LNAV");
        assert_eq!(annunciator(0.14), "LNAV");
        assert_eq!(annunciator(0.16), "");
        assert_eq!(annunciator(0.0), "LNAV");
        assert_eq!(annunciator(0.36), "TERM");
        assert_eq!(annunciator(0.44), "TERM");
        assert_eq!(annunciator(0.46), "");
        assert_eq!(annunciator(0.84), "ENR");
    }

    #[test]
    fn test_nav_type_label() {
        assert_eq!(nav_type_label(0, '1').as_deref(), Ok(""));
        assert_eq!(nav_type_label(3, '1').as_deref(), Ok("VOR1"));
        assert_eq!(nav_type_label(4, '2').as_deref(), Ok("LOC2"));
        assert_eq!(nav_type_label(7, '1').as_deref(), Ok("LOC1"));
        assert_eq!(nav_type_label(2, '1'), Err(NavDecodeError { nav_type: 2 }));
        assert_eq!(nav_type_label(-1, '2'), Err(NavDecodeError { nav_type: -1 }));
    }

    #[test]
    fn test_bad_nav_type_logged_and_blank() {
        let mut state = FlightState::new();
        state.nav1.nav_type = 1;
        let mut log = DebugLog::new();
        let bundle = derive_nav_bundle(&state, &mut log);
        assert_eq!(bundle.label.as_str(), "");
        assert_eq!(log.last(), Some("failed to decode nav type 1"));
    }

    #[test]
    fn test_gps_bundle() {
        let mut state = FlightState::new();
        state.hsi_source = 2;
        state.gps.course_deg = 123.0;
        state.gps.deviation = -0.7;
        state.gps.from_to = 1;
        state.gps_hsi_sensitivity_nm = 0.3;
        let bundle = derive_nav_bundle(&state, &mut NullLog);
        assert_eq!(bundle.source, NavSource::Gps);
        assert_eq!(bundle.label.as_str(), "GPS");
        assert_eq!(bundle.color, NavColor::Magenta);
        assert!((bundle.course_deg - 123.0).abs() < f32::EPSILON);
        assert!((bundle.deviation + 0.7).abs() < f32::EPSILON);
        assert_eq!(bundle.from_to, FromTo::To);
        assert_eq!(bundle.annunciator, "TERM");
        assert!(!bundle.glideslope_available);
    }

    #[test]
    fn test_gps_vertical_guidance() {
        let mut state = FlightState::new();
        state.hsi_source = 2;

        state.gps_vnav_available = 0.0;
        let bundle = derive_nav_bundle(&state, &mut NullLog);
        assert!(bundle.glideslope_available);
        assert_eq!(bundle.vertical_source, VerticalSource::Vnav);

        state.gps_vnav_available = VNAV_UNAVAILABLE;
        state.gps.glideslope_available = true;
        let bundle = derive_nav_bundle(&state, &mut NullLog);
        assert!(bundle.glideslope_available);
        assert_eq!(bundle.vertical_source, VerticalSource::Glideslope);
    }

    #[test]
    fn test_radio_bundles() {
        let mut state = FlightState::new();
        state.nav1.nav_type = 3;
        state.nav1.course_deg = 270.0;
        state.nav1.deviation = 0.5;
        state.nav1.from_to = 2;
        state.nav2.nav_type = 4;
        state.nav2.glideslope_available = true;
        state.nav2.glideslope_deviation = 1.25;

        let nav1 = derive_nav_bundle(&state, &mut NullLog);
        assert_eq!(nav1.source, NavSource::Nav1);
        assert_eq!(nav1.label.as_str(), "VOR1");
        assert_eq!(nav1.color, NavColor::Green);
        assert!((nav1.course_deg - 270.0).abs() < f32::EPSILON);
        assert_eq!(nav1.from_to, FromTo::From);
        assert_eq!(nav1.annunciator, "");

        state.hsi_source = 1;
        let nav2 = derive_nav_bundle(&state, &mut NullLog);
        assert_eq!(nav2.label.as_str(), "LOC2");
        assert!(nav2.glideslope_available);
        assert!((nav2.glideslope_deviation - 1.25).abs() < f32::EPSILON);
    }

    #[test]
    fn test_derive_is_total() {
        for source in [-5, 0, 1, 2, 3, i32::MAX] {
            for value in [0.0f32, 1e9, -1e9, f32::MAX, f32::MIN] {
                let mut state = FlightState::new();
                state.hsi_source = source;
                for radio in [&mut state.nav1, &mut state.nav2, &mut state.gps] {
                    radio.nav_type = value as i32;
                    radio.course_deg = value;
                    radio.deviation = value;
                    radio.from_to = value as i32;
                    radio.glideslope_deviation = value;
                }
                state.gps_hsi_sensitivity_nm = value;
                let bundle = derive_nav_bundle(&state, &mut NullLog);
                let expected = match source {
                    1 => NavSource::Nav2,
                    2 => NavSource::Gps,
                    _ => NavSource::Nav1,
                };
                assert_eq!(bundle.source, expected);
            }
        }
    }

    #[test]
    fn test_source_cycle() {
        let mut s = NavSource::Nav1;
        for _ in 0..3 {
            s = s.next();
        }
        assert_eq!(s, NavSource::Nav1);
        assert_eq!(NavSource::from_index(NavSource::Gps.index()), NavSource::Gps);
    }
}
