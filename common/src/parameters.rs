//! Flight parameter store.
//!
//! [`FlightState`] holds one strongly typed field per flight parameter.
//! Updates arrive from the host as `(name, value)` pairs; [`Parameter`] is the
//! closed table of accepted names and [`ParameterStore::apply_batch`] maps each
//! pair onto its field, then requests a single redraw for the whole batch.
//!
//! # Threading
//!
//! The store is not shared. Update producers send batches to the thread that
//! owns the store (the simulator uses a channel), and that thread applies
//! them between paint passes, so a paint never sees a half-applied batch.

use core::fmt;

use crate::debug_log::{LogSink, log_fmt};

// =============================================================================
// Flight State
// =============================================================================

/// Sentinel the host sends in `gpsvnavavailable` when no VNAV path exists.
pub const VNAV_UNAVAILABLE: f32 = -1000.0;

/// Per-source navigation fields (nav1, nav2 and GPS).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavRadio {
    /// Raw receiver type code: 0 none, 3 VOR, 4 and up localizer.
    pub nav_type: i32,
    pub course_deg: f32,
    /// Lateral deviation in dots; full scale is about ±2.
    pub deviation: f32,
    /// Raw from/to code: 0 off, 1 to, 2 from.
    pub from_to: i32,
    pub glideslope_available: bool,
    pub glideslope_deviation: f32,
}

impl NavRadio {
    pub const fn new() -> Self {
        Self {
            nav_type: 0,
            course_deg: 0.0,
            deviation: 0.0,
            from_to: 0,
            glideslope_available: false,
            glideslope_deviation: 0.0,
        }
    }
}

impl Default for NavRadio {
    fn default() -> Self { Self::new() }
}

/// Complete parameter snapshot read by both renderers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightState {
    // Attitude
    pub roll_deg: f32,
    pub pitch_deg: f32,

    // Air data
    pub kias: f32,
    /// Airspeed change per second, projected by the trend bar.
    pub kias_delta: f32,
    pub ktas: f32,
    pub ground_speed_ms: f32,
    pub altitude_ft: f32,
    pub alt_setting_inhg: f32,
    pub vertical_speed_fpm: f32,

    // Heading and track
    pub mag_heading_deg: f32,
    pub ground_track_deg: f32,
    pub heading_bug_deg: f32,

    // Turn and slip
    pub turn_rate: f32,
    pub slip: f32,

    // Wind
    pub wind_direction_deg: f32,
    pub wind_speed_ms: f32,

    // Navigation
    pub nav1: NavRadio,
    pub nav2: NavRadio,
    pub gps: NavRadio,
    pub gps_distance_nm: f32,
    pub gps_hsi_sensitivity_nm: f32,
    pub gps_vnav_available: f32,

    // Mode selectors
    /// 0 nav1, 1 nav2, 2 GPS.
    pub hsi_source: i32,
    pub avionics_powered: bool,

    // Reference speeds
    pub v_stall: f32,
    pub v_stall_landing: f32,
    pub v_flaps_extended: f32,
    pub v_normal_operating: f32,
    pub v_never_exceed: f32,
}

impl FlightState {
    /// Power-on defaults: standard altimeter setting, a light single's
    /// V-speeds, everything else zero and the avionics switched off.
    pub const fn new() -> Self {
        Self {
            roll_deg: 0.0,
            pitch_deg: 0.0,
            kias: 0.0,
            kias_delta: 0.0,
            ktas: 0.0,
            ground_speed_ms: 0.0,
            altitude_ft: 0.0,
            alt_setting_inhg: 29.92,
            vertical_speed_fpm: 0.0,
            mag_heading_deg: 0.0,
            ground_track_deg: 0.0,
            heading_bug_deg: 0.0,
            turn_rate: 0.0,
            slip: 0.0,
            wind_direction_deg: 0.0,
            wind_speed_ms: 0.0,
            nav1: NavRadio::new(),
            nav2: NavRadio::new(),
            gps: NavRadio::new(),
            gps_distance_nm: 0.0,
            gps_hsi_sensitivity_nm: 0.0,
            gps_vnav_available: VNAV_UNAVAILABLE,
            hsi_source: 0,
            avionics_powered: false,
            v_stall: 23.0,
            v_stall_landing: 23.0,
            v_flaps_extended: 88.0,
            v_normal_operating: 118.0,
            v_never_exceed: 127.0,
        }
    }

    /// Write one parameter. Integer and flag fields take the truncated code;
    /// any non-zero value switches a flag on.
    pub fn set(
        &mut self,
        param: Parameter,
        value: f32,
    ) {
        let code = code_of(value);
        let flag = value != 0.0;
        match param {
            Parameter::GpsDistance => self.gps_distance_nm = value,
            Parameter::GpsHsiSensitivity => self.gps_hsi_sensitivity_nm = value,
            Parameter::Nav1Type => self.nav1.nav_type = code,
            Parameter::Nav2Type => self.nav2.nav_type = code,
            Parameter::GpsType => self.gps.nav_type = code,
            Parameter::AvionicsOn => self.avionics_powered = flag,
            Parameter::HsiSource => self.hsi_source = code,
            Parameter::Nav1FromTo => self.nav1.from_to = code,
            Parameter::Nav2FromTo => self.nav2.from_to = code,
            Parameter::GpsFromTo => self.gps.from_to = code,
            Parameter::Nav1Course => self.nav1.course_deg = value,
            Parameter::Nav1GlideslopeAvailable => self.nav1.glideslope_available = flag,
            Parameter::Nav1Glideslope => self.nav1.glideslope_deviation = value,
            Parameter::Nav2Course => self.nav2.course_deg = value,
            Parameter::GpsCourse => self.gps.course_deg = value,
            Parameter::Nav2GlideslopeAvailable => self.nav2.glideslope_available = flag,
            Parameter::Nav2Glideslope => self.nav2.glideslope_deviation = value,
            Parameter::Nav1Deviation => self.nav1.deviation = value,
            Parameter::Nav2Deviation => self.nav2.deviation = value,
            Parameter::GpsDeviation => self.gps.deviation = value,
            Parameter::GpsGlideslopeAvailable => self.gps.glideslope_available = flag,
            Parameter::GpsVnavAvailable => self.gps_vnav_available = value,
            Parameter::GpsGlideslope => self.gps.glideslope_deviation = value,
            Parameter::GroundTrack => self.ground_track_deg = value,
            Parameter::MagHeading => self.mag_heading_deg = value,
            Parameter::WindDirection => self.wind_direction_deg = value,
            Parameter::WindSpeed => self.wind_speed_ms = value,
            Parameter::RollAngle => self.roll_deg = value,
            Parameter::PitchAngle => self.pitch_deg = value,
            Parameter::GroundSpeed => self.ground_speed_ms = value,
            Parameter::Kias => self.kias = value,
            Parameter::KiasDelta => self.kias_delta = value,
            Parameter::Ktas => self.ktas = value,
            Parameter::Altitude => self.altitude_ft = value,
            Parameter::AltSetting => self.alt_setting_inhg = value,
            Parameter::VerticalSpeed => self.vertical_speed_fpm = value,
            Parameter::TurnRate => self.turn_rate = value,
            Parameter::Slip => self.slip = value,
            Parameter::HeadingBug => self.heading_bug_deg = value,
            Parameter::VStall => self.v_stall = value,
            Parameter::VStallLanding => self.v_stall_landing = value,
            Parameter::VFlapsExtended => self.v_flaps_extended = value,
            Parameter::VNormalOperating => self.v_normal_operating = value,
            Parameter::VNeverExceed => self.v_never_exceed = value,
        }
    }

    /// Read one parameter back in its wire representation.
    pub fn get(
        &self,
        param: Parameter,
    ) -> f32 {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        match param {
            Parameter::GpsDistance => self.gps_distance_nm,
            Parameter::GpsHsiSensitivity => self.gps_hsi_sensitivity_nm,
            Parameter::Nav1Type => self.nav1.nav_type as f32,
            Parameter::Nav2Type => self.nav2.nav_type as f32,
            Parameter::GpsType => self.gps.nav_type as f32,
            Parameter::AvionicsOn => flag(self.avionics_powered),
            Parameter::HsiSource => self.hsi_source as f32,
            Parameter::Nav1FromTo => self.nav1.from_to as f32,
            Parameter::Nav2FromTo => self.nav2.from_to as f32,
            Parameter::GpsFromTo => self.gps.from_to as f32,
            Parameter::Nav1Course => self.nav1.course_deg,
            Parameter::Nav1GlideslopeAvailable => flag(self.nav1.glideslope_available),
            Parameter::Nav1Glideslope => self.nav1.glideslope_deviation,
            Parameter::Nav2Course => self.nav2.course_deg,
            Parameter::GpsCourse => self.gps.course_deg,
            Parameter::Nav2GlideslopeAvailable => flag(self.nav2.glideslope_available),
            Parameter::Nav2Glideslope => self.nav2.glideslope_deviation,
            Parameter::Nav1Deviation => self.nav1.deviation,
            Parameter::Nav2Deviation => self.nav2.deviation,
            Parameter::GpsDeviation => self.gps.deviation,
            Parameter::GpsGlideslopeAvailable => flag(self.gps.glideslope_available),
            Parameter::GpsVnavAvailable => self.gps_vnav_available,
            Parameter::GpsGlideslope => self.gps.glideslope_deviation,
            Parameter::GroundTrack => self.ground_track_deg,
            Parameter::MagHeading => self.mag_heading_deg,
            Parameter::WindDirection => self.wind_direction_deg,
            Parameter::WindSpeed => self.wind_speed_ms,
            Parameter::RollAngle => self.roll_deg,
            Parameter::PitchAngle => self.pitch_deg,
            Parameter::GroundSpeed => self.ground_speed_ms,
            Parameter::Kias => self.kias,
            Parameter::KiasDelta => self.kias_delta,
            Parameter::Ktas => self.ktas,
            Parameter::Altitude => self.altitude_ft,
            Parameter::AltSetting => self.alt_setting_inhg,
            Parameter::VerticalSpeed => self.vertical_speed_fpm,
            Parameter::TurnRate => self.turn_rate,
            Parameter::Slip => self.slip,
            Parameter::HeadingBug => self.heading_bug_deg,
            Parameter::VStall => self.v_stall,
            Parameter::VStallLanding => self.v_stall_landing,
            Parameter::VFlapsExtended => self.v_flaps_extended,
            Parameter::VNormalOperating => self.v_normal_operating,
            Parameter::VNeverExceed => self.v_never_exceed,
        }
    }
}

impl Default for FlightState {
    fn default() -> Self { Self::new() }
}

/// Integer code for a float parameter, truncated toward zero like the host
/// plugin's `int()`. Out-of-range values saturate and NaN reads as 0.
fn code_of(value: f32) -> i32 { value as i32 }

// =============================================================================
// Parameter Names
// =============================================================================

/// Every parameter accepted by the update path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    GpsDistance,
    GpsHsiSensitivity,
    Nav1Type,
    Nav2Type,
    GpsType,
    AvionicsOn,
    HsiSource,
    Nav1FromTo,
    Nav2FromTo,
    GpsFromTo,
    Nav1Course,
    Nav1GlideslopeAvailable,
    Nav1Glideslope,
    Nav2Course,
    GpsCourse,
    Nav2GlideslopeAvailable,
    Nav2Glideslope,
    Nav1Deviation,
    Nav2Deviation,
    GpsDeviation,
    GpsGlideslopeAvailable,
    GpsVnavAvailable,
    GpsGlideslope,
    GroundTrack,
    MagHeading,
    WindDirection,
    WindSpeed,
    RollAngle,
    PitchAngle,
    GroundSpeed,
    Kias,
    KiasDelta,
    Ktas,
    Altitude,
    AltSetting,
    VerticalSpeed,
    TurnRate,
    Slip,
    HeadingBug,
    VStall,
    VStallLanding,
    VFlapsExtended,
    VNormalOperating,
    VNeverExceed,
}

impl Parameter {
    /// All parameters in host table order.
    pub const ALL: [Self; 44] = [
        Self::GpsDistance,
        Self::GpsHsiSensitivity,
        Self::Nav1Type,
        Self::Nav2Type,
        Self::GpsType,
        Self::AvionicsOn,
        Self::HsiSource,
        Self::Nav1FromTo,
        Self::Nav2FromTo,
        Self::GpsFromTo,
        Self::Nav1Course,
        Self::Nav1GlideslopeAvailable,
        Self::Nav1Glideslope,
        Self::Nav2Course,
        Self::GpsCourse,
        Self::Nav2GlideslopeAvailable,
        Self::Nav2Glideslope,
        Self::Nav1Deviation,
        Self::Nav2Deviation,
        Self::GpsDeviation,
        Self::GpsGlideslopeAvailable,
        Self::GpsVnavAvailable,
        Self::GpsGlideslope,
        Self::GroundTrack,
        Self::MagHeading,
        Self::WindDirection,
        Self::WindSpeed,
        Self::RollAngle,
        Self::PitchAngle,
        Self::GroundSpeed,
        Self::Kias,
        Self::KiasDelta,
        Self::Ktas,
        Self::Altitude,
        Self::AltSetting,
        Self::VerticalSpeed,
        Self::TurnRate,
        Self::Slip,
        Self::HeadingBug,
        Self::VStall,
        Self::VStallLanding,
        Self::VFlapsExtended,
        Self::VNormalOperating,
        Self::VNeverExceed,
    ];

    /// Host-side identifier.
    pub const fn name(self) -> &'static str {
        match self {
            Self::GpsDistance => "gpsdmedist",
            Self::GpsHsiSensitivity => "gpshsisens",
            Self::Nav1Type => "nav1type",
            Self::Nav2Type => "nav2type",
            Self::GpsType => "gpstype",
            Self::AvionicsOn => "avionicson",
            Self::HsiSource => "hsiSource",
            Self::Nav1FromTo => "nav1fromto",
            Self::Nav2FromTo => "nav2fromto",
            Self::GpsFromTo => "gpsfromto",
            Self::Nav1Course => "nav1crs",
            Self::Nav1GlideslopeAvailable => "nav1gsavailable",
            Self::Nav1Glideslope => "nav1gs",
            Self::Nav2Course => "nav2crs",
            Self::GpsCourse => "gpscrs",
            Self::Nav2GlideslopeAvailable => "nav2gsavailable",
            Self::Nav2Glideslope => "nav2gs",
            Self::Nav1Deviation => "nav1dft",
            Self::Nav2Deviation => "nav2dft",
            Self::GpsDeviation => "gpsdft",
            Self::GpsGlideslopeAvailable => "gpsgsavailable",
            Self::GpsVnavAvailable => "gpsvnavavailable",
            Self::GpsGlideslope => "gpsgs",
            Self::GroundTrack => "groundTrack",
            Self::MagHeading => "magHeading",
            Self::WindDirection => "windDirection",
            Self::WindSpeed => "windSpeed",
            Self::RollAngle => "rollAngle",
            Self::PitchAngle => "pitchAngle",
            Self::GroundSpeed => "gs",
            Self::Kias => "kias",
            Self::KiasDelta => "kiasDelta",
            Self::Ktas => "ktas",
            Self::Altitude => "altitude",
            Self::AltSetting => "alt_setting",
            Self::VerticalSpeed => "vh_ind_fpm",
            Self::TurnRate => "turnRate",
            Self::Slip => "slip",
            Self::HeadingBug => "headingBug",
            Self::VStall => "vs",
            Self::VStallLanding => "vs0",
            Self::VFlapsExtended => "vfe",
            Self::VNormalOperating => "vno",
            Self::VNeverExceed => "vne",
        }
    }

    /// Look up a host-side identifier. Names are case sensitive.
    pub fn from_name(name: &str) -> Option<Self> { Self::ALL.iter().copied().find(|p| p.name() == name) }
}

impl fmt::Display for Parameter {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Update Errors
// =============================================================================

/// Reason a single `(name, value)` pair was skipped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpdateError<'a> {
    UnknownParameter(&'a str),
    NonFinite(Parameter, f32),
}

impl fmt::Display for UpdateError<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::UnknownParameter(name) => write!(f, "unknown parameter: {name}"),
            Self::NonFinite(param, value) => write!(f, "non-finite {param}: {value}"),
        }
    }
}

/// Outcome of one [`ParameterStore::apply_batch`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub applied: u32,
    pub rejected: u32,
}

// =============================================================================
// Parameter Store
// =============================================================================

/// Owner of the live [`FlightState`] plus a coalescing redraw flag.
#[derive(Debug, Clone, Default)]
pub struct ParameterStore {
    state: FlightState,
    redraw_pending: bool,
}

impl ParameterStore {
    pub const fn new() -> Self { Self { state: FlightState::new(), redraw_pending: false } }

    /// Current snapshot for the paint path.
    #[inline]
    pub const fn state(&self) -> &FlightState { &self.state }

    /// Validate and apply one update.
    pub fn apply<'a>(
        &mut self,
        name: &'a str,
        value: f32,
    ) -> Result<Parameter, UpdateError<'a>> {
        let param = Parameter::from_name(name).ok_or(UpdateError::UnknownParameter(name))?;
        if !value.is_finite() {
            return Err(UpdateError::NonFinite(param, value));
        }
        self.state.set(param, value);
        Ok(param)
    }

    /// Apply a batch of `(name, value)` pairs.
    ///
    /// Bad pairs are logged and skipped. One redraw is requested for the
    /// batch if at least one pair was applied.
    pub fn apply_batch<'a, I, L>(
        &mut self,
        batch: I,
        log: &mut L,
    ) -> BatchReport
    where
        I: IntoIterator<Item = (&'a str, f32)>,
        L: LogSink + ?Sized,
    {
        let mut report = BatchReport::default();
        for (name, value) in batch {
            match self.apply(name, value) {
                Ok(_) => report.applied += 1,
                Err(e) => {
                    report.rejected += 1;
                    log_fmt(log, format_args!("{e}"));
                }
            }
        }
        if report.applied > 0 {
            self.request_redraw();
        }
        report
    }

    /// Ask for a repaint at the next opportunity. Repeated requests before
    /// the next [`take_redraw`](Self::take_redraw) collapse into one.
    #[inline]
    pub fn request_redraw(&mut self) { self.redraw_pending = true; }

    /// Consume the pending redraw request, if any.
    #[inline]
    pub fn take_redraw(&mut self) -> bool { core::mem::take(&mut self.redraw_pending) }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debug_log::DebugLog;

    #[test]
    fn test_defaults() {
        let s = FlightState::default();
        assert!((s.alt_setting_inhg - 29.92).abs() < 1e-4);
        assert!((s.v_stall - 23.0).abs() < f32::EPSILON);
        assert!((s.v_flaps_extended - 88.0).abs() < f32::EPSILON);
        assert!((s.v_normal_operating - 118.0).abs() < f32::EPSILON);
        assert!((s.v_never_exceed - 127.0).abs() < f32::EPSILON);
        assert!(!s.avionics_powered);
        assert_eq!(s.hsi_source, 0);
    }

    #[test]
    fn test_names_unique_and_round_trip() {
        for (i, p) in Parameter::ALL.iter().enumerate() {
            assert_eq!(Parameter::from_name(p.name()), Some(*p));
            for q in &Parameter::ALL[i + 1..] {
                assert_ne!(p.name(), q.name());
            }
        }
        assert_eq!(Parameter::from_name("KIAS"), None);
    }

    #[test]
    fn test_set_get_round_trip() {
        let mut s = FlightState::new();
        for (i, p) in Parameter::ALL.iter().enumerate() {
            let value = (i + 1) as f32;
            s.set(*p, value);
            let back = s.get(*p);
            match p {
                Parameter::AvionicsOn
                | Parameter::Nav1GlideslopeAvailable
                | Parameter::Nav2GlideslopeAvailable
                | Parameter::GpsGlideslopeAvailable => assert!((back - 1.0).abs() < f32::EPSILON),
                _ => assert!((back - value).abs() < f32::EPSILON, "{p} read back {back}"),
            }
        }
    }

    #[test]
    fn test_integer_codes_truncate() {
        let mut s = FlightState::new();
        s.set(Parameter::Nav1Type, 2.9);
        assert_eq!(s.nav1.nav_type, 2);
        s.set(Parameter::Nav2Type, 3.99);
        assert_eq!(s.nav2.nav_type, 3);
        s.set(Parameter::HsiSource, 1.2);
        assert_eq!(s.hsi_source, 1);
        s.set(Parameter::Nav1FromTo, -0.7);
        assert_eq!(s.nav1.from_to, 0);
        s.set(Parameter::GpsType, 1e12);
        assert_eq!(s.gps.nav_type, i32::MAX);
    }

    #[test]
    fn test_apply_batch_coalesces_redraw() {
        let mut store = ParameterStore::new();
        let mut log = DebugLog::new();
        assert!(!store.take_redraw());

        let report = store.apply_batch([("kias", 95.0), ("rollAngle", -12.0), ("altitude", 4500.0)], &mut log);
        assert_eq!(report, BatchReport { applied: 3, rejected: 0 });
        assert!((store.state().kias - 95.0).abs() < f32::EPSILON);
        assert!((store.state().roll_deg + 12.0).abs() < f32::EPSILON);

        assert!(store.take_redraw());
        assert!(!store.take_redraw());
        assert!(log.is_empty());
    }

    #[test]
    fn test_apply_batch_skips_bad_pairs() {
        let mut store = ParameterStore::new();
        let mut log = DebugLog::new();

        let report = store.apply_batch([("bogus", 1.0), ("kias", f32::NAN), ("ktas", 101.0)], &mut log);
        assert_eq!(report, BatchReport { applied: 1, rejected: 2 });
        assert!((store.state().ktas - 101.0).abs() < f32::EPSILON);
        assert!(store.state().kias.abs() < f32::EPSILON);

        let lines: Vec<&str> = log.iter().collect();
        assert_eq!(lines, ["unknown parameter: bogus", "non-finite kias: NaN"]);
    }

    #[test]
    fn test_rejected_batch_requests_no_redraw() {
        let mut store = ParameterStore::new();
        let report = store.apply_batch([("nope", 0.0)], &mut crate::debug_log::NullLog);
        assert_eq!(report.applied, 0);
        assert!(!store.take_redraw());
    }

    #[test]
    fn test_manual_redraw_request() {
        let mut store = ParameterStore::new();
        store.request_redraw();
        store.request_redraw();
        assert!(store.take_redraw());
        assert!(!store.take_redraw());
    }
}
