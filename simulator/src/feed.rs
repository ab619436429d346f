//! Demo parameter feed.
//!
//! Stands in for the flight simulator plugin: a background thread sweeps the
//! flight parameters with slow sine signals and sends one update batch per
//! [`FEED_PERIOD`] over a channel. The render thread drains the channel each
//! frame and applies the batches through `ParameterStore::apply_batch`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use g5_common::config::MS_TO_KT;

use crate::timing::FEED_PERIOD;

/// One update batch of `(parameter name, value)` pairs.
pub type Batch = Vec<(&'static str, f32)>;

/// Settings sent once at startup: avionics on, a localizer with glideslope
/// on NAV1, a VOR on NAV2 and a GPS in terminal mode.
pub fn startup_batch() -> Batch {
    vec![
        ("avionicson", 1.0),
        ("nav1type", 4.0),
        ("nav1crs", 90.0),
        ("nav1fromto", 1.0),
        ("nav1gsavailable", 1.0),
        ("nav2type", 3.0),
        ("nav2crs", 220.0),
        ("nav2fromto", 2.0),
        ("gpscrs", 45.0),
        ("gpsfromto", 1.0),
        ("gpshsisens", 0.4),
        ("gpsvnavavailable", 1.0),
        ("headingBug", 120.0),
        ("alt_setting", 29.92),
    ]
}

/// Sample the demo flight at time `t` seconds.
pub fn demo_batch(t: f32) -> Batch {
    let roll = fake_signal(t, -25.0, 25.0, 0.3);
    let kias = fake_signal(t, 60.0, 130.0, 0.1);
    let ktas = kias * 1.05;
    let heading = (t * 3.0).rem_euclid(360.0);

    vec![
        ("rollAngle", roll),
        ("pitchAngle", fake_signal(t, -8.0, 12.0, 0.2)),
        ("kias", kias),
        // Quarter period ahead: the derivative of the kias sweep
        ("kiasDelta", fake_signal(t + 15.7, -2.0, 2.0, 0.1)),
        ("ktas", ktas),
        ("gs", ktas / MS_TO_KT),
        ("altitude", fake_signal(t, 2500.0, 4500.0, 0.05)),
        ("vh_ind_fpm", fake_signal(t + 31.4, -1000.0, 1000.0, 0.05)),
        ("magHeading", heading),
        ("groundTrack", (heading + 5.0).rem_euclid(360.0)),
        ("windDirection", fake_signal(t, 240.0, 300.0, 0.02)),
        ("windSpeed", fake_signal(t, 2.0, 12.0, 0.07)),
        ("turnRate", roll * 1.2),
        ("slip", fake_signal(t, -0.6, 0.6, 0.4)),
        ("nav1dft", fake_signal(t, -2.5, 2.5, 0.15)),
        ("nav1gs", fake_signal(t, -2.5, 2.5, 0.12)),
        ("nav2dft", fake_signal(t, -1.5, 1.5, 0.09)),
        ("gpsdft", fake_signal(t, -2.0, 2.0, 0.11)),
        ("gpsgs", fake_signal(t, -2.5, 2.5, 0.08)),
        ("gpsdmedist", fake_signal(t, 0.5, 25.0, 0.03)),
    ]
}

/// Start the feed thread. It stops sending while `frozen` is set and exits
/// once the receiving side is gone.
pub fn spawn(
    tx: Sender<Batch>,
    frozen: Arc<AtomicBool>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let step = FEED_PERIOD.as_secs_f32();
        let mut t = 0.0f32;
        loop {
            if !frozen.load(Ordering::Relaxed) {
                if tx.send(demo_batch(t)).is_err() {
                    return;
                }
                t += step;
            }
            thread::sleep(FEED_PERIOD);
        }
    })
}

fn fake_signal(
    t: f32,
    min: f32,
    max: f32,
    freq: f32,
) -> f32 {
    let normalized = (t * freq).sin().mul_add(0.5, 0.5);
    min + normalized * (max - min)
}
