//! G5 panel simulator for desktop.
//!
//! Opens a 480×720 window with the attitude indicator on top and the HSI
//! below, fed by a demo parameter thread in place of the flight simulator
//! plugin.
//!
//! # Keys
//!
//! | Key | Action                         |
//! |-----|--------------------------------|
//! | `P` | Toggle avionics power          |
//! | `S` | Cycle HSI source NAV1/NAV2/GPS |
//! | `D` | Toggle the debug page          |
//! | `F` | Freeze/unfreeze the demo feed  |

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

mod feed;
mod popup;
mod profiling;
mod screens;
mod timing;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics_simulator::sdl2::Keycode;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};
use g5_common::colors::BLACK;
use g5_common::config::{G5_HEIGHT, G5_WIDTH, STACK_HEIGHT};
use g5_common::nav::NavSource;
use g5_common::screens::{paint_attitude, paint_hsi};
use g5_common::widgets::{draw_power_popup, draw_source_popup};
use g5_common::{DebugLog, Parameter, ParameterStore};

use crate::feed::Batch;
use crate::popup::Popup;
use crate::profiling::ProfilingMetrics;
use crate::screens::{DebugView, draw_debug_page};
use crate::timing::FRAME_TIME;

/// Attitude indicator half of the window.
const ATTITUDE_AREA: Rectangle = Rectangle::new(Point::zero(), Size::new(G5_WIDTH, G5_HEIGHT));

/// HSI half of the window, directly below the attitude indicator.
const HSI_AREA: Rectangle = Rectangle::new(Point::new(0, G5_HEIGHT as i32), Size::new(G5_WIDTH, G5_HEIGHT));

/// Popups are centered on the attitude indicator.
const POPUP_CENTER: Point = Point::new(G5_WIDTH as i32 / 2, G5_HEIGHT as i32 / 2);

fn main() {
    let mut display: SimulatorDisplay<Rgb565> = SimulatorDisplay::new(Size::new(G5_WIDTH, STACK_HEIGHT));
    let output_settings = OutputSettingsBuilder::new().scale(1).build();
    let mut window = Window::new("G5 Sim", &output_settings);

    display.clear(BLACK).ok();
    window.update(&display);

    let mut store = ParameterStore::new();
    let mut metrics = ProfilingMetrics::new();
    let mut debug_log = DebugLog::new();
    debug_log.push("System started");

    let report = store.apply_batch(feed::startup_batch(), &mut debug_log);
    metrics.record_batch(report);

    let (tx, rx) = mpsc::channel::<Batch>();
    let frozen = Arc::new(AtomicBool::new(false));
    let _feed = feed::spawn(tx, Arc::clone(&frozen));

    // UI state
    let mut active_popup: Option<Popup> = None;
    let mut show_debug = false;
    let mut last_fps_calc = Instant::now();
    let mut fps_frame_count = 0u32;
    let mut current_fps = 0.0f32;

    loop {
        let frame_start = Instant::now();

        for ev in window.events() {
            match ev {
                SimulatorEvent::Quit => return,
                SimulatorEvent::KeyDown { keycode, repeat, .. } => {
                    if repeat {
                        continue;
                    }
                    match keycode {
                        Keycode::P => {
                            let powered = !store.state().avionics_powered;
                            let value = if powered { 1.0 } else { 0.0 };
                            let report = store.apply_batch([(Parameter::AvionicsOn.name(), value)], &mut debug_log);
                            metrics.record_batch(report);
                            active_popup = Some(Popup::Power(Instant::now()));
                            debug_log.push(if powered { "Avionics: ON" } else { "Avionics: OFF" });
                        }
                        Keycode::S => {
                            let source = NavSource::from_index(store.state().hsi_source).next();
                            let report = store
                                .apply_batch([(Parameter::HsiSource.name(), source.index() as f32)], &mut debug_log);
                            metrics.record_batch(report);
                            active_popup = Some(Popup::Source(Instant::now()));
                            debug_log.push(match source {
                                NavSource::Nav1 => "Source: NAV1",
                                NavSource::Nav2 => "Source: NAV2",
                                NavSource::Gps => "Source: GPS",
                            });
                        }
                        Keycode::D => {
                            show_debug = !show_debug;
                            store.request_redraw();
                            debug_log.push(if show_debug { "Page: Debug" } else { "Page: Instruments" });
                        }
                        Keycode::F => {
                            let now_frozen = !frozen.load(Ordering::Relaxed);
                            frozen.store(now_frozen, Ordering::Relaxed);
                            debug_log.push(if now_frozen { "Feed: FROZEN" } else { "Feed: RUNNING" });
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        // Apply everything the feed sent since the last frame
        while let Ok(batch) = rx.try_recv() {
            let report = store.apply_batch(batch, &mut debug_log);
            metrics.record_batch(report);
        }

        if let Some(ref popup) = active_popup
            && popup.is_expired()
        {
            active_popup = None;
            store.request_redraw();
        }

        fps_frame_count += 1;
        if last_fps_calc.elapsed().as_secs() >= 1 {
            current_fps = fps_frame_count as f32 / last_fps_calc.elapsed().as_secs_f32();
            fps_frame_count = 0;
            last_fps_calc = Instant::now();
        }

        if show_debug {
            let view = DebugView {
                state: store.state(),
                log: &debug_log,
                fps: current_fps,
                frozen: frozen.load(Ordering::Relaxed),
            };
            draw_debug_page(&mut display, &metrics, &view);
        } else if store.take_redraw() {
            paint_attitude(&mut display.cropped(&ATTITUDE_AREA), store.state(), &mut debug_log);
            paint_hsi(&mut display.cropped(&HSI_AREA), store.state(), &mut debug_log);
            metrics.inc_paints();

            match active_popup {
                Some(Popup::Power(_)) => draw_power_popup(&mut display, POPUP_CENTER, store.state().avionics_powered),
                Some(Popup::Source(_)) => {
                    draw_source_popup(&mut display, POPUP_CENTER, NavSource::from_index(store.state().hsi_source));
                }
                None => {}
            }
        }

        let render_time = frame_start.elapsed();
        window.update(&display);

        let pre_sleep = frame_start.elapsed();
        thread::sleep(FRAME_TIME.saturating_sub(pre_sleep));
        let sleep_time = frame_start.elapsed().saturating_sub(pre_sleep);

        metrics.record_frame(frame_start.elapsed(), render_time, sleep_time);
    }
}
