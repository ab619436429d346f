//! Debug/profiling page rendering.

use core::fmt::Write;

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::Text;
use g5_common::colors::{BLACK, GREEN, GREY, WHITE, YELLOW, rgb};
use g5_common::config::{G5_WIDTH, STACK_HEIGHT};
use g5_common::debug_log::DebugLog;
use g5_common::nav::NavSource;
use g5_common::parameters::FlightState;
use g5_common::styles::LABEL_FONT;
use heapless::String;

use crate::profiling::ProfilingMetrics;

const HEADER_Y: i32 = 12;
const HEADER_DIVIDER_Y: i32 = 18;
const SECTION_HEADER_Y: i32 = 32;
const STATS_Y: i32 = 48;
const LOG_DIVIDER_Y: i32 = 140;
const LOG_Y: i32 = 154;
const LOG_LINE_HEIGHT: i32 = 12;
const COL1_X: i32 = 4;
const COL2_X: i32 = 164;
const COL3_X: i32 = 324;
const STAT_LINE_HEIGHT: i32 = 13;

const DEBUG_BG: Rgb565 = BLACK;
const HEADER_COLOR: Rgb565 = GREEN;
const SECTION_COLOR: Rgb565 = GREY;
const VALUE_COLOR: Rgb565 = WHITE;
const HIGHLIGHT_COLOR: Rgb565 = YELLOW;
const LOG_PROMPT_COLOR: Rgb565 = GREEN;
const LOG_TEXT_COLOR: Rgb565 = rgb(255, 165, 0);
const LOG_BG: Rgb565 = rgb(8, 8, 8);
const DIVIDER_COLOR: Rgb565 = GREY;

/// Everything the page shows besides the timing metrics.
pub struct DebugView<'a> {
    pub state: &'a FlightState,
    pub log: &'a DebugLog,
    pub fps: f32,
    pub frozen: bool,
}

pub fn draw_debug_page<D>(
    display: &mut D,
    metrics: &ProfilingMetrics,
    view: &DebugView<'_>,
) where
    D: DrawTarget<Color = Rgb565>,
{
    display.clear(DEBUG_BG).ok();
    draw_header(display, metrics, view);
    draw_horizontal_line(display, HEADER_DIVIDER_Y);
    draw_section_headers(display);
    draw_timing_column(display, metrics);
    draw_update_column(display, metrics, view.log);
    draw_flight_column(display, view.state);
    draw_horizontal_line(display, LOG_DIVIDER_Y);
    draw_log_terminal(display, view.log);
}

/// One left-aligned stat line.
fn stat<D>(
    display: &mut D,
    x: i32,
    y: i32,
    color: Rgb565,
    args: core::fmt::Arguments<'_>,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let mut s: String<24> = String::new();
    let _ = s.write_fmt(args);
    Text::new(&s, Point::new(x, y), MonoTextStyle::new(LABEL_FONT, color))
        .draw(display)
        .ok();
}

fn draw_header<D>(
    display: &mut D,
    metrics: &ProfilingMetrics,
    view: &DebugView<'_>,
) where
    D: DrawTarget<Color = Rgb565>,
{
    stat(display, COL1_X, HEADER_Y, HEADER_COLOR, format_args!("G5 DEBUG VIEW"));
    stat(display, 160, HEADER_Y, VALUE_COLOR, format_args!("UP {}", metrics.uptime_string()));
    stat(display, 280, HEADER_Y, VALUE_COLOR, format_args!("{:.0} FPS", view.fps));
    if view.frozen {
        stat(display, 380, HEADER_Y, HIGHLIGHT_COLOR, format_args!("FROZEN"));
    }
}

fn draw_section_headers<D>(display: &mut D)
where
    D: DrawTarget<Color = Rgb565>,
{
    stat(display, COL1_X, SECTION_HEADER_Y, SECTION_COLOR, format_args!("TIMING"));
    stat(display, COL2_X, SECTION_HEADER_Y, SECTION_COLOR, format_args!("UPDATES"));
    stat(display, COL3_X, SECTION_HEADER_Y, SECTION_COLOR, format_args!("FLIGHT"));
}

fn draw_timing_column<D>(
    display: &mut D,
    metrics: &ProfilingMetrics,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let x = COL1_X;
    let y = |row: i32| STATS_Y + row * STAT_LINE_HEIGHT;
    let ms = |us: u32| us as f32 / 1000.0;

    let min_us = if metrics.frame_time_min_us == u32::MAX { 0 } else { metrics.frame_time_min_us };

    stat(display, x, y(0), VALUE_COLOR, format_args!("Frame: {:.1}ms", ms(metrics.frame_time_us)));
    stat(display, x, y(1), VALUE_COLOR, format_args!("Render:{:.1}ms", ms(metrics.render_time_us)));
    stat(display, x, y(2), VALUE_COLOR, format_args!("Sleep: {:.1}ms", ms(metrics.sleep_time_us)));
    stat(display, x, y(3), HIGHLIGHT_COLOR, format_args!("Min:   {:.1}ms", ms(min_us)));
    stat(display, x, y(4), HIGHLIGHT_COLOR, format_args!("Max:   {:.1}ms", ms(metrics.frame_time_max_us)));
    stat(display, x, y(5), HIGHLIGHT_COLOR, format_args!("Avg:   {:.1}ms", ms(metrics.frame_time_avg_us())));
}

fn draw_update_column<D>(
    display: &mut D,
    metrics: &ProfilingMetrics,
    log: &DebugLog,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let x = COL2_X;
    let y = |row: i32| STATS_Y + row * STAT_LINE_HEIGHT;

    stat(display, x, y(0), VALUE_COLOR, format_args!("Frames:  {}", metrics.total_frames));
    stat(display, x, y(1), VALUE_COLOR, format_args!("Batches: {}", metrics.batches));
    stat(display, x, y(2), VALUE_COLOR, format_args!("Applied: {}", metrics.params_applied));
    stat(display, x, y(3), VALUE_COLOR, format_args!("Rejected:{}", metrics.params_rejected));
    stat(display, x, y(4), VALUE_COLOR, format_args!("Paints:  {}", metrics.paints));
    stat(display, x, y(5), HIGHLIGHT_COLOR, format_args!("Log:     {}", log.total()));
}

fn draw_flight_column<D>(
    display: &mut D,
    state: &FlightState,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let x = COL3_X;
    let y = |row: i32| STATS_Y + row * STAT_LINE_HEIGHT;

    let source = match NavSource::from_index(state.hsi_source) {
        NavSource::Nav1 => "NAV1",
        NavSource::Nav2 => "NAV2",
        NavSource::Gps => "GPS",
    };

    stat(display, x, y(0), VALUE_COLOR, format_args!("Power: {}", if state.avionics_powered { "ON" } else { "OFF" }));
    stat(display, x, y(1), VALUE_COLOR, format_args!("Source:{source}"));
    stat(display, x, y(2), VALUE_COLOR, format_args!("Att: {:.0}/{:.0}", state.pitch_deg, state.roll_deg));
    stat(display, x, y(3), VALUE_COLOR, format_args!("KIAS:  {:.0}", state.kias));
    stat(display, x, y(4), VALUE_COLOR, format_args!("Alt:   {:.0}", state.altitude_ft));
    stat(display, x, y(5), VALUE_COLOR, format_args!("Hdg:   {:.0}", state.mag_heading_deg));
}

fn draw_log_terminal<D>(
    display: &mut D,
    log: &DebugLog,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let prompt_style = MonoTextStyle::new(LABEL_FONT, LOG_PROMPT_COLOR);
    let text_style = MonoTextStyle::new(LABEL_FONT, LOG_TEXT_COLOR);

    Rectangle::new(
        Point::new(0, LOG_DIVIDER_Y + 2),
        Size::new(G5_WIDTH, STACK_HEIGHT - LOG_DIVIDER_Y as u32 - 2),
    )
    .into_styled(PrimitiveStyle::with_fill(LOG_BG))
    .draw(display)
    .ok();

    let mut y = LOG_Y;

    for line in log.iter() {
        Text::new(">", Point::new(COL1_X, y), prompt_style).draw(display).ok();
        Text::new(line, Point::new(COL1_X + 10, y), text_style)
            .draw(display)
            .ok();
        y += LOG_LINE_HEIGHT;
    }

    Text::new("> _", Point::new(COL1_X, y), prompt_style).draw(display).ok();
}

fn draw_horizontal_line<D>(
    display: &mut D,
    y: i32,
) where
    D: DrawTarget<Color = Rgb565>,
{
    Line::new(Point::new(2, y), Point::new(G5_WIDTH as i32 - 2, y))
        .into_styled(PrimitiveStyle::with_stroke(DIVIDER_COLOR, 1))
        .draw(display)
        .ok();
}
