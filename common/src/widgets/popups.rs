//! Non-modal popup overlays confirming panel switch changes.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::Text;

use crate::colors::{BLACK, GREY, WHITE};
use crate::nav::NavSource;
use crate::styles::{CENTERED, POPUP_STYLE};

const POPUP_WIDTH: u32 = 180;
const POPUP_HEIGHT: u32 = 50;
const BORDER: u32 = 3;

const GREY_FILL: PrimitiveStyle<Rgb565> = PrimitiveStyle::with_fill(GREY);
const BLACK_FILL: PrimitiveStyle<Rgb565> = PrimitiveStyle::with_fill(BLACK);

/// Framed popup box centered on `center` with one line of text.
fn draw_popup<D>(
    display: &mut D,
    center: Point,
    text: &str,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let size = Size::new(POPUP_WIDTH, POPUP_HEIGHT);
    let border_size = Size::new(POPUP_WIDTH + 2 * BORDER, POPUP_HEIGHT + 2 * BORDER);

    Rectangle::with_center(center, border_size)
        .into_styled(GREY_FILL)
        .draw(display)
        .ok();

    Rectangle::with_center(center, size)
        .into_styled(BLACK_FILL)
        .draw(display)
        .ok();

    Text::with_text_style(text, center, POPUP_STYLE, CENTERED)
        .draw(display)
        .ok();
}

pub fn draw_power_popup<D>(
    display: &mut D,
    center: Point,
    powered: bool,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let status = if powered { "AVIONICS ON" } else { "AVIONICS OFF" };
    draw_popup(display, center, status);
}

pub fn draw_source_popup<D>(
    display: &mut D,
    center: Point,
    source: NavSource,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let label = match source {
        NavSource::Nav1 => "CDI: NAV1",
        NavSource::Nav2 => "CDI: NAV2",
        NavSource::Gps => "CDI: GPS",
    };
    draw_popup(display, center, label);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Inspect, framebuffer};

    #[test]
    fn test_popup_layers() {
        let mut fb = framebuffer();
        fb.clear(WHITE).ok();
        draw_power_popup(&mut fb, Point::new(240, 180), false);
        // Border ring, black body and white text
        assert_eq!(fb.pixel(240 - 91, 180), GREY);
        assert_eq!(fb.pixel(240 - 85, 160), BLACK);
        assert!(fb.count(WHITE) > 0);
        assert_eq!(fb.pixel(5, 5), WHITE);
    }

    #[test]
    fn test_source_popup_draws_text() {
        let mut fb = framebuffer();
        draw_source_popup(&mut fb, Point::new(240, 180), NavSource::Gps);
        assert!(fb.count(WHITE) > 0);
    }
}
