//! Small drawing helpers shared by both instruments.

use embedded_graphics::{pixelcolor::Rgb565, prelude::*};

use crate::canvas::{Brush, Canvas, Pen, PointF, RectF, pt};
use crate::colors::{BLACK, WHITE};
use crate::config::{HEIGHT, WIDTH};

/// Black screen with a white X: the instrument with avionics power off.
pub fn draw_powered_off<D>(canvas: &mut Canvas<'_, D>)
where
    D: DrawTarget<Color = Rgb565>,
{
    canvas.reset();
    canvas.clear(BLACK);
    canvas.set_pen(Pen::new(1, WHITE));
    canvas.line(pt(0.0, 0.0), pt(WIDTH, HEIGHT));
    canvas.line(pt(0.0, HEIGHT), pt(WIDTH, 0.0));
}

/// Black readout box with a frame in `frame`.
pub fn draw_box<D>(
    canvas: &mut Canvas<'_, D>,
    rect: RectF,
    frame: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    canvas.set_pen(Pen::new(2, frame));
    canvas.set_brush(Brush::Solid(BLACK));
    canvas.rect(rect);
}

/// Filled polygon with no outline.
pub fn fill_shape<D>(
    canvas: &mut Canvas<'_, D>,
    points: &[PointF],
    color: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    canvas.set_pen(Pen::NONE);
    canvas.set_brush(Brush::Solid(color));
    canvas.polygon(points);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{GREY, RED};
    use crate::testing::{Inspect, framebuffer};

    #[test]
    fn test_powered_off_x() {
        let mut fb = framebuffer();
        let mut canvas = Canvas::new(&mut fb);
        canvas.translate(50.0, 50.0);
        canvas.rotate(20.0);
        draw_powered_off(&mut canvas);
        canvas.finish();
        assert!(fb.only_colors(&[BLACK, WHITE]));
        assert_eq!(fb.pixel(0, 0), WHITE);
        assert_eq!(fb.pixel(240, 180), WHITE);
        assert_eq!(fb.pixel(4, 357), WHITE);
        assert_eq!(fb.pixel(240, 20), BLACK);
    }

    #[test]
    fn test_box_frame_and_fill() {
        let mut fb = framebuffer();
        fb.draw_iter([Pixel(Point::new(20, 20), RED)]).ok();
        let mut canvas = Canvas::new(&mut fb);
        draw_box(&mut canvas, RectF::new(0.0, 0.0, 105.0, 45.0), GREY);
        canvas.finish();
        assert_eq!(fb.pixel(20, 20), BLACK);
        assert!((103..=106).any(|x| fb.pixel(x, 20) == GREY));
    }
}
