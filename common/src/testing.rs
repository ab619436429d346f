//! Pixel inspection for renderer tests.
//!
//! Tests paint into the simulator's `SimulatorDisplay`, sized to one
//! instrument and cleared to black.

use embedded_graphics::{pixelcolor::Rgb565, prelude::*};
use embedded_graphics_simulator::SimulatorDisplay;

use crate::config::{G5_HEIGHT, G5_WIDTH};

pub type Framebuffer = SimulatorDisplay<Rgb565>;

/// A blank 480×360 display.
pub fn framebuffer() -> Framebuffer { SimulatorDisplay::new(Size::new(G5_WIDTH, G5_HEIGHT)) }

/// Read-back helpers on top of `get_pixel`.
pub trait Inspect {
    fn pixel(
        &self,
        x: u32,
        y: u32,
    ) -> Rgb565;

    /// Number of pixels of exactly `color`.
    fn count(
        &self,
        color: Rgb565,
    ) -> usize;

    fn area(&self) -> usize;

    /// True if every pixel matches one of `allowed`.
    fn only_colors(
        &self,
        allowed: &[Rgb565],
    ) -> bool;

    fn same_pixels(
        &self,
        other: &Self,
    ) -> bool;
}

impl Inspect for Framebuffer {
    fn pixel(
        &self,
        x: u32,
        y: u32,
    ) -> Rgb565 {
        self.get_pixel(Point::new(x as i32, y as i32))
    }

    fn count(
        &self,
        color: Rgb565,
    ) -> usize {
        self.bounding_box().points().filter(|&p| self.get_pixel(p) == color).count()
    }

    fn area(&self) -> usize { self.bounding_box().points().count() }

    fn only_colors(
        &self,
        allowed: &[Rgb565],
    ) -> bool {
        self.bounding_box().points().all(|p| allowed.contains(&self.get_pixel(p)))
    }

    fn same_pixels(
        &self,
        other: &Self,
    ) -> bool {
        self.size() == other.size() && self.bounding_box().points().all(|p| self.get_pixel(p) == other.get_pixel(p))
    }
}
