//! Widget components shared by the instrument screens.
//!
//! All widgets are generic over `DrawTarget<Color = Rgb565>` for platform independence.

mod glideslope;
mod popups;
mod primitives;
pub mod tapes;

pub use glideslope::{CIRCLE_OFFSETS, GlideslopeSlot, draw_glideslope};
pub use popups::{draw_power_popup, draw_source_popup};
pub use primitives::{draw_box, draw_powered_off, fill_shape};
