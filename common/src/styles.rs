//! Fonts and text alignment for instrument labels.
//!
//! Instrument text is requested by size bucket ([`FontSize`]) and alignment
//! flags ([`HAlign`], [`VAlign`]); this module maps those onto the closest
//! mono font and an `embedded-graphics` [`TextStyle`]. Alignment styles are
//! `const` so no style objects are built per frame.

use embedded_graphics::{
    mono_font::{
        MonoFont, MonoTextStyle,
        ascii::{FONT_6X10, FONT_7X13_BOLD, FONT_9X15_BOLD, FONT_9X18_BOLD, FONT_10X20},
    },
    pixelcolor::Rgb565,
    text::{Alignment, Baseline, TextStyle, TextStyleBuilder},
};
use profont::{
    PROFONT_7_POINT, PROFONT_9_POINT, PROFONT_10_POINT, PROFONT_12_POINT, PROFONT_14_POINT, PROFONT_18_POINT,
    PROFONT_24_POINT,
};

use crate::colors::WHITE;

// =============================================================================
// Font Selection
// =============================================================================

/// Text size buckets used by the instruments, smallest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FontSize {
    /// Glideslope badge, VS scale labels.
    Tiny,
    Small,
    /// Tape labels, nav source text.
    Normal,
    Medium,
    /// Readout boxes.
    Large,
    XLarge,
    Huge,
}

impl FontSize {
    /// Mono font for this bucket. `bold` picks a bold ASCII face where one of
    /// a matching height exists, otherwise the regular face is used.
    pub const fn font(
        self,
        bold: bool,
    ) -> &'static MonoFont<'static> {
        match (self, bold) {
            (Self::Tiny, _) => &PROFONT_7_POINT,
            (Self::Small, _) => &PROFONT_9_POINT,
            (Self::Normal, false) => &PROFONT_10_POINT,
            (Self::Normal, true) => &FONT_7X13_BOLD,
            (Self::Medium, false) => &PROFONT_12_POINT,
            (Self::Medium, true) => &FONT_9X15_BOLD,
            (Self::Large, false) => &PROFONT_14_POINT,
            (Self::Large, true) => &FONT_9X18_BOLD,
            (Self::XLarge, _) => &PROFONT_18_POINT,
            (Self::Huge, _) => &PROFONT_24_POINT,
        }
    }
}

/// Debug page font (6x10 pixels). Exposed for creating dynamic-color styles.
/// Usage: `MonoTextStyle::new(LABEL_FONT, dynamic_color)`
pub const LABEL_FONT: &MonoFont = &FONT_6X10;

/// White popup text (10x20 pixels).
pub const POPUP_STYLE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&FONT_10X20, WHITE);

// =============================================================================
// Alignment
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Middle,
    Bottom,
    Baseline,
}

/// Centered text, vertically centered on the anchor.
pub const CENTERED: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Center)
    .baseline(Baseline::Middle)
    .build();

/// Left-aligned text with the anchor on the top edge. Used for log lines.
pub const LEFT_ALIGNED: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Left)
    .baseline(Baseline::Top)
    .build();

/// Right-aligned text with the anchor on the top edge.
pub const RIGHT_ALIGNED: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Right)
    .baseline(Baseline::Top)
    .build();

/// Text style for an alignment pair.
pub const fn text_style(
    h: HAlign,
    v: VAlign,
) -> TextStyle {
    let alignment = match h {
        HAlign::Left => Alignment::Left,
        HAlign::Center => Alignment::Center,
        HAlign::Right => Alignment::Right,
    };
    let baseline = match v {
        VAlign::Top => Baseline::Top,
        VAlign::Middle => Baseline::Middle,
        VAlign::Bottom => Baseline::Bottom,
        VAlign::Baseline => Baseline::Alphabetic,
    };
    TextStyleBuilder::new().alignment(alignment).baseline(baseline).build()
}
