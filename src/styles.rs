//! Pre-computed static text styles shared across screens and widgets.
//!
//! Styles are `const` so drawing code references them without per-frame
//! construction. Styles that need a dynamic color build on the exported font
//! references instead.

use embedded_graphics::mono_font::ascii::{FONT_5X8, FONT_6X10};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::text::{Alignment, TextStyle, TextStyleBuilder};
use profont::{PROFONT_12_POINT, PROFONT_24_POINT};

use crate::colors::{AMBER, GREEN, GREEN_DIM, GREEN_MID};

// =============================================================================
// Text Alignment Styles
// =============================================================================

/// Centered text. Used for the shutdown overlay and empty states.
pub const CENTERED: TextStyle = TextStyleBuilder::new().alignment(Alignment::Center).build();

/// Right-aligned text. Used for the screen indicator in the header.
pub const RIGHT_ALIGNED: TextStyle = TextStyleBuilder::new().alignment(Alignment::Right).build();

// =============================================================================
// Font References (for dynamic color styles)
// =============================================================================

/// Small detail font (footer hints, track list).
pub const SMALL_FONT: &MonoFont<'static> = &FONT_5X8;

/// Body font (data rows, inventory lines).
pub const BODY_FONT: &MonoFont<'static> = &FONT_6X10;

// =============================================================================
// Fixed-Color Styles
// =============================================================================

/// Screen title in the header bar.
pub const TITLE_STYLE: MonoTextStyle<'static, Rgb888> =
    MonoTextStyle::new(&PROFONT_12_POINT, GREEN);

/// Bright body text for data values.
pub const VALUE_STYLE: MonoTextStyle<'static, Rgb888> = MonoTextStyle::new(&FONT_6X10, GREEN);

/// Dim body text for labels.
pub const LABEL_STYLE: MonoTextStyle<'static, Rgb888> = MonoTextStyle::new(&FONT_6X10, GREEN_DIM);

/// Small dim text for footer hints.
pub const HINT_STYLE: MonoTextStyle<'static, Rgb888> = MonoTextStyle::new(&FONT_5X8, GREEN_MID);

/// Large amber digits for the shutdown countdown.
pub const COUNTDOWN_STYLE: MonoTextStyle<'static, Rgb888> =
    MonoTextStyle::new(&PROFONT_24_POINT, AMBER);

/// Amber body text for warnings.
pub const WARN_STYLE: MonoTextStyle<'static, Rgb888> = MonoTextStyle::new(&FONT_5X8, AMBER);
