//! Color constants for the Pip-Boy interface.
//!
//! The frame pipeline works in 24-bit `Rgb888`; conversion to the panel's
//! RGB565 format happens once per frame in the display transport. The palette
//! is the classic green-on-black ramp with amber and cyan accents.

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;

/// Black background.
pub const BG: Rgb888 = Rgb888::BLACK;

/// Primary Pip-Boy green. Used for active values and selected text.
pub const GREEN: Rgb888 = Rgb888::new(0, 255, 0);

/// Dimmed green for labels, inactive list rows and chrome fills.
pub const GREEN_DIM: Rgb888 = Rgb888::new(0, 140, 0);

/// Mid-brightness green for secondary chrome text.
pub const GREEN_MID: Rgb888 = Rgb888::new(0, 200, 0);

/// Amber accent for warnings and the shutdown overlay.
pub const AMBER: Rgb888 = Rgb888::new(255, 191, 0);

/// Subtle cyan accent for the currently playing track.
pub const CYAN: Rgb888 = Rgb888::new(0, 200, 200);

/// Near-black green tint for alternating list rows.
pub const ROW_TINT: Rgb888 = Rgb888::new(0, 12, 0);

/// Slightly brighter tint for the selected list row.
pub const SELECT_TINT: Rgb888 = Rgb888::new(0, 30, 10);

/// Dark amber fill behind warning boxes.
pub const AMBER_TINT: Rgb888 = Rgb888::new(20, 10, 0);
