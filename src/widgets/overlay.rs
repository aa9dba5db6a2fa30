//! Shutdown confirmation overlay.
//!
//! Replaces the active screen while the confirmation countdown runs: a large
//! digit counting 3, 2, 1 and a proportional progress bar draining toward
//! power-off. Any key press cancels (handled by the state machine; the
//! overlay only renders).

use std::time::Duration;

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::Text;

use crate::colors::{AMBER, AMBER_TINT, BG};
use crate::config::layout::{
    SHUTDOWN_BAR_HEIGHT,
    SHUTDOWN_BAR_WIDTH,
    SHUTDOWN_BAR_X,
    SHUTDOWN_BAR_Y,
};
use crate::config::{CENTER_X, CENTER_Y, CONFIRM_SECONDS};
use crate::frame::Frame;
use crate::styles::{CENTERED, COUNTDOWN_STYLE, HINT_STYLE, WARN_STYLE};

/// The digit shown for a remaining time: floor(remaining)+1, so the display
/// counts 3, 2, 1 instead of 2, 1, 0. Clamped for the instant where the full
/// window still remains.
pub fn countdown_digit(remaining: Duration) -> u64 {
    (remaining.as_secs() + 1).min(CONFIRM_SECONDS)
}

/// Width of the filled part of the progress bar for a remaining time.
pub fn bar_fill_width(remaining: Duration) -> u32 {
    let full = Duration::from_secs(CONFIRM_SECONDS);
    let remaining = remaining.min(full);
    (SHUTDOWN_BAR_WIDTH as u64 * remaining.as_millis() as u64 / full.as_millis() as u64) as u32
}

/// Render the full-screen confirmation overlay.
pub fn draw_shutdown_overlay(frame: &mut Frame, remaining: Duration) {
    frame.clear(BG).ok();

    Text::with_text_style(
        "! SHUTDOWN !",
        Point::new(CENTER_X, 30),
        WARN_STYLE,
        CENTERED,
    )
    .draw(frame)
    .ok();

    let digit = countdown_digit(remaining).to_string();
    Text::with_text_style(
        &digit,
        Point::new(CENTER_X, CENTER_Y + 8),
        COUNTDOWN_STYLE,
        CENTERED,
    )
    .draw(frame)
    .ok();

    // Bar outline with a draining fill.
    Rectangle::new(
        Point::new(SHUTDOWN_BAR_X - 1, SHUTDOWN_BAR_Y - 1),
        Size::new(SHUTDOWN_BAR_WIDTH + 2, SHUTDOWN_BAR_HEIGHT + 2),
    )
    .into_styled(PrimitiveStyle::with_stroke(AMBER, 1))
    .draw(frame)
    .ok();
    Rectangle::new(
        Point::new(SHUTDOWN_BAR_X, SHUTDOWN_BAR_Y),
        Size::new(SHUTDOWN_BAR_WIDTH, SHUTDOWN_BAR_HEIGHT),
    )
    .into_styled(PrimitiveStyle::with_fill(AMBER_TINT))
    .draw(frame)
    .ok();
    let fill = bar_fill_width(remaining);
    if fill > 0 {
        Rectangle::new(
            Point::new(SHUTDOWN_BAR_X, SHUTDOWN_BAR_Y),
            Size::new(fill, SHUTDOWN_BAR_HEIGHT),
        )
        .into_styled(PrimitiveStyle::with_fill(AMBER))
        .draw(frame)
        .ok();
    }

    Text::with_text_style(
        "any key cancels",
        Point::new(CENTER_X, SHUTDOWN_BAR_Y + 20),
        HINT_STYLE,
        CENTERED,
    )
    .draw(frame)
    .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_counts_three_two_one() {
        assert_eq!(countdown_digit(Duration::from_secs(3)), 3);
        assert_eq!(countdown_digit(Duration::from_millis(2900)), 3);
        assert_eq!(countdown_digit(Duration::from_millis(1500)), 2);
        assert_eq!(countdown_digit(Duration::from_millis(200)), 1);
        assert_eq!(countdown_digit(Duration::ZERO), 1);
    }

    #[test]
    fn test_bar_drains_proportionally() {
        assert_eq!(bar_fill_width(Duration::from_secs(3)), SHUTDOWN_BAR_WIDTH);
        assert_eq!(
            bar_fill_width(Duration::from_millis(1500)),
            SHUTDOWN_BAR_WIDTH / 2
        );
        assert_eq!(bar_fill_width(Duration::ZERO), 0);
    }
}
