//! Header, footer, divider and scrollbar rendering shared by all screens.

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::Text;

use crate::colors::{GREEN, GREEN_DIM, GREEN_MID};
use crate::config::{FOOTER_HEIGHT, HEADER_HEIGHT, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::frame::Frame;
use crate::styles::{HINT_STYLE, RIGHT_ALIGNED, SMALL_FONT, TITLE_STYLE};

/// Draw the top header bar: left-aligned title plus a right-aligned screen
/// indicator such as "2/3".
pub fn draw_header(frame: &mut Frame, title: &str, index: usize, count: usize) {
    Rectangle::new(Point::zero(), Size::new(SCREEN_WIDTH, HEADER_HEIGHT))
        .into_styled(PrimitiveStyle::with_fill(GREEN_DIM))
        .draw(frame)
        .ok();

    Text::new(title, Point::new(3, 11), TITLE_STYLE).draw(frame).ok();

    let nav = format!("{}/{}", index + 1, count);
    let nav_style = MonoTextStyle::new(SMALL_FONT, GREEN_MID);
    Text::with_text_style(
        &nav,
        Point::new(SCREEN_WIDTH as i32 - 3, 9),
        nav_style,
        RIGHT_ALIGNED,
    )
    .draw(frame)
    .ok();
}

/// Draw the bottom footer bar with contextual button hints.
pub fn draw_footer(frame: &mut Frame, hints: &str) {
    let top = (SCREEN_HEIGHT - FOOTER_HEIGHT) as i32;
    Rectangle::new(Point::new(0, top), Size::new(SCREEN_WIDTH, FOOTER_HEIGHT))
        .into_styled(PrimitiveStyle::with_fill(GREEN_DIM))
        .draw(frame)
        .ok();
    Text::new(hints, Point::new(2, top + 9), HINT_STYLE).draw(frame).ok();
}

/// Horizontal divider line across the full width.
pub fn draw_divider(frame: &mut Frame, y: i32) {
    Line::new(Point::new(0, y), Point::new(SCREEN_WIDTH as i32 - 1, y))
        .into_styled(PrimitiveStyle::with_stroke(GREEN_DIM, 1))
        .draw(frame)
        .ok();
}

/// Right-edge scrollbar with a proportional thumb.
///
/// Drawn only when `total > visible`; the track spans `top..bottom`.
pub fn draw_scrollbar(frame: &mut Frame, top: i32, bottom: i32, total: usize, visible: usize, offset: usize) {
    if total <= visible {
        return;
    }
    let track_h = bottom - top;
    let thumb_h = ((track_h as usize * visible / total) as i32).max(6);
    let max_offset = total - visible;
    let thumb_pos = top + ((track_h - thumb_h) as usize * offset.min(max_offset) / max_offset) as i32;

    let x = SCREEN_WIDTH as i32 - 4;
    Rectangle::new(Point::new(x, top), Size::new(3, track_h as u32))
        .into_styled(PrimitiveStyle::with_fill(GREEN_DIM))
        .draw(frame)
        .ok();
    Rectangle::new(Point::new(x, thumb_pos), Size::new(3, thumb_h as u32))
        .into_styled(PrimitiveStyle::with_fill(GREEN))
        .draw(frame)
        .ok();
}
