//! Shared drawing widgets.
//!
//! - `chrome`: header/footer bars, dividers, scrollbars
//! - `overlay`: the shutdown confirmation overlay

mod chrome;
mod overlay;

pub use chrome::{draw_divider, draw_footer, draw_header, draw_scrollbar};
pub use overlay::draw_shutdown_overlay;
