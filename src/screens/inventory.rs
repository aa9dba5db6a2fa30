//! INV screen - scrollable viewer for a user-editable inventory file.

use std::fs;
use std::path::PathBuf;

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::Text;

use crate::colors::{BG, ROW_TINT};
use crate::config::{BODY_BOTTOM, BODY_TOP, SCREEN_WIDTH};
use crate::frame::Frame;
use crate::input::ButtonEvent;
use crate::styles::VALUE_STYLE;
use crate::widgets::{draw_footer, draw_header, draw_scrollbar};

use super::{Nav, Screen};

/// Pixel advance per inventory line (denser than the STAT rows).
const INV_LINE_HEIGHT: i32 = 10;

/// Characters that fit one line at the body font width.
const LINE_CHARS: usize = 20;

/// Scrollable text viewer for `inv.txt`. Select reloads the file from disk so
/// it can be edited while the interface runs.
pub struct InventoryScreen {
    path: PathBuf,
    lines: Vec<String>,
    scroll: usize,
}

impl InventoryScreen {
    pub fn new(path: PathBuf) -> Self {
        let mut screen = Self {
            path,
            lines: Vec::new(),
            scroll: 0,
        };
        screen.reload();
        screen
    }

    fn reload(&mut self) {
        self.lines = match fs::read_to_string(&self.path) {
            Ok(contents) => contents.lines().map(str::to_owned).collect(),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => vec![
                "[ inv.txt not found ]".into(),
                String::new(),
                "Create inv.txt next to".into(),
                "the pipboy binary to".into(),
                "populate your inventory.".into(),
            ],
            Err(err) => vec![format!("ERROR: {err}")],
        };
    }

    fn visible_lines() -> usize {
        ((BODY_BOTTOM - BODY_TOP) / INV_LINE_HEIGHT) as usize
    }

    fn max_scroll(&self) -> usize {
        self.lines.len().saturating_sub(Self::visible_lines())
    }
}

impl Screen for InventoryScreen {
    fn title(&self) -> &'static str {
        "INV"
    }

    fn handle_event(&mut self, event: ButtonEvent) {
        match event {
            ButtonEvent::Up => self.scroll = self.scroll.saturating_sub(1),
            ButtonEvent::Down => self.scroll = (self.scroll + 1).min(self.max_scroll()),
            ButtonEvent::Select => {
                self.reload();
                self.scroll = 0;
            }
            _ => {}
        }
    }

    fn render(&mut self, frame: &mut Frame, nav: Nav) {
        frame.clear(BG).ok();
        draw_header(frame, self.title(), nav.index, nav.count);

        let visible = Self::visible_lines();
        let mut y = BODY_TOP;
        for row in 0..visible {
            let Some(line) = self.lines.get(self.scroll + row) else {
                break;
            };
            if row % 2 == 0 {
                Rectangle::new(
                    Point::new(1, y - 1),
                    Size::new(SCREEN_WIDTH - 2, INV_LINE_HEIGHT as u32 - 1),
                )
                .into_styled(PrimitiveStyle::with_fill(ROW_TINT))
                .draw(frame)
                .ok();
            }
            let clipped: String = line.chars().take(LINE_CHARS).collect();
            Text::new(&clipped, Point::new(3, y + 7), VALUE_STYLE)
                .draw(frame)
                .ok();
            y += INV_LINE_HEIGHT;
        }

        draw_scrollbar(
            frame,
            BODY_TOP,
            BODY_BOTTOM,
            self.lines.len(),
            visible,
            self.scroll,
        );
        draw_footer(frame, "^v scroll  SEL reload");
    }
}
