//! RADIO screen - music player over the external playback service.
//!
//! Owns the one screen-local sub-state machine: `Stopped`, `Playing(i)` or
//! `Paused(i)`, plus a selection cursor that moves independently of the
//! playing track. Playback failures are swallowed into the `Stopped` state so
//! a bad file never takes down the interface.

use std::path::PathBuf;

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::Text;

use crate::colors::{BG, CYAN, GREEN, GREEN_DIM, SELECT_TINT};
use crate::config::{BODY_BOTTOM, BODY_TOP, SCREEN_WIDTH};
use crate::frame::Frame;
use crate::input::ButtonEvent;
use crate::playback::{scan_tracks, Playback};
use crate::styles::{BODY_FONT, LABEL_STYLE, SMALL_FONT};
use crate::widgets::{draw_divider, draw_footer, draw_header, draw_scrollbar};

use super::{Nav, Screen};

/// Track list line advance.
const LIST_LINE_HEIGHT: i32 = 10;

/// Top of the track list, below the now-playing block.
const LIST_TOP: i32 = BODY_TOP + 27;

/// Longest track name shown before truncation.
const NAME_CHARS: usize = 18;

/// Player sub-state. The indices always refer to the track list snapshot.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum PlayerState {
    Stopped,
    Playing(usize),
    Paused(usize),
}

/// Music player screen.
pub struct RadioScreen {
    playback: Option<Box<dyn Playback>>,
    music_dir: PathBuf,
    tracks: Vec<String>,
    state: PlayerState,
    /// Track to resume from when stopped; last index that played.
    current: usize,
    /// Selection cursor, independent of the playing track.
    cursor: usize,
}

impl RadioScreen {
    /// Snapshot the track list and wrap the playback service. `None` playback
    /// means no audio backend on this system; the screen stays navigable.
    pub fn new(music_dir: PathBuf, playback: Option<Box<dyn Playback>>) -> Self {
        let tracks = scan_tracks(&music_dir);
        Self {
            playback,
            music_dir,
            tracks,
            state: PlayerState::Stopped,
            current: 0,
            cursor: 0,
        }
    }

    fn select_and_play(&mut self, index: usize) {
        let Some(playback) = self.playback.as_mut() else {
            return;
        };
        if self.tracks.is_empty() {
            return;
        }
        playback.stop();
        let index = index % self.tracks.len();
        let path = self.music_dir.join(&self.tracks[index]);
        match playback.load(&path) {
            Ok(()) => {
                playback.play();
                self.current = index;
                self.state = PlayerState::Playing(index);
            }
            Err(err) => {
                tracing::warn!(track = %path.display(), "load failed: {err}");
                self.state = PlayerState::Stopped;
            }
        }
    }

    fn toggle_pause(&mut self) {
        let Some(playback) = self.playback.as_mut() else {
            return;
        };
        match self.state {
            PlayerState::Stopped => self.select_and_play(self.current),
            PlayerState::Playing(i) => {
                playback.pause();
                self.state = PlayerState::Paused(i);
            }
            PlayerState::Paused(i) => {
                playback.unpause();
                self.state = PlayerState::Playing(i);
            }
        }
    }

    fn next_track(&mut self) {
        if self.tracks.is_empty() {
            return;
        }
        self.select_and_play((self.current + 1) % self.tracks.len());
        self.cursor = self.current;
    }

    fn stop(&mut self) {
        if let Some(playback) = self.playback.as_mut() {
            playback.stop();
        }
        self.state = PlayerState::Stopped;
    }

    /// Index of the currently playing track, if any.
    fn playing_index(&self) -> Option<usize> {
        match self.state {
            PlayerState::Playing(i) => Some(i),
            _ => None,
        }
    }
}

impl Screen for RadioScreen {
    fn title(&self) -> &'static str {
        "RADIO"
    }

    fn handle_event(&mut self, event: ButtonEvent) {
        if self.tracks.is_empty() {
            return;
        }
        match event {
            ButtonEvent::Up => {
                self.cursor = (self.cursor + self.tracks.len() - 1) % self.tracks.len();
            }
            ButtonEvent::Down => self.cursor = (self.cursor + 1) % self.tracks.len(),
            ButtonEvent::Select => self.select_and_play(self.cursor),
            ButtonEvent::Key1 => self.toggle_pause(),
            ButtonEvent::Key2 => self.next_track(),
            ButtonEvent::Key3 => self.stop(),
            _ => {}
        }
    }

    /// Auto-advance when a track ends on its own.
    fn tick(&mut self) {
        let PlayerState::Playing(index) = self.state else {
            return;
        };
        let Some(playback) = self.playback.as_mut() else {
            return;
        };
        if !playback.is_busy() {
            let next = (index + 1) % self.tracks.len().max(1);
            self.select_and_play(next);
            self.cursor = self.current;
        }
    }

    fn render(&mut self, frame: &mut Frame, nav: Nav) {
        frame.clear(BG).ok();
        draw_header(frame, self.title(), nav.index, nav.count);

        if self.tracks.is_empty() {
            let notice = if self.playback.is_none() {
                "No audio backend"
            } else {
                "No audio files found"
            };
            Text::new(notice, Point::new(8, 44), LABEL_STYLE).draw(frame).ok();
            Text::new("Put .mp3/.ogg/.wav", Point::new(8, 56), LABEL_STYLE)
                .draw(frame)
                .ok();
            Text::new("into ./music/", Point::new(8, 68), LABEL_STYLE)
                .draw(frame)
                .ok();
            draw_footer(frame, "");
            return;
        }

        // Now-playing block
        let (status, status_color) = match self.state {
            PlayerState::Playing(_) => ("[PLAYING]", GREEN),
            PlayerState::Paused(_) => ("[PAUSED]", CYAN),
            PlayerState::Stopped => ("[STOPPED]", GREEN_DIM),
        };
        let status_style = MonoTextStyle::new(BODY_FONT, status_color);
        Text::new(status, Point::new(4, BODY_TOP + 7), status_style)
            .draw(frame)
            .ok();
        if self.playback.is_none() {
            Text::new("(no audio backend)", Point::new(4, BODY_TOP + 17), LABEL_STYLE)
                .draw(frame)
                .ok();
        } else {
            let current_name = truncate_name(&self.tracks[self.current]);
            let cyan_body = MonoTextStyle::new(BODY_FONT, CYAN);
            Text::new(&current_name, Point::new(4, BODY_TOP + 17), cyan_body)
                .draw(frame)
                .ok();
        }
        draw_divider(frame, LIST_TOP - 3);

        // Track list with the cursor kept visible
        let visible = (((BODY_BOTTOM - LIST_TOP) / LIST_LINE_HEIGHT) as usize).max(1);
        let scroll = self.cursor.saturating_sub(visible - 1);
        let mut y = LIST_TOP;
        for row in 0..visible {
            let idx = scroll + row;
            let Some(name) = self.tracks.get(idx) else {
                break;
            };
            let is_selected = idx == self.cursor;
            let is_playing = self.playing_index() == Some(idx);

            if is_selected {
                Rectangle::new(
                    Point::new(1, y - 1),
                    Size::new(SCREEN_WIDTH - 2, LIST_LINE_HEIGHT as u32 - 1),
                )
                .into_styled(PrimitiveStyle::with_fill(SELECT_TINT))
                .draw(frame)
                .ok();
            }

            let prefix = if is_playing {
                "> "
            } else if is_selected {
                "* "
            } else {
                "  "
            };
            let color = if is_playing {
                CYAN
            } else if is_selected {
                GREEN
            } else {
                GREEN_DIM
            };
            let style = MonoTextStyle::new(SMALL_FONT, color);
            let line = format!("{prefix}{}", truncate_name(name));
            Text::new(&line, Point::new(3, y + 6), style).draw(frame).ok();
            y += LIST_LINE_HEIGHT;
        }

        draw_scrollbar(frame, LIST_TOP, BODY_BOTTOM, self.tracks.len(), visible, scroll);
        draw_footer(frame, "K1:play K2:next K3:stop");
    }

    fn shutdown(&mut self) {
        self.stop();
    }
}

fn truncate_name(name: &str) -> String {
    if name.chars().count() > NAME_CHARS {
        let head: String = name.chars().take(NAME_CHARS - 3).collect();
        format!("{head}...")
    } else {
        name.to_owned()
    }
}
