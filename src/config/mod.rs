//! Application configuration.
//!
//! - `pins`: BCM pin assignments fixed by the Waveshare HAT wiring
//! - `layout`: display dimensions and pre-computed layout constants
//! - `timing`: debounce window, tick rate, shutdown confirmation window

pub mod layout;
pub mod pins;
pub mod timing;

use std::env;
use std::path::PathBuf;

// Re-export layout constants at config level for convenience
pub use layout::{
    BODY_BOTTOM,
    BODY_TOP,
    CENTER_X,
    CENTER_Y,
    FOOTER_HEIGHT,
    HEADER_HEIGHT,
    LINE_HEIGHT,
    SCREEN_HEIGHT,
    SCREEN_WIDTH,
};
pub use timing::{CONFIRM_SECONDS, CONFIRM_WINDOW, DEBOUNCE_WINDOW, TICK_PERIOD};

/// Runtime configuration resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding `inv.txt` and `music/`.
    pub root: PathBuf,
    /// Panel variant flag: most Waveshare 1.44" batches need INVON.
    pub invert_colors: bool,
    /// SPI clock in Hz. The ST7735S is stable at 40 MHz on short HAT traces.
    pub spi_clock_hz: u32,
}

impl Config {
    /// Build the configuration from the environment.
    ///
    /// `PIPBOY_ROOT` overrides the data directory (default: current directory),
    /// `PIPBOY_NO_INVERT` skips the INVON command for panel batches that do not
    /// need it.
    pub fn from_env() -> Self {
        let root = env::var_os("PIPBOY_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            root,
            invert_colors: env::var_os("PIPBOY_NO_INVERT").is_none(),
            spi_clock_hz: 40_000_000,
        }
    }

    /// Path to the inventory text file.
    pub fn inventory_file(&self) -> PathBuf {
        self.root.join("inv.txt")
    }

    /// Path to the music directory.
    pub fn music_dir(&self) -> PathBuf {
        self.root.join("music")
    }
}
