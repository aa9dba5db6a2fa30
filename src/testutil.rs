//! In-memory doubles for the hardware seams, shared by the unit tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::display::{DisplayError, SpiPort};
use crate::gpio::{GpioBackend, GpioError};
use crate::playback::{Playback, PlaybackError};

/// GPIO backend over a settable level table. Unset pins read high (released,
/// matching the pulled-up idle state of the HAT's inputs).
pub struct MockBackend {
    levels: Mutex<HashMap<u8, bool>>,
    writes: Mutex<Vec<(u8, bool)>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            levels: Mutex::new(HashMap::new()),
            writes: Mutex::new(Vec::new()),
        }
    }

    /// Drive an input to its pressed (low) state.
    pub fn press(&self, pin: u8) {
        self.levels.lock().unwrap().insert(pin, false);
    }

    /// Return an input to its released (high) state.
    pub fn release(&self, pin: u8) {
        self.levels.lock().unwrap().insert(pin, true);
    }

    /// Output writes observed so far, in order.
    pub fn written(&self) -> Vec<(u8, bool)> {
        self.writes.lock().unwrap().clone()
    }
}

impl GpioBackend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn claim_input(&self, _pin: u8) -> Result<(), GpioError> {
        Ok(())
    }

    fn claim_output(&self, _pin: u8) -> Result<(), GpioError> {
        Ok(())
    }

    fn read(&self, pin: u8) -> Result<bool, GpioError> {
        Ok(*self.levels.lock().unwrap().get(&pin).unwrap_or(&true))
    }

    fn write(&self, pin: u8, high: bool) -> Result<(), GpioError> {
        self.writes.lock().unwrap().push((pin, high));
        Ok(())
    }

    fn release_all(&self) {}
}

/// SPI port that records every transfer.
pub struct MockSpi {
    transfers: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl MockSpi {
    pub fn new() -> Self {
        Self {
            transfers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared handle to the recorded transfers.
    pub fn transfers(&self) -> Arc<Mutex<Vec<Vec<u8>>>> {
        Arc::clone(&self.transfers)
    }
}

impl SpiPort for MockSpi {
    fn write(&mut self, buf: &[u8]) -> Result<(), DisplayError> {
        self.transfers.lock().unwrap().push(buf.to_vec());
        Ok(())
    }
}

/// Scriptable playback service.
#[derive(Default)]
pub struct FakePlaybackState {
    pub busy: bool,
    pub loaded: Vec<String>,
    pub fail_loads: bool,
    pub stops: usize,
    pub pauses: usize,
    pub unpauses: usize,
}

pub struct FakePlayback {
    state: Arc<Mutex<FakePlaybackState>>,
}

impl FakePlayback {
    pub fn new() -> (Self, Arc<Mutex<FakePlaybackState>>) {
        let state = Arc::new(Mutex::new(FakePlaybackState::default()));
        (
            Self {
                state: Arc::clone(&state),
            },
            state,
        )
    }
}

impl Playback for FakePlayback {
    fn load(&mut self, path: &Path) -> Result<(), PlaybackError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_loads {
            return Err(PlaybackError::Unplayable(path.to_path_buf()));
        }
        state.loaded.push(path.display().to_string());
        Ok(())
    }

    fn play(&mut self) {
        self.state.lock().unwrap().busy = true;
    }

    fn pause(&mut self) {
        self.state.lock().unwrap().pauses += 1;
    }

    fn unpause(&mut self) {
        self.state.lock().unwrap().unpauses += 1;
    }

    fn stop(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.busy = false;
        state.stops += 1;
    }

    fn is_busy(&mut self) -> bool {
        self.state.lock().unwrap().busy
    }
}
