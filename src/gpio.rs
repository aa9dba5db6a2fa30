//! Backend-polymorphic GPIO access.
//!
//! The two Linux GPIO mechanisms available on a Pi (the gpiochip character
//! device via rppal, and the legacy sysfs interface) are alternative
//! implementations of one capability set: claim a line as input or output,
//! read it, write it, release it. The backend is selected once at startup;
//! nothing else in the program knows which one is in use.
//!
//! Input lines are claimed with the pull-up enabled where the backend supports
//! it (sysfs cannot set bias; the HAT's keys sit on lines the firmware already
//! pulls up via the device-tree overlay).

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::{debug, info, warn};

/// GPIO-related errors.
#[derive(Error, Debug)]
pub enum GpioError {
    #[error("no usable GPIO backend: {0}")]
    NoBackend(String),

    #[error("pin {pin} is not claimed")]
    NotClaimed { pin: u8 },

    #[error("gpiochip pin {pin}: {source}")]
    Chip {
        pin: u8,
        #[source]
        source: rppal::gpio::Error,
    },

    #[error("sysfs pin {pin}: {source}")]
    Sysfs {
        pin: u8,
        #[source]
        source: sysfs_gpio::Error,
    },
}

/// One GPIO capability set, independent of the underlying OS mechanism.
///
/// `read` and `write` report and drive the electrical level; callers decide
/// what a level means (the HAT's inputs are active-low).
pub trait GpioBackend: Send + Sync {
    /// Human-readable backend name for logs.
    fn name(&self) -> &'static str;

    /// Claim a line as a pulled-up input.
    fn claim_input(&self, pin: u8) -> Result<(), GpioError>;

    /// Claim a line as an output, initially low.
    fn claim_output(&self, pin: u8) -> Result<(), GpioError>;

    /// Read the electrical level of a claimed input line. `true` = high.
    fn read(&self, pin: u8) -> Result<bool, GpioError>;

    /// Drive a claimed output line.
    fn write(&self, pin: u8, high: bool) -> Result<(), GpioError>;

    /// Release every claimed line. Also runs on drop; explicit release lets
    /// the teardown path log failures.
    fn release_all(&self);
}

/// Pick the first working backend: gpiochip first, sysfs as fallback.
///
/// Startup aborts with the returned error if neither is usable; there is no
/// point entering the loop without input or display control.
pub fn select_backend() -> Result<Arc<dyn GpioBackend>, GpioError> {
    match ChipBackend::open() {
        Ok(backend) => {
            info!(backend = backend.name(), "GPIO backend selected");
            return Ok(Arc::new(backend));
        }
        Err(err) => warn!("gpiochip backend unavailable: {err}"),
    }
    match SysfsBackend::open() {
        Ok(backend) => {
            info!(backend = backend.name(), "GPIO backend selected");
            Ok(Arc::new(backend))
        }
        Err(err) => Err(GpioError::NoBackend(format!(
            "gpiochip and sysfs both failed ({err})"
        ))),
    }
}

// =============================================================================
// gpiochip backend (rppal)
// =============================================================================

/// Character-device backend built on rppal.
pub struct ChipBackend {
    gpio: rppal::gpio::Gpio,
    inputs: Mutex<HashMap<u8, rppal::gpio::InputPin>>,
    outputs: Mutex<HashMap<u8, rppal::gpio::OutputPin>>,
}

impl ChipBackend {
    /// Open the GPIO character device.
    pub fn open() -> Result<Self, GpioError> {
        let gpio = rppal::gpio::Gpio::new()
            .map_err(|err| GpioError::NoBackend(err.to_string()))?;
        Ok(Self {
            gpio,
            inputs: Mutex::new(HashMap::new()),
            outputs: Mutex::new(HashMap::new()),
        })
    }
}

impl GpioBackend for ChipBackend {
    fn name(&self) -> &'static str {
        "gpiochip"
    }

    fn claim_input(&self, pin: u8) -> Result<(), GpioError> {
        let line = self
            .gpio
            .get(pin)
            .map_err(|source| GpioError::Chip { pin, source })?
            .into_input_pullup();
        self.inputs.lock().unwrap().insert(pin, line);
        debug!(pin, "claimed input");
        Ok(())
    }

    fn claim_output(&self, pin: u8) -> Result<(), GpioError> {
        let line = self
            .gpio
            .get(pin)
            .map_err(|source| GpioError::Chip { pin, source })?
            .into_output_low();
        self.outputs.lock().unwrap().insert(pin, line);
        debug!(pin, "claimed output");
        Ok(())
    }

    fn read(&self, pin: u8) -> Result<bool, GpioError> {
        let inputs = self.inputs.lock().unwrap();
        let line = inputs.get(&pin).ok_or(GpioError::NotClaimed { pin })?;
        Ok(line.is_high())
    }

    fn write(&self, pin: u8, high: bool) -> Result<(), GpioError> {
        let mut outputs = self.outputs.lock().unwrap();
        let line = outputs.get_mut(&pin).ok_or(GpioError::NotClaimed { pin })?;
        if high {
            line.set_high();
        } else {
            line.set_low();
        }
        Ok(())
    }

    fn release_all(&self) {
        // rppal resets pins to their previous mode on drop.
        self.inputs.lock().unwrap().clear();
        self.outputs.lock().unwrap().clear();
    }
}

// =============================================================================
// sysfs backend
// =============================================================================

/// Legacy `/sys/class/gpio` backend for kernels without a usable gpiochip.
pub struct SysfsBackend {
    pins: Mutex<HashMap<u8, sysfs_gpio::Pin>>,
}

impl SysfsBackend {
    /// Check that the sysfs GPIO interface exists.
    pub fn open() -> Result<Self, GpioError> {
        if !Path::new("/sys/class/gpio").exists() {
            return Err(GpioError::NoBackend("/sys/class/gpio missing".into()));
        }
        Ok(Self {
            pins: Mutex::new(HashMap::new()),
        })
    }

    fn claim(&self, pin: u8, direction: sysfs_gpio::Direction) -> Result<(), GpioError> {
        let line = sysfs_gpio::Pin::new(u64::from(pin));
        line.export()
            .and_then(|()| line.set_direction(direction))
            .map_err(|source| GpioError::Sysfs { pin, source })?;
        self.pins.lock().unwrap().insert(pin, line);
        debug!(pin, "claimed (sysfs)");
        Ok(())
    }
}

impl GpioBackend for SysfsBackend {
    fn name(&self) -> &'static str {
        "sysfs"
    }

    fn claim_input(&self, pin: u8) -> Result<(), GpioError> {
        self.claim(pin, sysfs_gpio::Direction::In)
    }

    fn claim_output(&self, pin: u8) -> Result<(), GpioError> {
        self.claim(pin, sysfs_gpio::Direction::Low)
    }

    fn read(&self, pin: u8) -> Result<bool, GpioError> {
        let pins = self.pins.lock().unwrap();
        let line = pins.get(&pin).ok_or(GpioError::NotClaimed { pin })?;
        let value = line
            .get_value()
            .map_err(|source| GpioError::Sysfs { pin, source })?;
        Ok(value != 0)
    }

    fn write(&self, pin: u8, high: bool) -> Result<(), GpioError> {
        let pins = self.pins.lock().unwrap();
        let line = pins.get(&pin).ok_or(GpioError::NotClaimed { pin })?;
        line.set_value(u8::from(high))
            .map_err(|source| GpioError::Sysfs { pin, source })
    }

    fn release_all(&self) {
        let mut pins = self.pins.lock().unwrap();
        for (pin, line) in pins.drain() {
            if let Err(err) = line.unexport() {
                warn!(pin, "unexport failed: {err}");
            }
        }
    }
}

impl Drop for SysfsBackend {
    fn drop(&mut self) {
        self.release_all();
    }
}
