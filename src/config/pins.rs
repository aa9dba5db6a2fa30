//! GPIO pin assignments (BCM numbering), fixed by the Waveshare 1.44" LCD HAT.
//!
//! All joystick/key inputs are pulled up and read active-low. CS (GPIO 8) is
//! owned by the kernel SPI subsystem via `/dev/spidev0.0` and must never be
//! claimed here - claiming it fails with a resource-busy error.

/// Display reset line.
pub const RST: u8 = 27;
/// Display data/command select line.
pub const DC: u8 = 25;
/// Display backlight line.
pub const BL: u8 = 24;

/// Joystick up.
pub const JOY_UP: u8 = 6;
/// Joystick down.
pub const JOY_DOWN: u8 = 19;
/// Joystick left.
pub const JOY_LEFT: u8 = 5;
/// Joystick right.
pub const JOY_RIGHT: u8 = 26;
/// Joystick center press.
pub const JOY_PRESS: u8 = 13;
/// Context key 1 (top).
pub const KEY1: u8 = 21;
/// Context key 2 (middle).
pub const KEY2: u8 = 20;
/// Context key 3 (bottom).
pub const KEY3: u8 = 16;

/// Every monitored input line, in poll order.
pub const INPUT_PINS: [u8; 8] = [
    JOY_UP, JOY_DOWN, JOY_LEFT, JOY_RIGHT, JOY_PRESS, KEY1, KEY2, KEY3,
];

/// Holding both of these for the confirmation window powers the system off.
pub const SHUTDOWN_COMBO: [u8; 2] = [KEY1, KEY2];
