//! Pip-Boy HAT library - testable modules for the status interface.
//!
//! This library contains the core logic that can be exercised on any host:
//! the frame pipeline, input debouncing, the navigation/shutdown state
//! machine, and the individual screens. The binary (`main.rs`) adds the
//! hardware bring-up (SPI device, GPIO backend selection) and the 10 Hz
//! control loop.
//!
//! # Testing
//!
//! All hardware seams are traits (`GpioBackend`, `SpiPort`, `Playback`), so
//! `cargo test` runs everywhere without a Pi attached.

pub mod app;
pub mod colors;
pub mod config;
pub mod display;
pub mod frame;
pub mod gpio;
pub mod input;
pub mod metrics;
pub mod playback;
pub mod screens;
pub mod styles;
pub mod widgets;

#[cfg(test)]
pub mod testutil;
