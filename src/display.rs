//! ST7735S display transport over 4-wire SPI.
//!
//! Owns the SPI channel and the three control lines (reset, data/command
//! select, backlight). Command bytes go out with DC low, payload bytes with DC
//! high. Chip select is owned by the kernel SPI subsystem and is never claimed
//! or toggled here.
//!
//! `blit` streams the serialized frame in chunks of at most
//! [`MAX_TRANSFER`] bytes; a single oversized transfer is rejected by the
//! spidev layer.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

use crate::config::pins;
use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::frame::Frame;
use crate::gpio::{GpioBackend, GpioError};

/// Largest single SPI transfer the kernel accepts (spidev default bufsiz).
pub const MAX_TRANSFER: usize = 4096;

// ST7735 command bytes
const SWRESET: u8 = 0x01;
const SLPOUT: u8 = 0x11;
const INVON: u8 = 0x21;
const DISPON: u8 = 0x29;
const CASET: u8 = 0x2A;
const RASET: u8 = 0x2B;
const RAMWR: u8 = 0x2C;
const MADCTL: u8 = 0x36;
const COLMOD: u8 = 0x3A;

// MADCTL flags
const MADCTL_MX: u8 = 0x40; // Column address order
const MADCTL_MV: u8 = 0x20; // Row/column exchange
const MADCTL_RGB: u8 = 0x00; // RGB subpixel order

/// Orientation/mirror byte for the HAT's physical mounting.
const MADCTL_VALUE: u8 = MADCTL_MX | MADCTL_MV | MADCTL_RGB;

/// Display transport errors.
#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("spi transfer failed: {0}")]
    Spi(#[from] rppal::spi::Error),

    #[error("control line: {0}")]
    Gpio(#[from] GpioError),
}

/// Byte sink for the panel. Production code hands in the spidev channel; tests
/// record transfers instead.
pub trait SpiPort: Send {
    fn write(&mut self, buf: &[u8]) -> Result<(), DisplayError>;
}

impl SpiPort for rppal::spi::Spi {
    fn write(&mut self, buf: &[u8]) -> Result<(), DisplayError> {
        rppal::spi::Spi::write(self, buf)?;
        Ok(())
    }
}

/// ST7735S transport: init sequence, frame blits, teardown.
pub struct St7735<S: SpiPort> {
    spi: S,
    gpio: Arc<dyn GpioBackend>,
    invert_colors: bool,
}

impl<S: SpiPort> St7735<S> {
    /// Claim the three control lines and wrap the SPI channel.
    pub fn new(
        spi: S,
        gpio: Arc<dyn GpioBackend>,
        invert_colors: bool,
    ) -> Result<Self, DisplayError> {
        gpio.claim_output(pins::RST)?;
        gpio.claim_output(pins::DC)?;
        gpio.claim_output(pins::BL)?;
        Ok(Self {
            spi,
            gpio,
            invert_colors,
        })
    }

    /// Run the panel power-up sequence and light the backlight.
    pub fn init(&mut self) -> Result<(), DisplayError> {
        // Hardware reset with fixed settle delays
        self.gpio.write(pins::RST, false)?;
        thread::sleep(Duration::from_millis(100));
        self.gpio.write(pins::RST, true)?;
        thread::sleep(Duration::from_millis(100));

        self.send_command(SWRESET, &[])?;
        thread::sleep(Duration::from_millis(150));
        self.send_command(SLPOUT, &[])?;
        thread::sleep(Duration::from_millis(150));

        // 16-bit packed color, fixed orientation for the HAT mounting
        self.send_command(COLMOD, &[0x55])?;
        self.send_command(MADCTL, &[MADCTL_VALUE])?;
        if self.invert_colors {
            self.send_command(INVON, &[])?;
        }
        self.send_command(DISPON, &[])?;

        self.gpio.write(pins::BL, true)?;
        info!("display initialized");
        Ok(())
    }

    /// Send a command byte (DC low) followed by its payload (DC high).
    pub fn send_command(&mut self, opcode: u8, payload: &[u8]) -> Result<(), DisplayError> {
        self.gpio.write(pins::DC, false)?;
        self.spi.write(&[opcode])?;
        if !payload.is_empty() {
            self.gpio.write(pins::DC, true)?;
            self.spi.write(payload)?;
        }
        Ok(())
    }

    /// Serialize and transmit a full frame.
    ///
    /// Programs the full-panel write window, issues RAMWR, then streams the
    /// big-endian RGB565 bytes in [`MAX_TRANSFER`]-sized chunks.
    pub fn blit(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        let bytes = frame.to_rgb565_be();

        // Full-screen write window. This panel's visible columns start at 1.
        self.send_command(CASET, &[0x00, 0x01, 0x00, SCREEN_WIDTH as u8])?;
        self.send_command(RASET, &[0x00, 0x00, 0x00, (SCREEN_HEIGHT - 1) as u8])?;

        self.send_command(RAMWR, &[])?;
        self.gpio.write(pins::DC, true)?;
        for chunk in bytes.chunks(MAX_TRANSFER) {
            self.spi.write(chunk)?;
        }
        Ok(())
    }

    /// Push an all-black frame, e.g. right before releasing the panel.
    pub fn blank(&mut self) -> Result<(), DisplayError> {
        self.blit(&Frame::new())
    }

    /// Turn the backlight off. The SPI channel closes when the transport is
    /// dropped.
    pub fn cleanup(&mut self) -> Result<(), DisplayError> {
        debug!("display cleanup");
        self.gpio.write(pins::BL, false)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{MockBackend, MockSpi};
    use embedded_graphics::pixelcolor::Rgb888;

    fn transport(spi: MockSpi) -> St7735<MockSpi> {
        St7735::new(spi, Arc::new(MockBackend::new()), true).unwrap()
    }

    #[test]
    fn test_blit_chunks_are_bounded_and_lossless() {
        let spi = MockSpi::new();
        let transfers = spi.transfers();
        let mut display = transport(spi);

        let mut frame = Frame::new();
        frame.set_pixel(0, 0, Rgb888::new(255, 0, 0));
        let expected = frame.to_rgb565_be();
        display.blit(&frame).unwrap();

        let transfers = transfers.lock().unwrap();
        // Skip the window/RAMWR command traffic: pixel data starts after the
        // single-byte RAMWR transfer.
        let ramwr_idx = transfers
            .iter()
            .position(|t| t.as_slice() == [RAMWR])
            .expect("RAMWR issued");
        let pixel_chunks = &transfers[ramwr_idx + 1..];

        assert!(pixel_chunks.len() > 1, "frame must be split into chunks");
        assert!(pixel_chunks.iter().all(|c| c.len() <= MAX_TRANSFER));
        let rejoined: Vec<u8> = pixel_chunks.concat();
        assert_eq!(rejoined, expected);
    }

    #[test]
    fn test_window_covers_full_panel() {
        let spi = MockSpi::new();
        let transfers = spi.transfers();
        let mut display = transport(spi);
        display.blit(&Frame::new()).unwrap();

        let transfers = transfers.lock().unwrap();
        let caset_idx = transfers
            .iter()
            .position(|t| t.as_slice() == [CASET])
            .expect("CASET issued");
        assert_eq!(
            transfers[caset_idx + 1].as_slice(),
            [0x00, 0x01, 0x00, SCREEN_WIDTH as u8]
        );
        let raset_idx = transfers
            .iter()
            .position(|t| t.as_slice() == [RASET])
            .expect("RASET issued");
        assert_eq!(
            transfers[raset_idx + 1].as_slice(),
            [0x00, 0x00, 0x00, (SCREEN_HEIGHT - 1) as u8]
        );
    }

    #[test]
    fn test_init_sequence_order_and_dc_framing() {
        let spi = MockSpi::new();
        let transfers = spi.transfers();
        let mut display = transport(spi);
        display.init().unwrap();

        let transfers = transfers.lock().unwrap();
        let expected: Vec<Vec<u8>> = vec![
            vec![SWRESET],
            vec![SLPOUT],
            vec![COLMOD],
            vec![0x55], // 16bpp packed color
            vec![MADCTL],
            vec![MADCTL_VALUE],
            vec![INVON],
            vec![DISPON],
        ];
        assert_eq!(*transfers, expected);
    }

    #[test]
    fn test_inversion_skipped_for_non_inverting_panels() {
        let spi = MockSpi::new();
        let transfers = spi.transfers();
        let mut display =
            St7735::new(spi, Arc::new(MockBackend::new()), false).unwrap();
        display.init().unwrap();

        let transfers = transfers.lock().unwrap();
        assert!(!transfers.iter().any(|t| t.as_slice() == [INVON]));
    }
}
