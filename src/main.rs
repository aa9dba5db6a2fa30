//! Pip-Boy interface binary for the Waveshare 1.44" LCD HAT.
//!
//! Bring-up order: logging, GPIO backend selection, SPI/display init, input
//! sampler, screens, then the fixed 10 Hz control loop. Teardown (stop
//! playback, blank the panel, drop the backlight, release GPIO) runs on every
//! exit path - SIGINT, confirmed shutdown and errors alike.

use std::process::Command;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use pipboy_hat::app::{App, TickAction};
use pipboy_hat::config::{Config, TICK_PERIOD};
use pipboy_hat::display::St7735;
use pipboy_hat::gpio;
use pipboy_hat::input::InputSampler;
use pipboy_hat::playback::{Playback, ProcessPlayer};
use pipboy_hat::screens::{InventoryScreen, RadioScreen, Screen, StatScreen};

/// Why the control loop stopped.
enum LoopExit {
    Interrupted,
    PowerOff,
}

fn main() -> Result<()> {
    init_logging();
    let config = Config::from_env();
    info!(root = %config.root.display(), "starting");

    // Fatal startup path: no backend or no SPI means no point entering the
    // loop. Errors propagate out of main for a non-zero exit.
    let backend = gpio::select_backend().context("no usable GPIO backend")?;
    let spi = rppal::spi::Spi::new(
        rppal::spi::Bus::Spi0,
        rppal::spi::SlaveSelect::Ss0,
        config.spi_clock_hz,
        rppal::spi::Mode::Mode0,
    )
    .context("opening /dev/spidev0.0")?;

    let mut display = St7735::new(spi, Arc::clone(&backend), config.invert_colors)
        .context("claiming display control lines")?;
    display.init().context("display power-up sequence")?;

    let sampler = InputSampler::new(Arc::clone(&backend)).context("claiming input lines")?;

    let playback = ProcessPlayer::detect().map(|p| Box::new(p) as Box<dyn Playback>);
    let screens: Vec<Box<dyn Screen>> = vec![
        Box::new(StatScreen::new()),
        Box::new(InventoryScreen::new(config.inventory_file())),
        Box::new(RadioScreen::new(config.music_dir(), playback)),
    ];
    let mut app = App::new(sampler, screens);

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = Arc::clone(&running);
        ctrlc::set_handler(move || running.store(false, Ordering::SeqCst))
            .context("installing SIGINT handler")?;
    }

    info!("entering control loop");
    let exit = run_loop(&mut app, &mut display, &running);

    // Teardown runs here for every loop outcome; the Drop impls on the
    // playback child and the sysfs backend cover panic unwinds as well.
    app.shutdown_screens();
    if let Err(err) = display.blank() {
        warn!("blanking display failed: {err}");
    }
    if let Err(err) = display.cleanup() {
        warn!("display cleanup failed: {err}");
    }
    backend.release_all();

    match exit {
        LoopExit::Interrupted => {
            info!("interrupted, exiting");
            Ok(())
        }
        LoopExit::PowerOff => {
            info!("powering off");
            let status = Command::new("poweroff").status();
            if let Err(err) = status {
                error!("poweroff command failed: {err}");
            }
            Ok(())
        }
    }
}

/// Fixed-rate scheduler: tick, render, blit, sleep the remainder. An overrun
/// tick just runs behind schedule; no frame is skipped.
fn run_loop<S: pipboy_hat::display::SpiPort>(
    app: &mut App,
    display: &mut St7735<S>,
    running: &AtomicBool,
) -> LoopExit {
    while running.load(Ordering::SeqCst) {
        let tick_start = Instant::now();

        let action = app.tick(tick_start);
        let frame = app.render(Instant::now());
        if let Err(err) = display.blit(&frame) {
            // A transient SPI failure should not kill the interface.
            warn!("frame transfer failed: {err}");
        }

        if action == TickAction::PowerOff {
            return LoopExit::PowerOff;
        }

        if let Some(remaining) = TICK_PERIOD.checked_sub(tick_start.elapsed()) {
            thread::sleep(remaining);
        }
    }
    LoopExit::Interrupted
}

fn init_logging() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().compact())
        .init();
}
