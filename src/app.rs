//! Application state machine: screen navigation and shutdown confirmation.
//!
//! One tick runs, in order: sample input, evaluate the combo/shutdown
//! condition, dispatch at most one queued event, advance the active screen's
//! time-based state. Rendering happens separately so the caller controls the
//! frame's lifetime.
//!
//! The shutdown combo is a level condition checked every tick through the raw
//! [`InputSampler::pins_held`] path. Entering the confirmation drains the
//! queue: the two presses that created the held condition were also queued as
//! discrete edges and must not reach the active screen's Key1/Key2 handlers.

use std::time::Instant;

use tracing::{debug, info};

use crate::config::pins::SHUTDOWN_COMBO;
use crate::config::CONFIRM_WINDOW;
use crate::frame::Frame;
use crate::input::{ButtonEvent, InputSampler};
use crate::screens::{Nav, Screen};
use crate::widgets::draw_shutdown_overlay;

/// Shutdown confirmation sub-state.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ShutdownState {
    Idle,
    Confirming { deadline: Instant },
}

/// What the control loop should do after a tick.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TickAction {
    /// Keep looping.
    Continue,
    /// The countdown expired: release everything and power off.
    PowerOff,
}

/// Owns the screens, the active index and the shutdown sub-state.
pub struct App {
    sampler: InputSampler,
    screens: Vec<Box<dyn Screen>>,
    current: usize,
    shutdown: ShutdownState,
}

impl App {
    pub fn new(sampler: InputSampler, screens: Vec<Box<dyn Screen>>) -> Self {
        assert!(!screens.is_empty());
        Self {
            sampler,
            screens,
            current: 0,
            shutdown: ShutdownState::Idle,
        }
    }

    /// Current shutdown sub-state, for the render path and tests.
    pub fn shutdown_state(&self) -> ShutdownState {
        self.shutdown
    }

    /// Active screen index.
    pub fn current_screen(&self) -> usize {
        self.current
    }

    /// Run one control tick against an explicit clock.
    pub fn tick(&mut self, now: Instant) -> TickAction {
        self.sampler.poll_at(now);

        match self.shutdown {
            ShutdownState::Idle => {
                if self.sampler.pins_held(&SHUTDOWN_COMBO) {
                    self.shutdown = ShutdownState::Confirming {
                        deadline: now + CONFIRM_WINDOW,
                    };
                    // The combo edges are already queued; nothing from this
                    // tick may leak into screen dispatch.
                    self.sampler.drain();
                    info!("shutdown combo held, confirming");
                    return TickAction::Continue;
                }
            }
            ShutdownState::Confirming { deadline } => {
                // Any press cancels; the event is consumed, never dispatched.
                if let Some(event) = self.sampler.get_event() {
                    debug!(?event, "shutdown cancelled");
                    self.shutdown = ShutdownState::Idle;
                    return TickAction::Continue;
                }
                if now >= deadline {
                    info!("shutdown confirmed");
                    return TickAction::PowerOff;
                }
                return TickAction::Continue;
            }
        }

        if let Some(event) = self.sampler.get_event() {
            let count = self.screens.len();
            match event {
                ButtonEvent::Left => {
                    self.current = (self.current + count - 1) % count;
                    debug!(screen = self.current, "navigate left");
                }
                ButtonEvent::Right => {
                    self.current = (self.current + 1) % count;
                    debug!(screen = self.current, "navigate right");
                }
                other => self.screens[self.current].handle_event(other),
            }
        }

        self.screens[self.current].tick();
        TickAction::Continue
    }

    /// Render the active screen, or the shutdown overlay while confirming,
    /// into a fresh frame.
    pub fn render(&mut self, now: Instant) -> Frame {
        let mut frame = Frame::new();
        match self.shutdown {
            ShutdownState::Confirming { deadline } => {
                let remaining = deadline.saturating_duration_since(now);
                draw_shutdown_overlay(&mut frame, remaining);
            }
            ShutdownState::Idle => {
                let nav = Nav {
                    index: self.current,
                    count: self.screens.len(),
                };
                self.screens[self.current].render(&mut frame, nav);
            }
        }
        frame
    }

    /// Tell every screen to release what it holds (playback, file handles).
    pub fn shutdown_screens(&mut self) {
        for screen in &mut self.screens {
            screen.shutdown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::pins;
    use crate::gpio::GpioBackend;
    use crate::testutil::MockBackend;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Screen double recording the events it receives.
    struct RecordingScreen {
        received: Arc<Mutex<Vec<ButtonEvent>>>,
    }

    impl Screen for RecordingScreen {
        fn title(&self) -> &'static str {
            "REC"
        }

        fn handle_event(&mut self, event: ButtonEvent) {
            self.received.lock().unwrap().push(event);
        }

        fn render(&mut self, _frame: &mut Frame, _nav: Nav) {}
    }

    fn app_with_screens(count: usize) -> (App, Arc<MockBackend>, Arc<Mutex<Vec<ButtonEvent>>>) {
        let backend = Arc::new(MockBackend::new());
        let sampler = InputSampler::new(backend.clone() as Arc<dyn GpioBackend>).unwrap();
        let received = Arc::new(Mutex::new(Vec::new()));
        let screens: Vec<Box<dyn Screen>> = (0..count)
            .map(|_| {
                Box::new(RecordingScreen {
                    received: Arc::clone(&received),
                }) as Box<dyn Screen>
            })
            .collect();
        (App::new(sampler, screens), backend, received)
    }

    /// One press-and-release cycle far enough apart to beat debounce.
    fn pulse(app: &mut App, gpio: &MockBackend, pin: u8, at: Instant) -> TickAction {
        gpio.press(pin);
        let action = app.tick(at);
        gpio.release(pin);
        action
    }

    #[test]
    fn test_right_navigation_wraps_after_n_steps() {
        let (mut app, gpio, _) = app_with_screens(3);
        let t0 = Instant::now();
        for i in 0..3u64 {
            pulse(&mut app, &gpio, pins::JOY_RIGHT, t0 + Duration::from_millis(400 * i));
            app.tick(t0 + Duration::from_millis(400 * i + 200));
        }
        assert_eq!(app.current_screen(), 0);
    }

    #[test]
    fn test_left_from_zero_wraps_to_last() {
        let (mut app, gpio, _) = app_with_screens(3);
        pulse(&mut app, &gpio, pins::JOY_LEFT, Instant::now());
        assert_eq!(app.current_screen(), 2);
    }

    #[test]
    fn test_non_nav_events_reach_active_screen() {
        let (mut app, gpio, received) = app_with_screens(2);
        pulse(&mut app, &gpio, pins::JOY_PRESS, Instant::now());
        assert_eq!(received.lock().unwrap().as_slice(), [ButtonEvent::Select]);
    }

    #[test]
    fn test_combo_hold_enters_confirming_and_drains_queue() {
        let (mut app, gpio, received) = app_with_screens(2);
        let t0 = Instant::now();

        gpio.press(pins::KEY1);
        gpio.press(pins::KEY2);
        assert_eq!(app.tick(t0), TickAction::Continue);

        assert!(matches!(
            app.shutdown_state(),
            ShutdownState::Confirming { .. }
        ));
        // Both queued edges were discarded, none reached the screen.
        assert!(received.lock().unwrap().is_empty());

        // The drained queue must not cancel the countdown on the next tick.
        assert_eq!(
            app.tick(t0 + Duration::from_millis(200)),
            TickAction::Continue
        );
        assert!(matches!(
            app.shutdown_state(),
            ShutdownState::Confirming { .. }
        ));
    }

    #[test]
    fn test_countdown_expires_into_poweroff() {
        let (mut app, gpio, _) = app_with_screens(2);
        let t0 = Instant::now();

        gpio.press(pins::KEY1);
        gpio.press(pins::KEY2);
        app.tick(t0);

        // Keep holding; just before the deadline nothing happens.
        assert_eq!(
            app.tick(t0 + Duration::from_millis(2900)),
            TickAction::Continue
        );
        assert_eq!(
            app.tick(t0 + Duration::from_secs(3)),
            TickAction::PowerOff
        );
    }

    #[test]
    fn test_any_event_cancels_countdown_without_dispatch() {
        let (mut app, gpio, received) = app_with_screens(2);
        let t0 = Instant::now();

        gpio.press(pins::KEY1);
        gpio.press(pins::KEY2);
        app.tick(t0);
        gpio.release(pins::KEY1);
        gpio.release(pins::KEY2);

        // A third button press inside the window cancels.
        gpio.press(pins::KEY3);
        assert_eq!(
            app.tick(t0 + Duration::from_millis(500)),
            TickAction::Continue
        );
        assert_eq!(app.shutdown_state(), ShutdownState::Idle);
        // The cancelling event must not reach screen logic.
        assert!(received.lock().unwrap().is_empty());
    }

    #[test]
    fn test_navigation_suppressed_while_confirming() {
        let (mut app, gpio, _) = app_with_screens(3);
        let t0 = Instant::now();

        gpio.press(pins::KEY1);
        gpio.press(pins::KEY2);
        app.tick(t0);
        gpio.release(pins::KEY1);
        gpio.release(pins::KEY2);

        // Right is consumed as a cancel, not as navigation.
        gpio.press(pins::JOY_RIGHT);
        app.tick(t0 + Duration::from_millis(500));
        assert_eq!(app.current_screen(), 0);
        assert_eq!(app.shutdown_state(), ShutdownState::Idle);
    }

    #[test]
    fn test_silent_release_still_powers_off() {
        let (mut app, gpio, _) = app_with_screens(2);
        let t0 = Instant::now();

        gpio.press(pins::KEY1);
        gpio.press(pins::KEY2);
        app.tick(t0);
        gpio.release(pins::KEY1);
        gpio.release(pins::KEY2);

        // Combo released with no new events: countdown keeps running until
        // the deadline, because only a queued event cancels.
        assert_eq!(
            app.tick(t0 + Duration::from_secs(3)),
            TickAction::PowerOff
        );
    }
}
