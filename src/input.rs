//! Debounced, edge-triggered button sampling.
//!
//! [`InputSampler::poll`] reads every monitored line once per tick and queues
//! one [`ButtonEvent`] per qualifying falling edge (press). The debounce
//! window suppresses contact bounce; level tracking is updated on every call
//! so a missed tick never desyncs edge detection.
//!
//! [`InputSampler::pins_held`] is a separate raw-level snapshot used for the
//! shutdown combo: a combo is a *level* condition (both keys down for the
//! whole hold), not a pair of coincident edges, so it deliberately bypasses
//! the debounce records and the queue.
//!
//! The queue and debounce table sit behind a mutex so a dedicated sampler
//! thread may drive `poll` while the control loop consumes `get_event`.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use tracing::{debug, trace};

use crate::config::pins;
use crate::config::DEBOUNCE_WINDOW;
use crate::gpio::{GpioBackend, GpioError};

/// A discrete button press. Produced exactly once per qualifying edge.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ButtonEvent {
    Up,
    Down,
    Left,
    Right,
    Select,
    Key1,
    Key2,
    Key3,
}

/// Pin-to-event mapping for every monitored line.
const PIN_EVENTS: [(u8, ButtonEvent); 8] = [
    (pins::JOY_UP, ButtonEvent::Up),
    (pins::JOY_DOWN, ButtonEvent::Down),
    (pins::JOY_LEFT, ButtonEvent::Left),
    (pins::JOY_RIGHT, ButtonEvent::Right),
    (pins::JOY_PRESS, ButtonEvent::Select),
    (pins::KEY1, ButtonEvent::Key1),
    (pins::KEY2, ButtonEvent::Key2),
    (pins::KEY3, ButtonEvent::Key3),
];

/// Per-pin debounce state.
struct DebounceRecord {
    pressed: bool,
    last_accepted: Option<Instant>,
}

struct SamplerState {
    records: HashMap<u8, DebounceRecord>,
    queue: VecDeque<ButtonEvent>,
}

/// Polls the monitored pins, detects debounced press edges and maintains the
/// event FIFO.
pub struct InputSampler {
    gpio: Arc<dyn GpioBackend>,
    state: Mutex<SamplerState>,
}

impl InputSampler {
    /// Claim every monitored line as a pulled-up input.
    pub fn new(gpio: Arc<dyn GpioBackend>) -> Result<Self, GpioError> {
        let mut records = HashMap::new();
        for (pin, _) in PIN_EVENTS {
            gpio.claim_input(pin)?;
            records.insert(
                pin,
                DebounceRecord {
                    pressed: false,
                    last_accepted: None,
                },
            );
        }
        Ok(Self {
            gpio,
            state: Mutex::new(SamplerState {
                records,
                queue: VecDeque::new(),
            }),
        })
    }

    /// Sample all pins once.
    pub fn poll(&self) {
        self.poll_at(Instant::now());
    }

    /// Sample all pins against an explicit clock. A fresh falling edge is
    /// queued only if the pin's debounce window has elapsed; the recorded
    /// level is updated unconditionally.
    pub fn poll_at(&self, now: Instant) {
        let mut guard = self.state.lock().unwrap();
        let SamplerState { records, queue } = &mut *guard;
        for (pin, event) in PIN_EVENTS {
            // Active-low: a read failure counts as released so one flaky line
            // cannot flood the queue.
            let pressed = matches!(self.gpio.read(pin), Ok(false));
            let record = records.get_mut(&pin).expect("record per pin");

            let fresh_edge = pressed && !record.pressed;
            let debounced = match record.last_accepted {
                Some(last) => now.duration_since(last) >= DEBOUNCE_WINDOW,
                None => true,
            };
            record.pressed = pressed;

            if fresh_edge && debounced {
                record.last_accepted = Some(now);
                queue.push_back(event);
                trace!(?event, "queued");
            }
        }
    }

    /// Pop the oldest queued event, if any.
    pub fn get_event(&self) -> Option<ButtonEvent> {
        self.state.lock().unwrap().queue.pop_front()
    }

    /// Discard every queued event.
    pub fn drain(&self) {
        let mut state = self.state.lock().unwrap();
        if !state.queue.is_empty() {
            debug!(discarded = state.queue.len(), "event queue drained");
            state.queue.clear();
        }
    }

    /// Raw snapshot: are all of `set` currently pressed? Bypasses debounce
    /// and the queue; the combo must see "still held" every tick, not a
    /// one-shot edge.
    pub fn pins_held(&self, set: &[u8]) -> bool {
        set.iter().all(|&pin| matches!(self.gpio.read(pin), Ok(false)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MockBackend;
    use std::time::Duration;

    fn sampler() -> (InputSampler, Arc<MockBackend>) {
        let backend = Arc::new(MockBackend::new());
        let sampler = InputSampler::new(backend.clone() as Arc<dyn GpioBackend>).unwrap();
        (sampler, backend)
    }

    #[test]
    fn test_press_produces_single_event() {
        let (sampler, gpio) = sampler();
        let t0 = Instant::now();

        gpio.press(pins::JOY_UP);
        sampler.poll_at(t0);
        assert_eq!(sampler.get_event(), Some(ButtonEvent::Up));
        assert_eq!(sampler.get_event(), None);
    }

    #[test]
    fn test_held_pin_is_edge_triggered() {
        let (sampler, gpio) = sampler();
        let t0 = Instant::now();

        gpio.press(pins::JOY_PRESS);
        for tick in 0..20 {
            sampler.poll_at(t0 + Duration::from_millis(100 * tick));
        }
        assert_eq!(sampler.get_event(), Some(ButtonEvent::Select));
        assert_eq!(sampler.get_event(), None);
    }

    #[test]
    fn test_bounce_within_window_is_suppressed() {
        let (sampler, gpio) = sampler();
        let t0 = Instant::now();

        gpio.press(pins::KEY1);
        sampler.poll_at(t0);
        gpio.release(pins::KEY1);
        sampler.poll_at(t0 + Duration::from_millis(40));
        gpio.press(pins::KEY1);
        sampler.poll_at(t0 + Duration::from_millis(80));

        assert_eq!(sampler.get_event(), Some(ButtonEvent::Key1));
        assert_eq!(sampler.get_event(), None);
    }

    #[test]
    fn test_separate_presses_outside_window_both_queue() {
        let (sampler, gpio) = sampler();
        let t0 = Instant::now();

        gpio.press(pins::KEY1);
        sampler.poll_at(t0);
        gpio.release(pins::KEY1);
        sampler.poll_at(t0 + Duration::from_millis(100));
        gpio.press(pins::KEY1);
        sampler.poll_at(t0 + Duration::from_millis(200));

        assert_eq!(sampler.get_event(), Some(ButtonEvent::Key1));
        assert_eq!(sampler.get_event(), Some(ButtonEvent::Key1));
        assert_eq!(sampler.get_event(), None);
    }

    #[test]
    fn test_level_tracking_updates_without_queueing() {
        let (sampler, gpio) = sampler();
        let t0 = Instant::now();

        // Press and release entirely inside the debounce window.
        gpio.press(pins::JOY_DOWN);
        sampler.poll_at(t0);
        assert_eq!(sampler.get_event(), Some(ButtonEvent::Down));

        gpio.release(pins::JOY_DOWN);
        sampler.poll_at(t0 + Duration::from_millis(50));
        gpio.press(pins::JOY_DOWN);
        sampler.poll_at(t0 + Duration::from_millis(60));
        // Suppressed by debounce, but the level must have been recorded:
        gpio.release(pins::JOY_DOWN);
        sampler.poll_at(t0 + Duration::from_millis(400));
        gpio.press(pins::JOY_DOWN);
        sampler.poll_at(t0 + Duration::from_millis(450));
        assert_eq!(sampler.get_event(), Some(ButtonEvent::Down));
        assert_eq!(sampler.get_event(), None);
    }

    #[test]
    fn test_pins_held_bypasses_queue() {
        let (sampler, gpio) = sampler();
        let t0 = Instant::now();

        gpio.press(pins::KEY1);
        gpio.press(pins::KEY2);
        sampler.poll_at(t0);

        assert!(sampler.pins_held(&pins::SHUTDOWN_COMBO));
        // The queue still holds both edges; held-state did not consume them.
        assert_eq!(sampler.get_event(), Some(ButtonEvent::Key1));
        assert_eq!(sampler.get_event(), Some(ButtonEvent::Key2));

        gpio.release(pins::KEY2);
        assert!(!sampler.pins_held(&pins::SHUTDOWN_COMBO));
    }

    #[test]
    fn test_drain_empties_queue() {
        let (sampler, gpio) = sampler();
        gpio.press(pins::KEY1);
        gpio.press(pins::KEY3);
        sampler.poll_at(Instant::now());
        sampler.drain();
        assert_eq!(sampler.get_event(), None);
    }
}
