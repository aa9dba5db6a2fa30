//! Screens for the Pip-Boy interface.
//!
//! Each screen implements the [`Screen`] contract: it consumes the single
//! button event dispatched per tick and renders itself into a fresh frame.
//! Left/Right navigation between screens is handled above this layer.

mod inventory;
mod radio;
mod stat;

pub use inventory::InventoryScreen;
pub use radio::RadioScreen;
pub use stat::StatScreen;

use crate::frame::Frame;
use crate::input::ButtonEvent;

/// Position of a screen in the rotation, for the header indicator.
#[derive(Clone, Copy, Debug)]
pub struct Nav {
    pub index: usize,
    pub count: usize,
}

/// The polymorphic screen contract.
pub trait Screen {
    /// Title shown in the header bar.
    fn title(&self) -> &'static str;

    /// Handle one dispatched button event.
    fn handle_event(&mut self, event: ButtonEvent);

    /// Per-tick time-based update (e.g. playback auto-advance). Default no-op.
    fn tick(&mut self) {}

    /// Draw the screen into `frame`.
    fn render(&mut self, frame: &mut Frame, nav: Nav);

    /// Release screen-held resources ahead of process exit. Default no-op.
    fn shutdown(&mut self) {}
}
