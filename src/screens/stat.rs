//! STAT screen - system information dashboard.

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::Text;

use crate::colors::{AMBER, AMBER_TINT, BG};
use crate::config::{BODY_TOP, LINE_HEIGHT, SCREEN_WIDTH};
use crate::frame::Frame;
use crate::input::ButtonEvent;
use crate::metrics::SystemMetrics;
use crate::styles::{LABEL_STYLE, SMALL_FONT, VALUE_STYLE};
use crate::widgets::{draw_divider, draw_footer, draw_header};

use super::{Nav, Screen};

/// System info dashboard fed by the metrics provider.
pub struct StatScreen {
    metrics: SystemMetrics,
}

impl StatScreen {
    /// Creating the provider primes the first CPU sample, so the screen shows
    /// a real percentage from its second frame on.
    pub fn new() -> Self {
        Self {
            metrics: SystemMetrics::new(),
        }
    }
}

impl Default for StatScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for StatScreen {
    fn title(&self) -> &'static str {
        "STAT"
    }

    fn handle_event(&mut self, _event: ButtonEvent) {
        // No interactive elements; navigation is handled by the main loop.
    }

    fn render(&mut self, frame: &mut Frame, nav: Nav) {
        frame.clear(BG).ok();
        draw_header(frame, self.title(), nav.index, nav.count);

        let (ram_used, ram_total) = self.metrics.ram_info();
        let (disk_used, disk_total) = self.metrics.disk_info();
        let rows = [
            ("CPU", self.metrics.cpu_percent()),
            ("RAM", format!("{ram_used}/{ram_total}")),
            ("DISK", format!("{disk_used}/{disk_total}")),
            ("IP", self.metrics.ip_address()),
            ("UP", self.metrics.uptime()),
            ("TEMP", self.metrics.cpu_temp()),
        ];

        let mut y = BODY_TOP + 8;
        for (label, value) in rows {
            let label = format!("{label}:");
            Text::new(&label, Point::new(4, y), LABEL_STYLE).draw(frame).ok();
            let label_w = label.len() as i32 * 6;
            Text::new(&value, Point::new(6 + label_w, y), VALUE_STYLE)
                .draw(frame)
                .ok();
            y += LINE_HEIGHT;
        }

        draw_divider(frame, y - 4);

        // The X306 UPS exposes no battery telemetry; point at its LEDs.
        let box_top = y;
        Rectangle::new(Point::new(2, box_top), Size::new(SCREEN_WIDTH - 5, 17))
            .into_styled(
                PrimitiveStyle::with_fill(AMBER_TINT),
            )
            .draw(frame)
            .ok();
        Rectangle::new(Point::new(2, box_top), Size::new(SCREEN_WIDTH - 5, 17))
            .into_styled(PrimitiveStyle::with_stroke(AMBER, 1))
            .draw(frame)
            .ok();
        let warn = MonoTextStyle::new(SMALL_FONT, AMBER);
        Text::new("BATT: check the 4", Point::new(5, box_top + 7), warn)
            .draw(frame)
            .ok();
        Text::new("LEDs on the UPS", Point::new(5, box_top + 14), warn)
            .draw(frame)
            .ok();

        draw_footer(frame, "<> switch screen");
    }
}
