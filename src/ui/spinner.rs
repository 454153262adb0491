//! Request indicator for the list border.
//!
//! Only drawn when the list view surfaces its request state; under the
//! silent policy a pending fetch looks exactly like an idle view.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};
use url::Url;

use crate::app::list_view::{DataFrameListView, FailurePolicy};

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// `⠹ GET localhost:5000 #3`, right-aligned on the top border while a list
/// request is outstanding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchIndicator {
    pub visible: bool,
    /// Event-loop tick; picks the spinner frame.
    pub tick: u64,
    /// `host[:port]` the request went to.
    pub target: String,
    pub generation: u64,
}

impl FetchIndicator {
    /// Indicator state for `view`.  Hidden unless the view is fetching and
    /// its policy is [`FailurePolicy::Surface`].
    pub fn for_view<R>(view: &DataFrameListView<R>, tick: u64) -> Self {
        Self {
            visible: view.is_fetching() && view.failure_policy() == FailurePolicy::Surface,
            tick,
            target: request_target(view.url()),
            generation: view.generation(),
        }
    }

    fn label(&self) -> String {
        let frame = SPINNER_FRAMES[(self.tick as usize) % SPINNER_FRAMES.len()];
        format!(" {frame} GET {} #{} ", self.target, self.generation)
    }
}

fn request_target(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return url.to_string();
    };
    match (parsed.host_str(), parsed.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_string(),
        _ => url.to_string(),
    }
}

impl Widget for FetchIndicator {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.visible || area.height == 0 {
            return;
        }

        let label = self.label();
        let label_width = label.chars().count() as u16;
        // Leave both corners of the border alone.
        if label_width + 2 > area.width {
            return;
        }
        let x = area.x + area.width - label_width - 1;

        let line = Line::from(Span::styled(
            label,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
        buf.set_line(x, area.y, &line, label_width);
    }
}
