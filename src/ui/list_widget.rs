//! Custom Ratatui widget that renders the dataframe list, one record per row.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, StatefulWidget, Widget},
};

use crate::core::record::RecordDisplay;

use super::theme::Theme;

// ───────────────────────────────────────── state ─────────────

/// Persistent state for the list widget (selected index, scroll offset).
#[derive(Debug, Default)]
pub struct ListWidgetState {
    /// Index of the highlighted record.
    pub selected: usize,
    /// Vertical scroll offset (first visible row).
    pub offset: usize,
}

impl ListWidgetState {
    pub fn select_next(&mut self, max: usize) {
        if max > 0 && self.selected < max - 1 {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Ensure the selected row is visible within the viewport of `height` rows.
    pub fn clamp_scroll(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + height {
            self.offset = self.selected - height + 1;
        }
    }
}

// ───────────────────────────────────────── widget ────────────

/// The list widget itself — created fresh each frame.
pub struct ListWidget<'a, R> {
    records: &'a [R],
    block: Option<Block<'a>>,
    /// Text shown when there is nothing to list.
    placeholder: &'a str,
}

impl<'a, R: RecordDisplay> ListWidget<'a, R> {
    pub fn new(records: &'a [R]) -> Self {
        Self {
            records,
            block: None,
            placeholder: "",
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    pub fn placeholder(mut self, text: &'a str) -> Self {
        self.placeholder = text;
        self
    }
}

impl<'a, R: RecordDisplay> StatefulWidget for ListWidget<'a, R> {
    type State = ListWidgetState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let inner = if let Some(ref block) = self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };
        if inner.height == 0 {
            return;
        }

        if self.records.is_empty() {
            let line = Line::from(Span::styled(self.placeholder, Theme::placeholder_style()));
            buf.set_line(inner.x, inner.y, &line, inner.width);
            return;
        }

        state.clamp_scroll(inner.height as usize);

        let visible = self
            .records
            .iter()
            .enumerate()
            .skip(state.offset)
            .take(inner.height as usize);

        for (i, (idx, record)) in visible.enumerate() {
            let y = inner.y + i as u16;
            let is_selected = idx == state.selected;
            let (marker, style) = if is_selected {
                ("▸ ", Theme::selected_style())
            } else {
                ("  ", Theme::record_style())
            };
            let line = Line::from(vec![
                Span::styled(format!("{:>3} ", idx + 1), Theme::index_style()),
                Span::styled(format!("{marker}{}", record.label()), style),
            ]);
            buf.set_line(inner.x, y, &line, inner.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn row_text(buf: &Buffer, y: u16) -> String {
        let area = buf.area;
        (area.x..area.x + area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect::<String>()
            .trim_end()
            .to_string()
    }

    #[test]
    fn renders_records_in_order() {
        let records = vec![json!({"id": "df1", "columns": ["a"]}), json!({"id": "df2"})];
        let area = Rect::new(0, 0, 40, 3);
        let mut buf = Buffer::empty(area);
        let mut state = ListWidgetState::default();

        ListWidget::new(&records).render(area, &mut buf, &mut state);

        assert_eq!(row_text(&buf, 0), "  1 ▸ df1  [a]");
        assert!(row_text(&buf, 1).starts_with("  2   df2"));
        assert_eq!(row_text(&buf, 2), "");
    }

    #[test]
    fn empty_list_shows_placeholder() {
        let records: Vec<Value> = Vec::new();
        let area = Rect::new(0, 0, 20, 2);
        let mut buf = Buffer::empty(area);
        let mut state = ListWidgetState::default();

        ListWidget::new(&records)
            .placeholder("no dataframes")
            .render(area, &mut buf, &mut state);

        assert_eq!(row_text(&buf, 0), "no dataframes");
    }

    #[test]
    fn scroll_follows_selection() {
        let mut state = ListWidgetState {
            selected: 7,
            offset: 0,
        };
        state.clamp_scroll(3);
        assert_eq!(state.offset, 5);
        state.selected = 2;
        state.clamp_scroll(3);
        assert_eq!(state.offset, 2);
    }
}
