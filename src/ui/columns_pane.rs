//! Right-hand pane showing the column types of the inspected dataframe.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget, Wrap},
};

use crate::app::columns::ColumnsPromise;

use super::theme::Theme;

pub struct ColumnsPane<'a> {
    pub promise: &'a ColumnsPromise,
    pub block: Block<'a>,
}

impl ColumnsPane<'_> {
    fn lines(&self) -> Vec<Line<'static>> {
        match self.promise {
            ColumnsPromise::Empty => vec![Line::from(Span::styled(
                "select a dataframe and press Enter",
                Theme::placeholder_style(),
            ))],
            ColumnsPromise::Deferred(id) => vec![Line::from(Span::styled(
                format!("loading columns of {id}…"),
                Theme::placeholder_style(),
            ))],
            ColumnsPromise::Resolved(id, columns) => {
                let mut lines = vec![Line::from(Span::styled(id.clone(), Theme::title_style()))];
                if columns.is_empty() {
                    lines.push(Line::from(Span::styled("(no columns)", Theme::placeholder_style())));
                }
                let width = columns.keys().map(|k| k.chars().count()).max().unwrap_or(0);
                for (name, dtype) in columns {
                    lines.push(Line::from(vec![
                        Span::styled(format!("{name:<width$}  "), Theme::column_name_style()),
                        Span::styled(dtype.clone(), Theme::dtype_style()),
                    ]));
                }
                lines
            }
            ColumnsPromise::Rejected(id, err) => vec![
                Line::from(Span::styled(id.clone(), Theme::title_style())),
                Line::from(Span::styled(err.to_string(), Theme::error_style())),
            ],
        }
    }
}

impl Widget for ColumnsPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = self.lines();
        Paragraph::new(lines)
            .block(self.block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::FetchError;
    use crate::core::record::ColumnTypes;

    fn pane(promise: &ColumnsPromise) -> Vec<String> {
        ColumnsPane {
            promise,
            block: Block::default(),
        }
        .lines()
        .iter()
        .map(|l| l.to_string())
        .collect()
    }

    #[test]
    fn resolved_columns_are_aligned() {
        let mut cols = ColumnTypes::new();
        cols.insert("id".into(), "int64".into());
        cols.insert("value".into(), "float64".into());

        let lines = pane(&ColumnsPromise::Resolved("df1".into(), cols));

        assert_eq!(lines, vec!["df1", "id     int64", "value  float64"]);
    }

    #[test]
    fn rejection_shows_the_error() {
        let err = FetchError::Status {
            url: "http://localhost:5000/dataframe/nope/columns".into(),
            status: 404,
        };
        let lines = pane(&ColumnsPromise::Rejected("nope".into(), err));

        assert_eq!(lines[0], "nope");
        assert!(lines[1].contains("404"));
    }
}
