//! Form widget: one bordered row per field.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

/// Character drawn for each hidden password character.
const MASK_CHAR: char = '\u{2022}';

/// Render data for a single form row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    /// Display label shown in the row border.
    pub label: String,
    /// Text shown inside the row.
    pub value: String,
    /// Hint shown when `value` is empty.
    pub placeholder: String,
    /// Whether to show the selection check next to the value.
    pub confirmed: bool,
}

impl FormField {
    /// Creates a row showing `value` as-is.
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            placeholder: String::new(),
            confirmed: false,
        }
    }

    /// Creates a row whose value is hidden unless `visible` is set.
    pub fn secret(label: impl Into<String>, value: &str, visible: bool) -> Self {
        let shown = if visible {
            value.to_owned()
        } else {
            mask(value)
        };
        Self::new(label, shown)
    }

    /// Sets the hint shown while the value is empty.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Sets whether the selection check is shown.
    pub fn with_confirmed(mut self, confirmed: bool) -> Self {
        self.confirmed = confirmed;
        self
    }
}

/// Replaces every character of `value` with the mask character.
pub fn mask(value: &str) -> String {
    value.chars().map(|_| MASK_CHAR).collect()
}

/// Returns the height a form with `count` rows needs.
pub fn form_height(count: usize) -> u16 {
    u16::try_from(count).unwrap_or(u16::MAX).saturating_mul(ROW_HEIGHT)
}

const ROW_HEIGHT: u16 = 3;

/// Renders `fields` top to bottom, highlighting the row at `focus`.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
pub fn draw_form(fields: &[FormField], focus: usize, frame: &mut Frame, area: Rect) {
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(ROW_HEIGHT))
        .collect();
    let rows = Layout::vertical(constraints).split(area);

    for (i, (field, row)) in fields.iter().zip(rows.iter()).enumerate() {
        let is_focused = i == focus;
        let border_color = if is_focused {
            Color::Yellow
        } else {
            Color::DarkGray
        };

        let block = Block::default()
            .title(field.label.as_str())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color));

        let mut spans = if field.value.is_empty() && !is_focused {
            vec![Span::styled(
                field.placeholder.as_str(),
                Style::default().fg(Color::DarkGray),
            )]
        } else {
            vec![Span::raw(field.value.as_str())]
        };
        if is_focused {
            spans.push(Span::styled(
                "\u{2588}",
                Style::default().add_modifier(Modifier::SLOW_BLINK),
            ));
        }
        if field.confirmed {
            spans.push(Span::styled(" \u{2713}", Style::default().fg(Color::Green)));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)).block(block), *row);
    }
}
