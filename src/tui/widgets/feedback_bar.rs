//! Feedback bar: one line showing the submission indicators.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

/// Data passed to the feedback bar; decoupled from the controller so the
/// widget can be rendered from plain values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedbackContext {
    /// The success pulse is active.
    pub saved: bool,
    /// The failure pulse is active.
    pub rejected: bool,
    /// A load or save is in progress.
    pub busy: bool,
    /// A message from the last failed operation, if any.
    pub notice: Option<String>,
}

/// Renders a one-line feedback bar.
///
/// Display format (left-aligned):
/// - Success pulse:  `✓ Saved` in Green
/// - Failure pulse:  `✗ Fill in every field` in Red
/// - Busy:           `Saving…` in Yellow
/// - Then the notice, if any, in Red.
///
/// Renders nothing when no indicator is active and there is no notice.
#[mutants::skip]
pub fn draw_feedback_bar(ctx: &FeedbackContext, frame: &mut Frame, area: Rect) {
    let mut spans: Vec<Span> = Vec::new();

    if ctx.saved {
        spans.push(Span::styled(
            "\u{2713} Saved",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ));
    }
    if ctx.rejected {
        spans.push(Span::styled(
            "\u{2717} Fill in every field",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }
    if ctx.busy {
        spans.push(Span::styled("Saving\u{2026}", Style::default().fg(Color::Yellow)));
    }
    if let Some(notice) = &ctx.notice {
        if !spans.is_empty() {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(notice.clone(), Style::default().fg(Color::Red)));
    }

    if spans.is_empty() {
        return;
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
