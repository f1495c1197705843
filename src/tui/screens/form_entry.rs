//! Form entry screen: the four inputs, the room picker, and the confirmation
//! panel shown after a save.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::controller::SubmitError;
use crate::model::{Field, FormRecord, RoomChoices};
use crate::tui::action::Action;
use crate::tui::widgets::{
    FeedbackContext, FormField, PickerOutcome, RoomPickerState, draw_feedback_bar, draw_form,
    draw_room_picker, form_height, mask,
};

/// Placeholder shown in the room row until a room is chosen.
const ROOM_PLACEHOLDER: &str = "Select a room";

/// State for the form entry screen.
///
/// Field values are not kept here; they are read from the form store on
/// every key press and every frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormEntryState {
    focus: Field,
    show_password: bool,
    picker: Option<RoomPickerState>,
    notice: Option<String>,
    confirmation: Option<FormRecord>,
}

impl Default for FormEntryState {
    fn default() -> Self {
        Self::new()
    }
}

impl FormEntryState {
    /// Creates a state focused on the first field with the password hidden.
    pub fn new() -> Self {
        Self {
            focus: Field::Name,
            show_password: false,
            picker: None,
            notice: None,
            confirmation: None,
        }
    }

    /// Handles a key event, returning an [`Action`] for the app to apply.
    ///
    /// `record` is the current form contents; edits are computed from it.
    pub fn handle_key(&mut self, key: KeyEvent, record: &FormRecord, rooms: &RoomChoices) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }
        if self.confirmation.take().is_some() {
            return Action::None;
        }
        if let Some(picker) = self.picker.as_mut() {
            return match picker.handle_key(key, rooms) {
                PickerOutcome::Pending => Action::None,
                PickerOutcome::Closed => {
                    self.picker = None;
                    Action::None
                }
                PickerOutcome::Selected(room) => {
                    self.picker = None;
                    self.edit(Field::Room, room)
                }
            };
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('s') => Action::Submit,
                KeyCode::Char('v') => {
                    self.show_password = !self.show_password;
                    Action::None
                }
                _ => Action::None,
            };
        }

        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.focus = cycle(self.focus, true);
                Action::None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = cycle(self.focus, false);
                Action::None
            }
            KeyCode::Esc => Action::Quit,
            KeyCode::Enter if self.focus == Field::Room => {
                self.open_picker(record, rooms);
                Action::None
            }
            KeyCode::Enter => Action::Submit,
            KeyCode::Char(' ') if self.focus == Field::Room => {
                self.open_picker(record, rooms);
                Action::None
            }
            KeyCode::Char(ch) if self.focus != Field::Room => {
                let mut value = record.get(self.focus).to_owned();
                value.push(ch);
                self.edit(self.focus, value)
            }
            KeyCode::Backspace if self.focus != Field::Room => {
                let mut value = record.get(self.focus).to_owned();
                if value.pop().is_none() {
                    return Action::None;
                }
                self.edit(self.focus, value)
            }
            _ => Action::None,
        }
    }

    /// Records the outcome of a submission for display.
    pub fn apply_outcome(&mut self, outcome: Result<FormRecord, SubmitError>) {
        match outcome {
            Ok(record) => {
                self.notice = None;
                self.confirmation = Some(record);
            }
            Err(SubmitError::Busy) => {}
            Err(e) => self.notice = Some(e.to_string()),
        }
    }

    /// Sets a message to display in the feedback bar.
    pub fn set_notice(&mut self, msg: String) {
        self.notice = Some(msg);
    }

    /// Returns the focused field.
    pub fn focus(&self) -> Field {
        self.focus
    }

    /// Returns `true` if the password is shown in clear text.
    pub fn show_password(&self) -> bool {
        self.show_password
    }

    /// Returns the open picker, if any.
    pub fn picker(&self) -> Option<&RoomPickerState> {
        self.picker.as_ref()
    }

    /// Returns the current notice, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Returns the record shown in the confirmation panel, if open.
    pub fn confirmation(&self) -> Option<&FormRecord> {
        self.confirmation.as_ref()
    }

    fn open_picker(&mut self, record: &FormRecord, rooms: &RoomChoices) {
        self.picker = Some(RoomPickerState::open(rooms, &record.room));
    }

    fn edit(&mut self, field: Field, value: String) -> Action {
        self.notice = None;
        Action::Edit(field, value)
    }
}

/// Returns the next or previous field in display order, wrapping around.
fn cycle(current: Field, forward: bool) -> Field {
    let len = Field::ALL.len();
    let pos = Field::ALL.iter().position(|&f| f == current).unwrap_or(0);
    let next = if forward {
        (pos + 1) % len
    } else {
        (pos + len - 1) % len
    };
    Field::ALL.get(next).copied().unwrap_or(Field::Name)
}

/// Builds the render rows for `record`.
fn form_fields(state: &FormEntryState, record: &FormRecord, room_confirmed: bool) -> Vec<FormField> {
    Field::ALL
        .into_iter()
        .map(|field| match field {
            Field::Password => {
                FormField::secret(field.label(), record.get(field), state.show_password)
            }
            Field::Room => FormField::new(field.label(), record.get(field))
                .with_placeholder(ROOM_PLACEHOLDER)
                .with_confirmed(room_confirmed),
            _ => FormField::new(field.label(), record.get(field)),
        })
        .collect()
}

/// Renders the form entry screen.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
pub fn draw_form_entry(
    state: &FormEntryState,
    record: &FormRecord,
    rooms: &RoomChoices,
    feedback: &FeedbackContext,
    room_confirmed: bool,
    frame: &mut Frame,
    area: Rect,
) {
    let block = Block::default()
        .title(" Patrimônios em ordem ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [form_area, feedback_area, footer_area] = Layout::vertical([
        Constraint::Length(form_height(Field::ALL.len())),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .flex(Flex::Center)
    .areas(inner);
    let [form_area] = Layout::horizontal([Constraint::Max(48)])
        .flex(Flex::Center)
        .areas(form_area);

    let focus = Field::ALL
        .iter()
        .position(|&f| f == state.focus)
        .unwrap_or(0);
    draw_form(
        &form_fields(state, record, room_confirmed),
        focus,
        frame,
        form_area,
    );

    let feedback = FeedbackContext {
        notice: state.notice.clone().or_else(|| feedback.notice.clone()),
        ..feedback.clone()
    };
    draw_feedback_bar(&feedback, frame, feedback_area);

    let footer = Paragraph::new(Line::from(
        "Tab: next  Enter: pick room / submit  Ctrl+S: submit  Ctrl+V: show password  Esc: quit",
    ))
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, footer_area);

    if let Some(picker) = &state.picker {
        draw_room_picker(picker, rooms, frame, area);
    }
    if let Some(saved) = &state.confirmation {
        draw_confirmation(saved, frame, area);
    }
}

/// Renders the saved record in a centered panel.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
fn draw_confirmation(record: &FormRecord, frame: &mut Frame, area: Rect) {
    let [row] = Layout::vertical([Constraint::Length(9)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Max(44)])
        .flex(Flex::Center)
        .areas(row);

    let lines = vec![
        Line::from(format!("Name: {}", record.name)),
        Line::from(format!("Email: {}", record.email)),
        Line::from(format!("Room: {}", record.room)),
        Line::from(format!("Password: {}", mask(&record.password))),
        Line::from(""),
        Line::from("Press any key").style(Style::default().fg(Color::DarkGray)),
    ];
    let paragraph = Paragraph::new(lines).alignment(Alignment::Left).block(
        Block::default()
            .title(" Form data ")
            .borders(Borders::ALL)
            .border_style(
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
    );
    frame.render_widget(Clear, popup);
    frame.render_widget(paragraph, popup);
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEventKind, KeyEventState};

    use super::*;
    use crate::model::ValidationError;
    use crate::storage::{PersistenceError, StorageError};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent {
            code: KeyCode::Char(ch),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn rooms() -> RoomChoices {
        RoomChoices::default()
    }

    fn key(state: &mut FormEntryState, record: &FormRecord, code: KeyCode) -> Action {
        state.handle_key(press(code), record, &rooms())
    }

    fn focus_room(state: &mut FormEntryState, record: &FormRecord) {
        key(state, record, KeyCode::Tab);
        key(state, record, KeyCode::Tab);
        assert_eq!(state.focus(), Field::Room);
    }

    mod construction {
        use super::*;

        #[test]
        fn defaults() {
            let state = FormEntryState::new();
            assert_eq!(state.focus(), Field::Name);
            assert!(!state.show_password());
            assert!(state.picker().is_none());
            assert!(state.notice().is_none());
            assert!(state.confirmation().is_none());
        }

        #[test]
        fn default_trait() {
            assert_eq!(FormEntryState::default(), FormEntryState::new());
        }
    }

    mod navigation {
        use super::*;

        #[test]
        fn tab_cycles_through_fields_in_order() {
            let mut state = FormEntryState::new();
            let record = FormRecord::default();
            let mut seen = vec![state.focus()];
            for _ in 0..4 {
                key(&mut state, &record, KeyCode::Tab);
                seen.push(state.focus());
            }
            assert_eq!(
                seen,
                vec![
                    Field::Name,
                    Field::Email,
                    Field::Room,
                    Field::Password,
                    Field::Name
                ]
            );
        }

        #[test]
        fn backtab_wraps_to_last_field() {
            let mut state = FormEntryState::new();
            key(&mut state, &FormRecord::default(), KeyCode::BackTab);
            assert_eq!(state.focus(), Field::Password);
        }

        #[test]
        fn arrows_move_focus() {
            let mut state = FormEntryState::new();
            let record = FormRecord::default();
            key(&mut state, &record, KeyCode::Down);
            assert_eq!(state.focus(), Field::Email);
            key(&mut state, &record, KeyCode::Up);
            assert_eq!(state.focus(), Field::Name);
        }
    }

    mod typing {
        use super::*;

        #[test]
        fn char_appends_to_focused_field() {
            let mut state = FormEntryState::new();
            let record = FormRecord::new("An", "", "", "");
            assert_eq!(
                key(&mut state, &record, KeyCode::Char('a')),
                Action::Edit(Field::Name, "Ana".into())
            );
        }

        #[test]
        fn backspace_removes_last_char() {
            let mut state = FormEntryState::new();
            let record = FormRecord::new("Ana", "", "", "");
            assert_eq!(
                key(&mut state, &record, KeyCode::Backspace),
                Action::Edit(Field::Name, "An".into())
            );
        }

        #[test]
        fn backspace_on_empty_field_is_noop() {
            let mut state = FormEntryState::new();
            assert_eq!(
                key(&mut state, &FormRecord::default(), KeyCode::Backspace),
                Action::None
            );
        }

        #[test]
        fn space_is_typed_into_text_fields() {
            let mut state = FormEntryState::new();
            assert_eq!(
                key(&mut state, &FormRecord::default(), KeyCode::Char(' ')),
                Action::Edit(Field::Name, " ".into())
            );
        }

        #[test]
        fn typing_on_room_does_not_edit() {
            let mut state = FormEntryState::new();
            let record = FormRecord::default();
            focus_room(&mut state, &record);
            assert_eq!(key(&mut state, &record, KeyCode::Char('x')), Action::None);
            assert_eq!(key(&mut state, &record, KeyCode::Backspace), Action::None);
        }

        #[test]
        fn edit_clears_notice() {
            let mut state = FormEntryState::new();
            state.set_notice("oops".into());
            key(&mut state, &FormRecord::default(), KeyCode::Char('a'));
            assert!(state.notice().is_none());
        }

        #[test]
        fn ctrl_v_toggles_password_visibility() {
            let mut state = FormEntryState::new();
            let record = FormRecord::default();
            assert_eq!(state.handle_key(ctrl('v'), &record, &rooms()), Action::None);
            assert!(state.show_password());
            state.handle_key(ctrl('v'), &record, &rooms());
            assert!(!state.show_password());
        }
    }

    mod room_picker {
        use super::*;

        #[test]
        fn enter_on_room_opens_picker() {
            let mut state = FormEntryState::new();
            let record = FormRecord::default();
            focus_room(&mut state, &record);
            assert_eq!(key(&mut state, &record, KeyCode::Enter), Action::None);
            assert_eq!(state.picker().map(RoomPickerState::selected), Some(0));
        }

        #[test]
        fn picker_opens_on_current_room() {
            let mut state = FormEntryState::new();
            let record = FormRecord::new("", "", "Elétrica 1", "");
            focus_room(&mut state, &record);
            key(&mut state, &record, KeyCode::Char(' '));
            assert_eq!(state.picker().map(RoomPickerState::selected), Some(4));
        }

        #[test]
        fn selecting_room_emits_edit_and_closes() {
            let mut state = FormEntryState::new();
            let record = FormRecord::default();
            focus_room(&mut state, &record);
            key(&mut state, &record, KeyCode::Enter);
            key(&mut state, &record, KeyCode::Down);
            assert_eq!(
                key(&mut state, &record, KeyCode::Enter),
                Action::Edit(Field::Room, "Sala C19".into())
            );
            assert!(state.picker().is_none());
        }

        #[test]
        fn esc_in_picker_closes_without_quitting() {
            let mut state = FormEntryState::new();
            let record = FormRecord::default();
            focus_room(&mut state, &record);
            key(&mut state, &record, KeyCode::Enter);
            assert_eq!(key(&mut state, &record, KeyCode::Esc), Action::None);
            assert!(state.picker().is_none());
        }
    }

    mod submission {
        use super::*;

        #[test]
        fn enter_outside_room_submits() {
            let mut state = FormEntryState::new();
            assert_eq!(
                key(&mut state, &FormRecord::default(), KeyCode::Enter),
                Action::Submit
            );
        }

        #[test]
        fn ctrl_s_submits_from_any_field() {
            let mut state = FormEntryState::new();
            let record = FormRecord::default();
            focus_room(&mut state, &record);
            assert_eq!(state.handle_key(ctrl('s'), &record, &rooms()), Action::Submit);
        }

        #[test]
        fn saved_outcome_opens_confirmation() {
            let mut state = FormEntryState::new();
            let record = FormRecord::new("Ana", "a@x.com", "Sala C13", "abc");
            state.apply_outcome(Ok(record.clone()));
            assert_eq!(state.confirmation(), Some(&record));
            assert!(state.notice().is_none());
        }

        #[test]
        fn any_key_dismisses_confirmation() {
            let mut state = FormEntryState::new();
            let record = FormRecord::new("Ana", "a@x.com", "Sala C13", "abc");
            state.apply_outcome(Ok(record.clone()));
            assert_eq!(key(&mut state, &record, KeyCode::Char('x')), Action::None);
            assert!(state.confirmation().is_none());
        }

        #[test]
        fn rejected_outcome_sets_notice() {
            let mut state = FormEntryState::new();
            state.apply_outcome(Err(SubmitError::Incomplete(ValidationError::Incomplete(
                vec![Field::Name],
            ))));
            assert_eq!(state.notice(), Some("missing required fields: name"));
        }

        #[test]
        fn write_failure_sets_distinct_notice() {
            let mut state = FormEntryState::new();
            state.apply_outcome(Err(SubmitError::Persistence(PersistenceError::Write(
                StorageError::Unavailable("disk full".into()),
            ))));
            assert_eq!(
                state.notice(),
                Some("could not save form: storage unavailable: disk full")
            );
        }

        #[test]
        fn busy_outcome_is_ignored() {
            let mut state = FormEntryState::new();
            state.apply_outcome(Err(SubmitError::Busy));
            assert!(state.notice().is_none());
            assert!(state.confirmation().is_none());
        }
    }

    mod quitting {
        use super::*;

        #[test]
        fn esc_quits() {
            let mut state = FormEntryState::new();
            assert_eq!(
                key(&mut state, &FormRecord::default(), KeyCode::Esc),
                Action::Quit
            );
        }

        #[test]
        fn ctrl_c_quits_even_with_picker_open() {
            let mut state = FormEntryState::new();
            let record = FormRecord::default();
            focus_room(&mut state, &record);
            key(&mut state, &record, KeyCode::Enter);
            assert_eq!(state.handle_key(ctrl('c'), &record, &rooms()), Action::Quit);
        }
    }

    mod rendering {
        use super::*;

        #[test]
        fn password_is_masked_by_default() {
            let state = FormEntryState::new();
            let record = FormRecord::new("", "", "", "abc");
            let fields = form_fields(&state, &record, false);
            assert_eq!(fields[3].value, mask("abc"));
        }

        #[test]
        fn room_row_carries_placeholder_and_check() {
            let state = FormEntryState::new();
            let fields = form_fields(&state, &FormRecord::default(), true);
            assert_eq!(fields[2].placeholder, ROOM_PLACEHOLDER);
            assert!(fields[2].confirmed);
            assert!(!fields[0].confirmed);
        }
    }
}
