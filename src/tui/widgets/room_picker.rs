//! Room picker modal: presents the room choices and returns one.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState};

use crate::model::RoomChoices;

/// What the picker asks of its owner after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerOutcome {
    /// Keep the picker open.
    Pending,
    /// The user chose this room.
    Selected(String),
    /// The user closed the picker without choosing.
    Closed,
}

/// Cursor state of the open room picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomPickerState {
    selected: usize,
}

impl RoomPickerState {
    /// Opens the picker on `current` if it is one of the rooms, else on the first.
    pub fn open(rooms: &RoomChoices, current: &str) -> Self {
        Self {
            selected: rooms.position(current).unwrap_or(0),
        }
    }

    /// Returns the highlighted index.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Handles a key event while the picker is open.
    pub fn handle_key(&mut self, key: KeyEvent, rooms: &RoomChoices) -> PickerOutcome {
        match key.code {
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                PickerOutcome::Pending
            }
            KeyCode::Down => {
                if self.selected + 1 < rooms.len() {
                    self.selected += 1;
                }
                PickerOutcome::Pending
            }
            KeyCode::Enter | KeyCode::Char(' ') => rooms
                .get(self.selected)
                .map_or(PickerOutcome::Closed, |room| {
                    PickerOutcome::Selected(room.to_owned())
                }),
            KeyCode::Esc => PickerOutcome::Closed,
            _ => PickerOutcome::Pending,
        }
    }
}

/// Renders the picker centered over `area`.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
pub fn draw_room_picker(state: &RoomPickerState, rooms: &RoomChoices, frame: &mut Frame, area: Rect) {
    let width = rooms
        .as_slice()
        .iter()
        .map(|room| room.chars().count())
        .max()
        .unwrap_or(0)
        .saturating_add(8);
    let width = u16::try_from(width).unwrap_or(u16::MAX).max(24);
    let height = u16::try_from(rooms.len())
        .unwrap_or(u16::MAX)
        .saturating_add(2);

    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);

    let items: Vec<ListItem> = rooms
        .as_slice()
        .iter()
        .map(|room| ListItem::new(room.as_str()))
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .title(" Select a room ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut list_state = ListState::default().with_selected(Some(state.selected));
    frame.render_widget(Clear, popup);
    frame.render_stateful_widget(list, popup, &mut list_state);
}
