use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::controller::{Phase, SubmissionController, SubmitError};
use crate::model::{FormRecord, RoomChoices};
use crate::storage::KeyValueStore;

use super::action::Action;
use super::error::AppError;
use super::screens::{FormEntryState, draw_form_entry};
use super::widgets::FeedbackContext;

/// How often the screen is redrawn without input, so pulses visibly expire.
const REDRAW_INTERVAL: Duration = Duration::from_millis(100);

type Outcome = Result<FormRecord, SubmitError>;

/// Top-level application state.
pub struct App<S> {
    controller: Arc<SubmissionController<S>>,
    rooms: RoomChoices,
    entry: FormEntryState,
    outcome_tx: mpsc::UnboundedSender<Outcome>,
    outcome_rx: mpsc::UnboundedReceiver<Outcome>,
    submission: Option<JoinHandle<()>>,
    should_quit: bool,
}

impl<S: KeyValueStore + 'static> App<S> {
    /// Creates a new `App` over an initialized controller.
    pub fn new(controller: Arc<SubmissionController<S>>, rooms: RoomChoices) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            controller,
            rooms,
            entry: FormEntryState::new(),
            outcome_tx,
            outcome_rx,
            submission: None,
            should_quit: false,
        }
    }

    /// Main event loop: draw → wait for a key, a submission outcome, or the
    /// redraw tick → dispatch → check quit.
    ///
    /// Shuts down before returning, see [`shutdown`](Self::shutdown).
    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    pub async fn run<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut events = EventStream::new();
        let mut ticker = tokio::time::interval(REDRAW_INTERVAL);

        let result = loop {
            if self.should_quit {
                break Ok(());
            }
            if let Err(e) = terminal.draw(|frame| self.draw(frame)) {
                break Err(e.into());
            }
            tokio::select! {
                event = events.next() => match event {
                    Some(Ok(Event::Key(key))) => self.handle_key(key),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => break Err(e.into()),
                    None => self.should_quit = true,
                },
                Some(outcome) = self.outcome_rx.recv() => self.entry.apply_outcome(outcome),
                _ = ticker.tick() => {}
            }
        };

        self.shutdown();
        result
    }

    /// Aborts an in-flight submission and shuts the controller down.
    pub fn shutdown(&mut self) {
        if let Some(submission) = self.submission.take() {
            submission.abort();
        }
        self.controller.shutdown();
    }

    /// Renders the form screen.
    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    fn draw(&self, frame: &mut Frame) {
        let record = self.controller.form().snapshot();
        draw_form_entry(
            &self.entry,
            &record,
            &self.rooms,
            &self.feedback(),
            self.controller.form().selection().is_active(),
            frame,
            frame.area(),
        );
    }

    /// Handles a key event and applies the resulting [`Action`].
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        let record = self.controller.form().snapshot();
        match self.entry.handle_key(key, &record, &self.rooms) {
            Action::None => {}
            Action::Edit(field, value) => self.controller.form().set_field(field, value),
            Action::Submit => self.start_submit(),
            Action::Quit => self.should_quit = true,
        }
    }

    /// Runs a submission in the background; its outcome comes back through
    /// the outcome channel. At most one submission task runs at a time.
    fn start_submit(&mut self) {
        if self
            .submission
            .as_ref()
            .is_some_and(|submission| !submission.is_finished())
        {
            tracing::debug!("Submission already running");
            return;
        }
        let controller = Arc::clone(&self.controller);
        let outcomes = self.outcome_tx.clone();
        self.submission = Some(tokio::spawn(async move {
            let outcome = controller.submit().await;
            // The receiver is gone only when the app has quit.
            let _ = outcomes.send(outcome);
        }));
    }

    /// Returns the indicator state for the feedback bar.
    pub fn feedback(&self) -> FeedbackContext {
        FeedbackContext {
            saved: self.controller.success().is_active(),
            rejected: self.controller.failure().is_active(),
            busy: self.controller.phase() != Phase::Idle,
            notice: None,
        }
    }

    /// Returns the form screen state.
    pub fn entry(&self) -> &FormEntryState {
        &self.entry
    }

    /// Returns the controller.
    pub fn controller(&self) -> &SubmissionController<S> {
        &self.controller
    }

    /// Returns `true` if the app should quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}
