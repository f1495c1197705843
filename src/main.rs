#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use std::io::{self, stdout};
use std::sync::Arc;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use roomform::config::AppConfig;
use roomform::controller::{FormStore, SubmissionController};
use roomform::logging::init_logging;
use roomform::storage::{FileStore, PersistenceGateway};
use roomform::tui::{App, AppError};

#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), AppError> {
    let config = AppConfig::new()?;
    init_logging(&config.log_path())?;

    let store = FileStore::new(config.storage_path());
    let controller = Arc::new(SubmissionController::new(
        FormStore::new(),
        PersistenceGateway::new(store),
    ));
    // A failed read is logged by the controller; the form starts empty.
    let _ = controller.initialize().await;

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut app = App::new(controller, config.rooms().clone());
    let result = app.run(&mut terminal).await;

    let restore_result = restore_terminal();
    result?;
    restore_result.map_err(Into::into)
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
fn restore_terminal() -> Result<(), io::Error> {
    let raw_result = disable_raw_mode();
    let screen_result = execute!(stdout(), LeaveAlternateScreen);
    raw_result.and(screen_result)
}
