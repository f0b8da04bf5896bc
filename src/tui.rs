//! Terminal user interface for the trip chat
//!
//! Renders the transcript with markdown formatting, the itinerary decision
//! buttons, the vendor grid and the selected vendor panel.

mod app;
mod markdown;
mod runner;
mod views;

pub use app::{App, ScrollState};
pub use runner::TuiRunner;

use std::io::{self, Stdout};

use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::runtime::ConversationHandle;

/// Terminal type alias
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode
pub fn init() -> io::Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

/// Restore the terminal to normal mode
pub fn restore() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Restores the terminal even on early return or error
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = restore();
    }
}

/// Run the chat UI against a live session until the user quits
///
/// Dropping the handle on return closes the session.
pub async fn run(handle: ConversationHandle) -> io::Result<()> {
    let terminal = init()?;
    let _guard = TerminalGuard;

    let mut runner = TuiRunner::new(terminal, handle);
    runner.run().await
}
