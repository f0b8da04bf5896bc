//! TUI Runner - main loop that owns the terminal
//!
//! Draws the latest `ConversationView`, turns key presses into runtime
//! commands and applies snapshots as they arrive.

use std::io;

use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::app::App;
use super::views;
use super::Tui;
use crate::runtime::{ConversationHandle, ViewEvent};

/// TUI Runner that manages the terminal and event loop
pub struct TuiRunner {
    app: App,
    terminal: Tui,
    handle: ConversationHandle,
    view_rx: broadcast::Receiver<ViewEvent>,
    events: EventStream,
}

impl TuiRunner {
    pub fn new(terminal: Tui, handle: ConversationHandle) -> Self {
        let view_rx = handle.subscribe();
        Self {
            app: App::new(),
            terminal,
            handle,
            view_rx,
            events: EventStream::new(),
        }
    }

    /// Run until the user quits or the runtime goes away
    pub async fn run(&mut self) -> io::Result<()> {
        loop {
            self.terminal
                .draw(|frame| views::render(&mut self.app, frame))?;

            tokio::select! {
                event = self.events.next() => match event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        if let Some(command) = self.app.handle_key(key) {
                            debug!(?command, "Sending command");
                            if self.handle.command_tx.send(command).await.is_err() {
                                warn!("Conversation runtime closed");
                                break;
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e),
                    None => break,
                },
                view = self.view_rx.recv() => match view {
                    Ok(view) => self.app.apply(view),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped, "View receiver lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            }

            if self.app.should_quit {
                break;
            }
        }

        Ok(())
    }
}
