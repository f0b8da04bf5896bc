//! TUI application state and key handling

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::runtime::{Command, ComposerEdit, ConversationView, ViewEvent};

/// Transcript scroll position, measured in lines up from the bottom
///
/// Zero means the view follows the newest entry. Any change in transcript
/// length or vendor list snaps back to zero.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScrollState {
    from_bottom: u16,
    seen_len: usize,
    seen_vendors: Option<usize>,
}

impl ScrollState {
    /// Record the latest content shape; returns true if it changed
    pub fn observe(&mut self, transcript_len: usize, vendor_count: Option<usize>) -> bool {
        let changed = transcript_len != self.seen_len || vendor_count != self.seen_vendors;
        if changed {
            self.seen_len = transcript_len;
            self.seen_vendors = vendor_count;
            self.from_bottom = 0;
        }
        changed
    }

    pub fn page_up(&mut self, page: u16) {
        self.from_bottom = self.from_bottom.saturating_add(page.max(1));
    }

    pub fn page_down(&mut self, page: u16) {
        self.from_bottom = self.from_bottom.saturating_sub(page.max(1));
    }

    pub fn is_following(&self) -> bool {
        self.from_bottom == 0
    }

    /// First visible line for content of `total` lines in a `height` viewport
    pub fn top(&mut self, total: u16, height: u16) -> u16 {
        let max = total.saturating_sub(height);
        self.from_bottom = self.from_bottom.min(max);
        max - self.from_bottom
    }
}

/// Application state
pub struct App {
    pub view: ConversationView,
    /// Composer text as typed, ahead of the runtime's snapshot
    ///
    /// Every edit sent to the runtime is applied here first, and commands
    /// reach the runtime in order, so the two agree once the queue drains.
    pub composer: String,
    pub scroll: ScrollState,
    /// Highlighted vendor card, or decision button (0 = Yes, 1 = No)
    pub highlighted: usize,
    /// Last rejection, shown in the footer until the next key press
    pub status: Option<String>,
    /// Transcript viewport height from the last frame
    pub viewport_height: u16,
    pub should_quit: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        let view = ConversationView::default();
        let mut scroll = ScrollState::default();
        scroll.observe(view.transcript.len(), None);
        Self {
            view,
            composer: String::new(),
            scroll,
            highlighted: 0,
            status: None,
            viewport_height: 0,
            should_quit: false,
        }
    }

    /// Apply an update from the runtime
    pub fn apply(&mut self, event: ViewEvent) {
        match event {
            ViewEvent::Snapshot(view) => {
                let vendor_count = view.state.vendor_grid().map(<[_]>::len);
                if self.scroll.observe(view.transcript.len(), vendor_count) {
                    self.highlighted = 0;
                }
                self.view = view;
            }
            ViewEvent::Rejected { reason } => {
                self.status = Some(reason);
            }
        }
    }

    fn edit(&mut self, edit: ComposerEdit) -> Option<Command> {
        edit.clone().apply(&mut self.composer);
        Some(Command::Edit(edit))
    }

    fn vendor_count(&self) -> Option<usize> {
        self.view.state.vendor_grid().map(<[_]>::len)
    }

    /// Number of items the arrow keys move between
    fn choice_count(&self) -> Option<usize> {
        if self.view.state.decision_pending() {
            Some(2)
        } else {
            self.vendor_count()
        }
    }

    /// Handle a key press; returns the command to send, if any
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        self.status = None;
        let page = self.viewport_height.saturating_sub(2);

        match (key.code, key.modifiers) {
            // === Quit ===
            (KeyCode::Char('c'), KeyModifiers::CONTROL) | (KeyCode::Esc, _) => {
                self.should_quit = true;
                None
            }

            // === Scrolling ===
            (KeyCode::PageUp, _) => {
                self.scroll.page_up(page);
                None
            }
            (KeyCode::PageDown, _) => {
                self.scroll.page_down(page);
                None
            }

            // === Itinerary decision ===
            (KeyCode::Char('y' | 'Y'), modifiers)
                if modifiers.contains(KeyModifiers::ALT) && self.view.state.decision_pending() =>
            {
                Some(Command::ConfirmItinerary)
            }
            (KeyCode::Char('n' | 'N'), modifiers)
                if modifiers.contains(KeyModifiers::ALT) && self.view.state.decision_pending() =>
            {
                Some(Command::DeclineItinerary)
            }

            // === Decision buttons / vendor grid ===
            (KeyCode::Left | KeyCode::Up, _) if self.choice_count().is_some() => {
                self.highlighted = self.highlighted.saturating_sub(1);
                None
            }
            (KeyCode::Right | KeyCode::Down, _) => {
                if let Some(count) = self.choice_count() {
                    self.highlighted = (self.highlighted + 1).min(count.saturating_sub(1));
                }
                None
            }

            // === Composer ===
            (KeyCode::Enter, _) => {
                if !self.composer.trim().is_empty() {
                    // The runtime clears its copy when it accepts the message
                    self.composer.clear();
                    Some(Command::Submit)
                } else if self.view.state.decision_pending() {
                    Some(if self.highlighted == 0 {
                        Command::ConfirmItinerary
                    } else {
                        Command::DeclineItinerary
                    })
                } else if self.vendor_count().is_some() {
                    Some(Command::SelectVendor {
                        index: self.highlighted,
                    })
                } else {
                    None
                }
            }
            (KeyCode::Backspace, _) => self.edit(ComposerEdit::Backspace),
            (KeyCode::Char(c), modifiers) if !modifiers.contains(KeyModifiers::CONTROL) => {
                self.edit(ComposerEdit::Insert(c))
            }

            _ => None,
        }
    }
}
