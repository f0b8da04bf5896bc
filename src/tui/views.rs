//! TUI views and rendering

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use super::app::App;
use super::markdown;
use crate::backend::Vendor;
use crate::state_machine::{ConvState, VendorGrid};
use crate::transcript::{Role, Transcript};

const CARD_HEIGHT: u16 = 7;
/// Narrowest card that still fits a business name and city
const CARD_WIDTH: u16 = 26;

/// Main render function
pub fn render(app: &mut App, frame: &mut Frame) {
    let affordance_height = match &app.view.state {
        ConvState::AwaitingItineraryDecision => 3,
        ConvState::AwaitingVendorSelection {
            grid: VendorGrid::Ready { .. },
        } => CARD_HEIGHT + 1,
        ConvState::AwaitingVendorSelection {
            grid: VendorGrid::Loading { .. },
        } => 1,
        _ => 0,
    };
    let selected_height = if app.view.selected_vendor.is_some() { 4 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),                    // Transcript
            Constraint::Length(affordance_height), // Decision / vendor grid
            Constraint::Length(selected_height),   // Selected vendor
            Constraint::Length(3),                 // Composer
            Constraint::Length(1),                 // Footer
        ])
        .split(frame.area());

    render_transcript(app, frame, chunks[0]);

    match &app.view.state {
        ConvState::AwaitingItineraryDecision => render_decision(app.highlighted, frame, chunks[1]),
        ConvState::AwaitingVendorSelection {
            grid: VendorGrid::Ready { vendors },
        } => render_vendor_grid(vendors, app.highlighted, frame, chunks[1]),
        ConvState::AwaitingVendorSelection {
            grid: VendorGrid::Loading { .. },
        } => {
            let loading = Paragraph::new(Span::styled(
                " Fetching vendors...",
                Style::default().fg(Color::DarkGray),
            ));
            frame.render_widget(loading, chunks[1]);
        }
        _ => {}
    }

    if let Some(vendor) = &app.view.selected_vendor {
        render_selected_vendor(vendor, frame, chunks[2]);
    }

    render_composer(app, frame, chunks[3]);
    render_footer(app, frame, chunks[4]);
}

/// Transcript as display lines: markdown for the assistant, plain right-aligned text for the user
pub fn transcript_lines(transcript: &Transcript) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for message in transcript.messages() {
        match message.role {
            Role::Assistant => {
                lines.push(Line::from(Span::styled(
                    "Assistant",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                )));
                lines.extend(markdown::render(&message.text));
            }
            Role::User => {
                lines.push(
                    Line::from(Span::styled(
                        "You",
                        Style::default()
                            .fg(Color::Blue)
                            .add_modifier(Modifier::BOLD),
                    ))
                    .alignment(Alignment::Right),
                );
                for text in message.text.lines() {
                    lines.push(Line::from(text.to_string()).alignment(Alignment::Right));
                }
            }
        }
        lines.push(Line::default());
    }
    lines
}

fn render_transcript(app: &mut App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Trip Planner ");
    let inner = block.inner(area);
    app.viewport_height = inner.height;

    let paragraph = Paragraph::new(transcript_lines(&app.view.transcript))
        .wrap(Wrap { trim: false });
    let total = u16::try_from(paragraph.line_count(inner.width)).unwrap_or(u16::MAX);
    let top = app.scroll.top(total, inner.height);

    frame.render_widget(paragraph.block(block).scroll((top, 0)), area);
}

fn render_decision(highlighted: usize, frame: &mut Frame, area: Rect) {
    let button = |label: &'static str, color: Color, focused: bool| {
        let style = if focused {
            Style::default()
                .fg(Color::Black)
                .bg(color)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color)
        };
        Span::styled(format!(" {label} "), style)
    };

    let spans = vec![
        Span::raw("Use this itinerary?  "),
        button("Yes", Color::Green, highlighted == 0),
        Span::raw("   "),
        button("No", Color::Red, highlighted != 0),
    ];

    let decision = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(decision, area);
}

/// First card index and card count of the grid page holding `highlighted`
fn grid_page(len: usize, highlighted: usize, width: u16) -> (usize, usize) {
    let per_page = usize::from((width / CARD_WIDTH).max(1));
    let start = (highlighted.min(len.saturating_sub(1)) / per_page) * per_page;
    (start, per_page)
}

fn render_vendor_grid(vendors: &[Vendor], highlighted: usize, frame: &mut Frame, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    let (start, per_page) = grid_page(vendors.len(), highlighted, rows[1].width);
    let end = (start + per_page).min(vendors.len());
    let header = Paragraph::new(Span::styled(
        format!(" Vendors {}-{end} of {}", start + 1, vendors.len()),
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(header, rows[0]);

    let slots = u32::try_from(per_page).unwrap_or(u32::MAX);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints((0..per_page).map(|_| Constraint::Ratio(1, slots)))
        .split(rows[1]);

    let page = vendors.iter().enumerate().skip(start).take(per_page);
    for ((index, vendor), column) in page.zip(columns.iter()) {
        let border = if index == highlighted {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let card = Paragraph::new(vec![
            Line::from(Span::styled(
                vendor.vendor_type.clone(),
                Style::default().fg(Color::Cyan),
            )),
            Line::from(vendor.city.clone()),
            Line::from(Span::styled(
                vendor.summary.clone(),
                Style::default().add_modifier(Modifier::DIM),
            )),
        ])
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(Span::styled(
                    format!(" {} ", vendor.business_name),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
        );
        frame.render_widget(card, *column);
    }
}

fn render_selected_vendor(vendor: &Vendor, frame: &mut Frame, area: Rect) {
    let panel = Paragraph::new(vec![
        Line::from(Span::styled(
            vendor.business_name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("{} · {}", vendor.vendor_type, vendor.city)),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green))
            .title(" Selected Vendor "),
    );
    frame.render_widget(panel, area);
}

fn render_composer(app: &App, frame: &mut Frame, area: Rect) {
    let title = if app.view.state.is_waiting() {
        " Message (waiting for reply) "
    } else {
        " Message "
    };
    let composer = Paragraph::new(app.composer.as_str())
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(composer, area);

    let typed = u16::try_from(app.composer.chars().count()).unwrap_or(u16::MAX);
    let max_x = area.x + area.width.saturating_sub(2);
    frame.set_cursor_position(Position::new(
        (area.x + 1).saturating_add(typed).min(max_x),
        area.y + 1,
    ));
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let line = if let Some(status) = &app.status {
        Line::from(Span::styled(
            format!(" {status}"),
            Style::default().fg(Color::Red),
        ))
    } else {
        let mut hints = vec!["Enter send", "PgUp/PgDn scroll", "Esc quit"];
        if app.view.state.decision_pending() {
            hints.insert(0, "←/→ Enter or Alt+y/Alt+n decide");
        }
        if app.view.state.vendor_grid().is_some() {
            hints.insert(0, "←/→ choose, Enter select");
        }
        Line::from(Span::styled(
            format!(" {}", hints.join(" │ ")),
            Style::default().fg(Color::DarkGray),
        ))
    };
    frame.render_widget(Paragraph::new(line), area);
}
