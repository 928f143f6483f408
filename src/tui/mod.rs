// TUI dashboard: layout, input handling, and rendering.
//
// The TUI owns a `ViewState` that mirrors the coordinator's session state.
// The coordinator pushes `SessionSnapshot` messages over an mpsc channel;
// the TUI applies them to `ViewState` and re-renders at ~30 fps. Cursor
// position and table scroll are TUI-local and survive snapshot updates.

pub mod input;
pub mod layout;

use std::time::Duration;

use chrono::{DateTime, Utc};
use crossterm::event::{Event, EventStream, KeyCode, KeyModifiers};
use futures_util::StreamExt;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table};
use ratatui::Frame;
use tokio::sync::mpsc;

use crate::models::Competition;
use crate::protocol::{Notice, Phase, SessionSnapshot, UserCommand};
use crate::standings::{DisplayRow, FormOutcome, Tier};

use layout::{build_layout, AppLayout};

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state that mirrors the session state for rendering.
pub struct ViewState {
    pub phase: Phase,
    pub competitions: Vec<Competition>,
    /// Competition list cursor (TUI-local, not the committed selection).
    pub cursor: usize,
    /// The committed selection, as reported by the coordinator.
    pub selected: Option<usize>,
    pub display_rows: Vec<DisplayRow>,
    pub notice: Option<Notice>,
    pub fetched_at: Option<DateTime<Utc>>,
    /// First visible row of the standings table (TUI-local).
    pub table_scroll: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            phase: Phase::Idle,
            competitions: Vec::new(),
            cursor: 0,
            selected: None,
            display_rows: Vec::new(),
            notice: None,
            fetched_at: None,
            table_scroll: 0,
        }
    }
}

impl ViewState {
    /// Apply a session snapshot from the coordinator.
    ///
    /// Mirrored fields are replaced wholesale; the cursor is clamped to the
    /// new list and the table scroll resets when the rows changed.
    pub fn apply_snapshot(&mut self, snapshot: SessionSnapshot) {
        if snapshot.display_rows != self.display_rows {
            self.table_scroll = 0;
        }

        self.phase = snapshot.phase;
        self.competitions = snapshot.competitions;
        self.selected = snapshot.selected;
        self.display_rows = snapshot.display_rows;
        self.notice = snapshot.notice;
        self.fetched_at = snapshot.fetched_at;

        if !self.competitions.is_empty() {
            self.cursor = self.cursor.min(self.competitions.len() - 1);
        } else {
            self.cursor = 0;
        }
    }

    /// Label of the committed selection, if any.
    fn selected_label(&self) -> Option<String> {
        self.selected
            .and_then(|i| self.competitions.get(i))
            .map(Competition::label)
    }
}

// ---------------------------------------------------------------------------
// Styling helpers
// ---------------------------------------------------------------------------

const CHAMPIONS_COLOR: Color = Color::LightBlue;
const EUROPA_COLOR: Color = Color::LightYellow;
const RELEGATION_COLOR: Color = Color::LightRed;

/// Row style for a tier set. Relegation is painted last so its warning
/// color wins when zones overlap in a very small table.
fn tier_style(tiers: &[Tier]) -> Style {
    if tiers.contains(&Tier::Relegation) {
        Style::default().fg(RELEGATION_COLOR)
    } else if tiers.contains(&Tier::Champions) {
        Style::default().fg(CHAMPIONS_COLOR)
    } else if tiers.contains(&Tier::Europa) {
        Style::default().fg(EUROPA_COLOR)
    } else {
        Style::default()
    }
}

/// Goal-difference cell style: green when positive, red when negative.
fn goal_difference_style(goal_difference: i64) -> Style {
    match goal_difference.cmp(&0) {
        std::cmp::Ordering::Greater => Style::default().fg(Color::Green),
        std::cmp::Ordering::Less => Style::default().fg(Color::Red),
        std::cmp::Ordering::Equal => Style::default(),
    }
}

/// Form badges: one colored letter per outcome, most recent order as
/// published by the source.
fn form_spans(form_sequence: &[FormOutcome]) -> Vec<Span<'static>> {
    let mut spans = Vec::with_capacity(form_sequence.len() * 2);
    for (i, outcome) in form_sequence.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        let color = match outcome {
            FormOutcome::Win => Color::Green,
            FormOutcome::Draw => Color::Yellow,
            FormOutcome::Loss => Color::Red,
            FormOutcome::Unknown => Color::DarkGray,
        };
        spans.push(Span::styled(
            outcome.letter(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
    }
    spans
}

/// Short phase description for the status bar.
fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "Starting",
        Phase::LoadingCompetitions => "Loading competitions...",
        Phase::CompetitionsReady => "Ready",
        Phase::CompetitionsError => "Competition list unavailable",
        Phase::LoadingStandings => "Loading standings...",
        Phase::StandingsReady => "Standings loaded",
        Phase::StandingsUnavailable => "No standings",
        Phase::StandingsError => "Standings fetch failed",
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete viewer frame.
fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    render_status_bar(frame, &layout, state);
    render_competitions(frame, &layout, state);
    render_standings(frame, &layout, state);
    render_legend_bar(frame, &layout);
    render_help_bar(frame, &layout);
}

fn render_status_bar(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let mut text = format!(" standwatch | {}", phase_label(state.phase));
    if let Some(label) = state.selected_label() {
        text.push_str(&format!(" | {label}"));
    }
    if let Some(fetched_at) = state.fetched_at {
        text.push_str(&format!(" | updated {}", fetched_at.format("%H:%M:%S")));
    }

    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        text,
        Style::default().fg(Color::White),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.status_bar);
}

fn render_competitions(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let items: Vec<ListItem> = state
        .competitions
        .iter()
        .map(|c| ListItem::new(c.label()))
        .collect();

    let title = format!("Competitions ({})", state.competitions.len());
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");

    let mut list_state = ListState::default();
    if !state.competitions.is_empty() {
        list_state.select(Some(state.cursor));
    }
    frame.render_stateful_widget(list, layout.competitions, &mut list_state);
}

fn render_standings(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    if state.phase.is_loading() {
        let paragraph = Paragraph::new("Loading...")
            .block(Block::default().borders(Borders::ALL).title("Standings"));
        frame.render_widget(paragraph, layout.standings);
        return;
    }

    if let Some(notice) = &state.notice {
        render_notice(frame, layout, notice);
        return;
    }

    if state.display_rows.is_empty() {
        let paragraph = Paragraph::new("Select a competition and press Enter.")
            .block(Block::default().borders(Borders::ALL).title("Standings"));
        frame.render_widget(paragraph, layout.standings);
        return;
    }

    render_table(frame, layout, state);
}

fn render_notice(frame: &mut Frame, layout: &AppLayout, notice: &Notice) {
    let border_color = if notice.is_informational() {
        Color::Yellow
    } else {
        Color::Red
    };
    let paragraph = Paragraph::new(notice.message()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title("Standings"),
    );
    frame.render_widget(paragraph, layout.standings);
}

fn render_table(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let header = Row::new(vec![
        Cell::from("#"),
        Cell::from("Team"),
        Cell::from("MP"),
        Cell::from("W"),
        Cell::from("D"),
        Cell::from("L"),
        Cell::from("GF"),
        Cell::from("GA"),
        Cell::from("GD"),
        Cell::from("Pts"),
        Cell::from("Form"),
    ])
    .style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = state
        .display_rows
        .iter()
        .skip(state.table_scroll)
        .map(|row| {
            Row::new(vec![
                Cell::from(row.position.to_string()),
                Cell::from(row.team.name.clone()),
                Cell::from(row.played_games.to_string()),
                Cell::from(row.won.to_string()),
                Cell::from(row.draw.to_string()),
                Cell::from(row.lost.to_string()),
                Cell::from(row.goals_for.to_string()),
                Cell::from(row.goals_against.to_string()),
                Cell::from(row.goal_difference_label())
                    .style(goal_difference_style(row.goal_difference)),
                Cell::from(row.points.to_string())
                    .style(Style::default().add_modifier(Modifier::BOLD)),
                Cell::from(Line::from(form_spans(&row.form_sequence))),
            ])
            .style(tier_style(&row.tiers))
        })
        .collect();

    let title = match state.selected_label() {
        Some(label) => format!("{label} Standings"),
        None => "Standings".to_string(),
    };

    let widths = [
        ratatui::layout::Constraint::Length(4),
        ratatui::layout::Constraint::Min(18),
        ratatui::layout::Constraint::Length(4),
        ratatui::layout::Constraint::Length(4),
        ratatui::layout::Constraint::Length(4),
        ratatui::layout::Constraint::Length(4),
        ratatui::layout::Constraint::Length(4),
        ratatui::layout::Constraint::Length(4),
        ratatui::layout::Constraint::Length(5),
        ratatui::layout::Constraint::Length(5),
        ratatui::layout::Constraint::Min(11),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title));

    frame.render_widget(table, layout.standings);
}

fn render_legend_bar(frame: &mut Frame, layout: &AppLayout) {
    let line = Line::from(vec![
        Span::styled(" ■ Champions League  ", Style::default().fg(CHAMPIONS_COLOR)),
        Span::styled("■ Europa League  ", Style::default().fg(EUROPA_COLOR)),
        Span::styled("■ Relegation", Style::default().fg(RELEGATION_COLOR)),
        Span::styled(
            "   Data: football-data.org",
            Style::default().fg(Color::White).add_modifier(Modifier::DIM),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), layout.legend_bar);
}

fn render_help_bar(frame: &mut Frame, layout: &AppLayout) {
    let text = " q:Quit | Up/Down:Navigate | Enter:Load standings | r:Refresh | PgUp/PgDn:Scroll";
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        text,
        Style::default().fg(Color::White).add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.help_bar);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// This is the main entry point for the terminal UI. It:
/// 1. Initializes the terminal (enters raw mode, enables alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: snapshots, keyboard input, render ticks.
/// 4. Restores the terminal on clean exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<SessionSnapshot>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    // Panic hook to restore terminal on crash. Capture the original hook
    // and chain ours before it.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            // Snapshots from the coordinator
            snapshot = ui_rx.recv() => {
                match snapshot {
                    Some(snapshot) => {
                        view_state.apply_snapshot(snapshot);
                    }
                    None => {
                        // Channel closed: coordinator is shutting down
                        break;
                    }
                }
            }

            // Keyboard input
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if key_event.code == KeyCode::Char('c')
                            && key_event.modifiers.contains(KeyModifiers::CONTROL)
                        {
                            let _ = cmd_tx.send(UserCommand::Quit).await;
                            break;
                        }
                        if let Some(command) = input::handle_key(key_event, &mut view_state) {
                            let quit = command == UserCommand::Quit;
                            let _ = cmd_tx.send(command).await;
                            if quit {
                                break;
                            }
                        }
                    }
                    Some(Ok(_)) => {
                        // Mouse events, resize events, etc. -- ignore
                    }
                    Some(Err(_)) | None => {
                        break;
                    }
                }
            }

            // Render tick
            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    ratatui::restore();

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
