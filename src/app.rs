// Session state and orchestration logic.
//
// The coordinator task is the only owner and mutator of `SessionState`.
// Fetches run as spawned tasks that report back over an mpsc channel with
// their results tagged by competition id and selection generation; results
// are applied in completion order and a stale standings response (one
// started by a superseded selection) is discarded on arrival, never applied.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::gateway::{GatewayClient, GatewayError};
use crate::models::{Competition, StandingsResponse};
use crate::protocol::{FetchEvent, Notice, Phase, SessionSnapshot, UserCommand};
use crate::standings::{normalize, select_table, DisplayRow};

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// A standings fetch the coordinator has decided to start: which
/// competition, and under which selection generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingFetch {
    pub competition_id: u64,
    pub generation: u64,
}

/// The complete session state.
pub struct SessionState {
    pub phase: Phase,
    pub competitions: Vec<Competition>,
    /// Index into `competitions` of the current selection.
    pub selected: Option<usize>,
    pub display_rows: Vec<DisplayRow>,
    pub notice: Option<Notice>,
    /// Monotonically increasing counter identifying the current standings
    /// fetch. Bumped on every selection; results from older generations
    /// are discarded in `apply_standings`.
    pub standings_generation: u64,
    /// When the currently displayed standings were fetched.
    pub fetched_at: Option<DateTime<Utc>>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        SessionState {
            phase: Phase::Idle,
            competitions: Vec::new(),
            selected: None,
            display_rows: Vec::new(),
            notice: None,
            standings_generation: 0,
            fetched_at: None,
        }
    }

    /// The competition currently selected, if any.
    pub fn selected_competition(&self) -> Option<&Competition> {
        self.selected.and_then(|i| self.competitions.get(i))
    }

    /// Enter the initial competition-list load.
    pub fn begin_competitions_load(&mut self) {
        self.phase = Phase::LoadingCompetitions;
        self.notice = None;
    }

    /// Apply the competition-list fetch result. An empty list is a ready
    /// state with nothing selectable, not an error.
    pub fn apply_competitions(&mut self, result: Result<Vec<Competition>, GatewayError>) {
        match result {
            Ok(competitions) => {
                info!("Loaded {} competitions", competitions.len());
                self.competitions = competitions;
                self.phase = Phase::CompetitionsReady;
                self.notice = None;
            }
            Err(e) => {
                warn!("Competition list fetch failed: {e}");
                self.phase = Phase::CompetitionsError;
                self.notice = Some(Notice::CompetitionsFailed);
            }
        }
    }

    /// Start a standings fetch for the competition at `index`.
    ///
    /// Clears any prior notice, bumps the selection generation, and returns
    /// the fetch to spawn. Returns `None` for an out-of-range index.
    pub fn begin_selection(&mut self, index: usize) -> Option<PendingFetch> {
        let competition_id = self.competitions.get(index)?.id;
        self.selected = Some(index);
        self.notice = None;
        self.phase = Phase::LoadingStandings;
        self.standings_generation += 1;
        Some(PendingFetch {
            competition_id,
            generation: self.standings_generation,
        })
    }

    /// Apply a standings fetch result. Returns `false` when the result was
    /// stale and discarded: either its generation is not the current one,
    /// or the selection has moved to a different competition since the
    /// fetch started.
    pub fn apply_standings(
        &mut self,
        competition_id: u64,
        generation: u64,
        result: Result<StandingsResponse, GatewayError>,
    ) -> bool {
        if generation != self.standings_generation {
            return false;
        }
        if self.selected_competition().map(|c| c.id) != Some(competition_id) {
            return false;
        }

        match result {
            Err(e) => {
                warn!("Standings fetch for competition {competition_id} failed: {e}");
                self.display_rows.clear();
                self.phase = Phase::StandingsError;
                self.notice = Some(Notice::StandingsFailed);
            }
            Ok(response) => match select_table(&response) {
                None => {
                    self.display_rows.clear();
                    self.phase = Phase::StandingsUnavailable;
                    self.notice = Some(Notice::NoStandings);
                }
                Some(group) if group.table.is_empty() => {
                    self.display_rows.clear();
                    self.phase = Phase::StandingsUnavailable;
                    self.notice = Some(Notice::NoStandings);
                }
                Some(group) => match normalize(&group.table) {
                    Ok(rows) => {
                        self.display_rows = rows;
                        self.phase = Phase::StandingsReady;
                        self.notice = None;
                        self.fetched_at = Some(Utc::now());
                    }
                    Err(e) => {
                        warn!(
                            "Standings payload for competition {competition_id} is malformed: {e}"
                        );
                        self.display_rows.clear();
                        self.phase = Phase::StandingsError;
                        self.notice = Some(Notice::MalformedStandings(e.to_string()));
                    }
                },
            },
        }

        true
    }

    /// Build the snapshot pushed to the TUI.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            competitions: self.competitions.clone(),
            selected: self.selected,
            display_rows: self.display_rows.clone(),
            notice: self.notice.clone(),
            fetched_at: self.fetched_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Event handling
// ---------------------------------------------------------------------------

/// Apply one fetch event to the state. Pure state logic, factored out of
/// the loop so it can be tested without channels.
pub fn handle_fetch_event(state: &mut SessionState, event: FetchEvent) {
    match event {
        FetchEvent::Competitions(result) => {
            state.apply_competitions(result);
        }
        FetchEvent::Standings {
            competition_id,
            generation,
            result,
        } => {
            if !state.apply_standings(competition_id, generation, result) {
                debug!(
                    "Discarding stale standings response for competition {competition_id} \
                     (generation {generation}, current {})",
                    state.standings_generation
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Fetch task spawning
// ---------------------------------------------------------------------------

fn spawn_competitions_fetch(gateway: Arc<GatewayClient>, tx: mpsc::Sender<FetchEvent>) {
    tokio::spawn(async move {
        let result = gateway.list_competitions().await;
        let _ = tx.send(FetchEvent::Competitions(result)).await;
    });
}

fn spawn_standings_fetch(
    gateway: Arc<GatewayClient>,
    tx: mpsc::Sender<FetchEvent>,
    pending: PendingFetch,
) {
    tokio::spawn(async move {
        let result = gateway.standings(pending.competition_id).await;
        let _ = tx
            .send(FetchEvent::Standings {
                competition_id: pending.competition_id,
                generation: pending.generation,
                result,
            })
            .await;
    });
}

// ---------------------------------------------------------------------------
// Main coordinator loop
// ---------------------------------------------------------------------------

/// Run the coordinator until the TUI quits or every channel closes.
///
/// Kicks off the competition-list fetch immediately, then reacts to fetch
/// results and user commands, pushing a fresh snapshot to the TUI after
/// every applied event.
pub async fn run(
    gateway: Arc<GatewayClient>,
    fetch_tx: mpsc::Sender<FetchEvent>,
    mut fetch_rx: mpsc::Receiver<FetchEvent>,
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<SessionSnapshot>,
) -> anyhow::Result<()> {
    let mut state = SessionState::new();

    state.begin_competitions_load();
    spawn_competitions_fetch(gateway.clone(), fetch_tx.clone());
    let _ = ui_tx.send(state.snapshot()).await;

    loop {
        tokio::select! {
            event = fetch_rx.recv() => {
                match event {
                    Some(event) => {
                        handle_fetch_event(&mut state, event);
                        let _ = ui_tx.send(state.snapshot()).await;
                    }
                    None => break,
                }
            }

            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Select(index)) => {
                        if let Some(pending) = state.begin_selection(index) {
                            spawn_standings_fetch(gateway.clone(), fetch_tx.clone(), pending);
                        }
                        let _ = ui_tx.send(state.snapshot()).await;
                    }
                    Some(UserCommand::Refresh) => {
                        if let Some(index) = state.selected {
                            if let Some(pending) = state.begin_selection(index) {
                                spawn_standings_fetch(gateway.clone(), fetch_tx.clone(), pending);
                            }
                            let _ = ui_tx.send(state.snapshot()).await;
                        }
                    }
                    Some(UserCommand::Quit) | None => break,
                }
            }
        }
    }

    info!("Coordinator shutting down");
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
