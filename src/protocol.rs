// Message and status types shared between the coordinator, the fetch
// tasks, and the TUI. Everything here crosses an mpsc channel boundary.

use chrono::{DateTime, Utc};

use crate::gateway::GatewayError;
use crate::models::{Competition, StandingsResponse};
use crate::standings::DisplayRow;

// ---------------------------------------------------------------------------
// Coordinator phase
// ---------------------------------------------------------------------------

/// Where the selection state machine currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    LoadingCompetitions,
    CompetitionsReady,
    CompetitionsError,
    LoadingStandings,
    StandingsReady,
    StandingsUnavailable,
    StandingsError,
}

impl Phase {
    /// Whether a fetch is currently in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, Phase::LoadingCompetitions | Phase::LoadingStandings)
    }
}

// ---------------------------------------------------------------------------
// User-visible notices
// ---------------------------------------------------------------------------

/// The single error/informational surface. At most one notice is shown at
/// a time; a new fetch clears the previous one before applying its own
/// outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Transport or server failure fetching the competition list.
    CompetitionsFailed,
    /// Transport or server failure fetching standings.
    StandingsFailed,
    /// Well-formed response without a usable standings table. Expected
    /// condition, not logged as an error.
    NoStandings,
    /// Structurally broken row in the standings payload.
    MalformedStandings(String),
}

impl Notice {
    /// The message shown in the error banner.
    pub fn message(&self) -> String {
        match self {
            Notice::CompetitionsFailed => {
                "Failed to fetch competitions. Please try again later.".to_string()
            }
            Notice::StandingsFailed => {
                "Failed to fetch standings. Please try again later.".to_string()
            }
            Notice::NoStandings => {
                "No standings data available for this competition.".to_string()
            }
            Notice::MalformedStandings(detail) => {
                format!("Standings data for this competition is malformed: {detail}")
            }
        }
    }

    /// Informational notices are expected conditions; the rest are failures.
    pub fn is_informational(&self) -> bool {
        matches!(self, Notice::NoStandings)
    }
}

// ---------------------------------------------------------------------------
// Channel messages
// ---------------------------------------------------------------------------

/// Results sent by spawned fetch tasks back to the coordinator.
///
/// Standings results are tagged with the competition id they were fetched
/// for and the generation of the selection that started them, so stale
/// responses can be discarded on arrival.
#[derive(Debug)]
pub enum FetchEvent {
    Competitions(Result<Vec<Competition>, GatewayError>),
    Standings {
        competition_id: u64,
        generation: u64,
        result: Result<StandingsResponse, GatewayError>,
    },
}

/// Commands sent from the TUI to the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCommand {
    /// Select the competition at this index of the current list.
    Select(usize),
    /// Re-fetch standings for the currently selected competition.
    Refresh,
    Quit,
}

/// Full view of the session state, pushed to the TUI after every applied
/// event. The TUI renders from its latest snapshot and nothing else.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub competitions: Vec<Competition>,
    pub selected: Option<usize>,
    pub display_rows: Vec<DisplayRow>,
    pub notice: Option<Notice>,
    pub fetched_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
