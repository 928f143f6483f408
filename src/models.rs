// Wire types for the football-data.org v4 payloads consumed by the
// coordinator. Field names follow the upstream camelCase JSON.
//
// `position`, `goalsFor` and `goalsAgainst` are structurally required by the
// normalizer but deserialize as `Option` here: a row missing one of them is
// a data-contract violation reported by the normalizer, not a decode failure
// that would throw away the rest of the payload.

use serde::{Deserialize, Serialize};

/// Geographic area a competition belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub name: String,
}

/// A named football tournament or league.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competition {
    pub id: u64,
    pub name: String,
    pub area: Area,
    /// Short code like "PL" or "SA". Not all payloads carry one.
    #[serde(default)]
    pub code: Option<String>,
}

impl Competition {
    /// Display label used in the competition list: "Name (Area)".
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.area.name)
    }
}

/// Response body of `GET /api/competitions`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompetitionList {
    #[serde(default)]
    pub competitions: Vec<Competition>,
}

/// A team as it appears inside a standings row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    #[serde(default)]
    pub crest: Option<String>,
}

/// One ranked row of a standings table, as published upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingRow {
    pub position: Option<u32>,
    pub team: Team,
    #[serde(default)]
    pub played_games: u32,
    #[serde(default)]
    pub won: u32,
    #[serde(default)]
    pub draw: u32,
    #[serde(default)]
    pub lost: u32,
    #[serde(default)]
    pub points: i64,
    pub goals_for: Option<i64>,
    pub goals_against: Option<i64>,
    /// Comma-separated outcome codes ("W,D,L,..."), absent when the team
    /// has no recent-match history. Source order is preserved downstream.
    #[serde(default)]
    pub form: Option<String>,
}

/// One standings variant for a competition (e.g. TOTAL, HOME, AWAY, or a
/// group stage table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingsGroup {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub table: Vec<StandingRow>,
}

/// Response body of `GET /api/competitions/:id/standings`. A competition
/// may publish several group variants; exactly one is the full table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandingsResponse {
    #[serde(default)]
    pub standings: Vec<StandingsGroup>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
