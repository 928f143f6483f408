// Per-row presentation derivations: goal difference, qualification tiers,
// and decoding of the compact form string.
//
// Tier classification trusts the row's `position` field, not the array
// index; the relegation zone is computed from the size of the table passed
// in. Tiers are a set: in very small tables the relegation zone can overlap
// the qualification zones, and both tags are kept rather than hiding one.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{StandingRow, Team};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Positions at or above this rank qualify for the Champions League zone.
pub const CHAMPIONS_CUTOFF: u32 = 4;

/// Positions above the champions cutoff up to this rank are the Europa zone.
pub const EUROPA_CUTOFF: u32 = 6;

/// Number of bottom positions in the relegation zone.
pub const RELEGATION_COUNT: usize = 3;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("standings row for `{team}` is missing required field `{field}`")]
    MalformedRow { team: String, field: &'static str },
}

// ---------------------------------------------------------------------------
// Derived types
// ---------------------------------------------------------------------------

/// Qualification/relegation zone derived from table position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    Champions,
    Europa,
    Mid,
    Relegation,
}

/// A single decoded entry of the recent-form history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormOutcome {
    Win,
    Draw,
    Loss,
    Unknown,
}

impl FormOutcome {
    /// Decode one form token. Tokens are matched exactly; anything outside
    /// the W/D/L alphabet is `Unknown` rather than an error, so one
    /// malformed entry cannot discard the rest of the table.
    pub fn from_token(token: &str) -> Self {
        match token {
            "W" => FormOutcome::Win,
            "D" => FormOutcome::Draw,
            "L" => FormOutcome::Loss,
            _ => FormOutcome::Unknown,
        }
    }

    /// Single-letter display form.
    pub fn letter(&self) -> &'static str {
        match self {
            FormOutcome::Win => "W",
            FormOutcome::Draw => "D",
            FormOutcome::Loss => "L",
            FormOutcome::Unknown => "?",
        }
    }
}

/// A standings row augmented with the derived presentation fields. Owned by
/// the normalizer's output and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayRow {
    pub position: u32,
    pub team: Team,
    pub played_games: u32,
    pub won: u32,
    pub draw: u32,
    pub lost: u32,
    pub points: i64,
    pub goals_for: i64,
    pub goals_against: i64,
    pub goal_difference: i64,
    pub tiers: Vec<Tier>,
    pub form_sequence: Vec<FormOutcome>,
}

impl DisplayRow {
    /// Signed goal-difference string: positive values get an explicit `+`.
    pub fn goal_difference_label(&self) -> String {
        if self.goal_difference > 0 {
            format!("+{}", self.goal_difference)
        } else {
            self.goal_difference.to_string()
        }
    }
}

// ---------------------------------------------------------------------------
// Derivations
// ---------------------------------------------------------------------------

/// Classify a table position into its qualification/relegation tiers.
///
/// Champions and Europa are mutually exclusive by construction; the
/// relegation check runs independently and may co-select when the table has
/// six or fewer rows. An empty set collapses to `Mid`.
pub fn classify(position: u32, table_len: usize) -> Vec<Tier> {
    let mut tiers = Vec::new();

    if position <= CHAMPIONS_CUTOFF {
        tiers.push(Tier::Champions);
    } else if position <= EUROPA_CUTOFF {
        tiers.push(Tier::Europa);
    }

    if position as usize > table_len.saturating_sub(RELEGATION_COUNT) {
        tiers.push(Tier::Relegation);
    }

    if tiers.is_empty() {
        tiers.push(Tier::Mid);
    }

    tiers
}

/// Decode a form string into its outcome sequence, preserving source order.
///
/// Absent and empty strings both decode to an empty sequence: a team with
/// no recent-match history has no form, and the upstream occasionally sends
/// `""` instead of omitting the field.
pub fn decode_form(form: Option<&str>) -> Vec<FormOutcome> {
    match form {
        None => Vec::new(),
        Some("") => Vec::new(),
        Some(s) => s.split(',').map(FormOutcome::from_token).collect(),
    }
}

/// Normalize raw standings rows into display rows, order-preserving.
///
/// Fails only when a row is missing one of the structurally required
/// numeric fields; optional-field problems (absent or malformed `form`)
/// never reject a row.
pub fn normalize(rows: &[StandingRow]) -> Result<Vec<DisplayRow>, NormalizeError> {
    let table_len = rows.len();

    rows.iter()
        .map(|row| {
            let position = require(row, row.position, "position")?;
            let goals_for = require(row, row.goals_for, "goalsFor")?;
            let goals_against = require(row, row.goals_against, "goalsAgainst")?;

            Ok(DisplayRow {
                position,
                team: row.team.clone(),
                played_games: row.played_games,
                won: row.won,
                draw: row.draw,
                lost: row.lost,
                points: row.points,
                goals_for,
                goals_against,
                goal_difference: goals_for - goals_against,
                tiers: classify(position, table_len),
                form_sequence: decode_form(row.form.as_deref()),
            })
        })
        .collect()
}

fn require<T>(
    row: &StandingRow,
    value: Option<T>,
    field: &'static str,
) -> Result<T, NormalizeError> {
    value.ok_or_else(|| NormalizeError::MalformedRow {
        team: row.team.name.clone(),
        field,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
