// Selecting the canonical full table from a standings response.
//
// A competition may publish several standings variants (TOTAL, HOME, AWAY,
// per-group tables). The league view wants the full table: the first group
// typed "TOTAL", falling back to the first group when no TOTAL exists.
// `None` means the response carried no groups at all; the coordinator turns
// that into a no-standings-available state, not a failure.

use crate::models::{StandingsGroup, StandingsResponse};

/// Group type identifying the full league table.
pub const TOTAL_TYPE: &str = "TOTAL";

/// Pick the canonical table group. First `TOTAL` wins; duplicates are not
/// assumed away, the first occurrence is authoritative.
pub fn select_table(response: &StandingsResponse) -> Option<&StandingsGroup> {
    response
        .standings
        .iter()
        .find(|group| group.kind == TOTAL_TYPE)
        .or_else(|| response.standings.first())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
