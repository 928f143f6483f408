// Screen layout: panel arrangement and sizing.
//
// Divides the terminal area into fixed zones for the standings viewer:
//
// +--------------------------------------------------+
// | Status Bar (1 row)                               |
// +----------------------+---------------------------+
// | Competitions (35%)   | Standings Table (65%)     |
// +----------------------+---------------------------+
// | Legend Bar (1 row)                               |
// +--------------------------------------------------+
// | Help Bar (1 row)                                 |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: phase, selected competition, last-update time.
    pub status_bar: Rect,
    /// Left panel: selectable competition list.
    pub competitions: Rect,
    /// Right panel: the standings table (or loading/notice surface).
    pub standings: Rect,
    /// Tier color legend and data credit.
    pub legend_bar: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

/// Build the viewer layout from the available terminal area.
pub fn build_layout(area: Rect) -> AppLayout {
    // Vertical: status(1) | middle(fill) | legend(1) | help(1)
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(8),    // middle section (list + table)
            Constraint::Length(1), // legend bar
            Constraint::Length(1), // help bar
        ])
        .split(area);

    let status_bar = vertical[0];
    let middle = vertical[1];
    let legend_bar = vertical[2];
    let help_bar = vertical[3];

    // Horizontal: competition list (35%) | standings table (65%)
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(middle);

    AppLayout {
        status_bar,
        competitions: horizontal[0],
        standings: horizontal[1],
        legend_bar,
        help_bar,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn test_area() -> Rect {
        Rect::new(0, 0, 140, 40)
    }

    #[test]
    fn layout_all_rects_nonzero() {
        let layout = build_layout(test_area());
        let rects = [
            ("status_bar", layout.status_bar),
            ("competitions", layout.competitions),
            ("standings", layout.standings),
            ("legend_bar", layout.legend_bar),
            ("help_bar", layout.help_bar),
        ];
        for (name, rect) in &rects {
            assert!(
                rect.width > 0 && rect.height > 0,
                "{} has zero area: {:?}",
                name,
                rect
            );
        }
    }

    #[test]
    fn layout_single_row_bars() {
        let layout = build_layout(test_area());
        assert_eq!(layout.status_bar.height, 1);
        assert_eq!(layout.legend_bar.height, 1);
        assert_eq!(layout.help_bar.height, 1);
    }

    #[test]
    fn layout_table_wider_than_list() {
        let layout = build_layout(test_area());
        assert!(
            layout.standings.width > layout.competitions.width,
            "Standings panel ({}) should be wider than the competition list ({})",
            layout.standings.width,
            layout.competitions.width
        );
    }

    #[test]
    fn layout_panels_share_the_middle_band() {
        let layout = build_layout(test_area());
        assert_eq!(layout.competitions.y, layout.standings.y);
        assert_eq!(layout.competitions.height, layout.standings.height);
    }

    #[test]
    fn layout_fits_within_area() {
        let area = test_area();
        let layout = build_layout(area);
        let all_rects = [
            layout.status_bar,
            layout.competitions,
            layout.standings,
            layout.legend_bar,
            layout.help_bar,
        ];
        for rect in &all_rects {
            assert!(rect.x + rect.width <= area.width);
            assert!(rect.y + rect.height <= area.height);
        }
    }

    #[test]
    fn layout_small_terminal_still_valid() {
        let area = Rect::new(0, 0, 40, 12);
        let layout = build_layout(area);
        assert!(layout.competitions.height > 0);
        assert!(layout.standings.height > 0);
    }
}
