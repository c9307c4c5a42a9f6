//! Utility functions for rendering UI components

use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, List, ListItem, ListState},
    Frame,
};

pub const LOADING_PLACEHOLDER: &str = "Loading…";

pub fn render_scrollable_list(
    frame: &mut Frame,
    area: Rect,
    items: Vec<ListItem>,
    selected_index: usize,
    block: Block,
) {
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default()); // Highlight handled by item styles

    let mut list_state = ListState::default();
    list_state.select(Some(selected_index));

    frame.render_stateful_widget(list, area, &mut list_state);
}

/// `MM:SS`, or `H:MM:SS` from one hour on
pub fn format_duration(ms: u64) -> String {
    let total_seconds = ms / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// Text to show for a title or author that has not arrived yet
pub fn or_placeholder(s: &str) -> &str {
    if s.trim().is_empty() { LOADING_PLACEHOLDER } else { s }
}

/// Calculate width needed for index column (log10(n) + padding)
pub fn calculate_num_width(item_count: usize) -> usize {
    if item_count == 0 {
        2
    } else {
        let digits = (item_count as f64).log10().floor() as usize + 1;
        digits + 1
    }
}

pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.chars().count() > max_width {
        let truncated: String = s.chars().take(max_width.saturating_sub(3)).collect();
        format!("{:<width$}", format!("{}...", truncated), width = max_width)
    } else {
        format!("{:<width$}", s, width = max_width)
    }
}

/// Column widths for track listings: (num, title, author)
pub fn calculate_track_column_widths(content_width: usize, item_count: usize) -> (usize, usize, usize) {
    // " {num}   {title}   {author}"
    let num_width = calculate_num_width(item_count);
    let fixed_width = 1 + num_width + 3 + 3;
    let remaining_width = content_width.saturating_sub(fixed_width);
    let title_width = (remaining_width * 60) / 100;
    let author_width = remaining_width.saturating_sub(title_width);

    (num_width, title_width, author_width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_under_an_hour() {
        assert_eq!(format_duration(0), "00:00");
        assert_eq!(format_duration(999), "00:00");
        assert_eq!(format_duration(65_000), "01:05");
        assert_eq!(format_duration(3_599_999), "59:59");
    }

    #[test]
    fn durations_of_an_hour_or_more() {
        assert_eq!(format_duration(3_600_000), "1:00:00");
        assert_eq!(format_duration(3_661_000), "1:01:01");
        assert_eq!(format_duration(36_000_000), "10:00:00");
    }

    #[test]
    fn blank_text_gets_placeholder() {
        assert_eq!(or_placeholder(""), LOADING_PLACEHOLDER);
        assert_eq!(or_placeholder("  "), LOADING_PLACEHOLDER);
        assert_eq!(or_placeholder("Queen"), "Queen");
    }

    #[test]
    fn truncation_pads_to_width() {
        assert_eq!(truncate_string("abc", 5), "abc  ");
        assert_eq!(truncate_string("abcdefgh", 6), "abc...");
    }

    #[test]
    fn num_width_grows_with_digits() {
        assert_eq!(calculate_num_width(0), 2);
        assert_eq!(calculate_num_width(9), 2);
        assert_eq!(calculate_num_width(10), 3);
        assert_eq!(calculate_num_width(150), 4);
    }
}
