//! Layout rendering (top bar, sidebar)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph},
    Frame,
};

use crate::model::{ActiveSection, PlaybackState, UiState};
use super::artwork;

pub const SEARCH_PLACEHOLDER: &str = "Search for songs...";

pub fn render_top_bar(frame: &mut Frame, area: Rect, ui_state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Search input
            Constraint::Length(40), // Status
        ])
        .split(area);

    let is_active = ui_state.active_section == ActiveSection::Search;
    let input = ui_state.search.input();

    let (search_text, search_style) = if input.is_empty() {
        (SEARCH_PLACEHOLDER, Style::default().fg(Color::DarkGray))
    } else if is_active {
        (input, Style::default().fg(Color::Green))
    } else {
        (input, Style::default().fg(Color::White))
    };

    // Typed but not yet sent
    let title = if !input.trim().is_empty() && input != ui_state.search.last_confirmed() {
        " Search (Enter to send) "
    } else {
        " Search "
    };

    let search = Paragraph::new(search_text).style(search_style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .padding(Padding::horizontal(1))
            .border_style(if is_active {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            }),
    );
    frame.render_widget(search, chunks[0]);

    if is_active {
        // Cursor after the typed text, inside border and padding
        let x = chunks[0].x + 2 + input.chars().count() as u16;
        if x < chunks[0].right().saturating_sub(1) {
            frame.set_cursor_position((x, chunks[0].y + 1));
        }
    }

    let status = ui_state.status_message.as_deref().unwrap_or("");
    let status = Paragraph::new(status)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL).title(" Status "));
    frame.render_widget(status, chunks[1]);
}

pub fn render_sidebar(frame: &mut Frame, area: Rect, ui_state: &UiState, playback: &PlaybackState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),                        // Playlists
            Constraint::Length(artwork::ART_ROWS + 2), // Artwork (+ borders)
        ])
        .split(area);

    let playlist_items: Vec<ListItem> = ui_state
        .playlists
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let style = if i == ui_state.playlist_selected
                && ui_state.active_section == ActiveSection::Playlists
            {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else if i == ui_state.playlist_selected {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(item.name.clone()).style(style)
        })
        .collect();

    let playlists_border_style = if ui_state.active_section == ActiveSection::Playlists {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    let playlists = List::new(playlist_items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Playlists ")
                .padding(Padding::horizontal(1))
                .border_style(playlists_border_style),
        )
        .highlight_style(Style::default()); // Highlight handled by item styles

    let mut list_state = ListState::default();
    if !ui_state.playlists.is_empty() {
        list_state.select(Some(ui_state.playlist_selected));
    }

    frame.render_stateful_widget(playlists, chunks[0], &mut list_state);

    artwork::render_artwork(frame, chunks[1], ui_state.artwork.as_ref(), playback.current_track.is_some());
}
