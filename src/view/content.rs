//! Main content area rendering (search results, playlist detail)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, ListItem, Padding, Paragraph},
    Frame,
};

use crate::model::{
    ActiveSection, ContentState, ContentView, Playlist, PlaylistSummary, SearchResultSection,
    SearchResults, Track, UiState,
};
use super::utils::{
    calculate_num_width, calculate_track_column_widths, or_placeholder, render_scrollable_list,
    truncate_string,
};

pub fn render_main_content(
    frame: &mut Frame,
    area: Rect,
    ui_state: &UiState,
    content_state: &ContentState,
    current_track_id: Option<&str>,
) {
    let is_focused = ui_state.active_section == ActiveSection::MainContent;
    let border_style = if is_focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    if content_state.is_loading {
        let loading = Paragraph::new("Loading...")
            .style(Style::default().fg(Color::Yellow))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Content ")
                    .border_style(border_style),
            );
        frame.render_widget(loading, area);
        return;
    }

    match &content_state.view {
        ContentView::Empty => {
            let content = Paragraph::new("Type in search and press Enter to find music\n\nUse Tab to navigate between sections\nUse ↑/↓ to select items\nPress Enter to play or open")
                .style(Style::default().fg(Color::DarkGray))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .padding(Padding::horizontal(1))
                        .border_style(border_style),
                );
            frame.render_widget(content, area);
        }
        ContentView::SearchResults {
            results,
            section,
            track_index,
            playlist_index,
        } => {
            render_search_results(
                frame,
                area,
                results,
                *section,
                *track_index,
                *playlist_index,
                is_focused,
                current_track_id,
            );
        }
        ContentView::PlaylistDetail { playlist, selected_index } => {
            render_playlist_detail(frame, area, playlist, *selected_index, is_focused, current_track_id);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn render_search_results(
    frame: &mut Frame,
    area: Rect,
    results: &SearchResults,
    section: SearchResultSection,
    track_index: usize,
    playlist_index: usize,
    is_focused: bool,
    current_track_id: Option<&str>,
) {
    let border_style = if is_focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Category tabs
            Constraint::Min(0),    // Results list
        ])
        .split(area);

    let tabs_content: Vec<Span> = [
        (SearchResultSection::Tracks, format!(" Songs ({}) ", results.tracks.len())),
        (SearchResultSection::Playlists, format!(" Playlists ({}) ", results.playlists.len())),
    ]
    .into_iter()
    .flat_map(|(tab_section, title)| {
        let style = if tab_section == section {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        vec![Span::styled(title, style), Span::raw("  ")]
    })
    .collect();

    let tabs = Paragraph::new(Line::from(tabs_content)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Results for \"{}\" (←/→ to switch) ", results.query))
            .border_style(border_style),
    );
    frame.render_widget(tabs, chunks[0]);

    let content_width = chunks[1].width.saturating_sub(4) as usize;

    let (list_items, selected_index, empty_msg) = match section {
        SearchResultSection::Tracks => (
            render_track_items(&results.tracks, track_index, is_focused, current_track_id, content_width),
            track_index + 1, // +1 for header row
            "No songs found",
        ),
        SearchResultSection::Playlists => (
            render_playlist_items(&results.playlists, playlist_index, is_focused, content_width),
            playlist_index + 1,
            "No playlists found",
        ),
    };

    // Only the header row
    if list_items.len() <= 1 {
        let empty = Paragraph::new(format!("  {}", empty_msg))
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .padding(Padding::horizontal(1))
                    .border_style(border_style),
            );
        frame.render_widget(empty, chunks[1]);
        return;
    }

    let list_block = Block::default()
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
        .border_style(border_style);

    render_scrollable_list(frame, chunks[1], list_items, selected_index, list_block);
}

fn render_playlist_detail(
    frame: &mut Frame,
    area: Rect,
    playlist: &Playlist,
    selected_index: usize,
    is_focused: bool,
    current_track_id: Option<&str>,
) {
    let border_style = if is_focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ({} songs) ", playlist.name, playlist.tracks.len()))
        .title_bottom(Line::from(" Esc: back ").right_aligned())
        .padding(Padding::horizontal(1))
        .border_style(border_style);

    if playlist.tracks.is_empty() {
        let empty = Paragraph::new("  This playlist is empty")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let content_width = area.width.saturating_sub(4) as usize;
    let items = render_track_items(&playlist.tracks, selected_index, is_focused, current_track_id, content_width);
    render_scrollable_list(frame, area, items, selected_index + 1, block);
}

fn render_track_items(
    tracks: &[Track],
    track_index: usize,
    is_focused: bool,
    current_track_id: Option<&str>,
    content_width: usize,
) -> Vec<ListItem<'static>> {
    let (num_width, title_width, author_width) = calculate_track_column_widths(content_width, tracks.len());

    let mut items = vec![
        ListItem::new(format!(
            " {:<num_width$}   {:<title_width$}   {:<author_width$}",
            "#", "Title", "Author",
        ))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
    ];

    items.extend(tracks.iter().enumerate().map(|(i, track)| {
        let is_playing = current_track_id == Some(track.id.as_str());
        let style = if i == track_index && is_focused {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else if is_playing {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else if i == track_index {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        let playing_indicator = if is_playing { "▶" } else { " " };
        let track_num = format!("{}{:<num_width$}", playing_indicator, i + 1);
        let title_str = truncate_string(or_placeholder(&track.title), title_width);
        let author_str = truncate_string(or_placeholder(&track.author), author_width);

        ListItem::new(format!("{}   {}   {}", track_num, title_str, author_str)).style(style)
    }));

    items
}

fn render_playlist_items(
    playlists: &[PlaylistSummary],
    playlist_index: usize,
    is_focused: bool,
    content_width: usize,
) -> Vec<ListItem<'static>> {
    let num_width = calculate_num_width(playlists.len());
    let remaining = content_width.saturating_sub(1 + num_width + 3 + 3);
    let name_width = (remaining * 65) / 100;
    let author_width = remaining.saturating_sub(name_width);

    let mut items = vec![
        ListItem::new(format!(
            " {:<num_width$}   {:<name_width$}   {:<author_width$}",
            "#", "Playlist", "Author",
        ))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
    ];

    items.extend(playlists.iter().enumerate().map(|(i, playlist)| {
        let style = if i == playlist_index && is_focused {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else if i == playlist_index {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        let author = if playlist.author.is_empty() { "-" } else { playlist.author.as_str() };
        ListItem::new(format!(
            " {:<num_width$}   {}   {}",
            i + 1,
            truncate_string(&playlist.name, name_width),
            truncate_string(author, author_width),
        ))
        .style(style)
    }));

    items
}
