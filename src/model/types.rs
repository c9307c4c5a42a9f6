//! Core type definitions for the application

use std::time::Instant;

use super::content::{PlaylistSummary, Track};
use super::search::PendingQuery;

/// Which section of the UI is currently active/focused
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveSection {
    Search,
    Playlists,
    MainContent,
}

impl ActiveSection {
    pub fn next(self) -> Self {
        match self {
            ActiveSection::Search => ActiveSection::Playlists,
            ActiveSection::Playlists => ActiveSection::MainContent,
            ActiveSection::MainContent => ActiveSection::Search,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ActiveSection::Search => ActiveSection::MainContent,
            ActiveSection::Playlists => ActiveSection::Search,
            ActiveSection::MainContent => ActiveSection::Playlists,
        }
    }
}

/// Which section of search results is selected
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SearchResultSection {
    #[default]
    Tracks,
    Playlists,
}

impl SearchResultSection {
    pub fn toggle(self) -> Self {
        match self {
            Self::Tracks => Self::Playlists,
            Self::Playlists => Self::Tracks,
        }
    }
}

/// Represents a selected item for action handling
#[derive(Clone, Debug)]
pub enum SelectedItem {
    /// A track inside a list; the whole list becomes the play queue
    Track { queue: Vec<Track>, index: usize },
    Playlist { summary: PlaylistSummary },
}

/// Pixel grid of decoded artwork, two pixel rows per terminal row
pub type ArtPixels = Vec<Vec<(u8, u8, u8)>>;

/// UI state for the application
#[derive(Clone)]
pub struct UiState {
    pub active_section: ActiveSection,
    pub search: PendingQuery,
    pub playlists: Vec<PlaylistSummary>,
    pub playlist_selected: usize,
    pub error_message: Option<String>,
    pub error_timestamp: Option<Instant>,
    pub status_message: Option<String>,
    pub show_help_popup: bool,
    pub artwork: Option<ArtPixels>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            active_section: ActiveSection::Search,
            search: PendingQuery::default(),
            playlists: vec![], // Filled by the playlist search
            playlist_selected: 0,
            error_message: None,
            error_timestamp: None,
            status_message: None,
            show_help_popup: false,
            artwork: None,
        }
    }
}
