//! Model module - Application state and data types
//!
//! - `types`: Core type definitions (enums, UI state, etc.)
//! - `search`: Pending search input and the last confirmed query
//! - `playback`: Observable playback state store
//! - `content`: Tracks, playlists and the content view
//! - `cache`: On-disk audio cache
//! - `api_client`: Backend API client
//! - `app_model`: Main application model with state management methods

mod types;
mod search;
mod playback;
mod content;
mod cache;
mod api_client;
mod app_model;

pub use types::{ActiveSection, ArtPixels, SearchResultSection, SelectedItem, UiState};

pub use search::PendingQuery;

pub use playback::{PlaybackState, PlaybackStateStore};

pub use content::{
    ContentState, ContentView, Playlist, PlaylistSummary, SearchResults, StreamDescriptor, Track,
};

pub use cache::AudioCache;

pub use api_client::{ApiClient, HttpStatusError, MusicApi};

pub use app_model::AppModel;
