//! Main application model with state management

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

use super::content::{ContentState, ContentView, Playlist, PlaylistSummary, SearchResults};
use super::playback::{PlaybackState, PlaybackStateStore};
use super::types::{ActiveSection, ArtPixels, SearchResultSection, SelectedItem, UiState};

const ERROR_DISPLAY_SECS: u64 = 5;

/// Main application model containing all state
pub struct AppModel {
    playback: Arc<PlaybackStateStore>,
    pub ui_state: Arc<Mutex<UiState>>,
    pub content_state: Arc<Mutex<ContentState>>,
    pub should_quit: Arc<Mutex<bool>>,
}

impl AppModel {
    pub fn new() -> Self {
        Self {
            playback: Arc::new(PlaybackStateStore::new()),
            ui_state: Arc::new(Mutex::new(UiState::default())),
            content_state: Arc::new(Mutex::new(ContentState::default())),
            should_quit: Arc::new(Mutex::new(false)),
        }
    }

    // ========================================================================
    // Playback State
    // ========================================================================

    pub fn playback(&self) -> Arc<PlaybackStateStore> {
        self.playback.clone()
    }

    pub fn get_playback_state(&self) -> PlaybackState {
        self.playback.snapshot()
    }

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }

    pub async fn set_should_quit(&self, quit: bool) {
        *self.should_quit.lock().await = quit;
    }

    // ========================================================================
    // UI State
    // ========================================================================

    pub async fn get_ui_state(&self) -> UiState {
        self.ui_state.lock().await.clone()
    }

    pub async fn cycle_section_forward(&self) {
        let mut state = self.ui_state.lock().await;
        state.active_section = state.active_section.next();
    }

    pub async fn cycle_section_backward(&self) {
        let mut state = self.ui_state.lock().await;
        state.active_section = state.active_section.prev();
    }

    pub async fn set_active_section(&self, section: ActiveSection) {
        let mut state = self.ui_state.lock().await;
        state.active_section = section;
    }

    pub async fn move_selection_up(&self) {
        let mut state = self.ui_state.lock().await;
        if state.active_section == ActiveSection::Playlists && state.playlist_selected > 0 {
            state.playlist_selected -= 1;
        }
    }

    pub async fn move_selection_down(&self) {
        let mut state = self.ui_state.lock().await;
        if state.active_section == ActiveSection::Playlists
            && state.playlist_selected < state.playlists.len().saturating_sub(1)
        {
            state.playlist_selected += 1;
        }
    }

    pub async fn append_to_search(&self, c: char) {
        let mut state = self.ui_state.lock().await;
        state.search.push_char(c);
    }

    pub async fn backspace_search(&self) {
        let mut state = self.ui_state.lock().await;
        state.search.pop_char();
    }

    pub async fn reset_search(&self) {
        let mut state = self.ui_state.lock().await;
        state.search.reset();
    }

    /// The query to send now, if the pending input warrants one
    pub async fn confirm_search(&self) -> Option<String> {
        let mut state = self.ui_state.lock().await;
        state.search.confirm()
    }

    pub async fn set_playlists(&self, playlists: Vec<PlaylistSummary>) {
        let mut state = self.ui_state.lock().await;
        state.playlists = playlists;
        state.playlist_selected = 0;
    }

    pub async fn get_selected_playlist(&self) -> Option<PlaylistSummary> {
        let state = self.ui_state.lock().await;
        state.playlists.get(state.playlist_selected).cloned()
    }

    pub async fn set_error(&self, message: String) {
        let mut state = self.ui_state.lock().await;
        state.error_message = Some(message);
        state.error_timestamp = Some(Instant::now());
    }

    pub async fn clear_error(&self) {
        let mut state = self.ui_state.lock().await;
        state.error_message = None;
        state.error_timestamp = None;
    }

    pub async fn has_error(&self) -> bool {
        self.ui_state.lock().await.error_message.is_some()
    }

    pub async fn auto_clear_old_errors(&self) {
        let mut state = self.ui_state.lock().await;
        if let Some(timestamp) = state.error_timestamp {
            if timestamp.elapsed().as_secs() > ERROR_DISPLAY_SECS {
                state.error_message = None;
                state.error_timestamp = None;
            }
        }
    }

    pub async fn set_status(&self, message: impl Into<String>) {
        let mut state = self.ui_state.lock().await;
        state.status_message = Some(message.into());
    }

    pub async fn clear_status(&self) {
        let mut state = self.ui_state.lock().await;
        state.status_message = None;
    }

    pub async fn show_help_popup(&self) {
        let mut state = self.ui_state.lock().await;
        state.show_help_popup = true;
    }

    pub async fn hide_help_popup(&self) {
        let mut state = self.ui_state.lock().await;
        state.show_help_popup = false;
    }

    pub async fn is_help_popup_open(&self) -> bool {
        self.ui_state.lock().await.show_help_popup
    }

    pub async fn set_artwork(&self, artwork: Option<ArtPixels>) {
        let mut state = self.ui_state.lock().await;
        state.artwork = artwork;
    }

    // ========================================================================
    // Content State
    // ========================================================================

    pub async fn get_content_state(&self) -> ContentState {
        self.content_state.lock().await.clone()
    }

    pub async fn set_search_results(&self, results: SearchResults) {
        let mut state = self.content_state.lock().await;
        state.navigation_stack.clear();
        state.view = ContentView::SearchResults {
            results,
            section: SearchResultSection::Tracks,
            track_index: 0,
            playlist_index: 0,
        };
        state.is_loading = false;
    }

    pub async fn set_playlist_detail(&self, playlist: Playlist) {
        let mut state = self.content_state.lock().await;

        if !matches!(state.view, ContentView::Empty) {
            let previous_view = state.view.clone();
            state.navigation_stack.push(previous_view);
        }
        state.view = ContentView::PlaylistDetail {
            playlist,
            selected_index: 0,
        };
        state.is_loading = false;
    }

    pub async fn set_content_loading(&self, loading: bool) {
        let mut state = self.content_state.lock().await;
        state.is_loading = loading;
    }

    pub async fn navigate_back(&self) -> bool {
        let mut state = self.content_state.lock().await;
        if let Some(previous_view) = state.navigation_stack.pop() {
            state.view = previous_view;
            true
        } else {
            state.view = ContentView::Empty;
            false
        }
    }

    pub async fn navigate_search_section(&self) {
        let mut state = self.content_state.lock().await;
        if let ContentView::SearchResults { section, .. } = &mut state.view {
            *section = section.toggle();
        }
    }

    pub async fn content_move_up(&self) {
        let mut state = self.content_state.lock().await;
        match &mut state.view {
            ContentView::SearchResults {
                section,
                track_index,
                playlist_index,
                ..
            } => {
                let idx = match section {
                    SearchResultSection::Tracks => track_index,
                    SearchResultSection::Playlists => playlist_index,
                };
                if *idx > 0 {
                    *idx -= 1;
                }
            }
            ContentView::PlaylistDetail { selected_index, .. } => {
                if *selected_index > 0 {
                    *selected_index -= 1;
                }
            }
            ContentView::Empty => {}
        }
    }

    pub async fn content_move_down(&self) {
        let mut state = self.content_state.lock().await;
        match &mut state.view {
            ContentView::SearchResults {
                results,
                section,
                track_index,
                playlist_index,
            } => {
                let (idx, max) = match section {
                    SearchResultSection::Tracks => (track_index, results.tracks.len()),
                    SearchResultSection::Playlists => (playlist_index, results.playlists.len()),
                };
                if *idx < max.saturating_sub(1) {
                    *idx += 1;
                }
            }
            ContentView::PlaylistDetail { playlist, selected_index } => {
                if *selected_index < playlist.tracks.len().saturating_sub(1) {
                    *selected_index += 1;
                }
            }
            ContentView::Empty => {}
        }
    }

    pub async fn get_selected_content_item(&self) -> Option<SelectedItem> {
        let state = self.content_state.lock().await;
        match &state.view {
            ContentView::SearchResults {
                results,
                section: SearchResultSection::Tracks,
                track_index,
                ..
            } => (*track_index < results.tracks.len()).then(|| SelectedItem::Track {
                queue: results.tracks.clone(),
                index: *track_index,
            }),
            ContentView::SearchResults {
                results,
                section: SearchResultSection::Playlists,
                playlist_index,
                ..
            } => results
                .playlists
                .get(*playlist_index)
                .map(|summary| SelectedItem::Playlist { summary: summary.clone() }),
            ContentView::PlaylistDetail { playlist, selected_index } => {
                (*selected_index < playlist.tracks.len()).then(|| SelectedItem::Track {
                    queue: playlist.tracks.clone(),
                    index: *selected_index,
                })
            }
            ContentView::Empty => None,
        }
    }
}

impl Default for AppModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Track;

    fn track(id: &str) -> Track {
        Track {
            id: id.to_string(),
            title: id.to_uppercase(),
            author: "someone".to_string(),
            artwork: None,
            thumb_url: None,
            source_link: format!("https://www.youtube.com/watch?v={}", id),
        }
    }

    fn summary(name: &str) -> PlaylistSummary {
        PlaylistSummary {
            id: name.to_string(),
            name: name.to_string(),
            link: format!("https://www.youtube.com/playlist?list={}", name),
            author: String::new(),
            thumb_url: None,
        }
    }

    #[tokio::test]
    async fn selection_in_search_results_carries_whole_queue() {
        let model = AppModel::new();
        model
            .set_search_results(SearchResults {
                query: "q".to_string(),
                tracks: vec![track("a"), track("b"), track("c")],
                playlists: vec![],
            })
            .await;

        model.content_move_down().await;
        model.content_move_down().await;
        model.content_move_down().await;

        match model.get_selected_content_item().await {
            Some(SelectedItem::Track { queue, index }) => {
                assert_eq!(queue.len(), 3);
                assert_eq!(index, 2);
            }
            other => panic!("unexpected selection: {:?}", other),
        }
    }

    #[tokio::test]
    async fn playlists_tab_selects_playlist() {
        let model = AppModel::new();
        model
            .set_search_results(SearchResults {
                query: "q".to_string(),
                tracks: vec![track("a")],
                playlists: vec![summary("one"), summary("two")],
            })
            .await;
        model.navigate_search_section().await;
        model.content_move_down().await;

        match model.get_selected_content_item().await {
            Some(SelectedItem::Playlist { summary }) => assert_eq!(summary.name, "two"),
            other => panic!("unexpected selection: {:?}", other),
        }
    }

    #[tokio::test]
    async fn playlist_detail_pushes_and_back_restores() {
        let model = AppModel::new();
        model.set_search_results(SearchResults::default()).await;
        model
            .set_playlist_detail(Playlist {
                id: "p".to_string(),
                name: "Mix".to_string(),
                link: "l".to_string(),
                tracks: vec![track("x")],
            })
            .await;

        assert!(model.navigate_back().await);
        assert!(matches!(model.get_content_state().await.view, ContentView::SearchResults { .. }));
        assert!(!model.navigate_back().await);
        assert!(matches!(model.get_content_state().await.view, ContentView::Empty));
    }

    #[tokio::test]
    async fn errors_can_be_cleared() {
        let model = AppModel::new();
        model.set_error("boom".to_string()).await;
        assert!(model.has_error().await);
        model.auto_clear_old_errors().await;
        assert!(model.has_error().await);
        model.clear_error().await;
        assert!(!model.has_error().await);
    }

    #[tokio::test]
    async fn sidebar_selection_is_bounded() {
        let model = AppModel::new();
        model.set_playlists(vec![summary("one"), summary("two")]).await;
        model.set_active_section(ActiveSection::Playlists).await;
        for _ in 0..5 {
            model.move_selection_down().await;
        }
        assert_eq!(model.get_selected_playlist().await.map(|p| p.name).as_deref(), Some("two"));
        for _ in 0..5 {
            model.move_selection_up().await;
        }
        assert_eq!(model.get_selected_playlist().await.map(|p| p.name).as_deref(), Some("one"));
    }
}
