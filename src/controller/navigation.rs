//! Navigation-related controller methods (search, playlists)

use tokio::task::JoinHandle;

use crate::model::{ActiveSection, PlaylistSummary, SearchResults, SelectedItem};
use super::AppController;

impl AppController {
    /// Fire the pending query, if it is non-blank and differs from the last one.
    ///
    /// The query is confirmed before returning, so a second call right after
    /// finds nothing new to send. The request itself runs in its own task.
    pub async fn confirm_search(&self) -> Option<JoinHandle<()>> {
        let model = self.model.lock().await;
        let Some(query) = model.confirm_search().await else {
            tracing::debug!("Search input blank or unchanged, not searching");
            return None;
        };
        model.set_content_loading(true).await;
        drop(model);

        let controller = self.clone();
        Some(tokio::spawn(async move {
            controller.perform_search(&query).await;
        }))
    }

    async fn perform_search(&self, query: &str) {
        tracing::debug!(query, "Performing search");
        let (tracks, playlists) = tokio::join!(self.api.search(query), self.api.get_playlists(query));

        let playlists = playlists.unwrap_or_else(|e| {
            tracing::warn!(query, error = %e, "Playlist search failed");
            Vec::new()
        });

        let model = self.model.lock().await;
        match tracks {
            Ok(tracks) => {
                tracing::info!(
                    query,
                    tracks = tracks.len(),
                    playlists = playlists.len(),
                    "Search completed successfully"
                );
                model.set_playlists(playlists.clone()).await;
                model
                    .set_search_results(SearchResults {
                        query: query.to_string(),
                        tracks,
                        playlists,
                    })
                    .await;
                // Switch to MainContent section to show results
                model.set_active_section(ActiveSection::MainContent).await;
            }
            Err(e) => {
                tracing::error!(query, error = %e, "Search failed");
                model.set_content_loading(false).await;
                model.set_error(Self::format_error(&e)).await;
            }
        }
    }

    pub async fn open_playlist(&self, summary: &PlaylistSummary) {
        tracing::debug!(playlist = %summary.name, link = %summary.link, "Opening playlist");
        self.model.lock().await.set_content_loading(true).await;

        let result = self.api.playlist(&summary.link).await;

        let model = self.model.lock().await;
        match result {
            Ok(mut playlist) => {
                playlist.name = summary.name.clone();
                tracing::info!(playlist = %playlist.name, tracks = playlist.tracks.len(), "Playlist loaded");
                model.set_playlist_detail(playlist).await;
                model.set_active_section(ActiveSection::MainContent).await;
            }
            Err(e) => {
                tracing::error!(playlist = %summary.name, error = %e, "Failed to load playlist");
                model.set_content_loading(false).await;
                model.set_error(Self::format_error(&e)).await;
            }
        }
    }

    pub async fn handle_selected_item(&self, item: SelectedItem) {
        match item {
            SelectedItem::Track { queue, index } => self.play_tracks(queue, index).await,
            SelectedItem::Playlist { summary } => self.open_playlist(&summary).await,
        }
    }
}
