//! Playback control methods

use std::fmt;
use std::sync::Arc;

use anyhow::{Context, Result};
use futures::FutureExt;

use crate::config::AudioSource;
use crate::model::Track;

use super::AppController;

const NO_AUDIO_DEVICE: &str = "No audio device available. Playback is disabled.";

/// A failed audio fetch, handed to every caller that waited on it
#[derive(Debug, Clone)]
pub(crate) struct FetchError(Arc<anyhow::Error>);

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl AppController {
    /// Play/pause based on the stored state, then record what the player reports
    pub async fn toggle_playback(&self) {
        let store = self.playback_store().await;
        let was_paused = store.snapshot().paused;

        let mut guard = self.player.lock().await;
        let Some(player) = guard.as_mut() else {
            drop(guard);
            self.model.lock().await.set_error(NO_AUDIO_DEVICE.to_string()).await;
            return;
        };

        if was_paused {
            player.play();
        } else {
            player.pause();
        }
        let is_playing = player.is_playing();
        drop(guard);

        store.set_pause(!is_playing);
        tracing::info!(was_paused, is_playing, "Playback toggled");
    }

    pub async fn skip_next(&self) {
        tracing::debug!("Skipping to next track");
        let mut guard = self.player.lock().await;
        if let Some(player) = guard.as_mut() {
            player.next();
        }
    }

    pub async fn skip_previous(&self) {
        tracing::debug!("Skipping to previous track");
        let mut guard = self.player.lock().await;
        if let Some(player) = guard.as_mut() {
            player.previous();
        }
    }

    pub async fn toggle_mute(&self) {
        let store = self.playback_store().await;
        let muted = !store.snapshot().muted;
        store.set_mute(muted);

        let mut guard = self.player.lock().await;
        if let Some(player) = guard.as_mut() {
            player.set_muted(muted);
        }
        tracing::info!(muted, "Mute toggled");
    }

    pub async fn toggle_repeat(&self) {
        let store = self.playback_store().await;
        let repeat_enabled = !store.snapshot().repeat_enabled;
        store.set_repeat(repeat_enabled);
        tracing::info!(repeat_enabled, "Repeat toggled");
    }

    /// Make `tracks` the play queue and start at `start`
    pub async fn play_tracks(&self, tracks: Vec<Track>, start: usize) {
        let Some(track) = tracks.get(start).cloned() else {
            return;
        };

        {
            let mut guard = self.player.lock().await;
            let Some(player) = guard.as_mut() else {
                drop(guard);
                self.model.lock().await.set_error(NO_AUDIO_DEVICE.to_string()).await;
                return;
            };
            player.load_queue(tracks.clone(), start);
        }

        tracing::info!(track = %track.title, queue_len = tracks.len(), start, "Starting playback");
        self.model
            .lock()
            .await
            .set_status(format!("Loading \"{}\"", track.title))
            .await;

        let result = self.ensure_audio(&track).await;
        self.model.lock().await.clear_status().await;
        if let Err(e) = result {
            tracing::error!(track = %track.title, error = %e, "Failed to load audio");
            self.report_error(&e).await;
            return;
        }

        if self.config.prefetch_queue {
            let rest: Vec<Track> = tracks[start + 1..]
                .iter()
                .chain(tracks[..start].iter())
                .cloned()
                .collect();
            self.spawn_prefetch(rest);
        }
    }

    fn spawn_prefetch(&self, tracks: Vec<Track>) {
        if tracks.is_empty() {
            return;
        }
        let controller = self.clone();
        tokio::spawn(async move {
            for track in tracks {
                if let Err(e) = controller.ensure_audio(&track).await {
                    tracing::warn!(track = %track.title, error = %e, "Prefetch failed");
                }
            }
            tracing::debug!("Prefetch finished");
        });
    }

    /// Fetch the audio of `track` unless the player already has it.
    ///
    /// A call for a track that is already being fetched waits for that fetch
    /// and gets its outcome.
    pub(crate) async fn ensure_audio(&self, track: &Track) -> Result<()> {
        {
            let guard = self.player.lock().await;
            match guard.as_ref() {
                Some(player) if !player.has_audio(&track.id) => {}
                _ => return Ok(()),
            }
        }

        let fetch = {
            let mut in_flight = self.in_flight.lock().await;
            match in_flight.get(&track.id) {
                Some(fetch) => {
                    tracing::debug!(track = %track.title, "Audio already being fetched, waiting");
                    fetch.clone()
                }
                None => {
                    let fetch = self.clone().fetch_and_attach(track.clone()).boxed().shared();
                    in_flight.insert(track.id.clone(), fetch.clone());
                    fetch
                }
            }
        };

        fetch.await.map_err(anyhow::Error::new)
    }

    async fn fetch_and_attach(self, track: Track) -> Result<(), FetchError> {
        let result: Result<()> = async {
            let bytes = self.fetch_audio(&track).await?;
            let mut guard = self.player.lock().await;
            if let Some(player) = guard.as_mut() {
                player.attach_audio(&track.id, Arc::new(bytes))?;
            }
            Ok(())
        }
        .await;

        self.in_flight.lock().await.remove(&track.id);
        result.map_err(|e| FetchError(Arc::new(e)))
    }

    async fn fetch_audio(&self, track: &Track) -> Result<Vec<u8>> {
        if let Some(bytes) = self.cache.get(&track.id).await {
            return Ok(bytes);
        }

        let bytes = match self.config.audio_source {
            AudioSource::Download => self.api.download(&track.source_link).await,
            AudioSource::Stream => {
                let stream = self
                    .api
                    .stream(&track.source_link)
                    .await
                    .context("resolving stream")?;
                tracing::debug!(track = %track.title, url = %stream.url, mime = ?stream.mime_type, "Stream resolved");
                self.api.fetch_bytes(&stream.url).await
            }
        }
        .with_context(|| format!("fetching audio for \"{}\"", track.title))?;

        if let Err(e) = self.cache.put(&track.id, &bytes).await {
            tracing::warn!(track = %track.title, error = %e, "Could not cache audio");
        }
        Ok(bytes)
    }

    /// Save the current track's audio into the download directory
    pub async fn export_current_track(&self) {
        let store = self.playback_store().await;
        let Some(track) = store.snapshot().current_track else {
            return;
        };

        match self.cache.export(&track, &self.config.download_dir).await {
            Ok(path) => {
                tracing::info!(track = %track.title, path = %path.display(), "Track exported");
                self.model
                    .lock()
                    .await
                    .set_status(format!("Saved {}", path.display()))
                    .await;
            }
            Err(e) => {
                tracing::error!(track = %track.title, error = %e, "Export failed");
                self.report_error(&e).await;
            }
        }
    }
}
