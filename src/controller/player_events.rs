//! Position ticker: mirrors the player into the playback store

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::model::Track;
use crate::view::artwork::{decode_art, ART_COLS, ART_ROWS};
use super::AppController;

impl AppController {
    pub fn start_position_ticker(&self) -> JoinHandle<()> {
        let controller = self.clone();
        let period = self.config.tick_interval();
        tracing::info!(interval_ms = period.as_millis() as u64, "Starting position ticker");

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if controller.model.lock().await.should_quit().await {
                    tracing::debug!("Position ticker shutting down");
                    break;
                }
                controller.tick().await;
            }
        })
    }

    /// One poll of the player
    pub(crate) async fn tick(&self) {
        let store = self.playback_store().await;

        let mut guard = self.player.lock().await;
        let Some(player) = guard.as_mut() else {
            return;
        };

        if player.is_finished() {
            if store.snapshot().repeat_enabled {
                tracing::debug!("End of track, repeating");
                player.restart();
            } else {
                let before = player.current_track().map(|t| t.id);
                player.next();
                if player.current_track().map(|t| t.id) == before {
                    tracing::debug!("End of queue");
                    player.pause();
                }
            }
        }

        let current = player.current_track();
        let duration = player.duration_ms();
        let position = player.current_position_ms();
        let is_playing = player.is_playing();
        drop(guard);

        let previous_id = store.snapshot().current_track.map(|t| t.id);
        let changed = current.as_ref().map(|t| &t.id) != previous_id.as_ref();
        if changed {
            store.set_current_track(current.clone());
        }
        store.set_duration(duration);
        store.set_current_position(position);
        store.set_pause(!is_playing);

        if changed {
            if let Some(track) = current {
                tracing::info!(track = %track.title, author = %track.author, "Track changed");
                self.spawn_track_changed(track);
            } else {
                self.model.lock().await.set_artwork(None).await;
            }
        }
    }

    fn spawn_track_changed(&self, track: Track) {
        let controller = self.clone();
        tokio::spawn(async move {
            controller.model.lock().await.set_artwork(None).await;

            if let Err(e) = controller.ensure_audio(&track).await {
                tracing::error!(track = %track.title, error = %e, "Failed to load audio");
                controller.report_error(&e).await;
            }
            controller.load_artwork(track).await;
        });
    }

    async fn load_artwork(&self, track: Track) {
        let Some(url) = track.thumb_url.clone() else {
            return;
        };
        let bytes = match self.api.fetch_bytes(&url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(track = %track.title, error = %e, "Artwork fetch failed");
                return;
            }
        };

        let pixels = decode_art(&bytes, ART_COLS, ART_ROWS);
        if pixels.is_none() {
            tracing::warn!(track = %track.title, "Artwork could not be decoded");
        }

        let store = self.playback_store().await;
        let still_current = store
            .snapshot()
            .current_track
            .is_some_and(|current| current.id == track.id);
        if !still_current {
            return;
        }

        store.set_current_track(Some(Track {
            artwork: Some(bytes),
            ..track
        }));
        self.model.lock().await.set_artwork(pixels).await;
    }
}
