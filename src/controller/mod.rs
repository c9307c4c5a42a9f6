//! Controller module - Application logic and event handling
//!
//! This module contains the application controller that handles user input,
//! coordinates between the model and view, and drives the audio player.
//! It is organized into submodules by responsibility:
//!
//! - `input`: Key event handling
//! - `playback`: Playback control methods and audio fetching
//! - `navigation`: Search and playlist navigation
//! - `player_events`: Position ticker that mirrors the player into the model

mod input;
mod playback;
mod navigation;
mod player_events;

use std::collections::HashMap;
use std::sync::Arc;
use futures::future::{BoxFuture, Shared};
use tokio::sync::Mutex;

use crate::audio::PlayerController;
use crate::config::AppConfig;
use crate::model::{AppModel, AudioCache, HttpStatusError, MusicApi, PlaybackStateStore};

/// The player, or `None` when no audio device could be opened
pub type SharedPlayer = Arc<Mutex<Option<Box<dyn PlayerController>>>>;

/// Fetch-and-attach of one track's audio, awaited by everyone who asked for it
pub(crate) type AudioFetch = Shared<BoxFuture<'static, Result<(), playback::FetchError>>>;

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<Mutex<AppModel>>,
    pub(crate) api: Arc<dyn MusicApi>,
    pub(crate) player: SharedPlayer,
    pub(crate) cache: AudioCache,
    pub(crate) config: Arc<AppConfig>,
    /// Audio fetches currently running, by track id
    in_flight: Arc<Mutex<HashMap<String, AudioFetch>>>,
}

impl AppController {
    pub fn new(
        model: Arc<Mutex<AppModel>>,
        api: Arc<dyn MusicApi>,
        player: Option<Box<dyn PlayerController>>,
        cache: AudioCache,
        config: AppConfig,
    ) -> Self {
        Self {
            model,
            api,
            player: Arc::new(Mutex::new(player)),
            cache,
            config: Arc::new(config),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub(crate) async fn playback_store(&self) -> Arc<PlaybackStateStore> {
        self.model.lock().await.playback()
    }

    pub(crate) async fn report_error(&self, error: &anyhow::Error) {
        let model = self.model.lock().await;
        model.set_error(Self::format_error(error)).await;
    }

    pub(crate) fn format_error(error: &anyhow::Error) -> String {
        let status = error
            .chain()
            .find_map(|e| e.downcast_ref::<HttpStatusError>())
            .map(|e| e.status.as_u16());

        match status {
            Some(400) => return "The server rejected the request.".to_string(),
            Some(404) => return "Not found on the server.".to_string(),
            Some(429) => return "Rate limited. Please wait a moment.".to_string(),
            Some(code) if code >= 500 => {
                return "The server failed to handle the request. Try again later.".to_string();
            }
            _ => {}
        }

        let transport = error.chain().find_map(|e| e.downcast_ref::<reqwest::Error>());
        match transport {
            Some(e) if e.is_timeout() => "The server took too long to respond.".to_string(),
            Some(e) if e.is_connect() => "Cannot reach the SoundPy server. Is it running?".to_string(),
            _ => format!("Error: {:#}", error),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex as StdMutex};
    use std::time::Duration;

    use anyhow::{anyhow, Result};
    use futures::future::BoxFuture;
    use tokio::sync::Mutex;

    use super::AppController;
    use crate::audio::PlayerController;
    use crate::config::AppConfig;
    use crate::model::{
        AppModel, AudioCache, HttpStatusError, Playlist, PlaylistSummary, StreamDescriptor, Track,
    };

    pub fn track(id: &str) -> Track {
        Track {
            id: id.to_string(),
            title: format!("Title {}", id),
            author: "Artist".to_string(),
            artwork: None,
            thumb_url: None,
            source_link: format!("https://www.youtube.com/watch?v={}", id),
        }
    }

    /// Records every call; canned responses
    #[derive(Default)]
    pub struct FakeApi {
        pub tracks: Vec<Track>,
        pub playlists: Vec<PlaylistSummary>,
        pub fail_search: bool,
        /// Delays every search, like a slow backend
        pub search_delay: Option<Duration>,
        /// Delays every download
        pub download_delay: Option<Duration>,
        /// Links whose download answers 404
        pub missing_downloads: Vec<String>,
        pub search_calls: StdMutex<Vec<String>>,
        pub playlist_queries: StdMutex<Vec<String>>,
        pub downloads: StdMutex<Vec<String>>,
    }

    impl FakeApi {
        pub fn search_calls(&self) -> Vec<String> {
            self.search_calls.lock().unwrap().clone()
        }

        pub fn downloads(&self) -> Vec<String> {
            self.downloads.lock().unwrap().clone()
        }
    }

    impl crate::model::MusicApi for FakeApi {
        fn search<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<Vec<Track>>> {
            Box::pin(async move {
                self.search_calls.lock().unwrap().push(query.to_string());
                if let Some(delay) = self.search_delay {
                    tokio::time::sleep(delay).await;
                }
                if self.fail_search {
                    return Err(anyhow!("search failed"));
                }
                Ok(self.tracks.clone())
            })
        }

        fn get_playlists<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<Vec<PlaylistSummary>>> {
            Box::pin(async move {
                self.playlist_queries.lock().unwrap().push(query.to_string());
                Ok(self.playlists.clone())
            })
        }

        fn playlist<'a>(&'a self, link: &'a str) -> BoxFuture<'a, Result<Playlist>> {
            Box::pin(async move {
                Ok(Playlist {
                    id: link.to_string(),
                    name: link.to_string(),
                    link: link.to_string(),
                    tracks: self.tracks.clone(),
                })
            })
        }

        fn download<'a>(&'a self, link: &'a str) -> BoxFuture<'a, Result<Vec<u8>>> {
            Box::pin(async move {
                self.downloads.lock().unwrap().push(link.to_string());
                if let Some(delay) = self.download_delay {
                    tokio::time::sleep(delay).await;
                }
                if self.missing_downloads.iter().any(|missing| missing == link) {
                    return Err(HttpStatusError {
                        endpoint: "download".to_string(),
                        status: reqwest::StatusCode::NOT_FOUND,
                    }
                    .into());
                }
                Ok(link.as_bytes().to_vec())
            })
        }

        fn stream<'a>(&'a self, link: &'a str) -> BoxFuture<'a, Result<StreamDescriptor>> {
            Box::pin(async move {
                Ok(StreamDescriptor {
                    url: format!("http://cdn.local/{}", link),
                    title: None,
                    mime_type: None,
                })
            })
        }

        fn fetch_bytes<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Vec<u8>>> {
            Box::pin(async move { Ok(url.as_bytes().to_vec()) })
        }
    }

    #[derive(Default)]
    pub struct FakePlayerState {
        pub play_calls: usize,
        pub pause_calls: usize,
        pub next_calls: usize,
        pub previous_calls: usize,
        pub restarts: usize,
        /// When false, `play()` is accepted but the player stays paused
        pub accepts_play: bool,
        pub playing: bool,
        pub finished: bool,
        pub muted: bool,
        pub position_ms: u64,
        pub duration_ms: Option<u64>,
        pub queue: Vec<Track>,
        pub index: Option<usize>,
        pub audio: HashSet<String>,
    }

    /// Player whose state stays observable after being boxed
    pub struct FakePlayer {
        pub state: Arc<StdMutex<FakePlayerState>>,
    }

    impl FakePlayer {
        pub fn new() -> (Self, Arc<StdMutex<FakePlayerState>>) {
            let state = Arc::new(StdMutex::new(FakePlayerState {
                accepts_play: true,
                ..Default::default()
            }));
            (Self { state: state.clone() }, state)
        }
    }

    impl PlayerController for FakePlayer {
        fn play(&mut self) {
            let mut s = self.state.lock().unwrap();
            s.play_calls += 1;
            if s.accepts_play && s.index.is_some() {
                s.playing = true;
            }
        }

        fn pause(&mut self) {
            let mut s = self.state.lock().unwrap();
            s.pause_calls += 1;
            s.playing = false;
            s.finished = false;
        }

        fn next(&mut self) {
            let mut s = self.state.lock().unwrap();
            s.next_calls += 1;
            if let Some(i) = s.index {
                if i + 1 < s.queue.len() {
                    s.index = Some(i + 1);
                    s.position_ms = 0;
                    s.finished = false;
                }
            }
        }

        fn previous(&mut self) {
            let mut s = self.state.lock().unwrap();
            s.previous_calls += 1;
            if let Some(i) = s.index {
                s.index = Some(i.saturating_sub(1));
                s.position_ms = 0;
            }
        }

        fn is_playing(&self) -> bool {
            self.state.lock().unwrap().playing
        }

        fn duration_ms(&self) -> Option<u64> {
            self.state.lock().unwrap().duration_ms
        }

        fn current_position_ms(&self) -> u64 {
            self.state.lock().unwrap().position_ms
        }

        fn load_queue(&mut self, tracks: Vec<Track>, start: usize) {
            let mut s = self.state.lock().unwrap();
            s.index = if tracks.is_empty() { None } else { Some(start.min(tracks.len() - 1)) };
            s.queue = tracks;
            s.position_ms = 0;
        }

        fn attach_audio(&mut self, track_id: &str, _audio: Arc<Vec<u8>>) -> Result<()> {
            let mut s = self.state.lock().unwrap();
            s.audio.insert(track_id.to_string());
            if s.accepts_play {
                s.playing = true;
            }
            Ok(())
        }

        fn has_audio(&self, track_id: &str) -> bool {
            self.state.lock().unwrap().audio.contains(track_id)
        }

        fn current_track(&self) -> Option<Track> {
            let s = self.state.lock().unwrap();
            s.index.and_then(|i| s.queue.get(i)).cloned()
        }

        fn set_muted(&mut self, muted: bool) {
            self.state.lock().unwrap().muted = muted;
        }

        fn restart(&mut self) {
            let mut s = self.state.lock().unwrap();
            s.restarts += 1;
            s.position_ms = 0;
            s.finished = false;
        }

        fn is_finished(&self) -> bool {
            self.state.lock().unwrap().finished
        }
    }

    pub fn controller_with(api: Arc<FakeApi>, player: Option<FakePlayer>) -> AppController {
        let cache_dir = std::env::temp_dir().join(format!(
            "soundpy-rs-controller-{}-{}",
            std::process::id(),
            next_id()
        ));
        let config = AppConfig {
            cache_dir: cache_dir.clone(),
            download_dir: cache_dir.join("exports"),
            prefetch_queue: false,
            ..AppConfig::default()
        };
        AppController::new(
            Arc::new(Mutex::new(AppModel::new())),
            api,
            player.map(|p| Box::new(p) as Box<dyn PlayerController>),
            AudioCache::new(cache_dir),
            config,
        )
    }

    /// Poll `done` until it holds; spawned handlers finish in the background
    pub async fn wait_for<F, Fut>(mut done: F)
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = bool>,
    {
        for _ in 0..200 {
            if done().await {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("condition not reached in time");
    }

    fn next_id() -> u64 {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        COUNTER.fetch_add(1, Ordering::Relaxed)
    }
}
