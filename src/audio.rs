//! Audio output: the player trait the controllers drive, and its rodio backend

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use rodio::mixer::Mixer;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use crate::model::Track;

/// Media player collaborator.
///
/// Commands are fire-and-forget; callers read the resulting state back through
/// [`is_playing`](Self::is_playing) and friends instead of assuming success.
pub trait PlayerController: Send {
    fn play(&mut self);
    fn pause(&mut self);
    fn next(&mut self);
    fn previous(&mut self);
    fn is_playing(&self) -> bool;
    fn duration_ms(&self) -> Option<u64>;
    fn current_position_ms(&self) -> u64;

    /// Replace the queue and select `start`. Playback begins once its audio is attached.
    fn load_queue(&mut self, tracks: Vec<Track>, start: usize);
    fn attach_audio(&mut self, track_id: &str, audio: Arc<Vec<u8>>) -> Result<()>;
    fn has_audio(&self, track_id: &str) -> bool;
    fn current_track(&self) -> Option<Track>;
    fn set_muted(&mut self, muted: bool);
    /// Start the current track over from the beginning
    fn restart(&mut self);
    /// The current track played through to its end
    fn is_finished(&self) -> bool;
}

/// Owns the audio device; must outlive every player built from it.
pub fn open_output() -> Result<OutputStream> {
    let mut stream = OutputStreamBuilder::from_default_device()
        .context("no default audio device")?
        .open_stream_or_fallback()
        .context("opening audio stream")?;
    stream.log_on_drop(false);
    Ok(stream)
}

#[derive(Clone)]
struct SharedBytes(Arc<Vec<u8>>);

impl AsRef<[u8]> for SharedBytes {
    fn as_ref(&self) -> &[u8] {
        self.0.as_slice()
    }
}

/// One sink per track, rebuilt on every track change
pub struct RodioPlayer {
    mixer: Mixer,
    sink: Option<Sink>,
    queue: Vec<Track>,
    audio: HashMap<String, Arc<Vec<u8>>>,
    index: Option<usize>,
    duration: Option<Duration>,
    muted: bool,
    wants_play: bool,
}

impl RodioPlayer {
    pub fn new(stream: &OutputStream) -> Self {
        Self {
            mixer: stream.mixer().clone(),
            sink: None,
            queue: Vec::new(),
            audio: HashMap::new(),
            index: None,
            duration: None,
            muted: false,
            wants_play: false,
        }
    }

    fn volume(&self) -> f32 {
        if self.muted { 0.0 } else { 1.0 }
    }

    fn stop_sink(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.duration = None;
    }

    fn start_current(&mut self) -> Result<()> {
        self.stop_sink();

        let Some(track) = self.index.and_then(|i| self.queue.get(i)) else {
            return Ok(());
        };
        let Some(bytes) = self.audio.get(&track.id).cloned() else {
            tracing::debug!(track_id = %track.id, "Audio not attached yet, waiting");
            return Ok(());
        };

        let decoder = Decoder::new(Cursor::new(SharedBytes(bytes)))
            .with_context(|| format!("decoding \"{}\"", track.title))?;
        self.duration = decoder.total_duration();

        let sink = Sink::connect_new(&self.mixer);
        sink.set_volume(self.volume());
        sink.append(decoder);
        if !self.wants_play {
            sink.pause();
        }

        tracing::info!(
            track = %track.title,
            author = %track.author,
            duration_ms = ?self.duration.map(|d| d.as_millis()),
            "Track loaded"
        );
        self.sink = Some(sink);
        Ok(())
    }

    fn select(&mut self, index: usize) {
        self.index = Some(index);
        if let Err(e) = self.start_current() {
            tracing::error!(error = %e, "Failed to start track");
        }
    }
}

/// Keep only the audio of tracks in `queue`; the disk cache covers replays
fn retain_queued(audio: &mut HashMap<String, Arc<Vec<u8>>>, queue: &[Track]) {
    let before = audio.len();
    audio.retain(|id, _| queue.iter().any(|t| &t.id == id));
    if audio.len() < before {
        tracing::debug!(evicted = before - audio.len(), kept = audio.len(), "Released audio of dequeued tracks");
    }
}

impl PlayerController for RodioPlayer {
    fn play(&mut self) {
        if self.index.is_none() {
            return;
        }
        self.wants_play = true;
        let resumable = self.sink.as_ref().is_some_and(|sink| !sink.empty());
        if resumable {
            if let Some(sink) = &self.sink {
                sink.play();
            }
        } else {
            self.restart();
        }
    }

    fn pause(&mut self) {
        self.wants_play = false;
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn next(&mut self) {
        if let Some(index) = self.index {
            if index + 1 < self.queue.len() {
                self.select(index + 1);
            }
        }
    }

    fn previous(&mut self) {
        match self.index {
            Some(index) if index > 0 => self.select(index - 1),
            Some(_) => self.restart(),
            None => {}
        }
    }

    fn is_playing(&self) -> bool {
        self.sink
            .as_ref()
            .is_some_and(|sink| !sink.is_paused() && !sink.empty())
    }

    fn duration_ms(&self) -> Option<u64> {
        self.duration.map(|d| d.as_millis() as u64)
    }

    fn current_position_ms(&self) -> u64 {
        self.sink
            .as_ref()
            .map(|sink| sink.get_pos().as_millis() as u64)
            .unwrap_or(0)
    }

    fn load_queue(&mut self, tracks: Vec<Track>, start: usize) {
        self.stop_sink();
        retain_queued(&mut self.audio, &tracks);
        self.queue = tracks;
        self.wants_play = true;
        if self.queue.is_empty() {
            self.index = None;
            return;
        }
        self.select(start.min(self.queue.len() - 1));
    }

    fn attach_audio(&mut self, track_id: &str, audio: Arc<Vec<u8>>) -> Result<()> {
        // A late fetch for a queue that was since replaced
        if !self.queue.iter().any(|t| t.id == track_id) {
            tracing::debug!(track_id, "Dropping audio for a track no longer queued");
            return Ok(());
        }
        self.audio.insert(track_id.to_string(), audio);
        let is_current = self.current_track().is_some_and(|t| t.id == track_id);
        if is_current && self.sink.is_none() {
            self.start_current()?;
        }
        Ok(())
    }

    fn has_audio(&self, track_id: &str) -> bool {
        self.audio.contains_key(track_id)
    }

    fn current_track(&self) -> Option<Track> {
        self.index.and_then(|i| self.queue.get(i)).cloned()
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if let Some(sink) = &self.sink {
            sink.set_volume(self.volume());
        }
    }

    fn restart(&mut self) {
        if let Err(e) = self.start_current() {
            tracing::error!(error = %e, "Failed to restart track");
        }
    }

    fn is_finished(&self) -> bool {
        self.wants_play && self.sink.as_ref().is_some_and(|sink| sink.empty())
    }
}
