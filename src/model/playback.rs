//! Playback state and the observable store that owns it

use tokio::sync::watch;

use super::content::Track;

/// Transient playback state rendered by the views
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaybackState {
    pub muted: bool,
    pub repeat_enabled: bool,
    pub paused: bool,
    pub position_ms: u64,
    pub duration_ms: Option<u64>,
    pub current_track: Option<Track>,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            muted: false,
            repeat_enabled: false,
            paused: true,
            position_ms: 0,
            duration_ms: None,
            current_track: None,
        }
    }
}

/// Single owner of [`PlaybackState`].
///
/// Every mutator publishes to subscribers only when the value actually changes,
/// so repeating an identical call is a no-op.
pub struct PlaybackStateStore {
    tx: watch::Sender<PlaybackState>,
}

impl PlaybackStateStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(PlaybackState::default());
        Self { tx }
    }

    pub fn snapshot(&self) -> PlaybackState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.tx.subscribe()
    }

    pub fn set_mute(&self, muted: bool) -> bool {
        self.tx.send_if_modified(|state| replace(&mut state.muted, muted))
    }

    pub fn set_repeat(&self, repeat_enabled: bool) -> bool {
        self.tx
            .send_if_modified(|state| replace(&mut state.repeat_enabled, repeat_enabled))
    }

    /// Mirrors what the player reports; does not start or stop anything.
    pub fn set_pause(&self, paused: bool) -> bool {
        self.tx.send_if_modified(|state| replace(&mut state.paused, paused))
    }

    /// Clamped to the known duration.
    pub fn set_current_position(&self, position_ms: u64) -> bool {
        self.tx.send_if_modified(|state| {
            let clamped = match state.duration_ms {
                Some(duration) => position_ms.min(duration),
                None => position_ms,
            };
            replace(&mut state.position_ms, clamped)
        })
    }

    pub fn set_duration(&self, duration_ms: Option<u64>) -> bool {
        self.tx.send_if_modified(|state| {
            let mut changed = replace(&mut state.duration_ms, duration_ms);
            if let Some(duration) = duration_ms {
                if state.position_ms > duration {
                    state.position_ms = duration;
                    changed = true;
                }
            }
            changed
        })
    }

    /// Replaces the track wholesale; position restarts when a different track is set.
    pub fn set_current_track(&self, track: Option<Track>) -> bool {
        self.tx.send_if_modified(|state| {
            if state.current_track == track {
                return false;
            }
            let same_id = match (&state.current_track, &track) {
                (Some(old), Some(new)) => old.id == new.id,
                _ => false,
            };
            if !same_id {
                state.position_ms = 0;
                state.duration_ms = None;
            }
            state.current_track = track;
            true
        })
    }
}

impl Default for PlaybackStateStore {
    fn default() -> Self {
        Self::new()
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: &str) -> Track {
        Track {
            id: id.to_string(),
            title: format!("title {}", id),
            author: "author".to_string(),
            artwork: None,
            thumb_url: None,
            source_link: format!("https://www.youtube.com/watch?v={}", id),
        }
    }

    #[test]
    fn defaults_match_screen_mount() {
        let store = PlaybackStateStore::new();
        let state = store.snapshot();
        assert!(!state.muted);
        assert!(!state.repeat_enabled);
        assert!(state.paused);
        assert_eq!(state.position_ms, 0);
        assert!(state.current_track.is_none());
    }

    #[test]
    fn set_mute_is_idempotent() {
        let store = PlaybackStateStore::new();
        let mut rx = store.subscribe();

        assert!(store.set_mute(true));
        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();

        assert!(!store.set_mute(true));
        assert!(!rx.has_changed().unwrap());
        assert!(store.snapshot().muted);
    }

    #[test]
    fn mute_and_repeat_are_independent() {
        let store = PlaybackStateStore::new();
        store.set_repeat(true);
        store.set_mute(true);
        store.set_repeat(false);

        let state = store.snapshot();
        assert!(state.muted);
        assert!(!state.repeat_enabled);
    }

    #[test]
    fn position_clamps_at_duration() {
        let store = PlaybackStateStore::new();
        store.set_duration(Some(180_000));

        for tick in (0..=200_000).step_by(10_000) {
            store.set_current_position(tick);
            assert!(store.snapshot().position_ms <= 180_000);
        }
        assert_eq!(store.snapshot().position_ms, 180_000);
    }

    #[test]
    fn shrinking_duration_reclamps_position() {
        let store = PlaybackStateStore::new();
        store.set_current_position(90_000);
        assert_eq!(store.snapshot().position_ms, 90_000);

        store.set_duration(Some(60_000));
        assert_eq!(store.snapshot().position_ms, 60_000);
    }

    #[test]
    fn new_track_resets_position() {
        let store = PlaybackStateStore::new();
        store.set_current_track(Some(track("a")));
        store.set_duration(Some(100_000));
        store.set_current_position(50_000);

        let mut with_art = track("a");
        with_art.artwork = Some(vec![1, 2, 3]);
        assert!(store.set_current_track(Some(with_art)));
        assert_eq!(store.snapshot().position_ms, 50_000);

        assert!(store.set_current_track(Some(track("b"))));
        let state = store.snapshot();
        assert_eq!(state.position_ms, 0);
        assert_eq!(state.duration_ms, None);
        assert!(!store.set_current_track(Some(track("b"))));
    }

    #[tokio::test]
    async fn subscribers_see_published_changes() {
        let store = PlaybackStateStore::new();
        let mut rx = store.subscribe();

        store.set_pause(false);
        rx.changed().await.unwrap();
        assert!(!rx.borrow_and_update().paused);
    }
}
