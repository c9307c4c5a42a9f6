//! Content data (tracks, playlists) and the main content view state

use serde::Deserialize;

use super::types::SearchResultSection;

/// A playable track from search results or a playlist
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub author: String,
    pub artwork: Option<Vec<u8>>,
    pub thumb_url: Option<String>,
    pub source_link: String,
}

impl Track {
    /// Derive a stable id from a watch link (`...?v=<id>`), falling back to the link itself
    pub fn id_from_link(link: &str) -> String {
        link.split(['?', '&'])
            .find_map(|part| part.strip_prefix("v="))
            .filter(|id| !id.is_empty())
            .map(|id| id.to_string())
            .unwrap_or_else(|| link.to_string())
    }
}

/// A playlist as listed by the playlist search
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub link: String,
    pub author: String,
    pub thumb_url: Option<String>,
}

/// A playlist with its ordered tracks
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub link: String,
    pub tracks: Vec<Track>,
}

/// Where to fetch the audio of a track from
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StreamDescriptor {
    pub url: String,
    pub title: Option<String>,
    pub mime_type: Option<String>,
}

// ============================================================================
// Wire types (backend JSON)
// ============================================================================

/// The backend numbers unsaved rows `0`; those, like blank strings, carry no id
fn wire_id(value: Option<serde_json::Value>, fallback: impl FnOnce() -> String) -> String {
    match value {
        Some(serde_json::Value::String(s)) if !s.is_empty() => s,
        Some(serde_json::Value::Number(n)) if n.as_u64() != Some(0) => n.to_string(),
        _ => fallback(),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct MusicJson {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub thumb: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub author: Option<String>,
}

impl From<MusicJson> for Track {
    fn from(music: MusicJson) -> Self {
        let id = wire_id(music.id, || Track::id_from_link(&music.url));
        Self {
            id,
            title: music.title.unwrap_or_default(),
            author: music.author.unwrap_or_default(),
            artwork: None,
            thumb_url: music.thumb.filter(|t| !t.is_empty()),
            source_link: music.url,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponseJson {
    #[serde(default)]
    pub results: Vec<MusicJson>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlaylistSummaryJson {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default, alias = "title")]
    pub name: Option<String>,
    #[serde(default, alias = "url")]
    pub link: String,
    #[serde(default)]
    pub thumb: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}

impl From<PlaylistSummaryJson> for PlaylistSummary {
    fn from(json: PlaylistSummaryJson) -> Self {
        let id = wire_id(json.id, || json.link.clone());
        Self {
            id,
            name: json.name.unwrap_or_else(|| json.link.clone()),
            link: json.link,
            author: json.author.unwrap_or_default(),
            thumb_url: json.thumb.filter(|t| !t.is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlaylistJson {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub musics: Vec<MusicJson>,
}

impl PlaylistJson {
    pub fn into_playlist(self, name: Option<String>) -> Playlist {
        let id = wire_id(self.id, || self.link.clone());
        Playlist {
            id,
            name: name.unwrap_or_else(|| self.link.clone()),
            link: self.link,
            tracks: self.musics.into_iter().map(Track::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct StreamJson {
    #[serde(alias = "link", alias = "stream_url")]
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, alias = "mime")]
    pub mime_type: Option<String>,
}

impl From<StreamJson> for StreamDescriptor {
    fn from(json: StreamJson) -> Self {
        Self {
            url: json.url,
            title: json.title,
            mime_type: json.mime_type,
        }
    }
}

// ============================================================================
// Content view state
// ============================================================================

/// Combined search results
#[derive(Clone, Debug, Default)]
pub struct SearchResults {
    pub query: String,
    pub tracks: Vec<Track>,
    pub playlists: Vec<PlaylistSummary>,
}

/// Represents the current view in the main content area
#[derive(Clone, Debug, Default)]
pub enum ContentView {
    #[default]
    Empty,
    SearchResults {
        results: SearchResults,
        section: SearchResultSection,
        track_index: usize,
        playlist_index: usize,
    },
    PlaylistDetail {
        playlist: Playlist,
        selected_index: usize,
    },
}

/// State for the main content area
#[derive(Clone, Debug, Default)]
pub struct ContentState {
    pub view: ContentView,
    pub navigation_stack: Vec<ContentView>,
    pub is_loading: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_is_taken_from_watch_link() {
        assert_eq!(Track::id_from_link("https://www.youtube.com/watch?v=fJ9rUzIMcZQ"), "fJ9rUzIMcZQ");
        assert_eq!(Track::id_from_link("https://youtube.com/watch?list=PL1&v=abc"), "abc");
        assert_eq!(Track::id_from_link("https://youtu.be/xyz"), "https://youtu.be/xyz");
    }

    #[test]
    fn search_response_parses_backend_payload() {
        let body = r#"{"results": [
            {"title": "Bohemian Rhapsody", "thumb": "https://i.ytimg.com/vi/fJ9rUzIMcZQ/hq.jpg",
             "url": "https://www.youtube.com/watch?v=fJ9rUzIMcZQ", "author": "Queen Official"},
            {"title": "No thumb", "thumb": "", "url": "https://www.youtube.com/watch?v=2", "author": null}
        ]}"#;
        let parsed: SearchResponseJson = serde_json::from_str(body).unwrap();
        let tracks: Vec<Track> = parsed.results.into_iter().map(Track::from).collect();

        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].id, "fJ9rUzIMcZQ");
        assert_eq!(tracks[0].author, "Queen Official");
        assert!(tracks[0].thumb_url.is_some());
        assert!(tracks[0].artwork.is_none());
        assert_eq!(tracks[1].thumb_url, None);
        assert_eq!(tracks[1].author, "");
    }

    #[test]
    fn playlist_keeps_track_order_and_numeric_ids() {
        let body = r#"{"id": 0, "link": "https://www.youtube.com/playlist?list=PL1", "musics": [
            {"id": 7, "title": "First", "thumb": "t", "url": "https://www.youtube.com/watch?v=a", "author": "A"},
            {"id": 8, "title": "Second", "thumb": "t", "url": "https://www.youtube.com/watch?v=b", "author": "B"}
        ]}"#;
        let parsed: PlaylistJson = serde_json::from_str(body).unwrap();
        let playlist = parsed.into_playlist(Some("Mix".to_string()));

        assert_eq!(playlist.id, "https://www.youtube.com/playlist?list=PL1");
        assert_eq!(playlist.name, "Mix");
        let titles: Vec<&str> = playlist.tracks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["First", "Second"]);
        assert_eq!(playlist.tracks[0].id, "7");
    }

    #[test]
    fn playlist_summary_accepts_title_and_url_aliases() {
        let body = r#"[{"title": "Road trip", "url": "https://www.youtube.com/playlist?list=PL9"}]"#;
        let parsed: Vec<PlaylistSummaryJson> = serde_json::from_str(body).unwrap();
        let summary = PlaylistSummary::from(parsed.into_iter().next().unwrap());

        assert_eq!(summary.name, "Road trip");
        assert_eq!(summary.link, "https://www.youtube.com/playlist?list=PL9");
        assert_eq!(summary.id, summary.link);
    }

    #[test]
    fn unsaved_playlist_summaries_fall_back_to_their_links() {
        let body = r#"[
            {"id": 0, "name": "First", "link": "https://www.youtube.com/playlist?list=PL1"},
            {"id": 0, "name": "Second", "link": "https://www.youtube.com/playlist?list=PL2"},
            {"id": 12, "name": "Saved", "link": "https://www.youtube.com/playlist?list=PL3"}
        ]"#;
        let parsed: Vec<PlaylistSummaryJson> = serde_json::from_str(body).unwrap();
        let ids: Vec<String> = parsed.into_iter().map(|json| PlaylistSummary::from(json).id).collect();

        assert_eq!(
            ids,
            [
                "https://www.youtube.com/playlist?list=PL1",
                "https://www.youtube.com/playlist?list=PL2",
                "12",
            ]
        );
    }
}
