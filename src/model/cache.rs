//! On-disk cache of fetched audio, keyed by track id

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::content::Track;

const AUDIO_SUBDIR: &str = "audio";
const AUDIO_EXTENSION: &str = "mp4";

/// Cache of downloaded audio so a replayed track is not fetched twice
#[derive(Clone, Debug)]
pub struct AudioCache {
    root: PathBuf,
}

impl AudioCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, track_id: &str) -> PathBuf {
        self.root
            .join(AUDIO_SUBDIR)
            .join(format!("{}.{}", sanitize_file_name(track_id), AUDIO_EXTENSION))
    }

    pub async fn get(&self, track_id: &str) -> Option<Vec<u8>> {
        let path = self.path_for(track_id);
        match tokio::fs::read(&path).await {
            Ok(bytes) if !bytes.is_empty() => {
                tracing::debug!(track_id, path = %path.display(), "Audio cache hit");
                Some(bytes)
            }
            _ => None,
        }
    }

    pub async fn put(&self, track_id: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path_for(track_id);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating cache directory {}", parent.display()))?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::debug!(track_id, size = bytes.len(), "Audio cached");
        Ok(())
    }

    /// Copy cached audio into `dir` as `<title>.mp4` and return the written path
    pub async fn export(&self, track: &Track, dir: &Path) -> Result<PathBuf> {
        let bytes = self
            .get(&track.id)
            .await
            .with_context(|| format!("\"{}\" has not been downloaded yet", track.title))?;

        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("creating {}", dir.display()))?;

        let name = if track.title.trim().is_empty() { track.id.as_str() } else { track.title.as_str() };
        let target = dir.join(format!("{}.{}", sanitize_file_name(name), AUDIO_EXTENSION));
        tokio::fs::write(&target, bytes)
            .await
            .with_context(|| format!("writing {}", target.display()))?;
        Ok(target)
    }
}

fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = cleaned.trim().trim_matches('.');
    if trimmed.is_empty() { "track".to_string() } else { trimmed.to_string() }
}
