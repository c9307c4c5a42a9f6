//! User configuration: YAML file plus command-line overrides

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Arg, ArgMatches, Command};
use serde::{Deserialize, Serialize};

const FILE_NAME: &str = "config.yml";
const APP_DIR: &str = "soundpy-rs";
const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// How the audio of a track is obtained from the backend
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioSource {
    /// `/download` returns the audio file itself
    #[default]
    Download,
    /// `/stream` returns a URL that is then fetched
    Stream,
}

impl AudioSource {
    fn parse(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "download" => Ok(Self::Download),
            "stream" => Ok(Self::Stream),
            other => Err(anyhow!("unknown audio source '{}', expected download or stream", other)),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub cache_dir: PathBuf,
    pub download_dir: PathBuf,
    pub audio_source: AudioSource,
    pub tick_interval_ms: u64,
    pub prefetch_queue: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join(APP_DIR);
        let download_dir = dirs::audio_dir()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("downloads"));

        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: 60,
            cache_dir,
            download_dir,
            audio_source: AudioSource::Download,
            tick_interval_ms: 250,
            prefetch_queue: true,
        }
    }
}

impl AppConfig {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(FILE_NAME))
    }

    /// Missing file means defaults; a malformed one is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.clamp(50, 5_000))
    }

    fn apply_overrides(&mut self, matches: &ArgMatches) -> Result<()> {
        if let Some(url) = matches.get_one::<String>("api-url") {
            self.api_base_url = url.clone();
        }
        if let Some(dir) = matches.get_one::<String>("cache-dir") {
            self.cache_dir = PathBuf::from(dir);
        }
        if let Some(dir) = matches.get_one::<String>("download-dir") {
            self.download_dir = PathBuf::from(dir);
        }
        if let Some(source) = matches.get_one::<String>("source") {
            self.audio_source = AudioSource::parse(source)?;
        }
        Ok(())
    }

    /// Resolve the effective configuration from the process arguments
    pub fn from_args() -> Result<Self> {
        Self::from_matches(&command().get_matches())
    }

    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let path = matches
            .get_one::<String>("config")
            .map(PathBuf::from)
            .or_else(Self::default_path);

        let mut config = match path {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        config.apply_overrides(matches)?;
        Ok(config)
    }
}

pub fn command() -> Command {
    Command::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about("Terminal client for the SoundPy music service")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Path to the YAML config file"),
        )
        .arg(
            Arg::new("api-url")
                .short('u')
                .long("api-url")
                .value_name("URL")
                .help("Base URL of the SoundPy backend"),
        )
        .arg(
            Arg::new("cache-dir")
                .long("cache-dir")
                .value_name("DIR")
                .help("Where fetched audio is cached"),
        )
        .arg(
            Arg::new("download-dir")
                .long("download-dir")
                .value_name("DIR")
                .help("Where exported tracks are written"),
        )
        .arg(
            Arg::new("source")
                .short('s')
                .long("source")
                .value_name("SOURCE")
                .help("Fetch audio through 'download' or 'stream'"),
        )
}
