mod audio;
mod config;
mod controller;
mod logging;
mod model;
mod view;

use std::io;
use std::sync::Arc;
use anyhow::Result;
use std::time::Duration;
use tokio::sync::Mutex;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use view::AppView;
use audio::{PlayerController, RodioPlayer};
use config::AppConfig;
use controller::AppController;
use model::{ApiClient, AppModel, AudioCache, PlaybackStateStore};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_args()?;

    if let Err(e) = logging::init_logging() {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== SoundPy-RS Client Starting ===");
    tracing::info!(
        api = %config.api_base_url,
        source = ?config.audio_source,
        cache = %config.cache_dir.display(),
        "Configuration loaded"
    );

    let api = ApiClient::new(&config.api_base_url, config.request_timeout())?;
    tracing::debug!(base_url = %api.base_url(), "API client ready");
    let cache = AudioCache::new(config.cache_dir.clone());

    // The output stream has to stay alive for as long as anything plays
    let (_stream, player, audio_error) = match audio::open_output() {
        Ok(stream) => {
            let player: Box<dyn PlayerController> = Box::new(RodioPlayer::new(&stream));
            (Some(stream), Some(player), None)
        }
        Err(e) => {
            tracing::error!(error = %e, "Audio init failed, running without playback");
            (None, None, Some(format!("Audio init failed: {:#}", e)))
        }
    };

    let app_model = AppModel::new();
    if let Some(message) = audio_error {
        app_model.set_error(message).await;
    }
    spawn_track_logger(&app_model.playback());

    let model = Arc::new(Mutex::new(app_model));
    let controller = AppController::new(model.clone(), Arc::new(api), player, cache, config);
    let ticker = controller.start_position_ticker();

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, model.clone(), controller).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    ticker.abort();

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("SoundPy-RS Client shutting down");
    Ok(())
}

/// Log every track the store reports, as a plain subscriber
fn spawn_track_logger(store: &PlaybackStateStore) {
    let mut rx = store.subscribe();
    tokio::spawn(async move {
        let mut last_id: Option<String> = None;
        while rx.changed().await.is_ok() {
            let state = rx.borrow_and_update().clone();
            let id = state.current_track.as_ref().map(|t| t.id.clone());
            if id != last_id {
                if let Some(track) = &state.current_track {
                    tracing::info!(track = %track.title, author = %track.author, "Now playing");
                }
                last_id = id;
            }
        }
    });
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: Arc<Mutex<AppModel>>,
    controller: AppController,
) -> io::Result<()> {
    loop {
        // Get current state
        let (playback, ui_state, content_state, should_quit) = {
            let model_guard = model.lock().await;

            // Auto-clear old errors (after 5 seconds)
            model_guard.auto_clear_old_errors().await;

            (
                model_guard.get_playback_state(),
                model_guard.get_ui_state().await,
                model_guard.get_content_state().await,
                model_guard.should_quit().await,
            )
        };

        terminal.draw(|f| {
            AppView::render(f, &playback, &ui_state, &content_state);
        })?;

        // Short poll keeps the progress bar moving
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                // Errors are surfaced through the model
                let _ = controller.handle_key_event(key).await;
            }
        }

        if should_quit {
            break;
        }
    }

    Ok(())
}
