//! Key event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::model::ActiveSection;
use super::AppController;

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        let model = self.model.lock().await;

        // Handle error message first (blocks all other interactions)
        if model.has_error().await {
            return match key.code {
                KeyCode::Esc | KeyCode::Enter => {
                    model.clear_error().await;
                    Ok(())
                }
                _ => Ok(()),
            };
        }

        // Handle help popup
        if model.is_help_popup_open().await {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H') => {
                    model.hide_help_popup().await;
                    Ok(())
                }
                _ => Ok(()),
            };
        }

        let ui_state = model.get_ui_state().await;

        // Handle search input when in search section
        if ui_state.active_section == ActiveSection::Search {
            match key.code {
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        model.cycle_section_backward().await;
                    } else {
                        model.cycle_section_forward().await;
                    }
                    return Ok(());
                }
                KeyCode::Enter => {
                    drop(model);
                    // Confirmed here; the request runs on its own
                    let _ = self.confirm_search().await;
                    return Ok(());
                }
                KeyCode::Esc => {
                    model.reset_search().await;
                    return Ok(());
                }
                KeyCode::Backspace => {
                    model.backspace_search().await;
                    return Ok(());
                }
                KeyCode::Char(c) => {
                    // Q still quits even in search mode when Ctrl is pressed
                    if (c == 'q' || c == 'Q') && key.modifiers.contains(KeyModifiers::CONTROL) {
                        model.set_should_quit(true).await;
                        return Ok(());
                    }
                    model.append_to_search(c).await;
                    return Ok(());
                }
                _ => {}
            }
        }

        // Handle MainContent section navigation
        if ui_state.active_section == ActiveSection::MainContent {
            match key.code {
                KeyCode::Up => {
                    model.content_move_up().await;
                    return Ok(());
                }
                KeyCode::Down => {
                    model.content_move_down().await;
                    return Ok(());
                }
                KeyCode::Left | KeyCode::Right => {
                    model.navigate_search_section().await;
                    return Ok(());
                }
                KeyCode::Enter => {
                    let selected = model.get_selected_content_item().await;
                    drop(model);
                    // Fetching audio can take a while; keep the UI responsive
                    if let Some(item) = selected {
                        let controller = self.clone();
                        tokio::spawn(async move {
                            controller.handle_selected_item(item).await;
                        });
                    }
                    return Ok(());
                }
                KeyCode::Backspace | KeyCode::Esc => {
                    model.navigate_back().await;
                    return Ok(());
                }
                _ => {}
            }
        }

        // Global keybindings
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                model.set_should_quit(true).await;
            }
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    model.cycle_section_backward().await;
                } else {
                    model.cycle_section_forward().await;
                }
            }
            KeyCode::BackTab => {
                model.cycle_section_backward().await;
            }
            KeyCode::Up => {
                model.move_selection_up().await;
            }
            KeyCode::Down => {
                model.move_selection_down().await;
            }
            KeyCode::Enter => {
                if ui_state.active_section == ActiveSection::Playlists {
                    if let Some(playlist) = model.get_selected_playlist().await {
                        drop(model);
                        let controller = self.clone();
                        tokio::spawn(async move {
                            controller.open_playlist(&playlist).await;
                        });
                    }
                }
            }
            // Play/Pause toggle
            KeyCode::Char(' ') => {
                drop(model);
                self.toggle_playback().await;
            }
            KeyCode::Char('n') | KeyCode::Char('N') => {
                drop(model);
                self.skip_next().await;
            }
            KeyCode::Char('p') | KeyCode::Char('P') => {
                drop(model);
                self.skip_previous().await;
            }
            KeyCode::Char('m') | KeyCode::Char('M') => {
                drop(model);
                self.toggle_mute().await;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                drop(model);
                self.toggle_repeat().await;
            }
            // Save current track to the download directory
            KeyCode::Char('d') | KeyCode::Char('D') => {
                drop(model);
                self.export_current_track().await;
            }
            // Focus search
            KeyCode::Char('g') | KeyCode::Char('G') | KeyCode::Char('/') => {
                model.set_active_section(ActiveSection::Search).await;
            }
            // Focus playlists
            KeyCode::Char('l') | KeyCode::Char('L') => {
                model.set_active_section(ActiveSection::Playlists).await;
            }
            KeyCode::Char('h') | KeyCode::Char('H') => {
                model.show_help_popup().await;
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::super::test_support::{controller_with, track, wait_for, FakeApi};
    use super::super::AppController;
    use crate::model::{ActiveSection, ContentView, PlaylistSummary};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn typing_never_searches_and_enter_searches_once() {
        let api = Arc::new(FakeApi::default());
        let controller = controller_with(api.clone(), None);

        for c in "abba".chars() {
            controller.handle_key_event(press(KeyCode::Char(c))).await.unwrap();
        }
        controller.handle_key_event(press(KeyCode::Backspace)).await.unwrap();
        assert!(api.search_calls().is_empty());

        controller.handle_key_event(press(KeyCode::Enter)).await.unwrap();
        controller.handle_key_event(press(KeyCode::Enter)).await.unwrap();
        let c = &controller;
        wait_for(move || async move { !is_loading(c).await }).await;
        assert_eq!(api.search_calls(), vec!["abb".to_string()]);
    }

    async fn is_loading(controller: &AppController) -> bool {
        controller.model.lock().await.get_content_state().await.is_loading
    }

    #[tokio::test]
    async fn slow_search_does_not_hold_up_key_handling() {
        let api = Arc::new(FakeApi {
            search_delay: Some(Duration::from_secs(3)),
            ..Default::default()
        });
        let controller = controller_with(api.clone(), None);
        controller.handle_key_event(press(KeyCode::Char('a'))).await.unwrap();

        let handled = tokio::time::timeout(
            Duration::from_millis(500),
            controller.handle_key_event(press(KeyCode::Enter)),
        )
        .await;

        assert!(handled.is_ok());
        assert!(is_loading(&controller).await);
        // Keys keep working while the request is out
        controller.handle_key_event(press(KeyCode::Char('b'))).await.unwrap();
        let ui = controller.model.lock().await.get_ui_state().await;
        assert_eq!(ui.search.input(), "ab");
    }

    #[tokio::test]
    async fn enter_on_sidebar_playlist_opens_it_in_the_background() {
        let summary = PlaylistSummary {
            id: "p1".to_string(),
            name: "Road trip".to_string(),
            link: "https://www.youtube.com/playlist?list=p1".to_string(),
            author: String::new(),
            thumb_url: None,
        };
        let api = Arc::new(FakeApi {
            tracks: vec![track("a")],
            ..Default::default()
        });
        let controller = controller_with(api, None);
        {
            let model = controller.model.lock().await;
            model.set_playlists(vec![summary]).await;
            model.set_active_section(ActiveSection::Playlists).await;
        }

        controller.handle_key_event(press(KeyCode::Enter)).await.unwrap();
        let c = &controller;
        wait_for(move || async move {
            matches!(
                c.model.lock().await.get_content_state().await.view,
                ContentView::PlaylistDetail { .. }
            )
        })
        .await;

        let ui = controller.model.lock().await.get_ui_state().await;
        assert_eq!(ui.active_section, ActiveSection::MainContent);
    }

    #[tokio::test]
    async fn escape_clears_pending_input() {
        let api = Arc::new(FakeApi::default());
        let controller = controller_with(api.clone(), None);

        controller.handle_key_event(press(KeyCode::Char('x'))).await.unwrap();
        controller.handle_key_event(press(KeyCode::Esc)).await.unwrap();

        let ui = controller.model.lock().await.get_ui_state().await;
        assert_eq!(ui.search.input(), "");
    }

    #[tokio::test]
    async fn error_overlay_swallows_keys_until_dismissed() {
        let api = Arc::new(FakeApi::default());
        let controller = controller_with(api, None);
        controller.model.lock().await.set_error("boom".to_string()).await;

        controller.handle_key_event(press(KeyCode::Char('x'))).await.unwrap();
        assert_eq!(controller.model.lock().await.get_ui_state().await.search.input(), "");

        controller.handle_key_event(press(KeyCode::Esc)).await.unwrap();
        assert!(!controller.model.lock().await.has_error().await);
    }

    #[tokio::test]
    async fn ctrl_q_quits_from_search() {
        let controller = controller_with(Arc::new(FakeApi::default()), None);
        controller
            .handle_key_event(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL))
            .await
            .unwrap();
        assert!(controller.model.lock().await.should_quit().await);
    }
}
