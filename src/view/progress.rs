//! Progress bar rendering

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Gauge},
    Frame,
};

use crate::model::PlaybackState;
use super::utils::{format_duration, or_placeholder};

fn status_text(playback: &PlaybackState) -> String {
    match &playback.current_track {
        None => " No track playing".to_string(),
        Some(track) => {
            let icon = if playback.paused { "⏸ " } else { " ▶" };
            format!(
                "{} {} | {}",
                icon,
                or_placeholder(&track.title),
                or_placeholder(&track.author)
            )
        }
    }
}

fn progress_ratio(playback: &PlaybackState) -> f64 {
    match playback.duration_ms {
        Some(duration) if duration > 0 => (playback.position_ms as f64 / duration as f64).clamp(0.0, 1.0),
        _ => 0.0,
    }
}

pub fn render_progress_bar(frame: &mut Frame, area: Rect, playback: &PlaybackState) {
    let mute_text = if playback.muted { "Muted" } else { "Sound: On" };
    let repeat_text = if playback.repeat_enabled { "Repeat: On" } else { "Repeat: Off" };

    let time_str = format!(
        "{} / {}",
        format_duration(playback.position_ms),
        playback.duration_ms.map(format_duration).unwrap_or_else(|| "--:--".to_string())
    );

    let title = format!("{} ", status_text(playback));
    let controls_info = format!(" {} | {} ", mute_text, repeat_text);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_bottom(Line::from(controls_info).right_aligned()),
        )
        .gauge_style(Style::default().fg(if playback.muted { Color::DarkGray } else { Color::Green }))
        .ratio(progress_ratio(playback))
        .label(time_str);

    frame.render_widget(gauge, area);
}
