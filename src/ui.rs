//! UI rendering helpers for the terminal user interface.
//!
//! This module renders the shared [`Screen`] snapshot using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style, Stylize},
    widgets::{Block, Borders, Gauge, Padding, Paragraph, Wrap},
};
use std::time::{Duration, SystemTime};

use crate::config::UiSettings;
use crate::display::{Screen, format_clock};

/// Render the controls help text.
fn controls_text() -> String {
    ["[q/esc] quit", "[ctrl-c] quit"].join(" | ")
}

/// Lines for the status box describing `screen` as of `now`.
pub fn status_lines(screen: &Screen, now: SystemTime) -> Vec<String> {
    match screen {
        Screen::Loading => vec!["Loading playlist...".to_string()],
        Screen::NoContent => vec!["No songs available".to_string()],
        Screen::Waiting { anchor } => {
            let left = anchor.duration_since(now).unwrap_or(Duration::ZERO);
            vec![
                "Waiting for sync...".to_string(),
                format!("Starts in {}", format_clock(left)),
            ]
        }
        Screen::Playing(np) => vec![
            format!("Now Playing: {}", np.name),
            format!("{} / {}", np.elapsed, np.total),
        ],
    }
}

/// Fraction of the current track already played, for the progress gauge.
pub fn progress_ratio(screen: &Screen) -> Option<f64> {
    let Screen::Playing(np) = screen else {
        return None;
    };
    if np.length.is_zero() {
        return None;
    }
    Some((np.offset.as_secs_f64() / np.length.as_secs_f64()).clamp(0.0, 1.0))
}

/// Render the entire UI into the provided `frame`.
pub fn draw(frame: &mut Frame, screen: &Screen, location: &str, ui_settings: &UiSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" unison ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box
    let status = status_lines(screen, SystemTime::now()).join("\n");
    let mut status_par = Paragraph::new(status)
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(format!(" {} ", location)),
        )
        .wrap(Wrap { trim: true });
    if matches!(screen, Screen::Waiting { .. }) {
        status_par = status_par.slow_blink();
    }
    frame.render_widget(status_par, chunks[1]);

    // Progress
    let ratio = progress_ratio(screen).unwrap_or(0.0);
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" progress "))
        .gauge_style(Style::default().add_modifier(Modifier::BOLD))
        .ratio(ratio)
        .label("");
    frame.render_widget(gauge, chunks[2]);

    let footer = Paragraph::new(controls_text())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(footer, chunks[4]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::NowPlaying;

    fn playing(offset: u64, length: u64) -> Screen {
        Screen::Playing(NowPlaying {
            index: 0,
            name: "Opening".to_string(),
            elapsed: format_clock(Duration::from_secs(offset)),
            total: format_clock(Duration::from_secs(length)),
            offset: Duration::from_secs(offset),
            length: Duration::from_secs(length),
        })
    }

    #[test]
    fn status_lines_show_now_playing_and_times() {
        let lines = status_lines(&playing(65, 200), SystemTime::now());
        assert_eq!(lines, vec!["Now Playing: Opening", "1:05 / 3:20"]);
    }

    #[test]
    fn status_lines_count_down_to_the_anchor() {
        let now = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        let anchor = now + Duration::from_secs(90);
        let lines = status_lines(&Screen::Waiting { anchor }, now);
        assert_eq!(lines, vec!["Waiting for sync...", "Starts in 1:30"]);

        // Past the anchor but not yet re-synced: never negative.
        let lines = status_lines(&Screen::Waiting { anchor }, anchor + Duration::from_secs(2));
        assert_eq!(lines[1], "Starts in 0:00");
    }

    #[test]
    fn status_lines_for_no_content() {
        assert_eq!(
            status_lines(&Screen::NoContent, SystemTime::now()),
            vec!["No songs available"]
        );
    }

    #[test]
    fn progress_ratio_is_bounded_and_needs_a_length() {
        assert_eq!(progress_ratio(&playing(50, 200)), Some(0.25));
        assert_eq!(progress_ratio(&playing(0, 0)), None);
        assert_eq!(progress_ratio(&Screen::NoContent), None);
    }
}
