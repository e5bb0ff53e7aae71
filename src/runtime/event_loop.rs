use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::audio::AudioEngine;
use crate::config;
use crate::display::{Display, Screen, ScreenHandle};
use crate::mpris::{ControlCmd, MprisHandle};
use crate::runtime::mpris_sync::update_mpris;
use crate::runtime::startup::Session;
use crate::sync::Clock;
use crate::ui;

/// Main terminal event loop: runs the session, draws the UI and mirrors it
/// to MPRIS. Returns `Ok(())` when shutdown is requested.
pub fn run<C: Clock, E: AudioEngine, D: Display>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    location: &str,
    session: &mut Session<C, E, D>,
    screen: &ScreenHandle,
    mpris: &MprisHandle,
    control_rx: &mpsc::Receiver<ControlCmd>,
) -> anyhow::Result<()> {
    let tick = Duration::from_millis(settings.ui.tick_ms);
    let fade_out = Duration::from_millis(settings.audio.quit_fade_out_ms);
    let mut last_published: Option<Screen> = None;

    loop {
        session.tick(Instant::now());

        let snapshot = screen.snapshot();
        update_mpris(mpris, &snapshot, &mut last_published);
        terminal.draw(|f| ui::draw(f, &snapshot, location, &settings.ui))?;

        while let Ok(cmd) = control_rx.try_recv() {
            match cmd {
                ControlCmd::Quit => {
                    info!("quit requested over MPRIS");
                    session.shutdown(fade_out);
                    return Ok(());
                }
            }
        }

        let timeout = poll_timeout(tick, session.next_check(), Instant::now());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && is_quit_key(&key) {
                    info!("quit requested from the keyboard");
                    session.shutdown(fade_out);
                    return Ok(());
                }
            }
        }
    }
}

/// How long to block on input: one UI tick, cut short by a pending sync
/// re-check so the anchor is not missed by up to a tick.
fn poll_timeout(tick: Duration, next_check: Option<Instant>, now: Instant) -> Duration {
    match next_check {
        Some(at) => tick.min(at.saturating_duration_since(now)),
        None => tick,
    }
}

fn is_quit_key(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}
