use std::sync::mpsc;

use anyhow::{Context, bail};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::audio::RodioEngine;
use crate::display::ScreenHandle;
use crate::library::{DirectorySource, LoftyProbe, load_playlist};
use crate::mpris::ControlCmd;
use crate::sync::SystemClock;

mod event_loop;
mod logging;
mod mpris_sync;
mod settings;
mod startup;

const USAGE: &str = "usage: unison [--print-config] [DIR]";

/// Parsed command line.
#[derive(Debug, Default, PartialEq, Eq)]
struct Cli {
    print_config: bool,
    help: bool,
    /// Overrides `sync.location`.
    location: Option<String>,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> anyhow::Result<Cli> {
    let mut cli = Cli::default();
    for arg in args {
        match arg.as_str() {
            "--print-config" => cli.print_config = true,
            "-h" | "--help" => cli.help = true,
            flag if flag.starts_with('-') => bail!("unknown option {flag}\n{USAGE}"),
            _ if cli.location.is_some() => bail!("more than one directory given\n{USAGE}"),
            _ => cli.location = Some(arg),
        }
    }
    Ok(cli)
}

type Tui = Terminal<CrosstermBackend<std::io::Stdout>>;

/// Enter raw mode and the alternate screen. Raw mode is undone again if
/// the rest of the setup fails.
fn setup_terminal() -> anyhow::Result<Tui> {
    enable_raw_mode()?;
    undo_on_error(
        || {
            let mut stdout = std::io::stdout();
            execute!(stdout, EnterAlternateScreen)?;
            Terminal::new(CrosstermBackend::new(stdout))
        },
        || {
            let _ = execute!(std::io::stdout(), LeaveAlternateScreen);
            let _ = disable_raw_mode();
        },
    )
    .context("setting up the terminal")
}

/// Run `step`; if it fails, run `undo` before handing the error back.
fn undo_on_error<T>(
    step: impl FnOnce() -> std::io::Result<T>,
    undo: impl FnOnce(),
) -> std::io::Result<T> {
    let result = step();
    if result.is_err() {
        undo();
    }
    result
}

pub fn run() -> anyhow::Result<()> {
    let cli = parse_args(std::env::args().skip(1))?;
    if cli.help {
        println!("{USAGE}");
        return Ok(());
    }

    let mut settings = settings::load_settings();
    if let Some(location) = cli.location {
        settings.sync.location = location;
    }

    if cli.print_config {
        print!(
            "{}",
            toml::to_string_pretty(&settings).context("serializing settings")?
        );
        return Ok(());
    }

    logging::init_logging(&settings);
    info!(
        location = %settings.sync.location,
        anchor_unix = settings.sync.anchor_unix,
        wrap = settings.sync.wrap_timeline,
        "starting"
    );

    let source = DirectorySource::new(&settings.sync.location, &settings.library);
    let playlist = load_playlist(&source, &LoftyProbe, &settings.library);

    let screen = ScreenHandle::new();
    let mut session = startup::build_session(
        playlist,
        RodioEngine::open_default,
        screen.clone(),
        &settings,
        SystemClock,
    )
    .context("opening audio output")?;

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx);

    let mut terminal = setup_terminal()?;

    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &settings.sync.location,
        &mut session,
        &screen,
        &mpris,
        &control_rx,
    );

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("exiting");
    run_result
}
