use std::io::{IsTerminal, Write};
use std::time::Duration;

use clap::Args;
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use pomocycle_core::{Clock, MonotonicClock, PresentationAdapter, SessionScheduler};

use super::{load_config_file, ConfigArgs};
use crate::audio::CueSink;
use crate::presenter::{JsonPresenter, TerminalPresenter};

/// How long the host waits between frames.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
    /// Print one JSON event per line instead of drawing; starts immediately
    #[arg(long)]
    pub json: bool,
    /// With --json, exit after this many completed sessions
    #[arg(long, requires = "json")]
    pub sessions: Option<u32>,
}

/// User actions mapped from keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Start,
    Pause,
    Toggle,
    Skip,
    Reset,
    Quit,
}

fn control_for(key: KeyEvent) -> Option<Control> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Control::Quit),
        KeyCode::Char('s') => Some(Control::Start),
        KeyCode::Char('p') => Some(Control::Pause),
        KeyCode::Char(' ') => Some(Control::Toggle),
        KeyCode::Char('k') | KeyCode::Char('n') => Some(Control::Skip),
        KeyCode::Char('r') => Some(Control::Reset),
        KeyCode::Char('q') | KeyCode::Esc => Some(Control::Quit),
        _ => None,
    }
}

fn apply<P: PresentationAdapter, C: Clock>(scheduler: &mut SessionScheduler<P, C>, control: Control) {
    match control {
        Control::Start => scheduler.start(),
        Control::Pause => scheduler.pause(),
        Control::Toggle if scheduler.state().running => scheduler.pause(),
        Control::Toggle => scheduler.start(),
        Control::Skip => scheduler.skip(),
        Control::Reset => scheduler.reset(),
        Control::Quit => {}
    }
}

/// Raw mode for single-key controls, restored on drop.
struct RawTerminal;

impl RawTerminal {
    fn enter() -> std::io::Result<Self> {
        enable_raw_mode()?;
        execute!(std::io::stdout(), Hide)?;
        Ok(Self)
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        let _ = execute!(std::io::stdout(), Show);
        let _ = disable_raw_mode();
        let _ = writeln!(std::io::stdout());
    }
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let file = load_config_file();
    let config = args.config.resolve(&file);
    tracing::debug!(?config, "starting timer");

    if args.json {
        let audio = CueSink::new(file.hooks.clone(), false);
        let presenter = JsonPresenter::new(std::io::stdout(), audio);
        let scheduler = SessionScheduler::new(config, presenter, MonotonicClock::new())?;
        return run_headless(scheduler, args.sessions);
    }

    if !std::io::stdout().is_terminal() {
        return Err("stdout is not a terminal (use --json for headless output)".into());
    }
    let audio = CueSink::new(file.hooks.clone(), true);
    let presenter = TerminalPresenter::new(std::io::stdout(), audio);
    let scheduler = SessionScheduler::new(config, presenter, MonotonicClock::new())?;
    run_interactive(scheduler)
}

fn run_interactive<P: PresentationAdapter>(
    mut scheduler: SessionScheduler<P>,
) -> Result<(), Box<dyn std::error::Error>> {
    let _terminal = RawTerminal::enter()?;
    scheduler.reset();

    loop {
        if event::poll(FRAME_INTERVAL)? {
            if let TermEvent::Key(key) = event::read()? {
                match control_for(key) {
                    Some(Control::Quit) => break,
                    Some(control) => apply(&mut scheduler, control),
                    None => {}
                }
            }
        }
        if let Some(frame) = scheduler.pending_frame() {
            scheduler.fire_frame(frame);
        }
    }
    Ok(())
}

/// Runs until the timer stops on its own (no auto-advance) or `sessions`
/// sessions have completed.
fn run_headless<W: Write>(
    mut scheduler: SessionScheduler<JsonPresenter<W>>,
    sessions: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    scheduler.reset();
    scheduler.start();

    while let Some(frame) = scheduler.pending_frame() {
        std::thread::sleep(FRAME_INTERVAL);
        scheduler.fire_frame(frame);
        if sessions.is_some_and(|n| scheduler.presenter().completed() >= n) {
            break;
        }
    }
    Ok(())
}
