//! Presentation adapters for the terminal and for headless JSON output.

use std::io::Write;

use crossterm::cursor::MoveToColumn;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType, SetTitle};
use crossterm::queue;
use pomocycle_core::{CoreError, Event, PresentationAdapter, Render, Snapshot, SoundKind};

use crate::audio::CueSink;

fn style_color(style: &str) -> Color {
    match style {
        "work" => Color::Red,
        "short-break" => Color::Green,
        _ => Color::Blue,
    }
}

/// Single status line, redrawn in place, plus the window title.
pub struct TerminalPresenter<W: Write> {
    out: W,
    audio: CueSink,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W, audio: CueSink) -> Self {
        Self { out, audio }
    }

    fn draw(&mut self, render: &Render) -> std::io::Result<()> {
        let controls = if render.running {
            "[p]ause s[k]ip [r]eset [q]uit"
        } else {
            "[s]tart s[k]ip [r]eset [q]uit"
        };
        queue!(
            self.out,
            SetTitle(&render.title),
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            SetForegroundColor(style_color(render.style)),
            Print(format!("{:<11}  {}", render.label, render.clock)),
            ResetColor,
            Print(format!("  {}  {}", render.cycle_label, controls)),
        )?;
        self.out.flush()
    }
}

impl<W: Write> PresentationAdapter for TerminalPresenter<W> {
    fn on_snapshot(&mut self, snapshot: &Snapshot) {
        if let Err(e) = self.draw(&Render::from_snapshot(snapshot)) {
            tracing::debug!(error = %e, "terminal draw failed");
        }
    }

    fn on_session_complete(&mut self, sound: SoundKind) -> Result<(), CoreError> {
        self.audio.play(sound)
    }
}

/// One [`Event`] per line. Counts completed sessions for `--sessions`.
pub struct JsonPresenter<W: Write> {
    out: W,
    audio: CueSink,
    completed: u32,
}

impl<W: Write> JsonPresenter<W> {
    pub fn new(out: W, audio: CueSink) -> Self {
        Self {
            out,
            audio,
            completed: 0,
        }
    }

    /// Sessions that have run out or been skipped so far.
    pub fn completed(&self) -> u32 {
        self.completed
    }

    fn emit(&mut self, event: &Event) {
        let written = serde_json::to_writer(&mut self.out, event)
            .map_err(std::io::Error::from)
            .and_then(|()| self.out.write_all(b"\n"))
            .and_then(|()| self.out.flush());
        if let Err(e) = written {
            tracing::warn!(error = %e, "failed to write event");
        }
    }
}

impl<W: Write> PresentationAdapter for JsonPresenter<W> {
    fn on_snapshot(&mut self, snapshot: &Snapshot) {
        // Every completion renders a zero state exactly once.
        if snapshot.remaining_secs == 0 {
            self.completed += 1;
        }
        self.emit(&Event::snapshot(snapshot));
    }

    fn on_session_complete(&mut self, sound: SoundKind) -> Result<(), CoreError> {
        self.emit(&Event::cue(sound));
        self.audio.play(sound)
    }
}
