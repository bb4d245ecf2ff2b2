//! End-of-session cues.
//!
//! A configured hook command wins; otherwise the terminal bell is rung.
//! Hooks get the cue shape in `POMOCYCLE_CUE_*` variables so a script can
//! synthesize the tone itself (e.g. with `play -n synth`).

use std::io::Write;
use std::process::{Child, Command, Stdio};

use pomocycle_core::{CoreError, HooksConfig, SoundKind};

pub struct CueSink {
    hooks: HooksConfig,
    terminal_bell: bool,
    /// Hook processes not yet reaped.
    children: Vec<Child>,
}

impl CueSink {
    /// `terminal_bell` is false when stdout is not a terminal or is reserved
    /// for machine-readable output.
    pub fn new(hooks: HooksConfig, terminal_bell: bool) -> Self {
        Self {
            hooks,
            terminal_bell,
            children: Vec::new(),
        }
    }

    /// Fire the cue without waiting for it to finish. Hooks from earlier
    /// cues that have exited are reaped first.
    pub fn play(&mut self, sound: SoundKind) -> Result<(), CoreError> {
        self.reap();
        let Some(profile) = sound.profile() else {
            return Ok(());
        };

        if let Some(command) = self.hook(sound) {
            let child = Command::new("sh")
                .arg("-c")
                .arg(command)
                .env("POMOCYCLE_CUE_KIND", sound.as_str())
                .env("POMOCYCLE_CUE_FREQ_HZ", profile.frequency_hz.to_string())
                .env("POMOCYCLE_CUE_MS", profile.duration.as_millis().to_string())
                .env("POMOCYCLE_CUE_DECAY", profile.decay.as_str())
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn()
                .map_err(|e| CoreError::AudioUnavailable(format!("hook '{command}': {e}")))?;
            self.children.push(child);
            return Ok(());
        }

        if !self.terminal_bell {
            return Err(CoreError::AudioUnavailable(
                "no hook configured and no terminal to ring".into(),
            ));
        }
        let mut stdout = std::io::stdout();
        stdout
            .write_all(b"\x07")
            .and_then(|()| stdout.flush())
            .map_err(|e| CoreError::AudioUnavailable(e.to_string()))
    }

    /// Drop hooks that have exited.
    fn reap(&mut self) {
        self.children.retain_mut(|child| match child.try_wait() {
            Ok(Some(status)) => {
                if !status.success() {
                    tracing::debug!(%status, "cue hook failed");
                }
                false
            }
            Ok(None) => true,
            Err(e) => {
                tracing::warn!(error = %e, "lost track of cue hook");
                false
            }
        });
    }

    /// Hook for `sound`, skipping blank and commented-out commands.
    fn hook(&self, sound: SoundKind) -> Option<&str> {
        let command = self.hooks.command_for(sound)?.trim();
        if command.is_empty() || command.starts_with('#') {
            None
        } else {
            Some(command)
        }
    }
}
