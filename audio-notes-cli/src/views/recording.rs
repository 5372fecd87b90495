use std::io::{self, Write};
use std::time::Duration;

use anyhow::Result;
use console::style;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{self, ClearType};
use crossterm::{cursor, execute, queue};

use audio_notes_core::{
    CaptureProvider, LiveMonitor, RecorderError, RecorderShell, SaveReceipt, Vault,
};

use super::waveform::{format_elapsed, level_bar, render_trace};
use super::{RawMode, View};
use crate::prompt;

/// ~30 fps.
const FRAME: Duration = Duration::from_millis(33);

enum Outcome {
    Stop,
    Discard,
}

/// Live recording dialog.
///
/// Shows the input waveform until Enter (stop, name, save) or Esc (discard).
/// The visualisation is torn down before the name is asked for, and the
/// session keeps capturing until a usable name has been given.
pub struct RecordingView<'a, P: CaptureProvider, V: Vault> {
    shell: &'a mut RecorderShell<P, V>,
    name: Option<String>,
    screen: Option<RawMode>,
}

impl<'a, P: CaptureProvider, V: Vault> RecordingView<'a, P, V> {
    pub fn new(shell: &'a mut RecorderShell<P, V>) -> Self {
        Self {
            shell,
            name: None,
            screen: None,
        }
    }

    /// Save under `name` on Enter instead of prompting.
    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    fn visualize(&mut self) -> Result<Outcome> {
        let monitor = self.shell.monitor();
        let device = self.shell.controller().device_info().name;
        let mut out = io::stdout();

        self.screen = Some(RawMode::enable()?);
        execute!(out, terminal::EnterAlternateScreen, cursor::Hide)?;

        loop {
            draw(&mut out, &monitor, &device)?;

            if !event::poll(FRAME)? {
                continue;
            }
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Enter => return Ok(Outcome::Stop),
                    KeyCode::Esc => return Ok(Outcome::Discard),
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(Outcome::Discard)
                    }
                    _ => {}
                }
            }
        }
    }

    fn save(&mut self) -> Result<Option<SaveReceipt>> {
        let preset = self.name.take();
        finish_with_name(self.shell, preset, |default| prompt::input("File name", Some(default)))
    }
}

/// Stop the session and save it under `preset` or a name from `ask`.
///
/// `ask` is offered the default name. Empty or rejected names are asked for
/// again while the session keeps capturing.
pub(crate) fn finish_with_name<P: CaptureProvider, V: Vault>(
    shell: &mut RecorderShell<P, V>,
    mut preset: Option<String>,
    mut ask: impl FnMut(&str) -> Result<String>,
) -> Result<Option<SaveReceipt>> {
    let default = shell.library().default_file_name();
    loop {
        let name = match preset.take() {
            Some(name) => name,
            None => ask(&default)?,
        };
        if name.trim().is_empty() {
            prompt::error("File name must not be empty");
            continue;
        }

        match shell.finish(Some(&name)) {
            Ok(receipt) => return Ok(receipt),
            // Rejected before stopping: the session is still armed, ask again.
            Err(RecorderError::EmptyFileName | RecorderError::InvalidFileName(_))
                if shell.is_recording() =>
            {
                continue
            }
            Err(e) => return Err(e.into()),
        }
    }
}

impl<P: CaptureProvider, V: Vault> View for RecordingView<'_, P, V> {
    type Output = Option<SaveReceipt>;

    fn render(&mut self) -> Result<Option<SaveReceipt>> {
        if !self.shell.is_recording() {
            self.shell.start()?;
        }

        let outcome = self.visualize();
        self.dispose();

        match outcome {
            Ok(Outcome::Stop) => self.save(),
            Ok(Outcome::Discard) => {
                self.shell.cancel();
                Ok(None)
            }
            Err(e) => {
                self.shell.cancel();
                Err(e)
            }
        }
    }

    fn dispose(&mut self) {
        let Some(raw) = self.screen.take() else {
            return;
        };
        if let Err(e) = execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen) {
            log::warn!("Failed to restore terminal screen: {}", e);
        }
        drop(raw);
    }
}

impl<P: CaptureProvider, V: Vault> Drop for RecordingView<'_, P, V> {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn draw(out: &mut impl Write, monitor: &LiveMonitor, device: &str) -> io::Result<()> {
    let (cols, rows) = terminal::size().unwrap_or((80, 24));
    let width = (cols as usize).saturating_sub(2).clamp(10, 240);
    let height = (rows as usize).saturating_sub(7).clamp(3, 15);
    let levels = monitor.levels();

    queue!(out, cursor::MoveTo(0, 0), terminal::Clear(ClearType::All))?;
    queue!(
        out,
        Print(format!(
            " {} {}  {}\r\n\r\n",
            style("● REC").red().bold(),
            format_elapsed(monitor.elapsed_secs()),
            style(device).dim()
        ))
    )?;
    for line in render_trace(&monitor.trace(width), height) {
        queue!(out, Print(format!(" {}\r\n", style(line).cyan())))?;
    }
    queue!(
        out,
        Print(format!("\r\n level {}\r\n\r\n", level_bar(levels.level, 30))),
        Print(format!(" {}", style("Enter: stop and save   Esc: discard").dim()))
    )?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{answers, fixture};

    #[test]
    fn empty_name_is_asked_again() {
        let mut f = fixture();
        f.shell.start().unwrap();

        let receipt = finish_with_name(&mut f.shell, None, answers(&["", "  ", "standup"]))
            .unwrap()
            .unwrap();
        assert_eq!(receipt.file.name, "standup.wav");
        assert!(!f.shell.is_recording());
    }

    #[test]
    fn rejected_name_keeps_session_and_asks_again() {
        let mut f = fixture();
        f.shell.start().unwrap();

        let receipt = finish_with_name(
            &mut f.shell,
            Some("../escape".into()),
            answers(&["bad/name", "kept"]),
        )
        .unwrap()
        .unwrap();

        assert_eq!(receipt.file.name, "kept.wav");
        assert_eq!(receipt.file.size_bytes, 44 + 960 * 2);
        let rejected = f
            .notifier
            .notices()
            .iter()
            .filter(|n| n.message.starts_with("Could not save recording"))
            .count();
        assert_eq!(rejected, 2);
        assert_eq!(f.capture.starts(), 1);
        assert_eq!(f.capture.open_streams(), 0);
    }

    #[test]
    fn default_name_is_offered() {
        let mut f = fixture();
        f.shell.start().unwrap();

        let mut offered = String::new();
        let receipt = finish_with_name(&mut f.shell, None, |default| {
            offered = default.to_string();
            Ok(default.to_string())
        })
        .unwrap()
        .unwrap();

        assert!(offered.starts_with("Recording-") && offered.ends_with(".wav"));
        assert_eq!(receipt.file.name, offered);
    }
}
