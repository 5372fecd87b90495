use std::path::Path;
use std::sync::atomic::Ordering;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};

use audio_notes_core::{CaptureProvider, RecorderShell, Vault, VaultFile};
use audio_notes_cpal::CpalPlayer;

use super::{NamingView, RawMode, View};
use crate::prompt;

const ACTIONS: [&str; 4] = ["Play", "Rename", "Delete", "Back"];

/// Browser for the recordings folder: play, rename, delete.
///
/// The listing is fetched again after a rename or delete goes through. A
/// failed change leaves the listing as it was; the library has already
/// reported the failure.
pub struct PlaybackView<'a, P: CaptureProvider, V: Vault> {
    shell: &'a RecorderShell<P, V>,
    player: CpalPlayer,
}

impl<'a, P: CaptureProvider, V: Vault> PlaybackView<'a, P, V> {
    pub fn new(shell: &'a RecorderShell<P, V>) -> Self {
        Self {
            shell,
            player: CpalPlayer::new(),
        }
    }

    fn play(&self, name: &str) -> Result<()> {
        match self.shell.resource_path(name) {
            Ok(path) => play_until_key(&self.player, &path, name),
            // Already reported by the library.
            Err(_) => Ok(()),
        }
    }

    fn rename(&self, current: &str, relative: &str) -> Result<bool> {
        let mut naming = NamingView::new(current, self.shell.library().extension());
        let answer = naming.render();
        naming.dispose();
        Ok(rename_entry(self.shell, relative, answer?))
    }

    fn delete(&self, relative: &str) -> Result<bool> {
        let confirmed = prompt::confirm(&format!("Delete {}?", relative), false)?;
        Ok(confirmed && self.shell.delete(relative).is_ok())
    }
}

/// Apply the answer of the rename dialog. True when the file was renamed.
fn rename_entry<P: CaptureProvider, V: Vault>(
    shell: &RecorderShell<P, V>,
    relative: &str,
    answer: Option<String>,
) -> bool {
    match answer {
        Some(new_name) => shell.rename(relative, &new_name).is_ok(),
        None => false,
    }
}

/// Recordings as last shown.
struct Listing {
    files: Vec<VaultFile>,
}

impl Listing {
    fn fetch<P: CaptureProvider, V: Vault>(shell: &RecorderShell<P, V>) -> Option<Self> {
        shell.open_recordings().ok().map(|files| Self { files })
    }

    /// Fetch again if `changed`. False when the folder can no longer be listed.
    fn refresh_after<P: CaptureProvider, V: Vault>(
        &mut self,
        shell: &RecorderShell<P, V>,
        changed: bool,
    ) -> bool {
        if !changed {
            return true;
        }
        match shell.open_recordings() {
            Ok(files) => {
                self.files = files;
                true
            }
            Err(_) => false,
        }
    }
}

impl<P: CaptureProvider, V: Vault> View for PlaybackView<'_, P, V> {
    type Output = ();

    fn render(&mut self) -> Result<()> {
        prompt::header("Audio Recordings");
        let Some(mut listing) = Listing::fetch(self.shell) else {
            return Ok(());
        };
        loop {
            if listing.files.is_empty() {
                prompt::info("No recordings yet");
                return Ok(());
            }

            let mut entries: Vec<String> = listing
                .files
                .iter()
                .map(|f| describe(self.shell.library().relative_name(f), f))
                .collect();
            entries.push("Close".into());

            let index = match prompt::select("Recordings", &entries, 0)? {
                Some(i) if i < listing.files.len() => i,
                _ => return Ok(()),
            };
            let file = &listing.files[index];
            let relative = self.shell.library().relative_name(file).to_string();

            let changed = match prompt::select(&relative, &ACTIONS, 0)? {
                Some(0) => {
                    self.play(&relative)?;
                    false
                }
                Some(1) => self.rename(&file.name, &relative)?,
                Some(2) => self.delete(&relative)?,
                _ => false,
            };
            if !listing.refresh_after(self.shell, changed) {
                return Ok(());
            }
        }
    }
}

/// Play `path` on a worker thread; Enter or Esc stops it early.
pub fn play_until_key(player: &CpalPlayer, path: &Path, label: &str) -> Result<()> {
    let worker = player.clone();
    let stop = player.stop_handle();
    let path = path.to_path_buf();
    player.rearm();

    prompt::info(&format!("Playing {} (Enter or Esc to stop)", label));
    let handle = thread::Builder::new()
        .name("playback".into())
        .spawn(move || worker.play_file(&path))?;

    {
        let _raw = RawMode::enable()?;
        while !handle.is_finished() {
            if !event::poll(Duration::from_millis(50))? {
                continue;
            }
            if let Event::Key(key) = event::read()? {
                let stops = matches!(key.code, KeyCode::Enter | KeyCode::Esc);
                if key.kind == KeyEventKind::Press && stops {
                    stop.store(true, Ordering::SeqCst);
                }
            }
        }
    }

    match handle.join() {
        Ok(Ok(())) => {}
        Ok(Err(e)) => prompt::error(&format!("Could not play {}: {}", label, e)),
        Err(_) => prompt::error("Playback thread panicked"),
    }
    Ok(())
}

/// One listing line: relative name, size, modification time.
pub fn describe(relative: &str, file: &VaultFile) -> String {
    let modified = file
        .modified
        .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();
    format!("{:<40} {:>9}  {}", relative, format_size(file.size_bytes), modified)
}

pub fn format_size(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KIB {
        format!("{} B", bytes)
    } else if b < KIB * KIB {
        format!("{:.1} KiB", b / KIB)
    } else {
        format!("{:.1} MiB", b / (KIB * KIB))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixture, saved};

    #[test]
    fn sizes_are_human_readable() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KiB");
        assert_eq!(format_size(3 * 1024 * 1024 + 512 * 1024), "3.5 MiB");
    }

    #[test]
    fn description_without_timestamp() {
        let file = VaultFile {
            path: "Recordings/a.wav".into(),
            name: "a.wav".into(),
            size_bytes: 100,
            modified: None,
        };
        let line = describe("a.wav", &file);
        assert!(line.starts_with("a.wav "));
        assert!(line.contains("100 B"));
    }

    #[test]
    fn failed_rename_keeps_listing() {
        let mut f = fixture();
        saved(&mut f, "a");
        saved(&mut f, "b");
        let mut listing = Listing::fetch(&f.shell).unwrap();

        let changed = rename_entry(&f.shell, "a.wav", Some("b".into()));
        assert!(!changed);
        // Listing is not fetched again, so a change made meanwhile stays unseen.
        f.shell.delete("b.wav").unwrap();
        assert!(listing.refresh_after(&f.shell, changed));
        assert_eq!(listing.files.len(), 2);
    }

    #[test]
    fn successful_rename_refreshes_listing() {
        let mut f = fixture();
        saved(&mut f, "a");
        let mut listing = Listing::fetch(&f.shell).unwrap();

        let changed = rename_entry(&f.shell, "a.wav", Some("b".into()));
        assert!(changed);
        assert!(listing.refresh_after(&f.shell, changed));
        let names: Vec<&str> = listing.files.iter().map(|x| x.name.as_str()).collect();
        assert_eq!(names, vec!["b.wav"]);
    }

    #[test]
    fn unchanged_name_is_not_a_rename() {
        let mut f = fixture();
        saved(&mut f, "a");
        assert!(!rename_entry(&f.shell, "a.wav", None));
        assert!(f.shell.resource_path("a.wav").is_ok());
    }

    #[test]
    fn missing_file_is_reported_once() {
        let f = fixture();
        let view = PlaybackView::new(&f.shell);

        assert!(view.play("gone.wav").is_ok());
        let notices = f.notifier.notices();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].message.starts_with("Could not open"));
    }
}
