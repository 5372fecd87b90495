//! Shell fixture and scripted answers for the dialog tests.

use std::collections::VecDeque;
use std::sync::Arc;

use anyhow::{anyhow, Result};

use audio_notes_core::testing::{CaptureStats, CollectingNotifier, ScriptedCapture};
use audio_notes_core::{EncoderRegistry, FsVault, RecorderConfiguration, RecorderShell, TrashMode};

pub type TestShell = RecorderShell<ScriptedCapture, FsVault>;

pub struct Fixture {
    _dir: tempfile::TempDir,
    pub notifier: Arc<CollectingNotifier>,
    pub capture: Arc<CaptureStats>,
    pub shell: TestShell,
}

/// A shell over a temporary vault whose microphone delivers a short tone.
pub fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let notifier = Arc::new(CollectingNotifier::default());
    let provider = ScriptedCapture::new(vec![vec![0.25; 480], vec![-0.25; 480]]);
    let capture = provider.stats();
    let shell = RecorderShell::from_config(
        provider,
        FsVault::new(dir.path(), TrashMode::Local),
        &EncoderRegistry::builtin(),
        &RecorderConfiguration::default(),
        notifier.clone(),
    )
    .unwrap();
    Fixture {
        _dir: dir,
        notifier,
        capture,
        shell,
    }
}

/// Answers typed in order; running out is an error.
pub fn answers(list: &[&str]) -> impl FnMut(&str) -> Result<String> {
    let mut queue: VecDeque<String> = list.iter().map(|s| s.to_string()).collect();
    move |_: &str| {
        queue
            .pop_front()
            .ok_or_else(|| anyhow!("asked more often than expected"))
    }
}

/// Record and save `name` so the vault has something to list.
pub fn saved(fixture: &mut Fixture, name: &str) {
    fixture.shell.start().unwrap();
    fixture.shell.finish(Some(name)).unwrap().unwrap();
}
