use anyhow::Result;

use audio_notes_core::{CaptureProvider, RecorderError, RecorderShell, SaveReceipt, Vault};

use crate::app::Shell;
use crate::prompt;
use crate::views::{PlaybackView, RecordingView, View};

const START_RECORDING: &str = "Start recording";
const OPEN_RECORDINGS: &str = "Open Audio Recordings";
const QUIT: &str = "Quit";

/// Main menu: record, browse recordings, quit.
pub fn run(shell: &mut Shell) -> Result<()> {
    prompt::header("Audio Notes");
    let items = [START_RECORDING, OPEN_RECORDINGS, QUIT];

    loop {
        let choice = match prompt::select("What would you like to do?", &items, 0)? {
            Some(i) => items[i],
            None => return Ok(()),
        };

        match choice {
            START_RECORDING => {
                let result = record_then_browse(
                    shell,
                    |shell| RecordingView::new(shell).render(),
                    |shell| browse(shell),
                );
                if let Err(e) = result {
                    // Recorder failures were already shown as notices.
                    if e.downcast_ref::<RecorderError>().is_none() {
                        prompt::error(&format!("{:#}", e));
                    }
                }
            }
            OPEN_RECORDINGS => browse(shell)?,
            _ => return Ok(()),
        }
    }
}

/// Run `record`, then `browse` once a recording has been saved.
///
/// The listing only opens after the save completed, so it includes the new
/// file. A discarded or empty session skips it.
pub fn record_then_browse<S, R, B>(
    shell: &mut S,
    record: R,
    browse: B,
) -> Result<Option<SaveReceipt>>
where
    R: FnOnce(&mut S) -> Result<Option<SaveReceipt>>,
    B: FnOnce(&S) -> Result<()>,
{
    let receipt = record(shell)?;
    if receipt.is_some() {
        browse(&*shell)?;
    }
    Ok(receipt)
}

/// Open the recordings browser.
pub fn browse<P: CaptureProvider, V: Vault>(shell: &RecorderShell<P, V>) -> Result<()> {
    let mut view = PlaybackView::new(shell);
    let result = view.render();
    view.dispose();
    result
}
