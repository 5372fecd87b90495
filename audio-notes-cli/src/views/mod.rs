//! Terminal dialogs.
//!
//! A view draws itself in `render`, runs until the user is done with it and
//! returns its outcome. `dispose` releases whatever the view holds on the
//! terminal and is safe to call more than once.

pub mod naming;
pub mod playback;
pub mod recording;
pub mod waveform;

pub use naming::NamingView;
pub use playback::PlaybackView;
pub use recording::RecordingView;

use crossterm::terminal;

pub trait View {
    type Output;

    fn render(&mut self) -> anyhow::Result<Self::Output>;

    fn dispose(&mut self) {}
}

/// Raw terminal mode for the lifetime of the guard.
pub(crate) struct RawMode;

impl RawMode {
    pub(crate) fn enable() -> std::io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            log::warn!("Failed to leave raw mode: {}", e);
        }
    }
}
