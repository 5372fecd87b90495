use audio_notes_core::{Notice, NoticeLevel, Notifier};

use crate::prompt;

/// Prints notices as single styled lines; errors go to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info => prompt::info(&notice.message),
            NoticeLevel::Success => prompt::success(&notice.message),
            NoticeLevel::Error => prompt::error(&notice.message),
        }
    }
}
