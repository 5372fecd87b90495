use anyhow::Result;

use super::View;
use crate::prompt;

/// Asks for a new file name.
///
/// Empty input is rejected and asked again. Returns `None` when the answer
/// is the current name, meaning there is nothing to rename.
pub struct NamingView {
    current: String,
    extension: String,
}

impl NamingView {
    pub fn new(current: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            current: current.into(),
            extension: extension.into(),
        }
    }

    /// The current name without the enforced extension, offered for editing.
    fn initial_text(&self) -> &str {
        let suffix = format!(".{}", self.extension);
        let len = self.current.len();
        match self.current.get(len.saturating_sub(suffix.len())..) {
            Some(tail) if len > suffix.len() && tail.eq_ignore_ascii_case(&suffix) => {
                &self.current[..len - suffix.len()]
            }
            _ => &self.current,
        }
    }

    /// Ask through `answer` until a non-empty name comes back.
    pub(crate) fn ask(
        &self,
        mut answer: impl FnMut(&str) -> Result<String>,
    ) -> Result<Option<String>> {
        loop {
            let text = answer(self.initial_text())?;
            if text.trim().is_empty() {
                prompt::error("File name must not be empty");
                continue;
            }
            return Ok(self.accept(&text));
        }
    }

    fn accept(&self, answer: &str) -> Option<String> {
        let answer = answer.trim();
        if answer == self.current || answer == self.initial_text() {
            None
        } else {
            Some(answer.to_string())
        }
    }
}

impl View for NamingView {
    type Output = Option<String>;

    fn render(&mut self) -> Result<Option<String>> {
        self.ask(|initial| prompt::input("New name", Some(initial)))
    }
}
