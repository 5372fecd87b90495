//! Interactive prompt helpers using dialoguer
//!
//! Provides themed, consistent prompts for the menu and dialogs.

use anyhow::Result;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

/// Get the shared theme for all prompts
pub fn theme() -> ColorfulTheme {
    ColorfulTheme::default()
}

/// Select from a list of options with arrow keys. `None` when dismissed with Esc.
pub fn select<T: std::fmt::Display>(
    prompt: &str,
    items: &[T],
    default: usize,
) -> Result<Option<usize>> {
    let theme = theme();
    Ok(Select::with_theme(&theme)
        .with_prompt(prompt)
        .items(items)
        .default(default)
        .interact_opt()?)
}

/// Confirm yes/no with default
pub fn confirm(prompt: &str, default: bool) -> Result<bool> {
    let theme = theme();
    Ok(Confirm::with_theme(&theme)
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

/// Get text input. Empty answers are returned as-is so callers can re-ask.
pub fn input(prompt: &str, initial: Option<&str>) -> Result<String> {
    let theme = theme();
    let mut input = Input::<String>::with_theme(&theme)
        .with_prompt(prompt)
        .allow_empty(true);

    if let Some(text) = initial {
        input = input.with_initial_text(text);
    }

    Ok(input.interact_text()?)
}

/// Print a styled header
pub fn header(text: &str) {
    println!();
    println!("{}", style(text).bold().cyan());
    println!();
}

/// Print an error message
pub fn error(text: &str) {
    eprintln!("{} {}", style("✗").red().bold(), text);
}

/// Print a success message
pub fn success(text: &str) {
    println!("{} {}", style("✓").green().bold(), text);
}

/// Print an info message
pub fn info(text: &str) {
    println!("{} {}", style("ℹ").blue(), text);
}
