use chrono::{DateTime, Utc};

use crate::models::error::RecorderError;

/// Validate a user-supplied recording name and enforce `extension`.
///
/// Surrounding whitespace is trimmed. The extension check is
/// case-insensitive, so `Memo.WAV` is kept as is.
pub fn normalize_file_name(input: &str, extension: &str) -> Result<String, RecorderError> {
    let name = input.trim();
    if name.is_empty() {
        return Err(RecorderError::EmptyFileName);
    }
    if name.contains(['/', '\\']) {
        return Err(RecorderError::InvalidFileName(format!(
            "\"{}\" contains a path separator",
            name
        )));
    }
    if name.chars().any(char::is_control) {
        return Err(RecorderError::InvalidFileName(format!(
            "\"{}\" contains control characters",
            name.escape_debug()
        )));
    }
    if name.starts_with('.') {
        return Err(RecorderError::InvalidFileName(format!("\"{}\" would be hidden", name)));
    }

    let suffix = format!(".{}", extension);
    let has_extension = name.len() > suffix.len()
        && name
            .get(name.len() - suffix.len()..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(&suffix));

    if has_extension {
        Ok(name.to_string())
    } else {
        Ok(format!("{}{}", name, suffix))
    }
}

/// Timestamp-derived default name: `Recording-<unix millis>.<ext>`.
pub fn default_file_name(now: DateTime<Utc>, extension: &str) -> String {
    format!("Recording-{}.{}", now.timestamp_millis(), extension)
}

/// Join a vault folder and a file name.
pub fn join(folder: &str, name: &str) -> String {
    let folder = folder.trim_matches('/');
    if folder.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", folder, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn appends_missing_extension() {
        assert_eq!(normalize_file_name("memo", "wav").unwrap(), "memo.wav");
        assert_eq!(normalize_file_name("  memo  ", "wav").unwrap(), "memo.wav");
        assert_eq!(normalize_file_name("memo.mp3", "wav").unwrap(), "memo.mp3.wav");
    }

    #[test]
    fn keeps_existing_extension_any_case() {
        assert_eq!(normalize_file_name("memo.wav", "wav").unwrap(), "memo.wav");
        assert_eq!(normalize_file_name("Memo.WAV", "wav").unwrap(), "Memo.WAV");
    }

    #[test]
    fn bare_extension_is_a_name() {
        assert_eq!(normalize_file_name("wav", "wav").unwrap(), "wav.wav");
    }

    #[test]
    fn rejects_empty_names() {
        assert_eq!(normalize_file_name("", "wav"), Err(RecorderError::EmptyFileName));
        assert_eq!(normalize_file_name("   ", "wav"), Err(RecorderError::EmptyFileName));
    }

    #[test]
    fn rejects_paths_and_hidden_names() {
        for bad in ["../memo", "a/b", "a\\b", ".memo", "me\u{0}mo"] {
            assert!(
                matches!(normalize_file_name(bad, "wav"), Err(RecorderError::InvalidFileName(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn default_name_is_timestamp_derived() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(default_file_name(now, "wav"), "Recording-1700000000123.wav");
    }

    #[test]
    fn join_handles_slashes() {
        assert_eq!(join("Recordings", "a.wav"), "Recordings/a.wav");
        assert_eq!(join("/Recordings/", "a.wav"), "Recordings/a.wav");
        assert_eq!(join("", "a.wav"), "a.wav");
    }
}
