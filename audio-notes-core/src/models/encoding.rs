use std::fmt;

use serde::{Deserialize, Serialize};

/// Audio container/codec a recording can be encoded into.
///
/// Ordered by the default preference: dedicated compressed format first,
/// then a generic compressed format, then two container fallbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioEncoding {
    Mp3,
    Webm,
    Ogg,
    Wav,
}

impl AudioEncoding {
    pub const DEFAULT_PREFERENCE: [AudioEncoding; 4] =
        [Self::Mp3, Self::Webm, Self::Ogg, Self::Wav];

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Webm => "audio/webm",
            Self::Ogg => "audio/ogg",
            Self::Wav => "audio/wav",
        }
    }

    /// File extension without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Webm => "webm",
            Self::Ogg => "ogg",
            Self::Wav => "wav",
        }
    }
}

impl fmt::Display for AudioEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_preference_order() {
        assert_eq!(
            AudioEncoding::DEFAULT_PREFERENCE,
            [AudioEncoding::Mp3, AudioEncoding::Webm, AudioEncoding::Ogg, AudioEncoding::Wav]
        );
    }

    #[test]
    fn deserializes_lowercase_names() {
        let parsed: Vec<AudioEncoding> = serde_json::from_str(r#"["ogg","wav"]"#).unwrap();
        assert_eq!(parsed, vec![AudioEncoding::Ogg, AudioEncoding::Wav]);
    }
}
