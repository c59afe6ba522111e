//! [`Key`] is a wrapper around a Gemini API key.

use zeroize::Zeroizing;

/// Error for when a string cannot be used as an API key.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InvalidKey {
    /// The key is empty (or only whitespace).
    #[error("API key is empty")]
    Empty,
    /// The key contains characters that cannot be sent in an HTTP header.
    #[error("API key contains invalid character at byte {position}")]
    Character {
        /// Byte offset of the first offending character.
        position: usize,
    },
}

/// Stores a Gemini API key. The key is zeroized on drop and never printed by
/// [`Debug`].
///
/// [`Debug`]: std::fmt::Debug
pub struct Key {
    inner: Zeroizing<String>,
}

impl Key {
    /// Read the key.
    pub fn read(&self) -> &str {
        self.inner.as_str()
    }
}

impl TryFrom<String> for Key {
    type Error = InvalidKey;

    /// Create a new key from a string. Surrounding whitespace is trimmed. The
    /// original string is zeroized after conversion.
    fn try_from(s: String) -> Result<Self, Self::Error> {
        let s = Zeroizing::new(s);
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(InvalidKey::Empty);
        }

        // Header values must be visible ASCII.
        if let Some(position) =
            trimmed.bytes().position(|b| !b.is_ascii_graphic())
        {
            return Err(InvalidKey::Character { position });
        }

        Ok(Self {
            inner: Zeroizing::new(trimmed.to_string()),
        })
    }
}

impl std::fmt::Debug for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Key").field(&"[REDACTED]").finish()
    }
}
