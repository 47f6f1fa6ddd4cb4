use derive_more::Display;
use serde_json::Value;

/// Opaque version token for a book, as reported by the remote catalog.
///
/// Two fetches of the same book with equal hashes have identical content.
/// The catalog has been seen to send these both as strings and as integers;
/// integers are kept as their decimal representation.
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash(String);

impl From<String> for ContentHash {
    fn from(hash: String) -> Self {
        Self(hash)
    }
}
impl From<&str> for ContentHash {
    fn from(hash: &str) -> Self {
        Self(hash.to_string())
    }
}

impl ContentHash {
    /// Read a hash from a JSON value. Anything but a string or an integer
    /// isn't a hash.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(hash) => Some(Self(hash.clone())),
            Value::Number(number) if number.is_i64() || number.is_u64() => Some(Self(number.to_string())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
