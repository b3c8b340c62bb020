use core::fmt;

use serde::{Deserialize, Serialize};

/// Size of the standard text buffer: 16 characters plus the terminator.
pub const TEXT_CAPACITY: usize = 17;

/// Standard caller-owned storage for a text variable.
pub type TextBuffer = [u8; TEXT_CAPACITY];

/// Alias for the readonly flag accepted by [`ValueBinding::readonly`].
///
/// [`ValueBinding::readonly`]: crate::data::binding::ValueBinding::readonly
pub const READONLY: bool = true;

/// Scalar kinds a menu item can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    /// Signed integer (`i32`).
    Integer,
    /// Small unsigned integer (`u8`).
    Byte,
    /// Boolean flag.
    Boolean,
    /// NUL-terminated text in a fixed-capacity byte buffer.
    Text,
}

/// Menu item variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    /// Edits a bound variable directly.
    Variable,
    /// Picks the bound variable's value from an option set.
    Select,
    /// Opens another page.
    PageLink,
    /// Returns to the parent page.
    BackLink,
    /// Runs a user action.
    Button,
}

impl ItemType {
    /// Whether items of this type carry a [`ValueBinding`].
    ///
    /// [`ValueBinding`]: crate::data::binding::ValueBinding
    pub fn has_binding(self) -> bool {
        matches!(self, ItemType::Variable | ItemType::Select)
    }
}

/// Owned scalar value, tagged with its type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Value of an integer variable or option.
    Integer(i32),
    /// Value of a byte variable or option.
    Byte(u8),
    /// Value of a boolean variable.
    Boolean(bool),
    /// Content of a text buffer, as raw bytes.
    Text(TextValue),
}

impl Value {
    /// Scalar type of this value.
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            Value::Integer(_) => ScalarType::Integer,
            Value::Byte(_) => ScalarType::Byte,
            Value::Boolean(_) => ScalarType::Boolean,
            Value::Text(_) => ScalarType::Text,
        }
    }

    /// Text content, if this is a text value.
    pub fn as_text(&self) -> Option<&TextValue> {
        match self {
            Value::Text(t) => Some(t),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{v}"),
            Value::Byte(v) => write!(f, "{v}"),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Text(v) => write!(f, "{v}"),
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::Byte(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.into())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v.into())
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Text(v.into())
    }
}

/// Text as it sits in a display buffer: bytes up to the first NUL.
///
/// Bytes are kept as-is, so controller-specific glyphs (e.g. `0xDF` for
/// the degree sign on HD44780 ROMs) survive a read/write cycle. Use
/// [`to_string_lossy`](Self::to_string_lossy) only for host-side display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct TextValue(Vec<u8>);

impl TextValue {
    /// Text bytes, terminator excluded.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// UTF-8 view, replacing invalid bytes with U+FFFD.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }
}

impl From<&[u8]> for TextValue {
    fn from(v: &[u8]) -> Self {
        TextValue(until_nul(v).to_vec())
    }
}

impl From<&str> for TextValue {
    fn from(v: &str) -> Self {
        v.as_bytes().into()
    }
}

impl From<String> for TextValue {
    fn from(v: String) -> Self {
        v.as_str().into()
    }
}

impl From<TextValue> for String {
    fn from(v: TextValue) -> Self {
        v.to_string_lossy()
    }
}

impl fmt::Display for TextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

/// Bytes up to the first NUL, the way a C string would be read.
pub(crate) fn until_nul(bytes: &[u8]) -> &[u8] {
    match bytes.iter().position(|&b| b == 0) {
        Some(end) => &bytes[..end],
        None => bytes,
    }
}
