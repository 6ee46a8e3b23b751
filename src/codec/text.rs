//! Code-unit text
//!
//! Share tokens carry UTF-16 code units, not Unicode scalar values, so a
//! decoded token may hold unpaired surrogates that `String` cannot represent.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A sequence of 16-bit code units, compared unit for unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Text {
    units: Vec<u16>,
}

impl Text {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_units(units: Vec<u16>) -> Self {
        Self { units }
    }

    pub fn as_units(&self) -> &[u16] {
        &self.units
    }

    pub fn into_units(self) -> Vec<u16> {
        self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// True when every surrogate is part of a valid pair.
    pub fn is_well_formed(&self) -> bool {
        char::decode_utf16(self.units.iter().copied()).all(|c| c.is_ok())
    }

    /// Converts to `String`, handing the text back if it holds an unpaired
    /// surrogate.
    pub fn into_string(self) -> std::result::Result<String, Text> {
        String::from_utf16(&self.units).map_err(|_| self)
    }

    /// Converts to `String`, replacing unpaired surrogates with U+FFFD.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf16_lossy(&self.units)
    }
}

/// Little-endian byte layout, two bytes per unit.
pub(crate) fn units_to_le_bytes(units: &[u16]) -> Vec<u8> {
    units.iter().flat_map(|unit| unit.to_le_bytes()).collect()
}

/// Inverse of [`units_to_le_bytes`]. Caller guarantees an even length.
pub(crate) fn le_bytes_to_units(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

impl From<&str> for Text {
    fn from(value: &str) -> Self {
        Self {
            units: value.encode_utf16().collect(),
        }
    }
}

impl From<String> for Text {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<Vec<u16>> for Text {
    fn from(units: Vec<u16>) -> Self {
        Self::from_units(units)
    }
}

impl PartialEq<str> for Text {
    fn eq(&self, other: &str) -> bool {
        self.units.iter().copied().eq(other.encode_utf16())
    }
}

impl PartialEq<&str> for Text {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in char::decode_utf16(self.units.iter().copied()) {
            fmt::Write::write_char(f, c.unwrap_or(char::REPLACEMENT_CHARACTER))?;
        }
        Ok(())
    }
}

impl Serialize for Text {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string_lossy())
    }
}

impl<'de> Deserialize<'de> for Text {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        String::deserialize(deserializer).map(Text::from)
    }
}
