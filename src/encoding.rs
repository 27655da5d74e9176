//! Text encoding shared by the runner and the asserter.
//!
//! Programmes given as text are encoded with a single fixed encoding before
//! they are written to the parser, and every captured stream is decoded with
//! the same encoding before it is compared or shown in a failure message.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Encoding used for programme text and captured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextEncoding {
    /// 7-bit ASCII, strict in both directions.
    #[default]
    Ascii,
}

impl TextEncoding {
    /// Returns the encoding name as used in configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            TextEncoding::Ascii => "ascii",
        }
    }

    /// Encodes text into the bytes fed to the external program.
    pub fn encode(&self, text: &str) -> Result<Vec<u8>> {
        match self {
            TextEncoding::Ascii => {
                if let Some((position, ch)) = text.chars().enumerate().find(|(_, c)| !c.is_ascii())
                {
                    return Err(Error::Encoding {
                        encoding: *self,
                        reason: format!("character {:?} at position {}", ch, position),
                    });
                }
                Ok(text.as_bytes().to_vec())
            }
        }
    }

    /// Decodes captured output.
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        match self {
            TextEncoding::Ascii => {
                if let Some(position) = bytes.iter().position(|b| !b.is_ascii()) {
                    return Err(Error::Decoding {
                        encoding: *self,
                        reason: format!(
                            "byte 0x{:02x} at position {}",
                            bytes[position], position
                        ),
                    });
                }
                Ok(bytes.iter().map(|&b| char::from(b)).collect())
            }
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Splits text into lines on `\n`, `\r\n` and `\r`.
///
/// A trailing terminator does not produce an empty last line, and empty
/// input yields no lines at all.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        match rest.find(|c| c == '\n' || c == '\r') {
            Some(idx) => {
                lines.push(&rest[..idx]);
                let skip = if rest[idx..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[idx + skip..];
            }
            None => {
                lines.push(rest);
                break;
            }
        }
    }

    lines
}
