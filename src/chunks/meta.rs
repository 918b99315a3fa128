/*
    wozkit
    https://github.com/dbalsom/wozkit

    Copyright 2025 Daniel Balsom

    Permission is hereby granted, free of charge, to any person obtaining a
    copy of this software and associated documentation files (the “Software”),
    to deal in the Software without restriction, including without limitation
    the rights to use, copy, modify, merge, publish, distribute, sublicense,
    and/or sell copies of the Software, and to permit persons to whom the
    Software is furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in
    all copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
    FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
    DEALINGS IN THE SOFTWARE.

    --------------------------------------------------------------------------
*/

//! Decoder for the `META` chunk: free-form key/value metadata.
//!
//! The payload is UTF-8 text, one row per line feed, fields separated by
//! horizontal tabs. The first field of a row is the key; any remaining fields
//! are its ordered values. The format guarantees key uniqueness, and the
//! decoder enforces it rather than silently overwriting.

use std::collections::HashMap;

use crate::WozError;

/// Decoded `META` chunk.
///
/// A key mapped to `None` was present in the chunk with no value fields -
/// distinct from a key mapped to an empty or whitespace value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetaChunk {
    entries: HashMap<String, Option<Vec<String>>>,
}

impl MetaChunk {
    pub fn decode(data: &[u8]) -> Result<Self, WozError> {
        let text = String::from_utf8_lossy(data);
        let mut entries: HashMap<String, Option<Vec<String>>> = HashMap::new();

        for row in text.split('\n') {
            let mut fields = row.split('\t');
            // split always yields at least one field
            let key = fields.next().unwrap_or_default();
            let values: Vec<String> = fields.map(str::to_string).collect();

            if key.is_empty() {
                if values.is_empty() {
                    // Blank padding row
                    continue;
                }
                return Err(WozError::EmptyKey);
            }

            let value = if values.is_empty() { None } else { Some(values) };
            if entries.insert(key.to_string(), value).is_some() {
                return Err(WozError::DuplicateKey(key.to_string()));
            }
        }

        Ok(Self { entries })
    }

    /// Look a key up: `None` if the key is missing, `Some(None)` for a key
    /// with no value fields, `Some(Some(values))` otherwise.
    pub fn get(&self, key: &str) -> Option<Option<&[String]>> {
        self.entries.get(key).map(|v| v.as_deref())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, Option<&[String]>)> {
        self.entries.iter().map(|(k, v)| (k, v.as_deref()))
    }
}
