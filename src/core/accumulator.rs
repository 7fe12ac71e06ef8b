use std::str;

const REPLACEMENT: char = char::REPLACEMENT_CHARACTER;

/// Incremental UTF-8 decoder. A multi-byte sequence split across two chunks
/// is held back until the rest arrives.
#[derive(Debug, Default)]
pub(crate) struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        let mut bytes = std::mem::take(&mut self.pending);
        bytes.extend_from_slice(chunk);

        let mut out = String::with_capacity(bytes.len());
        let mut rest = bytes.as_slice();

        loop {
            match str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    break;
                }
                Err(e) => {
                    let (valid, after) = rest.split_at(e.valid_up_to());
                    // valid_up_to guarantees this prefix is well-formed
                    out.push_str(str::from_utf8(valid).unwrap_or_default());

                    match e.error_len() {
                        Some(len) => {
                            out.push(REPLACEMENT);
                            rest = &after[len..];
                        }
                        None => {
                            self.pending = after.to_vec();
                            break;
                        }
                    }
                }
            }
        }

        out
    }

    /// Flushes bytes left over at end-of-stream.
    pub fn finish(&mut self) -> Option<char> {
        if self.pending.is_empty() {
            None
        } else {
            self.pending.clear();
            Some(REPLACEMENT)
        }
    }
}

/// Append-only text buffer for one generation cycle.
#[derive(Debug, Default)]
pub(crate) struct RawAccumulator {
    text: String,
}

impl RawAccumulator {
    pub fn append(&mut self, chunk: &str) {
        self.text.push_str(chunk);
    }

    pub fn push(&mut self, ch: char) {
        self.text.push(ch);
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn into_string(self) -> String {
        self.text
    }
}
