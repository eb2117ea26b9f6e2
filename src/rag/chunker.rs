//! Overlapping character-window splitter.
//!
//! Chunks are the unit of embedding and retrieval: fixed-size character
//! windows advancing by `max_size - overlap`, so adjacent chunks share
//! exactly `overlap` characters except at the end of the text.

use crate::core::errors::AssistantError;

/// Lazy chunk sequence over a text. Restart by cloning before consumption.
#[derive(Debug, Clone)]
pub struct Chunks {
    chars: Vec<char>,
    max_size: usize,
    step: usize,
    start: usize,
}

impl Chunks {
    /// Window advance per chunk.
    pub fn step(&self) -> usize {
        self.step
    }
}

impl Iterator for Chunks {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.start >= self.chars.len() {
            return None;
        }

        let end = (self.start + self.max_size).min(self.chars.len());
        let chunk: String = self.chars[self.start..end].iter().collect();
        self.start += self.step;
        Some(chunk)
    }
}

/// Split `text` into overlapping chunks of at most `max_size` characters.
/// Rejects `max_size == 0` and `overlap >= max_size`.
pub fn split(text: &str, max_size: usize, overlap: usize) -> Result<Chunks, AssistantError> {
    if max_size == 0 {
        return Err(AssistantError::InvalidArgument(
            "chunk size must be greater than zero".to_string(),
        ));
    }
    if overlap >= max_size {
        return Err(AssistantError::InvalidArgument(format!(
            "chunk overlap {overlap} must be smaller than chunk size {max_size}"
        )));
    }

    Ok(Chunks {
        chars: text.chars().collect(),
        max_size,
        step: max_size - overlap,
        start: 0,
    })
}
