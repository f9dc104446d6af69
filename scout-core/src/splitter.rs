//! Recursive character text splitter
//!
//! Splits large page content into overlapping chunks small enough for a
//! single summarization call. Separators are tried in order (blank lines,
//! then single newlines); pieces that are still too large are split again
//! with the next separator. Lengths are counted in characters, not bytes.

use std::collections::VecDeque;

use crate::config::SummarizerConfig;
use crate::error::{Result, ScoutError};

/// Splitter producing chunks of at most `chunk_size` characters where the
/// separators allow it, with up to `chunk_overlap` characters carried from
/// one chunk into the next.
#[derive(Debug, Clone)]
pub struct RecursiveCharacterSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl RecursiveCharacterSplitter {
    /// Create a splitter.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `chunk_size` is zero or smaller than
    /// `chunk_overlap`.
    pub fn new(chunk_size: usize, chunk_overlap: usize, separators: Vec<String>) -> Result<Self> {
        if chunk_size == 0 {
            return Err(ScoutError::Configuration(
                "chunk_size must be greater than zero".to_string(),
            ));
        }
        if chunk_overlap > chunk_size {
            return Err(ScoutError::Configuration(format!(
                "chunk_overlap ({}) is larger than chunk_size ({})",
                chunk_overlap, chunk_size
            )));
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
            separators,
        })
    }

    /// Create a splitter from summarizer settings.
    pub fn from_config(config: &SummarizerConfig) -> Result<Self> {
        Self::new(
            config.chunk_size,
            config.chunk_overlap,
            config.separators.clone(),
        )
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split `text` into chunks. The same input always yields the same chunks.
    pub fn split(&self, text: &str) -> Vec<String> {
        self.split_with(text, &self.separators)
    }

    fn split_with(&self, text: &str, separators: &[String]) -> Vec<String> {
        let mut separator = separators.last().map(String::as_str).unwrap_or("");
        let mut remaining: &[String] = &[];
        for (i, candidate) in separators.iter().enumerate() {
            if candidate.is_empty() {
                separator = "";
                break;
            }
            if text.contains(candidate.as_str()) {
                separator = candidate;
                remaining = &separators[i + 1..];
                break;
            }
        }

        let mut chunks = Vec::new();
        let mut small: Vec<String> = Vec::new();

        for piece in split_keeping_separator(text, separator) {
            if char_len(&piece) < self.chunk_size {
                small.push(piece);
                continue;
            }

            if !small.is_empty() {
                chunks.extend(self.merge(&small));
                small.clear();
            }

            if remaining.is_empty() {
                let trimmed = piece.trim();
                if !trimmed.is_empty() {
                    chunks.push(trimmed.to_string());
                }
            } else {
                chunks.extend(self.split_with(&piece, remaining));
            }
        }

        if !small.is_empty() {
            chunks.extend(self.merge(&small));
        }

        chunks
    }

    /// Greedily merge pieces into chunks, keeping an overlap window between
    /// consecutive chunks.
    fn merge(&self, pieces: &[String]) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut window: VecDeque<(&str, usize)> = VecDeque::new();
        let mut total = 0usize;

        for piece in pieces {
            let len = char_len(piece);

            if total + len > self.chunk_size {
                if total > self.chunk_size {
                    tracing::warn!(
                        total,
                        chunk_size = self.chunk_size,
                        "Created a chunk longer than the configured size"
                    );
                }

                if !window.is_empty() {
                    if let Some(chunk) = join_window(&window) {
                        chunks.push(chunk);
                    }

                    while total > self.chunk_overlap || (total + len > self.chunk_size && total > 0)
                    {
                        match window.pop_front() {
                            Some((_, dropped)) => total -= dropped,
                            None => break,
                        }
                    }
                }
            }

            window.push_back((piece.as_str(), len));
            total += len;
        }

        if let Some(chunk) = join_window(&window) {
            chunks.push(chunk);
        }

        chunks
    }
}

/// Split on `separator`, re-attaching it to the front of every piece after
/// the first. Empty pieces are dropped. An empty separator splits into
/// characters.
fn split_keeping_separator(text: &str, separator: &str) -> Vec<String> {
    if separator.is_empty() {
        return text.chars().map(String::from).collect();
    }

    let mut parts = text.split(separator);
    let mut pieces = Vec::new();
    if let Some(first) = parts.next() {
        pieces.push(first.to_string());
    }
    pieces.extend(parts.map(|rest| format!("{}{}", separator, rest)));
    pieces.retain(|p| !p.is_empty());
    pieces
}

fn join_window(window: &VecDeque<(&str, usize)>) -> Option<String> {
    let joined: String = window.iter().map(|(piece, _)| *piece).collect();
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}
