//! Transcript — the ReAct loop's working memory.
//!
//! An append-only log of the actions the model took and what it observed,
//! rendered back into every subsequent prompt. A fresh transcript is built
//! for each run; nothing is shared between runs.

use serde::{Deserialize, Serialize};

/// One line of the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum TranscriptEntry {
    /// The raw action text the model emitted, e.g. `Search[GPU]`.
    Action(String),
    /// What came back: tool output, an error, or a format complaint.
    Observation(String),
}

impl TranscriptEntry {
    pub fn render(&self) -> String {
        match self {
            Self::Action(text) => format!("Action: {text}"),
            Self::Observation(text) => format!("Observation: {text}"),
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Action(text) | Self::Observation(text) => text,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_action(&mut self, text: impl Into<String>) {
        self.entries.push(TranscriptEntry::Action(text.into()));
    }

    pub fn push_observation(&mut self, text: impl Into<String>) {
        self.entries.push(TranscriptEntry::Observation(text.into()));
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Newline-joined rendering embedded into the ReAct prompt.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(TranscriptEntry::render)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
