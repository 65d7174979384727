use crate::corpus::{Difficulty, SentenceProvider};
use crate::error::EngineError;

/// Walks through the sentences of one difficulty tier.
#[derive(Debug, Clone, PartialEq)]
pub struct SentenceSequencer {
    difficulty: Difficulty,
    sentences: Vec<String>,
    index: usize,
    reference_text: String,
}

impl SentenceSequencer {
    pub fn new(
        difficulty: Difficulty,
        provider: &dyn SentenceProvider,
    ) -> Result<Self, EngineError> {
        Self::from_sentences(difficulty, provider.sentences_for(difficulty))
    }

    pub fn from_sentences(
        difficulty: Difficulty,
        sentences: Vec<String>,
    ) -> Result<Self, EngineError> {
        if sentences.is_empty() {
            return Err(EngineError::InvalidDifficulty(difficulty));
        }

        let reference_text = sentences.join(" ").trim().to_string();

        Ok(Self {
            difficulty,
            sentences,
            index: 0,
            reference_text,
        })
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn sentences(&self) -> &[String] {
        &self.sentences
    }

    pub fn current_sentence(&self) -> &str {
        &self.sentences[self.index]
    }

    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn has_next(&self) -> bool {
        self.index + 1 < self.sentences.len()
    }

    /// Moves to the next sentence; a no-op on the last one.
    pub fn advance(&mut self) {
        if self.has_next() {
            self.index += 1;
        }
    }

    /// Number of sentences after the current one.
    pub fn remaining(&self) -> usize {
        self.sentences.len() - self.index - 1
    }

    pub fn reference_text(&self) -> &str {
        &self.reference_text
    }
}
