use include_dir::{include_dir, Dir};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

static CORPUS_DIR: Dir = include_dir!("src/corpus");

const BUILTIN_CORPUS: &str = "english.json";

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn description(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Short simple sentences",
            Difficulty::Medium => "Moderate length sentences",
            Difficulty::Hard => "Complex long sentences",
        }
    }
}

/// Supplies the ordered practice sentences for each difficulty tier.
///
/// An empty list means the tier is not configured.
pub trait SentenceProvider {
    fn sentences_for(&self, difficulty: Difficulty) -> Vec<String>;
}

impl SentenceProvider for HashMap<Difficulty, Vec<String>> {
    fn sentences_for(&self, difficulty: Difficulty) -> Vec<String> {
        self.get(&difficulty).cloned().unwrap_or_default()
    }
}

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("corpus file {0} not found")]
    Missing(String),
    #[error("unable to read corpus: {0}")]
    Read(#[from] std::io::Error),
    #[error("unable to deserialize corpus json: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A named set of sentences keyed by difficulty.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Corpus {
    pub name: String,
    pub sentences: HashMap<Difficulty, Vec<String>>,
}

impl Corpus {
    /// The English corpus compiled into the binary.
    pub fn builtin() -> Result<Self, CorpusError> {
        let file = CORPUS_DIR
            .get_file(BUILTIN_CORPUS)
            .ok_or_else(|| CorpusError::Missing(BUILTIN_CORPUS.to_string()))?;

        let contents = file
            .contents_utf8()
            .ok_or_else(|| CorpusError::Missing(BUILTIN_CORPUS.to_string()))?;

        Self::from_json(contents)
    }

    pub fn from_json(json: &str) -> Result<Self, CorpusError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CorpusError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Tiers that have at least one sentence, in ascending difficulty.
    pub fn difficulties(&self) -> Vec<Difficulty> {
        Difficulty::ALL
            .into_iter()
            .filter(|d| self.sentences.get(d).is_some_and(|s| !s.is_empty()))
            .collect()
    }
}

impl SentenceProvider for Corpus {
    fn sentences_for(&self, difficulty: Difficulty) -> Vec<String> {
        self.sentences.sentences_for(difficulty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_builtin_corpus() {
        let corpus = Corpus::builtin().unwrap();

        assert_eq!(corpus.name, "english");
        assert_eq!(corpus.difficulties(), Difficulty::ALL.to_vec());
        for difficulty in Difficulty::ALL {
            assert_eq!(corpus.sentences_for(difficulty).len(), 5);
        }
        assert_eq!(
            corpus.sentences_for(Difficulty::Easy)[0],
            "The cat sat on the mat."
        );
    }

    #[test]
    fn test_corpus_deserialization() {
        let json_data = r#"
        {
            "name": "test",
            "sentences": {
                "Easy": ["one two.", "three four."],
                "Medium": []
            }
        }
        "#;

        let corpus = Corpus::from_json(json_data).unwrap();

        assert_eq!(corpus.name, "test");
        assert_eq!(corpus.sentences_for(Difficulty::Easy).len(), 2);
        assert!(corpus.sentences_for(Difficulty::Medium).is_empty());
        assert!(corpus.sentences_for(Difficulty::Hard).is_empty());
        assert_eq!(corpus.difficulties(), vec![Difficulty::Easy]);
    }

    #[test]
    fn test_corpus_rejects_unknown_tier() {
        let json_data = r#"{ "name": "bad", "sentences": { "Extreme": ["x"] } }"#;
        assert!(matches!(
            Corpus::from_json(json_data),
            Err(CorpusError::Parse(_))
        ));
    }

    #[test]
    fn test_corpus_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("corpus.json");
        let corpus = Corpus {
            name: "custom".into(),
            sentences: HashMap::from([(Difficulty::Hard, vec!["Hard words here.".into()])]),
        };
        fs::write(&path, serde_json::to_string(&corpus).unwrap()).unwrap();

        assert_eq!(Corpus::load(&path).unwrap(), corpus);
    }

    #[test]
    fn test_corpus_load_missing_file() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            Corpus::load(dir.path().join("nope.json")),
            Err(CorpusError::Read(_))
        ));
    }

    #[test]
    fn test_difficulty_display_and_description() {
        assert_eq!(Difficulty::Easy.to_string(), "Easy");
        assert_eq!(Difficulty::Medium.to_string(), "Medium");
        assert_eq!(Difficulty::Hard.description(), "Complex long sentences");
    }
}
