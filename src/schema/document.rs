/// The parsed-document input boundary.
///
/// A `Document` is the shape the model ingests: sentences carrying
/// part-of-speech-tagged, lemmatized tokens and typed dependency
/// relations. How that structure was produced (batch parse, streaming
/// annotation service) is the backend's business, not ours.
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// One annotated token as emitted by the parsing backend.
///
/// `lemma` and `pos` are optional because real parser output has gaps;
/// tokens missing either are never promoted to narrative events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Surface form.
    pub word: String,
    #[serde(default)]
    pub lemma: Option<String>,
    /// Penn Treebank tag.
    #[serde(default)]
    pub pos: Option<String>,
    /// Representative head of the token's coreference chain, when the
    /// backend ran coreference resolution.
    #[serde(default)]
    pub rep_head: Option<String>,
}

impl Token {
    /// Lower-cased lemma, or `None` when the backend omitted it.
    pub fn key_lemma(&self) -> Option<String> {
        self.lemma.as_deref().map(str::to_lowercase)
    }

    /// Entity key for this token: the coreference representative head
    /// when one is available, otherwise the lower-cased lemma.
    pub fn entity_key(&self) -> Option<String> {
        match &self.rep_head {
            Some(head) => Some(head.to_lowercase()),
            None => self.key_lemma(),
        }
    }
}

/// A typed dependency relation between a governor and a dependent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    /// Label in the Stanford typed-dependencies inventory ("nsubj", ...).
    pub label: String,
    pub gov: Token,
    pub dep: Token,
}

/// One sentence: tokens in surface order plus its dependency relations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Sentence {
    #[serde(default)]
    pub tokens: Vec<Token>,
    #[serde(default)]
    pub relations: Vec<Relation>,
}

/// One parsed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Document {
    pub sentences: Vec<Sentence>,
}

impl Document {
    /// Parse a document from RON text.
    pub fn parse_ron(text: &str) -> Result<Self, DocumentError> {
        Ok(ron::from_str(text)?)
    }

    /// Load a document from a RON file.
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }
}
