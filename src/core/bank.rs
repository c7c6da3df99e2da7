/// The narrative event store — counts, ingestion, and persistence.
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::core::aggregate::{self, AggregationMode, EntityVerbMap};
use crate::schema::document::Document;

#[derive(Debug, Error)]
pub enum BankError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// A single narrative event: a verb attributed to an entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Event {
    pub verb: String,
    pub entity: String,
}

/// A within-document co-occurrence of two distinct verbs attributed to
/// the same entity. `verb1` and `verb2` are stored in the order the
/// verbs were observed for the entity; `verb1 != verb2` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pair {
    pub entity: String,
    pub verb1: String,
    pub verb2: String,
}

/// Ingestion configuration for a bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BankConfig {
    pub mode: AggregationMode,
    /// Track grammatical role in the verb key by suffixing `-subj` or
    /// `-obj`, so the same verb in different roles is a distinct event.
    pub typed: bool,
}

/// The event store: every count the model accumulates over a corpus.
///
/// Ingestion only ever increments; scoring and chain building are pure
/// reads. Both maps iterate in insertion order, which is what makes
/// chain tie-breaking reproducible across runs of the same corpus.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NarrativeBank {
    config: BankConfig,
    events: IndexMap<Event, u64>,
    pairs: IndexMap<Pair, u64>,
}

impl NarrativeBank {
    /// An empty bank with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty bank with an explicit configuration.
    pub fn with_config(config: BankConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &BankConfig {
        &self.config
    }

    // Ingestion --------------------------------------------------------

    /// Ingest one parsed document.
    ///
    /// Every verb attributed to an entity increments that event's count.
    /// Entities with two or more verbs additionally increment one pair
    /// count per ordered combination of distinct verbs in their list.
    /// Calling this twice with the same document doubles the counts:
    /// ingestion is additive, never idempotent.
    pub fn add_document(&mut self, doc: &Document) {
        let aggregated = aggregate::aggregate(doc, &self.config);
        self.add_aggregated(&aggregated);
    }

    fn add_aggregated(&mut self, map: &EntityVerbMap) {
        for (entity, verbs) in map {
            for (i, verb) in verbs.iter().enumerate() {
                *self
                    .events
                    .entry(Event {
                        verb: verb.clone(),
                        entity: entity.clone(),
                    })
                    .or_insert(0) += 1;
                for later in &verbs[i + 1..] {
                    if later == verb {
                        continue;
                    }
                    *self
                        .pairs
                        .entry(Pair {
                            entity: entity.clone(),
                            verb1: verb.clone(),
                            verb2: later.clone(),
                        })
                        .or_insert(0) += 1;
                }
            }
        }
    }

    // Event counts -----------------------------------------------------

    /// Occurrence count of a verb under an entity; 0 when never seen.
    pub fn count(&self, verb: &str, entity: &str) -> u64 {
        self.events
            .get(&Event {
                verb: verb.to_string(),
                entity: entity.to_string(),
            })
            .copied()
            .unwrap_or(0)
    }

    /// Total event occurrences for an entity.
    pub fn num_events(&self, entity: &str) -> u64 {
        self.events
            .iter()
            .filter(|(event, _)| event.entity == entity)
            .map(|(_, count)| count)
            .sum()
    }

    /// Total occurrences of a verb across all entities.
    pub fn verb_occurrences(&self, verb: &str) -> u64 {
        self.events
            .iter()
            .filter(|(event, _)| event.verb == verb)
            .map(|(_, count)| count)
            .sum()
    }

    /// Sum of every event count in the store.
    pub fn total_events(&self) -> u64 {
        self.events.values().sum()
    }

    // Pair counts ------------------------------------------------------

    /// Co-occurrence count of two verbs under an entity, symmetric in
    /// the verb arguments: both stored orders are summed.
    pub fn cooccur(&self, verb1: &str, verb2: &str, entity: &str) -> u64 {
        self.pair_count(entity, verb1, verb2) + self.pair_count(entity, verb2, verb1)
    }

    fn pair_count(&self, entity: &str, verb1: &str, verb2: &str) -> u64 {
        self.pairs
            .get(&Pair {
                entity: entity.to_string(),
                verb1: verb1.to_string(),
                verb2: verb2.to_string(),
            })
            .copied()
            .unwrap_or(0)
    }

    /// Total pair occurrences for an entity.
    pub fn num_pairs(&self, entity: &str) -> u64 {
        self.pairs
            .iter()
            .filter(|(pair, _)| pair.entity == entity)
            .map(|(_, count)| count)
            .sum()
    }

    /// Co-occurrences of an unordered verb pair summed across all
    /// entities.
    pub fn pair_occurrences(&self, verb1: &str, verb2: &str) -> u64 {
        self.pairs
            .iter()
            .filter(|(pair, _)| {
                (pair.verb1 == verb1 && pair.verb2 == verb2)
                    || (pair.verb1 == verb2 && pair.verb2 == verb1)
            })
            .map(|(_, count)| count)
            .sum()
    }

    /// Sum of every pair count in the store.
    pub fn total_pairs(&self) -> u64 {
        self.pairs.values().sum()
    }

    // Iteration --------------------------------------------------------

    /// Events in insertion order.
    pub fn events(&self) -> impl Iterator<Item = (&Event, u64)> {
        self.events.iter().map(|(event, count)| (event, *count))
    }

    /// Pairs in insertion order.
    pub fn pairs(&self) -> impl Iterator<Item = (&Pair, u64)> {
        self.pairs.iter().map(|(pair, count)| (pair, *count))
    }

    /// Number of distinct (verb, entity) events.
    pub fn unique_events(&self) -> usize {
        self.events.len()
    }

    /// Number of distinct (entity, verb1, verb2) pairs.
    pub fn unique_pairs(&self) -> usize {
        self.pairs.len()
    }

    // Persistence ------------------------------------------------------

    /// Save the bank to a RON file. Counts round-trip losslessly.
    pub fn save(&self, path: &Path) -> Result<(), BankError> {
        let serialized = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
        std::fs::write(path, serialized)?;
        Ok(())
    }

    /// Load a bank from a RON file.
    pub fn load(path: &Path) -> Result<Self, BankError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(ron::from_str(&contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::document::{Relation, Sentence, Token};

    fn token(word: &str, lemma: &str, pos: &str) -> Token {
        Token {
            word: word.to_string(),
            lemma: Some(lemma.to_string()),
            pos: Some(pos.to_string()),
            rep_head: None,
        }
    }

    fn nsubj(verb: &str, noun: &str) -> Relation {
        Relation {
            label: "nsubj".to_string(),
            gov: token(verb, verb, "VBD"),
            dep: token(noun, noun, "NNP"),
        }
    }

    /// One document attributing the given verbs, in order, to `entity`.
    fn doc(entity: &str, verbs: &[&str]) -> Document {
        Document {
            sentences: verbs
                .iter()
                .map(|verb| Sentence {
                    tokens: Vec::new(),
                    relations: vec![nsubj(verb, entity)],
                })
                .collect(),
        }
    }

    fn diner_bank() -> NarrativeBank {
        let mut bank = NarrativeBank::new();
        bank.add_document(&doc("she", &["eat", "pay", "leave"]));
        bank.add_document(&doc("she", &["eat", "pay", "leave"]));
        bank
    }

    #[test]
    fn counts_events_and_all_pairwise_combinations() {
        let bank = diner_bank();
        assert_eq!(bank.count("eat", "she"), 2);
        assert_eq!(bank.count("pay", "she"), 2);
        assert_eq!(bank.count("leave", "she"), 2);
        // All combinations, not just adjacent ones.
        assert_eq!(bank.cooccur("eat", "pay", "she"), 2);
        assert_eq!(bank.cooccur("eat", "leave", "she"), 2);
        assert_eq!(bank.cooccur("pay", "leave", "she"), 2);
    }

    #[test]
    fn reingestion_is_additive() {
        let mut bank = NarrativeBank::new();
        let document = doc("she", &["eat", "pay"]);
        bank.add_document(&document);
        assert_eq!(bank.count("eat", "she"), 1);
        bank.add_document(&document);
        assert_eq!(bank.count("eat", "she"), 2);
        assert_eq!(bank.cooccur("eat", "pay", "she"), 2);
    }

    #[test]
    fn single_verb_entity_gets_event_but_no_pair() {
        let mut bank = NarrativeBank::new();
        bank.add_document(&doc("waiter", &["serve"]));
        assert_eq!(bank.count("serve", "waiter"), 1);
        assert_eq!(bank.num_pairs("waiter"), 0);
    }

    #[test]
    fn identical_verbs_never_pair() {
        let mut bank = NarrativeBank::new();
        bank.add_document(&doc("she", &["knock", "knock"]));
        assert_eq!(bank.count("knock", "she"), 2);
        assert_eq!(bank.cooccur("knock", "knock", "she"), 0);
        assert_eq!(bank.total_pairs(), 0);
    }

    #[test]
    fn pairs_imply_their_events() {
        let mut bank = NarrativeBank::new();
        bank.add_document(&doc("she", &["eat", "pay", "leave"]));
        bank.add_document(&doc("waiter", &["serve", "clear"]));
        for (pair, count) in bank.pairs() {
            assert!(count > 0);
            assert!(bank.count(&pair.verb1, &pair.entity) > 0);
            assert!(bank.count(&pair.verb2, &pair.entity) > 0);
        }
    }

    #[test]
    fn lookup_miss_is_zero_not_error() {
        let bank = diner_bank();
        assert_eq!(bank.count("run", "she"), 0);
        assert_eq!(bank.count("eat", "nobody"), 0);
        assert_eq!(bank.cooccur("eat", "run", "she"), 0);
    }

    #[test]
    fn per_entity_and_global_sums() {
        let mut bank = NarrativeBank::new();
        bank.add_document(&doc("she", &["eat", "pay"]));
        bank.add_document(&doc("waiter", &["serve", "clear", "eat"]));
        assert_eq!(bank.num_events("she"), 2);
        assert_eq!(bank.num_events("waiter"), 3);
        assert_eq!(bank.total_events(), 5);
        assert_eq!(bank.num_pairs("she"), 1);
        assert_eq!(bank.num_pairs("waiter"), 3);
        assert_eq!(bank.total_pairs(), 4);
        assert_eq!(bank.verb_occurrences("eat"), 2);
        assert_eq!(bank.pair_occurrences("serve", "eat"), 1);
    }

    #[test]
    fn save_and_load_round_trips_counts() {
        let bank = diner_bank();
        std::fs::create_dir_all("target").unwrap();
        let path = std::path::PathBuf::from("target/test_narrative_bank.ron");

        bank.save(&path).unwrap();
        let loaded = NarrativeBank::load(&path).unwrap();

        assert_eq!(loaded.unique_events(), bank.unique_events());
        assert_eq!(loaded.unique_pairs(), bank.unique_pairs());
        assert_eq!(loaded.count("eat", "she"), 2);
        assert_eq!(loaded.cooccur("pay", "leave", "she"), 2);
        assert_eq!(loaded.config(), bank.config());

        // Cleanup
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn load_rejects_garbage() {
        std::fs::create_dir_all("target").unwrap();
        let path = std::path::PathBuf::from("target/test_narrative_bank_garbage.ron");
        std::fs::write(&path, "not a bank").unwrap();
        assert!(NarrativeBank::load(&path).is_err());
        let _ = std::fs::remove_file(&path);
    }
}
