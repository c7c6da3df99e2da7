/// Greedy narrative chain construction.
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::bank::NarrativeBank;

/// Knobs for chain construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainOptions {
    /// Upper bound on chain length, head verb included.
    pub max_size: usize,
    /// Also extend through pairs whose second member is already in the
    /// chain, scoring the reverse direction.
    pub bidirectional: bool,
}

impl Default for ChainOptions {
    fn default() -> Self {
        Self {
            max_size: 6,
            bidirectional: false,
        }
    }
}

impl NarrativeBank {
    /// Greedily grow a chain of verbs from `head`, restricted to pairs
    /// of `entity` when one is given.
    ///
    /// Each step scores every verb reachable through a recorded pair
    /// from the verbs already chosen, summing the PMI contribution of
    /// every chain member it pairs with; an undefined PMI contributes
    /// nothing. The strictly best candidate is appended; ties go to the
    /// candidate first reached in pair insertion order. The chain stops
    /// at `max_size`, when no candidate exists, or when the best
    /// accumulated score is not positive — a short chain is a normal
    /// outcome, not a failure.
    ///
    /// The store is never mutated; identical inputs always yield the
    /// identical chain.
    pub fn chain(&self, head: &str, entity: Option<&str>, opts: ChainOptions) -> Vec<String> {
        let mut chain: Vec<String> = vec![head.to_string()];

        while chain.len() < opts.max_size {
            let mut scores: IndexMap<&str, f64> = IndexMap::new();

            for verb in &chain {
                for (pair, count) in self.pairs() {
                    if count == 0 {
                        continue;
                    }
                    if let Some(entity) = entity {
                        if pair.entity != entity {
                            continue;
                        }
                    }
                    if pair.verb1 == *verb && !chain.contains(&pair.verb2) {
                        if let Some(score) = self.pmi(verb, &pair.verb2, entity) {
                            *scores.entry(pair.verb2.as_str()).or_insert(0.0) += score;
                        }
                    }
                    if opts.bidirectional
                        && pair.verb2 == *verb
                        && !chain.contains(&pair.verb1)
                    {
                        if let Some(score) = self.pmi(&pair.verb1, verb, entity) {
                            *scores.entry(pair.verb1.as_str()).or_insert(0.0) += score;
                        }
                    }
                }
            }

            // First strictly-greater wins: ties resolve to the earliest
            // candidate in insertion order.
            let mut best: Option<(&str, f64)> = None;
            for (candidate, score) in &scores {
                match best {
                    Some((_, top)) if *score <= top => {}
                    _ => best = Some((candidate, *score)),
                }
            }

            match best {
                Some((candidate, score)) if score > 0.0 => chain.push(candidate.to_string()),
                _ => break,
            }
        }

        chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::document::{Document, Relation, Sentence, Token};

    fn token(word: &str, lemma: &str, pos: &str) -> Token {
        Token {
            word: word.to_string(),
            lemma: Some(lemma.to_string()),
            pos: Some(pos.to_string()),
            rep_head: None,
        }
    }

    fn doc(entity: &str, verbs: &[&str]) -> Document {
        Document {
            sentences: verbs
                .iter()
                .map(|verb| Sentence {
                    tokens: Vec::new(),
                    relations: vec![Relation {
                        label: "nsubj".to_string(),
                        gov: token(verb, verb, "VBD"),
                        dep: token(entity, entity, "NNP"),
                    }],
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
    fn max_size_one_returns_only_the_head() {
        let bank = diner_bank();
        let opts = ChainOptions {
            max_size: 1,
            ..ChainOptions::default()
        };
        assert_eq!(bank.chain("eat", Some("she"), opts), vec!["eat"]);
        // Even for a verb the bank has never seen.
        assert_eq!(bank.chain("run", Some("she"), opts), vec!["run"]);
    }

    #[test]
    fn follows_pair_order_and_terminates() {
        let bank = diner_bank();
        let chain = bank.chain("eat", Some("she"), ChainOptions::default());
        // pay and leave tie on accumulated PMI; pay was recorded first.
        // No pair leads out of leave, so the chain stops at three.
        assert_eq!(chain, vec!["eat", "pay", "leave"]);
    }

    #[test]
    fn respects_max_size() {
        let bank = diner_bank();
        let opts = ChainOptions {
            max_size: 2,
            ..ChainOptions::default()
        };
        assert_eq!(bank.chain("eat", Some("she"), opts), vec!["eat", "pay"]);
    }

    #[test]
    fn never_repeats_a_verb() {
        let mut bank = NarrativeBank::new();
        for _ in 0..3 {
            bank.add_document(&doc("she", &["wake", "eat", "wake", "leave"]));
        }
        let chain = bank.chain("wake", Some("she"), ChainOptions::default());
        let mut seen = chain.clone();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), chain.len(), "duplicate verb in {:?}", chain);
        assert!(chain.len() <= 6);
    }

    #[test]
    fn deterministic_across_invocations() {
        let bank = diner_bank();
        let first = bank.chain("eat", Some("she"), ChainOptions::default());
        let second = bank.chain("eat", Some("she"), ChainOptions::default());
        assert_eq!(first, second);
    }

    #[test]
    fn unknown_head_yields_singleton() {
        let bank = diner_bank();
        assert_eq!(
            bank.chain("run", Some("she"), ChainOptions::default()),
            vec!["run"]
        );
    }

    #[test]
    fn entity_restriction_excludes_other_protagonists() {
        let mut bank = diner_bank();
        bank.add_document(&doc("waiter", &["eat", "gossip"]));
        let chain = bank.chain("eat", Some("she"), ChainOptions::default());
        assert!(!chain.contains(&"gossip".to_string()), "got {:?}", chain);
    }

    #[test]
    fn corpus_wide_chain_crosses_entities() {
        let mut bank = NarrativeBank::new();
        bank.add_document(&doc("she", &["eat", "pay"]));
        bank.add_document(&doc("he", &["pay", "tip"]));
        let chain = bank.chain("eat", None, ChainOptions::default());
        assert_eq!(chain[0], "eat");
        assert!(chain.contains(&"pay".to_string()));
    }

    #[test]
    fn bidirectional_walks_reverse_pairs() {
        let mut bank = NarrativeBank::new();
        bank.add_document(&doc("she", &["wake", "eat"]));
        bank.add_document(&doc("she", &["wake", "pay"]));

        // Forward-only: nothing is recorded with eat as first member.
        let forward = bank.chain("eat", Some("she"), ChainOptions::default());
        assert_eq!(forward, vec!["eat"]);

        let opts = ChainOptions {
            bidirectional: true,
            ..ChainOptions::default()
        };
        let chain = bank.chain("eat", Some("she"), opts);
        assert_eq!(chain, vec!["eat", "wake", "pay"]);
    }

    #[test]
    fn accumulates_over_all_chain_members() {
        // leave pairs with both eat and pay, hop with eat only; after
        // [eat, pay] the summed support must favor leave.
        let mut bank = NarrativeBank::new();
        bank.add_document(&doc("she", &["eat", "pay", "leave"]));
        bank.add_document(&doc("she", &["eat", "hop"]));
        bank.add_document(&doc("she", &["eat", "pay"]));
        let chain = bank.chain("eat", Some("she"), ChainOptions::default());
        assert_eq!(chain[0], "eat");
        assert_eq!(chain[1], "pay");
        assert_eq!(chain[2], "leave");
    }
}
