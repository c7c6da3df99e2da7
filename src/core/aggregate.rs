/// Document aggregation — turns one parsed document into an
/// entity → ordered-verb-list mapping.
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use serde::{Deserialize, Serialize};

use crate::core::bank::BankConfig;
use crate::core::filter::{self, Role};
use crate::schema::document::Document;

/// Strategy for attributing verbs to entities within a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AggregationMode {
    /// Follow filter-accepted dependency relations. The canonical
    /// strategy.
    #[default]
    DependencyRelation,
    /// Attribute the verbs surrounding each noun token by surface
    /// adjacency, without consulting the dependency graph.
    TokenAdjacency,
}

/// Entity key → verbs attributed to that entity, in the order they were
/// encountered (sentence order, then relation order within a sentence).
/// Entities appear in first-mention order.
pub type EntityVerbMap = IndexMap<String, Vec<String>, FxBuildHasher>;

/// Extract the entity → ordered-verb mapping for one document.
///
/// Relations missing a POS tag or lemma are dropped by the filter; they
/// never fail the document.
pub fn aggregate(doc: &Document, config: &BankConfig) -> EntityVerbMap {
    match config.mode {
        AggregationMode::DependencyRelation => aggregate_relations(doc, config),
        AggregationMode::TokenAdjacency => aggregate_tokens(doc),
    }
}

fn aggregate_relations(doc: &Document, config: &BankConfig) -> EntityVerbMap {
    let mut map = EntityVerbMap::default();
    for sent in &doc.sentences {
        for rel in &sent.relations {
            if !filter::is_narrative(rel) {
                continue;
            }
            // The filter guarantees both lemmas are present.
            let (entity, verb) = match (rel.dep.entity_key(), rel.gov.key_lemma()) {
                (Some(entity), Some(verb)) => (entity, verb),
                _ => continue,
            };
            let verb = if config.typed {
                match filter::relation_role(&rel.label) {
                    Some(Role::Subject) => format!("{}-subj", verb),
                    _ => format!("{}-obj", verb),
                }
            } else {
                verb
            };
            map.entry(entity).or_default().push(verb);
        }
    }
    map
}

/// Surface-adjacency aggregation: nouns are buffered until the next
/// verb, which is attributed to each buffered noun along with the verb
/// preceding the buffer; a trailing buffer takes the sentence's last
/// verb.
fn aggregate_tokens(doc: &Document) -> EntityVerbMap {
    let mut map = EntityVerbMap::default();
    for sent in &doc.sentences {
        let mut pending: Vec<String> = Vec::new();
        let mut last_verb: Option<String> = None;

        for token in &sent.tokens {
            let pos = match token.pos.as_deref() {
                Some(pos) => pos,
                None => continue,
            };
            if filter::NOUN_TAGS.contains(&pos) {
                if let Some(entity) = token.entity_key() {
                    pending.push(entity);
                }
            }
            if filter::VERB_TAGS.contains(&pos) {
                let next_verb = match token.key_lemma() {
                    Some(verb) => verb,
                    None => continue,
                };
                for entity in pending.drain(..) {
                    let verbs = map.entry(entity).or_default();
                    if let Some(prev) = &last_verb {
                        verbs.push(prev.clone());
                    }
                    verbs.push(next_verb.clone());
                }
                last_verb = Some(next_verb);
            }
        }

        if let Some(prev) = last_verb {
            for entity in pending {
                map.entry(entity).or_default().push(prev.clone());
            }
        }
    }
    map
}
