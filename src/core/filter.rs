/// Relation filter — decides whether a single dependency relation
/// qualifies as a narrative event link.
use crate::schema::document::Relation;

/// Dependency labels (Stanford typed-dependencies manual) that link a
/// predicate to a narrative argument.
pub const NARRATIVE_RELATIONS: &[&str] =
    &["nsubj", "xsubj", "dobj", "iobj", "agent", "nsubjpass"];

/// Penn Treebank verb tags.
pub const VERB_TAGS: &[&str] = &["VB", "VBD", "VBG", "VBN", "VBP", "VBZ"];

/// Penn Treebank noun tags.
pub const NOUN_TAGS: &[&str] = &["NN", "NNS", "NNP", "NNPS"];

/// Grammatical role an entity plays in a narrative relation, used for
/// typed event keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Subject,
    Object,
}

/// Role of a narrative relation label. nsubj/xsubj/agent attach the
/// entity as the acting argument; dobj/iobj/nsubjpass as the acted-on
/// one. `None` for labels outside the narrative set.
pub fn relation_role(label: &str) -> Option<Role> {
    match label {
        "nsubj" | "xsubj" | "agent" => Some(Role::Subject),
        "dobj" | "iobj" | "nsubjpass" => Some(Role::Object),
        _ => None,
    }
}

/// Whether a relation qualifies as a narrative event link:
/// (a) narrative relation label, (b) verb governor, (c) noun dependent.
/// Tokens missing a POS tag or a lemma never qualify.
pub fn is_narrative(rel: &Relation) -> bool {
    if !NARRATIVE_RELATIONS.contains(&rel.label.as_str()) {
        return false;
    }
    let (gov_pos, dep_pos) = match (rel.gov.pos.as_deref(), rel.dep.pos.as_deref()) {
        (Some(g), Some(d)) => (g, d),
        _ => return false,
    };
    VERB_TAGS.contains(&gov_pos)
        && NOUN_TAGS.contains(&dep_pos)
        && rel.gov.lemma.is_some()
        && rel.dep.lemma.is_some()
}
