/// Discounted pointwise mutual information over the event store.
use crate::core::bank::NarrativeBank;

impl NarrativeBank {
    /// Discounted PMI between two verbs, conditioned on an entity when
    /// one is given, corpus-wide otherwise.
    ///
    /// Returns `None` when the two verbs were never observed together —
    /// the "undefined" sentinel, distinct from a defined score of zero
    /// or a defined negative score.
    ///
    /// Corpus-wide, the marginal count of each verb is its total event
    /// count summed across entities (a verb occurring three times for
    /// one protagonist counts three, not one).
    pub fn pmi(&self, verb1: &str, verb2: &str, entity: Option<&str>) -> Option<f64> {
        let (cooccur, num_events, num_pairs, count1, count2) = match entity {
            Some(entity) => (
                self.cooccur(verb1, verb2, entity),
                self.num_events(entity),
                self.num_pairs(entity),
                self.count(verb1, entity),
                self.count(verb2, entity),
            ),
            None => (
                self.pair_occurrences(verb1, verb2),
                self.total_events(),
                self.total_pairs(),
                self.verb_occurrences(verb1),
                self.verb_occurrences(verb2),
            ),
        };

        if cooccur == 0 {
            return None;
        }

        // cooccur > 0 implies both marginal counts and num_pairs are
        // nonzero (a pair cannot exist without its events), so the
        // ratio is finite.
        let num_events = num_events as f64;
        let raw = (cooccur as f64 * num_events * num_events
            / (count1 as f64 * count2 as f64 * num_pairs as f64))
            .ln();
        Some(raw * discount(cooccur, count1, count2))
    }
}

/// Rarity discount: `(c·m) / ((c+1)(m+1))` with `m` the smaller verb
/// count. Approaches 1 for well-attested verbs and shrinks scores that
/// rest on a handful of observations.
fn discount(cooccur: u64, count1: u64, count2: u64) -> f64 {
    let m = count1.min(count2);
    (cooccur * m) as f64 / ((cooccur + 1) * (m + 1)) as f64
}
