//! Narrative Bank — statistical modelling of narrative events.
//!
//! Accumulates (verb, entity) event counts and per-entity verb
//! co-occurrence counts from dependency-parsed documents, scores verb
//! affinity with discounted pointwise mutual information, and greedily
//! assembles ordered verb chains that read as a script for a protagonist.

pub mod core;
pub mod schema;

pub use crate::core::aggregate::AggregationMode;
pub use crate::core::bank::{BankConfig, BankError, Event, NarrativeBank, Pair};
pub use crate::core::chain::ChainOptions;
pub use crate::core::corpus::{CorpusError, IngestReport};
pub use crate::schema::document::{Document, Relation, Sentence, Token};
