pub mod aggregate;
pub mod bank;
pub mod chain;
pub mod corpus;
pub mod filter;
pub mod pmi;
