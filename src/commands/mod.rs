//! Command implementations for the journal-unify CLI

pub mod unify;
