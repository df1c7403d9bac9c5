//! Operator diagnostics: an append-only JSONL log of workflow events and the
//! summaries built from it.

pub mod logger;
pub mod reporter;
