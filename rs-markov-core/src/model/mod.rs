//! Top-level module for the word n-gram generation system.
//!
//! This module provides a two-level word model and its generator, including:
//! - Tokenization of plain text (`tokenizer`)
//! - Interning and classification of keys (`KeyRegistry`)
//! - Unigram and bigram frequency tables (`NGramModel`)
//! - Weighted successor sampling (`State`)
//! - Generation configuration (`GenerationInput`)
//! - A high-level generation interface (`Generator`)

/// High-level interface for generating sentences from a trained model.
///
/// Exposes training from files or text and line-based generation
/// with an explicit random source.
pub mod generator;

/// Generation parameters: line count and dead-end limits.
pub mod generation_input;

/// Unigram and bigram frequency tables built in two passes.
///
/// Handles text ingestion, transition counting and read-only lookups.
pub mod ngram_model;

/// Source of bounded uniform draws.
pub mod random;

/// Canonical key storage and sentence/quote classification.
pub mod registry;

/// Successor counts of one context and weighted random sampling.
pub mod state;

/// Splits plain text into word tokens with attached punctuation.
pub mod tokenizer;
