//! Word n-gram text generation library.
//!
//! This crate builds a word-adjacency model from plain prose and uses it to
//! generate new text, including:
//! - ASCII tokenization with attached punctuation
//! - Single-copy interning of words and word pairs
//! - Unigram and bigram frequency tables
//! - Weighted random generation with sentence boundaries
//!
//! File loading is kept internal; everything else is reachable through
//! the `model` module.

/// Core n-gram models and generation logic.
pub mod model;

/// Error type shared by training and generation.
pub mod error;

/// I/O utilities (file loading).
///
/// Not exposed
pub(crate) mod io;

pub use error::{MarkovError, Result};
