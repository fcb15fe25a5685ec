//! # Block Parsing
//!
//! Two-phase parsing of `-- #name` annotated SQL sources.
//!
//! 1. **Line Classification** (`classify`): each line is classified on its
//!    own into a [`LineClass`] (header, content, or ignorable).
//! 2. **Block Construction** (`builder`): a [`BlockBuilder`] accumulates
//!    content under the most recent header and emits a [`NamedBlock`] at
//!    each header boundary and at end of input.
//!
//! ## Key invariants
//!
//! - Header detection and name extraction share one pattern, so a header
//!   line always yields a name.
//! - Blocks without a name or without content are dropped silently.
//! - Content before the first header is discarded, never an error.

pub mod builder;
pub mod classify;

use std::io::{BufRead, BufReader, Read};

pub use builder::{BlockBuilder, NamedBlock};
pub use classify::{LineClass, SqlLineClassifier};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("SQL source could not be read")]
    SourceUnreadable(#[from] std::io::Error),
}

/// Runs the classifier and block builder over an in-memory source.
pub fn parse_blocks(text: &str) -> Vec<NamedBlock> {
    let classifier = SqlLineClassifier;
    let mut builder = BlockBuilder::new();

    for line in text.lines() {
        let class = classifier.classify(line);
        builder.push(&class, line);
    }

    builder.finish()
}

/// Runs the classifier and block builder over a line-oriented byte stream.
///
/// Any read failure aborts the whole parse; no partial result is returned.
pub fn parse_blocks_from_reader<R: Read>(source: R) -> Result<Vec<NamedBlock>, ParseError> {
    let classifier = SqlLineClassifier;
    let mut builder = BlockBuilder::new();

    for line in BufReader::new(source).lines() {
        let line = line?;
        let class = classifier.classify(&line);
        builder.push(&class, &line);
    }

    Ok(builder.finish())
}
