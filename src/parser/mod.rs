//! C declaration parsing pipeline
//!
//! This module transforms declaration text into resolved [`types::Type`]
//! trees:
//! - [`preprocess`]: textual cleanup (comments, simple macros, directives)
//! - [`lexer`]: tokenization (text → tokens)
//! - [`parse`] + [`declarations`]: resolution (tokens → type trees)
//! - [`report`]: caret diagnostics for failed inputs
//!
//! # Batch model
//!
//! Each input string is preprocessed, tokenized, and parsed independently;
//! the typedef table and token cursor live and die with one input. A failure
//! anywhere in one input discards that input's declarations, prints a
//! diagnostic to stderr, and leaves the rest of the batch untouched.

pub mod declarations;
pub mod lexer;
pub mod parse;
pub mod preprocess;
pub mod report;
pub mod types;

use rustc_hash::FxHashMap;

use crate::parser::parse::Parser;
use crate::parser::report::ErrorReporter;
use crate::parser::types::Type;

/// Parse a batch of declaration strings into one declaration table.
///
/// Later inputs silently overwrite earlier declarations of the same name.
pub fn parse_decls(decl_strs: &[String]) -> FxHashMap<String, Type> {
    let mut decls = FxHashMap::default();

    for decl_str in decl_strs {
        let content = preprocess::preprocess(decl_str);
        let parsed = Parser::new(&content).and_then(Parser::parse);
        match parsed {
            Ok(batch) => decls.extend(batch),
            Err(err) => {
                let reporter = ErrorReporter::new(&content);
                eprintln!(
                    "{}",
                    reporter.render(err.line, err.offset, &err.message)
                );
            }
        }
    }

    decls
}
