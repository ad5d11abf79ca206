//! # Introduction
//!
//! cdecl parses textual C variable and function declarations (e.g.
//! `int (*(*pf)(double d))[3];`) into a structured type representation,
//! resolving `typedef` aliases introduced earlier in the same input.
//!
//! ## Resolution pipeline
//!
//! ```text
//! Text → Preprocessor → Lexer → Parser → Type tree → Renderer
//! ```
//!
//! 1. [`parser::preprocess`] — strips comments and directives, substitutes
//!    simple numeric macros, removes `typedef enum` blocks.
//! 2. [`parser::lexer`] — tokenises the cleaned text.
//! 3. [`parser`] — resolves type specifiers and declarators into owned
//!    [`parser::types::Type`] trees; the hard part is unwinding arbitrarily
//!    nested pointers, arrays, parenthesised groupings, and parameter lists
//!    into a single correctly-ordered tree.
//! 4. [`render`] — displays a resolved tree in spoken-declaration order.
//!
//! ## Supported C fragment
//!
//! Declarations only: primitive and fixed-width base types, pointers,
//! arrays (including parameter-name lengths, `int foo(size_t n, int a[n])`),
//! function declarators, and `typedef`. No expressions, statements, or
//! struct/union/enum member layout.

pub mod parser;
pub mod render;
