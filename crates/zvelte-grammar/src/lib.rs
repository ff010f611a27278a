//! The `zvelte` tree-sitter grammar, with a Rust-native loader and a load verifier.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::multiple_crate_versions)]

/// Typed representation of tree-sitter's `grammar.json`.
///
/// This is the shape of the raw data every provider hands out: rules,
/// extras, conflicts and the rest of the declarative grammar description.
pub mod grammar;

/// The opaque [`Language`] handle and its factory.
///
/// [`Language::new`] is the single entry point from raw grammar data to a
/// usable handle. Anything malformed comes back as `None`.
pub mod language;

/// Where raw grammar data comes from.
pub mod provider;

/// Grammar validation and consistency checking.
///
/// Validation protects everything downstream of the factory from grammars
/// that parse as JSON but could never drive a parser.
pub mod validate;

/// The grammar load verification harness.
pub mod verify;

pub use grammar::{parse_grammar, Grammar, GrammarError, Rule, RuleType, RuleValue};
pub use language::{Language, LanguageError};
pub use provider::{
    FileProvider, GrammarProvider, GrammarSource, ProviderError, Zvelte, GRAMMAR_JSON,
    GRAMMAR_NAME, GRAMMAR_PATH_ENV,
};
pub use validate::{validate, ValidationError};
pub use verify::{verify_grammar_loads, verify_with, VerificationError};

/// Loads the bundled `zvelte` grammar.
///
/// Returns `None` only if the bundled grammar is broken, which
/// [`verify_grammar_loads`] exists to catch.
#[must_use]
pub fn language() -> Option<Language> {
    Language::new(GRAMMAR_JSON)
}
