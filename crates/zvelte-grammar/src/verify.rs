//! Checking that a grammar loads before anything depends on it.
//!
//! [`verify_grammar_loads`] asks a [`GrammarProvider`] for its data, feeds it
//! to [`Language::new`] and reports whether a handle came back. The handle
//! itself is dropped straight away; only the outcome matters.

use crate::language::Language;
use crate::provider::{GrammarProvider, ProviderError};
use thiserror::Error;

/// Why a grammar did not verify.
#[derive(Debug, Error)]
pub enum VerificationError {
    /// The runtime factory returned no handle for the grammar's data.
    #[error("error loading {grammar} grammar")]
    GrammarLoadFailed {
        /// Name of the grammar that failed to load.
        grammar: String,
    },

    /// The provider could not supply any data to load.
    #[error("{grammar} grammar is unavailable: {source}")]
    ProviderUnavailable {
        /// Name of the grammar whose provider failed.
        grammar: String,
        /// What went wrong in the provider.
        source: ProviderError,
    },
}

impl VerificationError {
    /// Name of the grammar this error is about.
    #[must_use]
    pub fn grammar(&self) -> &str {
        match self {
            VerificationError::GrammarLoadFailed { grammar }
            | VerificationError::ProviderUnavailable { grammar, .. } => grammar,
        }
    }
}

/// Verifies that `provider`'s grammar loads into a [`Language`].
///
/// # Errors
///
/// Returns [`VerificationError::ProviderUnavailable`] if the provider fails
/// and [`VerificationError::GrammarLoadFailed`] if no handle is produced.
pub fn verify_grammar_loads<P>(provider: &P) -> Result<(), VerificationError>
where
    P: GrammarProvider + ?Sized,
{
    verify_with(provider, Language::new)
}

/// Like [`verify_grammar_loads`], with the runtime factory supplied by the caller.
///
/// # Errors
///
/// Returns [`VerificationError::ProviderUnavailable`] if the provider fails
/// and [`VerificationError::GrammarLoadFailed`] if `factory` returns `None`
/// or the provider's data is not text.
pub fn verify_with<P, F>(provider: &P, factory: F) -> Result<(), VerificationError>
where
    P: GrammarProvider + ?Sized,
    F: FnOnce(&str) -> Option<Language>,
{
    let grammar = provider.name();
    let data = match provider.grammar_data() {
        Ok(data) => data,
        Err(source) if source.is_corrupt_data() => {
            tracing::debug!(grammar, error = %source, "grammar data rejected");
            return Err(VerificationError::GrammarLoadFailed {
                grammar: grammar.to_owned(),
            });
        }
        Err(source) => {
            return Err(VerificationError::ProviderUnavailable {
                grammar: grammar.to_owned(),
                source,
            });
        }
    };

    match factory(&*data) {
        Some(language) => {
            tracing::debug!(
                grammar,
                start_rule = language.start_rule(),
                "grammar verified"
            );
            Ok(())
        }
        None => Err(VerificationError::GrammarLoadFailed {
            grammar: grammar.to_owned(),
        }),
    }
}
