//! Sources of raw grammar data.
//!
//! A [`GrammarProvider`] hands out the `grammar.json` text for one named
//! grammar. The verifier and the CLI take a provider as an argument instead
//! of reaching for the bundled grammar directly, so tests can substitute
//! stubs and users can point at a freshly generated file.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The compiled `zvelte` grammar, as emitted by `tree-sitter generate`.
pub const GRAMMAR_JSON: &str = include_str!("../grammar/grammar.json");

/// Name of the bundled grammar.
pub const GRAMMAR_NAME: &str = "zvelte";

/// Environment variable that overrides the bundled grammar with a file.
pub const GRAMMAR_PATH_ENV: &str = "ZVELTE_GRAMMAR_PATH";

/// Errors that can occur when fetching grammar data.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The grammar file does not exist.
    #[error("grammar not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The grammar file exists but could not be read.
    #[error("failed to read grammar {}: {source}", path.display())]
    Io {
        /// The file being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The grammar was read but its bytes are not UTF-8 text.
    #[error("grammar {} is not valid UTF-8: {source}", path.display())]
    InvalidUtf8 {
        /// The file that was read.
        path: PathBuf,
        /// Where decoding stopped.
        source: std::string::FromUtf8Error,
    },
}

impl ProviderError {
    /// Returns `true` when data was obtained but cannot be grammar text.
    ///
    /// Such a payload is a load failure, not an unavailable provider.
    #[must_use]
    pub fn is_corrupt_data(&self) -> bool {
        matches!(self, ProviderError::InvalidUtf8 { .. })
    }
}

/// Supplies raw grammar data for one named grammar.
pub trait GrammarProvider {
    /// The grammar's name, used in diagnostics.
    fn name(&self) -> &str;

    /// Returns the raw `grammar.json` text.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] when the data cannot be obtained.
    fn grammar_data(&self) -> Result<Cow<'_, str>, ProviderError>;
}

/// The `zvelte` grammar compiled into this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Zvelte;

impl GrammarProvider for Zvelte {
    fn name(&self) -> &str {
        GRAMMAR_NAME
    }

    fn grammar_data(&self) -> Result<Cow<'_, str>, ProviderError> {
        Ok(Cow::Borrowed(GRAMMAR_JSON))
    }
}

/// A grammar read from a `grammar.json` file on every request.
#[derive(Debug, Clone)]
pub struct FileProvider {
    name: String,
    path: PathBuf,
}

impl FileProvider {
    /// Creates a provider for the grammar `name` stored at `path`.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// The file this provider reads.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GrammarProvider for FileProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn grammar_data(&self) -> Result<Cow<'_, str>, ProviderError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(ProviderError::NotFound(self.path.clone()));
            }
            Err(source) => {
                return Err(ProviderError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        String::from_utf8(bytes)
            .map(Cow::Owned)
            .map_err(|source| ProviderError::InvalidUtf8 {
                path: self.path.clone(),
                source,
            })
    }
}

/// Where the `zvelte` grammar should be loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarSource {
    /// The grammar compiled into this crate.
    Bundled,
    /// A `grammar.json` on disk.
    File(PathBuf),
}

impl GrammarSource {
    /// Reads [`GRAMMAR_PATH_ENV`]; unset or empty means [`GrammarSource::Bundled`].
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_override(std::env::var_os(GRAMMAR_PATH_ENV).map(PathBuf::from))
    }

    /// Picks a file when `path` is set and non-empty, the bundled grammar otherwise.
    #[must_use]
    pub fn from_override(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) if !path.as_os_str().is_empty() => GrammarSource::File(path),
            _ => GrammarSource::Bundled,
        }
    }

    /// Turns the source into a provider for the `zvelte` grammar.
    #[must_use]
    pub fn provider(&self) -> Box<dyn GrammarProvider> {
        match self {
            GrammarSource::Bundled => Box::new(Zvelte),
            GrammarSource::File(path) => Box::new(FileProvider::new(GRAMMAR_NAME, path)),
        }
    }
}
