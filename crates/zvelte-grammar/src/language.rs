//! The loaded-language handle and the factory that builds it.

use crate::grammar::{parse_grammar, Grammar, GrammarError, Rule};
use crate::validate::{validate, ValidationError};
use std::sync::Arc;
use thiserror::Error;

/// Why raw grammar data could not become a [`Language`].
#[derive(Debug, Error)]
pub enum LanguageError {
    /// The data is not a `grammar.json` document.
    #[error(transparent)]
    Parse(#[from] GrammarError),

    /// The document parsed but describes an unusable grammar.
    #[error("invalid grammar: {0}")]
    Invalid(#[from] ValidationError),
}

/// An opaque handle to a loaded, validated grammar.
///
/// A `Language` only exists for grammars that passed validation; there is no
/// partially loaded state. Clones share the same underlying grammar.
#[derive(Debug, Clone)]
pub struct Language {
    inner: Arc<LanguageInner>,
}

#[derive(Debug)]
struct LanguageInner {
    grammar: Grammar,
    start_rule: String,
}

impl Language {
    /// Builds a language from raw `grammar.json` data.
    ///
    /// Returns `None` for anything that is not a well-formed grammar; the
    /// reason is logged at debug level. Use [`Language::try_new`] to get it
    /// as a value.
    #[must_use]
    pub fn new(raw: &str) -> Option<Self> {
        match Self::try_new(raw) {
            Ok(language) => Some(language),
            Err(err) => {
                tracing::debug!(error = %err, "grammar rejected");
                None
            }
        }
    }

    /// Builds a language from raw `grammar.json` data.
    ///
    /// # Errors
    ///
    /// Returns [`LanguageError::Parse`] if the data cannot be deserialized and
    /// [`LanguageError::Invalid`] if the grammar fails validation.
    pub fn try_new(raw: &str) -> Result<Self, LanguageError> {
        let grammar = parse_grammar(raw)?;
        let start_rule = validate(&grammar)?.to_owned();
        tracing::debug!(
            grammar = %grammar.name,
            start_rule = %start_rule,
            rules = grammar.rules.len(),
            "grammar loaded"
        );
        Ok(Self {
            inner: Arc::new(LanguageInner {
                grammar,
                start_rule,
            }),
        })
    }

    /// The grammar's language name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.grammar.name
    }

    /// The root rule every document is parsed from.
    #[must_use]
    pub fn start_rule(&self) -> &str {
        &self.inner.start_rule
    }

    /// Number of rules, hidden ones included.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.inner.grammar.rules.len()
    }

    /// All rule names, sorted.
    #[must_use]
    pub fn rule_names(&self) -> Vec<&str> {
        self.inner.grammar.rule_names()
    }

    /// Rule names that produce visible nodes, sorted.
    #[must_use]
    pub fn node_kinds(&self) -> Vec<&str> {
        self.rule_names()
            .into_iter()
            .filter(|name| !Grammar::is_hidden(name))
            .collect()
    }

    /// Looks up a rule by name.
    #[must_use]
    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.inner.grammar.rule(name)
    }

    /// Returns `true` if the grammar defines `name`.
    #[must_use]
    pub fn has_rule(&self, name: &str) -> bool {
        self.rule(name).is_some()
    }

    /// Rule groups whose conflicts the grammar expects.
    #[must_use]
    pub fn conflicts(&self) -> &[Vec<String>] {
        self.inner.grammar.conflicts()
    }

    /// Tokens allowed between any two tokens.
    #[must_use]
    pub fn extras(&self) -> &[Rule] {
        self.inner.grammar.extras()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CALC: &str = r#"{
        "name": "calc",
        "rules": {
            "program": {"type": "REPEAT", "content": {"type": "SYMBOL", "name": "_expr"}},
            "_expr": {"type": "CHOICE", "members": [
                {"type": "SYMBOL", "name": "number"},
                {"type": "SYMBOL", "name": "sum"}
            ]},
            "sum": {"type": "PREC_LEFT", "value": 1, "content": {"type": "SEQ", "members": [
                {"type": "SYMBOL", "name": "_expr"},
                {"type": "STRING", "value": "+"},
                {"type": "SYMBOL", "name": "_expr"}
            ]}},
            "number": {"type": "PATTERN", "value": "[0-9]+"}
        },
        "extras": [{"type": "PATTERN", "value": "\\s"}]
    }"#;

    #[test]
    fn test_loads_valid_grammar() {
        let language = Language::new(CALC).expect("calc grammar should load");
        assert_eq!(language.name(), "calc");
        assert_eq!(language.start_rule(), "program");
        assert_eq!(language.rule_count(), 4);
        assert_eq!(language.node_kinds(), ["number", "program", "sum"]);
        assert!(language.has_rule("_expr"));
        assert!(!language.has_rule("product"));
        assert_eq!(language.extras().len(), 1);
        assert!(language.conflicts().is_empty());
    }

    #[test]
    fn test_empty_payload_yields_no_handle() {
        assert!(Language::new("").is_none());
        assert!(matches!(Language::try_new(""), Err(LanguageError::Parse(_))));
    }

    #[test]
    fn test_invalid_grammar_yields_no_handle() {
        let dangling = r#"{"name": "x", "rules": {"a": {"type": "SYMBOL", "name": "b"}}}"#;
        assert!(Language::new(dangling).is_none());
        let err = Language::try_new(dangling).unwrap_err();
        assert!(matches!(err, LanguageError::Invalid(_)));
        assert_eq!(
            err.to_string(),
            "invalid grammar: undefined symbol 'b' referenced in rule 'a'"
        );
    }

    #[test]
    fn test_clones_share_the_grammar() {
        let language = Language::new(CALC).unwrap();
        let clone = language.clone();
        assert!(Arc::ptr_eq(&language.inner, &clone.inner));
    }

    #[test]
    fn test_handle_is_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Language>();
    }
}
