//! Typed model of tree-sitter's `grammar.json`.
//!
//! `tree-sitter generate` compiles a `grammar.js` into this declarative JSON
//! form. [`parse_grammar`] deserializes it with [`serde_json`]; nothing here
//! checks that the result makes sense, see [`crate::validate`] for that.

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

mod rules;

pub use rules::{Rule, RuleType, RuleValue};

/// A complete tree-sitter grammar definition.
///
/// Mirrors the serialized schema at
/// <https://tree-sitter.github.io/tree-sitter/assets/schemas/grammar.schema.json>.
#[derive(Debug, Clone, Deserialize)]
pub struct Grammar {
    /// `$schema` pointer written by the generator.
    #[serde(rename = "$schema", default)]
    pub schema: Option<String>,

    /// The grammar's language name (e.g. `"zvelte"`).
    pub name: String,

    /// Name of a base grammar this one extends.
    #[serde(default)]
    pub inherits: Option<String>,

    /// Every rule, keyed by its name, in definition order.
    ///
    /// The first entry is the start rule.
    pub rules: IndexMap<String, Rule>,

    /// Tokens that may appear anywhere, such as whitespace.
    #[serde(default)]
    pub extras: Option<Vec<Rule>>,

    /// Tokens produced by an external scanner.
    #[serde(default)]
    pub externals: Option<Vec<Rule>>,

    /// Rules to inline at every use site.
    #[serde(default)]
    pub inline: Option<Vec<String>>,

    /// Ordered precedence groups. Entries are `STRING` (named level) or
    /// `SYMBOL` rules.
    #[serde(default)]
    pub precedences: Option<Vec<Vec<Rule>>>,

    /// Rule groups whose LR conflicts are resolved at runtime.
    #[serde(default)]
    pub conflicts: Option<Vec<Vec<String>>>,

    /// Reserved word sets, keyed by context name. The first set is the default.
    #[serde(default)]
    pub reserved: Option<IndexMap<String, Vec<Rule>>>,

    /// The keyword-extraction token.
    #[serde(default)]
    pub word: Option<String>,

    /// Hidden rules exposed as abstract node types.
    #[serde(default)]
    pub supertypes: Option<Vec<String>>,
}

/// Failure to turn raw bytes into a [`Grammar`].
#[derive(Debug, Error)]
pub enum GrammarError {
    /// The input was not valid JSON or did not match the grammar schema.
    #[error("JSON parse error: {0}")]
    JsonParse(String),
}

impl From<serde_json::Error> for GrammarError {
    fn from(err: serde_json::Error) -> Self {
        GrammarError::JsonParse(err.to_string())
    }
}

/// Parse a `grammar.json` document into a [`Grammar`].
///
/// # Errors
///
/// Returns [`GrammarError::JsonParse`] if the input is empty, is not JSON, or
/// does not match the schema.
pub fn parse_grammar(json: &str) -> Result<Grammar, GrammarError> {
    if json.trim().is_empty() {
        return Err(GrammarError::JsonParse("empty grammar document".to_string()));
    }
    Ok(serde_json::from_str(json)?)
}

impl Grammar {
    /// Looks up a rule by name.
    #[must_use]
    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    /// The first rule in definition order, which tree-sitter uses as the root.
    #[must_use]
    pub fn start_rule(&self) -> Option<&str> {
        self.rules.keys().next().map(String::as_str)
    }

    /// Rule names, sorted.
    #[must_use]
    pub fn rule_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Hidden rules start with an underscore and never appear as tree nodes.
    #[must_use]
    pub fn is_hidden(name: &str) -> bool {
        name.starts_with('_')
    }

    /// The extras, or an empty slice when the grammar declares none.
    #[must_use]
    pub fn extras(&self) -> &[Rule] {
        self.extras.as_deref().unwrap_or_default()
    }

    /// The externals, or an empty slice when the grammar declares none.
    #[must_use]
    pub fn externals(&self) -> &[Rule] {
        self.externals.as_deref().unwrap_or_default()
    }

    /// The precedence groups, or an empty slice when none are declared.
    #[must_use]
    pub fn precedences(&self) -> &[Vec<Rule>] {
        self.precedences.as_deref().unwrap_or_default()
    }

    /// The conflict groups, or an empty slice when none are declared.
    #[must_use]
    pub fn conflicts(&self) -> &[Vec<String>] {
        self.conflicts.as_deref().unwrap_or_default()
    }
}
