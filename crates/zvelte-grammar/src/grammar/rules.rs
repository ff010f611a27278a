//! Rule nodes of a tree-sitter grammar.
//!
//! A rule is one node of the grammar's rule graph as serialized in
//! `grammar.json`. Which of the optional fields are populated depends on the
//! rule's [`RuleType`]; [`Rule::shape_error`] reports rules whose fields do
//! not match their type.

use serde::Deserialize;

/// A single rule in tree-sitter's JSON grammar format.
///
/// Atomic rules (`STRING`, `PATTERN`, `SYMBOL`, `BLANK`) carry a value or a
/// name; composite rules carry `members` (`SEQ`, `CHOICE`) or a single
/// `content` (repetitions, precedence wrappers, fields, aliases, tokens).
#[derive(Debug, Clone, Deserialize)]
pub struct Rule {
    /// The discriminant identifying what kind of rule this is.
    #[serde(rename = "type")]
    pub rule_type: RuleType,

    /// Literal text, pattern source, alias name or precedence level.
    #[serde(default)]
    pub value: Option<RuleValue>,

    /// Symbol or field name for `SYMBOL` and `FIELD` rules.
    #[serde(default)]
    pub name: Option<String>,

    /// Wrapped rule for unary constructs.
    #[serde(default)]
    pub content: Option<Box<Rule>>,

    /// Child rules for `SEQ` and `CHOICE`.
    #[serde(default)]
    pub members: Vec<Rule>,

    /// Whether an `ALIAS` produces a named node.
    #[serde(default)]
    pub named: Option<bool>,

    /// Regex flags attached to a `PATTERN`.
    #[serde(default)]
    pub flags: Option<String>,

    /// Reserved word set used by a `RESERVED` rule.
    #[serde(default)]
    pub context_name: Option<String>,
}

/// Scalar payload of a rule: literal text or a precedence level.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    /// A string value (literal token, pattern source, alias name).
    String(String),

    /// An integer value (precedence level).
    Integer(i32),
}

/// Every `type` tag tree-sitter writes into `grammar.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum RuleType {
    /// An empty (ε) production.
    #[serde(rename = "BLANK")]
    Blank,
    /// A literal string token.
    #[serde(rename = "STRING")]
    String,
    /// A regular-expression token.
    #[serde(rename = "PATTERN")]
    Pattern,
    /// A reference to another rule.
    #[serde(rename = "SYMBOL")]
    Symbol,
    /// One of several alternatives.
    #[serde(rename = "CHOICE")]
    Choice,
    /// A sequence of members.
    #[serde(rename = "SEQ")]
    Seq,
    /// Zero or more repetitions.
    #[serde(rename = "REPEAT")]
    Repeat,
    /// One or more repetitions.
    #[serde(rename = "REPEAT1")]
    Repeat1,
    /// Precedence without associativity.
    #[serde(rename = "PREC")]
    Prec,
    /// Left-associative precedence.
    #[serde(rename = "PREC_LEFT")]
    PrecLeft,
    /// Right-associative precedence.
    #[serde(rename = "PREC_RIGHT")]
    PrecRight,
    /// Runtime precedence used for GLR conflict resolution.
    #[serde(rename = "PREC_DYNAMIC")]
    PrecDynamic,
    /// A named field on the wrapped rule.
    #[serde(rename = "FIELD")]
    Field,
    /// A renamed node.
    #[serde(rename = "ALIAS")]
    Alias,
    /// Collapses the wrapped rule into a single token.
    #[serde(rename = "TOKEN")]
    Token,
    /// A token that may not be preceded by extras.
    #[serde(rename = "IMMEDIATE_TOKEN")]
    ImmediateToken,
    /// A rule evaluated against a reserved word set.
    #[serde(rename = "RESERVED")]
    Reserved,
}

impl RuleType {
    /// The tag as written in `grammar.json`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RuleType::Blank => "BLANK",
            RuleType::String => "STRING",
            RuleType::Pattern => "PATTERN",
            RuleType::Symbol => "SYMBOL",
            RuleType::Choice => "CHOICE",
            RuleType::Seq => "SEQ",
            RuleType::Repeat => "REPEAT",
            RuleType::Repeat1 => "REPEAT1",
            RuleType::Prec => "PREC",
            RuleType::PrecLeft => "PREC_LEFT",
            RuleType::PrecRight => "PREC_RIGHT",
            RuleType::PrecDynamic => "PREC_DYNAMIC",
            RuleType::Field => "FIELD",
            RuleType::Alias => "ALIAS",
            RuleType::Token => "TOKEN",
            RuleType::ImmediateToken => "IMMEDIATE_TOKEN",
            RuleType::Reserved => "RESERVED",
        }
    }

    /// Returns `true` for types that wrap exactly one `content` rule.
    #[must_use]
    pub fn is_wrapper(self) -> bool {
        matches!(
            self,
            RuleType::Repeat
                | RuleType::Repeat1
                | RuleType::Prec
                | RuleType::PrecLeft
                | RuleType::PrecRight
                | RuleType::PrecDynamic
                | RuleType::Field
                | RuleType::Alias
                | RuleType::Token
                | RuleType::ImmediateToken
                | RuleType::Reserved
        )
    }

    /// Returns `true` for precedence wrappers.
    #[must_use]
    pub fn is_precedence(self) -> bool {
        matches!(
            self,
            RuleType::Prec | RuleType::PrecLeft | RuleType::PrecRight | RuleType::PrecDynamic
        )
    }
}

impl Rule {
    /// Returns the canonical string name of this rule type.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.rule_type.as_str()
    }

    /// Returns `true` if this rule is a lexical token.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self.rule_type, RuleType::String | RuleType::Pattern)
    }

    /// Returns the referenced symbol name for `SYMBOL` rules.
    #[must_use]
    pub fn symbol_name(&self) -> Option<&str> {
        match self.rule_type {
            RuleType::Symbol => self.name.as_deref(),
            _ => None,
        }
    }

    /// Returns the field name for `FIELD` rules.
    #[must_use]
    pub fn field_name(&self) -> Option<&str> {
        match self.rule_type {
            RuleType::Field => self.name.as_deref(),
            _ => None,
        }
    }

    /// Returns the numeric level of a precedence wrapper.
    ///
    /// Named precedences (string values) yield `None`.
    #[must_use]
    pub fn precedence(&self) -> Option<i32> {
        if !self.rule_type.is_precedence() {
            return None;
        }
        match self.value {
            Some(RuleValue::Integer(level)) => Some(level),
            _ => None,
        }
    }

    /// Returns the literal text of a `STRING` rule.
    #[must_use]
    pub fn string_value(&self) -> Option<&str> {
        match self.rule_type {
            RuleType::String => self.text_value(),
            _ => None,
        }
    }

    /// Returns the source of a `PATTERN` rule.
    #[must_use]
    pub fn pattern_value(&self) -> Option<&str> {
        match self.rule_type {
            RuleType::Pattern => self.text_value(),
            _ => None,
        }
    }

    /// Returns the replacement node name of an `ALIAS` rule.
    #[must_use]
    pub fn alias_value(&self) -> Option<&str> {
        match self.rule_type {
            RuleType::Alias => self.text_value(),
            _ => None,
        }
    }

    fn text_value(&self) -> Option<&str> {
        match &self.value {
            Some(RuleValue::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Iterates over the direct children of this rule.
    pub fn children(&self) -> impl Iterator<Item = &Rule> {
        self.members.iter().chain(self.content.as_deref())
    }

    /// Collects every symbol referenced anywhere beneath this rule.
    pub fn referenced_symbols<'a>(&'a self, out: &mut Vec<&'a str>) {
        if let Some(name) = self.symbol_name() {
            out.push(name);
        }
        for child in self.children() {
            child.referenced_symbols(out);
        }
    }

    /// Describes why this rule's fields do not fit its type, if they don't.
    ///
    /// Only this node is checked; children are left to the caller.
    #[must_use]
    pub fn shape_error(&self) -> Option<String> {
        let kind = self.type_name();
        match self.rule_type {
            RuleType::Blank => None,
            RuleType::String => match self.string_value() {
                None => Some(format!("{kind} rule has no string value")),
                Some("") => Some(format!("{kind} rule is an empty string")),
                Some(_) => None,
            },
            RuleType::Pattern => self
                .pattern_value()
                .is_none()
                .then(|| format!("{kind} rule has no pattern source")),
            RuleType::Symbol => match self.name.as_deref() {
                None | Some("") => Some(format!("{kind} rule has no name")),
                Some(_) => None,
            },
            RuleType::Choice | RuleType::Seq => self
                .members
                .is_empty()
                .then(|| format!("{kind} rule has no members")),
            wrapper => {
                if self.content.is_none() {
                    return Some(format!("{kind} rule has no content"));
                }
                match wrapper {
                    RuleType::Field if self.field_name().is_none_or(str::is_empty) => {
                        Some(format!("{kind} rule has no field name"))
                    }
                    RuleType::Alias if self.alias_value().is_none_or(str::is_empty) => {
                        Some(format!("{kind} rule has no alias value"))
                    }
                    _ => None,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string(text: &str) -> Rule {
        Rule {
            rule_type: RuleType::String,
            value: Some(RuleValue::String(text.to_string())),
            name: None,
            content: None,
            members: Vec::new(),
            named: None,
            flags: None,
            context_name: None,
        }
    }

    fn symbol(name: &str) -> Rule {
        Rule {
            rule_type: RuleType::Symbol,
            value: None,
            name: Some(name.to_string()),
            ..string("")
        }
    }

    fn wrap(rule_type: RuleType, content: Rule) -> Rule {
        Rule {
            rule_type,
            value: None,
            content: Some(Box::new(content)),
            ..string("")
        }
    }

    #[test]
    fn test_accessors_respect_rule_type() {
        let literal = string("if");
        assert_eq!(literal.string_value(), Some("if"));
        assert_eq!(literal.pattern_value(), None);
        assert!(literal.is_terminal());

        let sym = symbol("expr");
        assert_eq!(sym.symbol_name(), Some("expr"));
        assert_eq!(sym.field_name(), None);
        assert!(!sym.is_terminal());
    }

    #[test]
    fn test_precedence_only_for_integer_levels() {
        let mut prec = wrap(RuleType::PrecLeft, symbol("expr"));
        prec.value = Some(RuleValue::Integer(4));
        assert_eq!(prec.precedence(), Some(4));

        prec.value = Some(RuleValue::String("additive".to_string()));
        assert_eq!(prec.precedence(), None);

        let mut repeat = wrap(RuleType::Repeat, symbol("expr"));
        repeat.value = Some(RuleValue::Integer(1));
        assert_eq!(repeat.precedence(), None);
    }

    #[test]
    fn test_referenced_symbols_descends_into_members_and_content() {
        let rule = Rule {
            rule_type: RuleType::Seq,
            members: vec![
                symbol("a"),
                wrap(RuleType::Repeat, symbol("b")),
                string(","),
            ],
            ..string("")
        };
        let mut found = Vec::new();
        rule.referenced_symbols(&mut found);
        assert_eq!(found, ["a", "b"]);
    }

    #[test]
    fn test_shape_errors() {
        assert!(string("x").shape_error().is_none());
        assert!(string("").shape_error().unwrap().contains("empty string"));

        let empty_seq = Rule {
            rule_type: RuleType::Seq,
            ..string("")
        };
        assert!(empty_seq.shape_error().unwrap().contains("no members"));

        let bare_repeat = Rule {
            rule_type: RuleType::Repeat,
            value: None,
            ..string("")
        };
        assert!(bare_repeat.shape_error().unwrap().contains("no content"));

        let unnamed_field = wrap(RuleType::Field, symbol("x"));
        assert!(unnamed_field.shape_error().unwrap().contains("field name"));

        let mut alias = wrap(RuleType::Alias, string("script"));
        alias.value = Some(RuleValue::String("regular_element_name".to_string()));
        assert!(alias.shape_error().is_none());
        assert_eq!(alias.alias_value(), Some("regular_element_name"));
    }
}
