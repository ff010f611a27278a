//! Structural validation of parsed grammars.
//!
//! A [`Grammar`] that deserialized cleanly may still be unusable: rules can
//! be missing the fields their type requires, symbols can point nowhere, and
//! the first rule can be hidden. [`validate`] rejects such grammars. Unreachable rules are logged as warnings; left recursion and
//! mixed precedence levels are logged at debug level.

use crate::grammar::{Grammar, Rule, RuleType};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use thiserror::Error;

/// A validation failure; the grammar cannot be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// The descriptive human-readable error message.
    pub message: String,
}

impl ValidationError {
    fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

/// Validates `grammar` and returns the name of its start rule, the first rule
/// in definition order.
///
/// # Errors
///
/// Returns a [`ValidationError`] when the grammar has no name or no rules,
/// when a rule's fields do not match its type, when a symbol is undefined,
/// or when the start rule is hidden.
pub fn validate(grammar: &Grammar) -> Result<&str, ValidationError> {
    check_header(grammar)?;
    check_shapes(grammar)?;
    check_undefined_symbols(grammar)?;
    let start = find_start_rule(grammar)?;

    warn_unreachable_rules(grammar, start);
    check_left_recursion(grammar);
    check_precedence(grammar);

    Ok(start)
}

fn check_header(grammar: &Grammar) -> Result<(), ValidationError> {
    if grammar.name.trim().is_empty() {
        return Err(ValidationError::new("grammar has no name"));
    }
    if grammar.rules.is_empty() {
        return Err(ValidationError::new(format!(
            "grammar '{}' has no rules",
            grammar.name
        )));
    }
    Ok(())
}

fn sorted_rules(grammar: &Grammar) -> BTreeMap<&str, &Rule> {
    grammar
        .rules
        .iter()
        .map(|(name, rule)| (name.as_str(), rule))
        .collect()
}

fn check_shapes(grammar: &Grammar) -> Result<(), ValidationError> {
    for (name, rule) in sorted_rules(grammar) {
        check_rule_shape(rule, name)?;
    }
    for rule in grammar.extras() {
        check_rule_shape(rule, "extras")?;
    }
    Ok(())
}

fn check_rule_shape(rule: &Rule, context: &str) -> Result<(), ValidationError> {
    if let Some(problem) = rule.shape_error() {
        return Err(ValidationError::new(format!(
            "malformed rule '{context}': {problem}"
        )));
    }
    for child in rule.children() {
        check_rule_shape(child, context)?;
    }
    Ok(())
}

/// Names a symbol may legally refer to: rules plus externally scanned tokens.
fn defined_names(grammar: &Grammar) -> HashSet<&str> {
    let mut defined: HashSet<&str> = grammar.rules.keys().map(String::as_str).collect();
    for external in grammar.externals() {
        if let Some(name) = external.symbol_name() {
            defined.insert(name);
        }
    }
    defined
}

fn ensure_defined(
    defined: &HashSet<&str>,
    name: &str,
    context: &str,
) -> Result<(), ValidationError> {
    if defined.contains(name) {
        Ok(())
    } else {
        Err(ValidationError::new(format!(
            "undefined symbol '{name}' referenced in {context}"
        )))
    }
}

fn check_undefined_symbols(grammar: &Grammar) -> Result<(), ValidationError> {
    let defined = defined_names(grammar);

    for (rule_name, rule) in sorted_rules(grammar) {
        let mut symbols = Vec::new();
        rule.referenced_symbols(&mut symbols);
        for symbol in symbols {
            ensure_defined(&defined, symbol, &format!("rule '{rule_name}'"))?;
        }
    }

    let mut extras = Vec::new();
    for rule in grammar.extras() {
        rule.referenced_symbols(&mut extras);
    }
    for symbol in extras {
        ensure_defined(&defined, symbol, "extras")?;
    }

    for group in grammar.conflicts() {
        for name in group {
            ensure_defined(&defined, name, "conflicts")?;
        }
    }
    let mut ordered = Vec::new();
    for entry in grammar.precedences().iter().flatten() {
        entry.referenced_symbols(&mut ordered);
    }
    for symbol in ordered {
        ensure_defined(&defined, symbol, "precedences")?;
    }
    for name in grammar.inline.iter().flatten() {
        ensure_defined(&defined, name, "inline")?;
    }
    for name in grammar.supertypes.iter().flatten() {
        ensure_defined(&defined, name, "supertypes")?;
    }
    if let Some(word) = &grammar.word {
        ensure_defined(&defined, word, "word")?;
    }
    Ok(())
}

fn find_start_rule(grammar: &Grammar) -> Result<&str, ValidationError> {
    let Some(start) = grammar.start_rule() else {
        return Err(ValidationError::new(format!(
            "grammar '{}' has no rules",
            grammar.name
        )));
    };
    if Grammar::is_hidden(start) {
        return Err(ValidationError::new(format!(
            "grammar '{}' starts with hidden rule '{start}'; the start rule must be visible",
            grammar.name
        )));
    }
    Ok(start)
}

fn warn_unreachable_rules(grammar: &Grammar, start: &str) {
    let mut reachable: HashSet<&str> = HashSet::new();
    let mut to_visit = vec![start];
    for rule in grammar.extras().iter().chain(grammar.externals()) {
        rule.referenced_symbols(&mut to_visit);
    }

    while let Some(rule_name) = to_visit.pop() {
        if !reachable.insert(rule_name) {
            continue;
        }
        if let Some(rule) = grammar.rule(rule_name) {
            rule.referenced_symbols(&mut to_visit);
        }
    }

    let inline: HashSet<&str> = grammar.inline.iter().flatten().map(String::as_str).collect();
    for rule_name in sorted_rules(grammar).into_keys() {
        if !reachable.contains(rule_name) && !inline.contains(rule_name) {
            tracing::warn!(grammar = %grammar.name, rule = rule_name, "unreachable rule");
        }
    }
}

fn check_left_recursion(grammar: &Grammar) {
    for (rule_name, rule) in sorted_rules(grammar) {
        if has_immediate_left_recursion(rule, rule_name) {
            tracing::debug!(grammar = %grammar.name, rule = rule_name, "left-recursive rule");
        }
    }
}

fn has_immediate_left_recursion(rule: &Rule, target: &str) -> bool {
    match rule.rule_type {
        RuleType::Symbol => rule.symbol_name() == Some(target),
        RuleType::Seq => rule
            .members
            .first()
            .is_some_and(|first| has_immediate_left_recursion(first, target)),
        RuleType::Choice => rule
            .members
            .iter()
            .any(|member| has_immediate_left_recursion(member, target)),
        RuleType::Prec
        | RuleType::PrecLeft
        | RuleType::PrecRight
        | RuleType::PrecDynamic
        | RuleType::Field
        | RuleType::Alias => rule
            .content
            .as_deref()
            .is_some_and(|content| has_immediate_left_recursion(content, target)),
        _ => false,
    }
}

fn check_precedence(grammar: &Grammar) {
    for (rule_name, rule) in sorted_rules(grammar) {
        let mut levels = BTreeSet::new();
        collect_precedence_levels(rule, &mut levels);
        if levels.len() > 1 {
            tracing::debug!(
                grammar = %grammar.name,
                rule = rule_name,
                ?levels,
                "rule uses multiple precedence levels"
            );
        }
    }
}

fn collect_precedence_levels(rule: &Rule, levels: &mut BTreeSet<i32>) {
    if let Some(level) = rule.precedence() {
        levels.insert(level);
    }
    for child in rule.children() {
        collect_precedence_levels(child, levels);
    }
}
