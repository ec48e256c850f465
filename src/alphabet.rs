//! Alphabet, rules and the symbol-to-action vocabulary.
//!
//! A [`Configuration`] is the immutable description both engines read from.
//! It is produced by an editor or by the preset decoder in [`crate::preset`]
//! and replaced wholesale whenever the user reconfigures.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Classification of a symbol within the active alphabet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SymbolKind {
    /// Rewritten each generation by its rule.
    Variable,
    /// Copied through unchanged, but may still carry turtle actions.
    Constant,
}

/// A single turtle instruction.
///
/// The vocabulary is closed; every interpreter dispatch over it is exhaustive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Advance by `length` and append the new point.
    DrawLine,
    /// Two half-length side tips around a [`Action::DrawLine`] trunk step.
    DrawLeaf,
    /// Add `angle` degrees to the heading.
    RotateClockwise,
    /// Subtract `angle` degrees from the heading.
    RotateAnticlockwise,
    /// Save position and heading onto the branch stack (`[`).
    PushState,
    /// Restore the most recently saved position and heading (`]`).
    PopState,
    NoOp,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::DrawLine,
        Action::DrawLeaf,
        Action::RotateClockwise,
        Action::RotateAnticlockwise,
        Action::PushState,
        Action::PopState,
        Action::NoOp,
    ];

    /// Parses an action tag, accepting both the long names and the short
    /// preset aliases (`DLi`, `DLe`, `RC`, `RA`, `Push`, `Pop`, `DN`).
    ///
    /// Returns `None` for anything else; callers drop unknown tags.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let action = match tag.trim() {
            "DrawLine" | "DLi" => Action::DrawLine,
            "DrawLeaf" | "DLe" => Action::DrawLeaf,
            "RotateClockwise" | "RC" => Action::RotateClockwise,
            "RotateAnticlockwise" | "RA" => Action::RotateAnticlockwise,
            "PushState" | "Push" => Action::PushState,
            "PopState" | "Pop" => Action::PopState,
            "NoOp" | "DN" => Action::NoOp,
            _ => return None,
        };
        Some(action)
    }

    pub fn tag(self) -> &'static str {
        match self {
            Action::DrawLine => "DrawLine",
            Action::DrawLeaf => "DrawLeaf",
            Action::RotateClockwise => "RotateClockwise",
            Action::RotateAnticlockwise => "RotateAnticlockwise",
            Action::PushState => "PushState",
            Action::PopState => "PopState",
            Action::NoOp => "NoOp",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Substitution rules, one replacement string per variable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet(BTreeMap<char, String>);

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the replacement for `variable`, replacing any previous rule.
    pub fn insert(&mut self, variable: char, replacement: impl Into<String>) {
        self.0.insert(variable, replacement.into());
    }

    pub fn get(&self, variable: char) -> Option<&str> {
        self.0.get(&variable).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &str)> {
        self.0.iter().map(|(&k, v)| (k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(char, S)> for RuleSet {
    fn from_iter<I: IntoIterator<Item = (char, S)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

/// Maps each symbol to the ordered actions it triggers.
///
/// Symbols without an entry behave as [`Action::NoOp`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionMapping(BTreeMap<char, Vec<Action>>);

impl ActionMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the action list for `symbol`.
    pub fn set(&mut self, symbol: char, actions: impl IntoIterator<Item = Action>) {
        self.0.insert(symbol, actions.into_iter().collect());
    }

    /// Appends a single action to `symbol`'s list, creating it if needed.
    pub fn push(&mut self, symbol: char, action: Action) {
        self.0.entry(symbol).or_default().push(action);
    }

    /// Actions for `symbol`; empty when the symbol is unmapped.
    pub fn actions(&self, symbol: char) -> &[Action] {
        self.0.get(&symbol).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.0.contains_key(&symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &[Action])> {
        self.0.iter().map(|(&k, v)| (k, v.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<A: IntoIterator<Item = Action>> FromIterator<(char, A)> for ActionMapping {
    fn from_iter<I: IntoIterator<Item = (char, A)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k, v.into_iter().collect()))
                .collect(),
        )
    }
}

/// Complete description of an L-System and how to draw it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Generation-0 seed string.
    pub axiom: String,
    pub variables: BTreeSet<char>,
    pub constants: BTreeSet<char>,
    pub rules: RuleSet,
    pub actions: ActionMapping,
    /// Forward step for [`Action::DrawLine`] and [`Action::DrawLeaf`].
    pub length: f32,
    /// Turn angle in degrees.
    pub angle: f32,
    /// Turtle start position.
    pub offset: Vec2,
    /// Generation to expand to when the configuration is applied.
    pub generation: usize,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            axiom: String::new(),
            variables: BTreeSet::new(),
            constants: BTreeSet::new(),
            rules: RuleSet::new(),
            actions: ActionMapping::new(),
            length: 1.0,
            angle: 25.0,
            offset: Vec2::ZERO,
            generation: 0,
        }
    }
}

impl Configuration {
    /// Creates a configuration with the given axiom and default parameters.
    pub fn new(axiom: impl Into<String>) -> Self {
        Self {
            axiom: axiom.into(),
            ..Default::default()
        }
    }

    pub fn with_variables(mut self, symbols: &str) -> Self {
        self.variables.extend(symbols.chars());
        self
    }

    pub fn with_constants(mut self, symbols: &str) -> Self {
        self.constants.extend(symbols.chars());
        self
    }

    pub fn with_rule(mut self, variable: char, replacement: impl Into<String>) -> Self {
        self.rules.insert(variable, replacement);
        self
    }

    pub fn with_actions(mut self, symbol: char, actions: impl IntoIterator<Item = Action>) -> Self {
        self.actions.set(symbol, actions);
        self
    }

    pub fn with_length(mut self, length: f32) -> Self {
        self.length = length;
        self
    }

    pub fn with_angle(mut self, degrees: f32) -> Self {
        self.angle = degrees;
        self
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_generation(mut self, generation: usize) -> Self {
        self.generation = generation;
        self
    }

    /// Classifies `symbol`. Variables win over constants when a symbol was
    /// declared as both; characters outside the alphabet yield `None`.
    pub fn classify(&self, symbol: char) -> Option<SymbolKind> {
        if self.variables.contains(&symbol) {
            Some(SymbolKind::Variable)
        } else if self.constants.contains(&symbol) {
            Some(SymbolKind::Constant)
        } else {
            None
        }
    }

    /// Replacement for `symbol` in one rewrite pass, or `None` to copy it through.
    ///
    /// Only declared variables are rewritten. A declared variable without a
    /// rule passes through literally.
    pub fn replacement(&self, symbol: char) -> Option<&str> {
        match self.classify(symbol) {
            Some(SymbolKind::Variable) => self.rules.get(symbol),
            _ => None,
        }
    }

    /// Lists every inconsistency in the configuration.
    ///
    /// None of these are fatal: the engines fall back to pass-through or
    /// no-op behaviour, since half-edited configurations are routine.
    pub fn diagnostics(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        for &symbol in self.variables.intersection(&self.constants) {
            issues.push(ConfigIssue::VariableAndConstant(symbol));
        }

        for (key, body) in self.rules.iter() {
            if !self.variables.contains(&key) {
                issues.push(ConfigIssue::RuleForUndeclaredVariable(key));
            }
            for symbol in body.chars() {
                if self.classify(symbol).is_none() {
                    issues.push(ConfigIssue::UndeclaredSymbolInRule { rule: key, symbol });
                }
            }
        }

        for &variable in &self.variables {
            if self.rules.get(variable).is_none() {
                issues.push(ConfigIssue::MissingRule(variable));
            }
        }

        let mut seen = BTreeSet::new();
        for symbol in self.axiom.chars() {
            if seen.insert(symbol) && self.classify(symbol).is_none() {
                issues.push(ConfigIssue::UndeclaredSymbolInAxiom(symbol));
            }
        }

        for &symbol in self.variables.union(&self.constants) {
            if !self.actions.contains(symbol) {
                issues.push(ConfigIssue::UnmappedSymbol(symbol));
            }
        }

        issues
    }
}

/// A non-fatal inconsistency found by [`Configuration::diagnostics`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigIssue {
    /// Declared as both; treated as a variable.
    VariableAndConstant(char),
    /// A rule whose key is not a declared variable; never applied.
    RuleForUndeclaredVariable(char),
    /// A declared variable without a rule; copied through unchanged.
    MissingRule(char),
    UndeclaredSymbolInRule { rule: char, symbol: char },
    UndeclaredSymbolInAxiom(char),
    /// An alphabet symbol without actions; interpreted as a no-op.
    UnmappedSymbol(char),
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigIssue::VariableAndConstant(c) => {
                write!(f, "'{c}' is declared both variable and constant")
            }
            ConfigIssue::RuleForUndeclaredVariable(c) => {
                write!(f, "rule for '{c}' ignored: not a declared variable")
            }
            ConfigIssue::MissingRule(c) => write!(f, "variable '{c}' has no rule"),
            ConfigIssue::UndeclaredSymbolInRule { rule, symbol } => {
                write!(f, "rule for '{rule}' uses undeclared symbol '{symbol}'")
            }
            ConfigIssue::UndeclaredSymbolInAxiom(c) => {
                write!(f, "axiom uses undeclared symbol '{c}'")
            }
            ConfigIssue::UnmappedSymbol(c) => write!(f, "symbol '{c}' has no actions"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary_tree() -> Configuration {
        Configuration::new("0")
            .with_variables("01")
            .with_constants("[]")
            .with_rule('1', "11")
            .with_rule('0', "1[0]0")
            .with_actions('0', [Action::DrawLeaf])
            .with_actions('1', [Action::DrawLine])
            .with_actions('[', [Action::PushState, Action::RotateAnticlockwise])
            .with_actions(']', [Action::PopState, Action::RotateClockwise])
    }

    #[test]
    fn test_tags_accept_long_and_short_names() {
        for action in Action::ALL {
            assert_eq!(Action::from_tag(action.tag()), Some(action));
        }
        assert_eq!(Action::from_tag("DLi"), Some(Action::DrawLine));
        assert_eq!(Action::from_tag(" RA "), Some(Action::RotateAnticlockwise));
        assert_eq!(Action::from_tag("Jump"), None);
        assert_eq!(Action::from_tag(""), None);
    }

    #[test]
    fn test_unmapped_symbol_has_no_actions() {
        let config = binary_tree();
        assert!(config.actions.actions('X').is_empty());
        assert_eq!(
            config.actions.actions('['),
            &[Action::PushState, Action::RotateAnticlockwise]
        );
    }

    #[test]
    fn test_replacement_only_for_declared_variables() {
        let config = binary_tree().with_rule('[', "oops");
        assert_eq!(config.replacement('0'), Some("1[0]0"));
        assert_eq!(config.replacement('['), None);
        assert_eq!(config.replacement('Z'), None);
    }

    #[test]
    fn test_overlap_classifies_as_variable() {
        let config = Configuration::new("F").with_variables("F").with_constants("F+");
        assert_eq!(config.classify('F'), Some(SymbolKind::Variable));
        assert_eq!(config.classify('+'), Some(SymbolKind::Constant));
        assert_eq!(config.classify('?'), None);
        assert!(
            config
                .diagnostics()
                .contains(&ConfigIssue::VariableAndConstant('F'))
        );
    }

    #[test]
    fn test_consistent_configuration_has_no_issues() {
        assert!(binary_tree().diagnostics().is_empty());
    }

    #[test]
    fn test_diagnostics_report_each_gap() {
        let config = Configuration::new("AQ")
            .with_variables("AB")
            .with_rule('A', "A+Z")
            .with_rule('C', "C")
            .with_actions('A', [Action::DrawLine]);
        let issues = config.diagnostics();

        assert!(issues.contains(&ConfigIssue::RuleForUndeclaredVariable('C')));
        assert!(issues.contains(&ConfigIssue::MissingRule('B')));
        assert!(issues.contains(&ConfigIssue::UndeclaredSymbolInRule {
            rule: 'A',
            symbol: 'Z'
        }));
        assert!(issues.contains(&ConfigIssue::UndeclaredSymbolInAxiom('Q')));
        assert!(issues.contains(&ConfigIssue::UnmappedSymbol('B')));
        assert!(!issues.contains(&ConfigIssue::UnmappedSymbol('A')));
    }
}
