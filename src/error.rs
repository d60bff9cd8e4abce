use std::fmt;

/// Reason a rule string produced no descriptor.
///
/// The extractor never surfaces these to its caller: a rule that fails to parse
/// is dropped and the remaining rules still run. `RuleError` exists so callers
/// who validate rule sets up front (for example at startup) can see why a rule
/// would be ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// The rule string was empty or whitespace only
    EmptyRule,
    /// Every character of the rule was consumed by modifiers, leaving no key
    EmptyKey {
        /// The rule text as written
        rule: String,
    },
}

impl RuleError {
    /// Short machine-friendly reason, used as a log field.
    pub fn reason(&self) -> &'static str {
        match self {
            RuleError::EmptyRule => "empty rule",
            RuleError::EmptyKey { .. } => "empty key",
        }
    }
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleError::EmptyRule => write!(f, "Invalid rule: rule is empty"),
            RuleError::EmptyKey { rule } => {
                write!(f, "Invalid rule '{}': no source key after modifiers", rule)
            }
        }
    }
}

impl std::error::Error for RuleError {}
