//! Issuing authority to expected intermediate table.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use crate::error_handling::ConfigError;

/// One `ISSUER=INTERMEDIATE` rule as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectationRule {
    /// Issuer Common Name on the leaf
    pub issuer: String,
    /// Subject Common Name the chain must contain for that issuer
    pub intermediate: String,
}

impl ExpectationRule {
    /// Creates a rule from its two labels.
    pub fn new(issuer: impl Into<String>, intermediate: impl Into<String>) -> Self {
        ExpectationRule {
            issuer: issuer.into(),
            intermediate: intermediate.into(),
        }
    }
}

impl FromStr for ExpectationRule {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (issuer, intermediate) = s
            .split_once('=')
            .map(|(i, m)| (i.trim(), m.trim()))
            .filter(|(i, m)| !i.is_empty() && !m.is_empty())
            .ok_or_else(|| ConfigError::InvalidExpectation(s.to_string()))?;
        Ok(ExpectationRule::new(issuer, intermediate))
    }
}

/// Immutable table of issuer label to acceptable intermediate labels.
///
/// Built once before any worker starts and shared read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorityExpectation {
    table: HashMap<String, HashSet<String>>,
}

impl AuthorityExpectation {
    /// Builds the table from rules. Rules sharing an issuer are merged.
    pub fn from_rules<'a>(rules: impl IntoIterator<Item = &'a ExpectationRule>) -> Self {
        let mut table: HashMap<String, HashSet<String>> = HashMap::new();
        for rule in rules {
            table
                .entry(rule.issuer.clone())
                .or_default()
                .insert(rule.intermediate.clone());
        }
        AuthorityExpectation { table }
    }

    /// Acceptable intermediate labels for `issuer`, or `None` when the issuer
    /// is not audited.
    pub fn expected(&self, issuer: &str) -> Option<&HashSet<String>> {
        self.table.get(issuer)
    }

    /// Number of audited issuers.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// True when no issuer is audited.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
