//! Navigation parameters and the declared-vs-supplied contract.
//!
//! # Design Decisions
//! - The check is strict in both directions: a declared name that was not
//!   supplied fails, and so does a supplied name that was never declared
//! - Declared names are reported in declaration order, unexpected names in
//!   sorted order, so the reported key is deterministic

use std::collections::HashMap;

use crate::error::RoutingError;

/// Parameter name → value, as parsed from a navigation path.
pub type Parameters = HashMap<String, String>;

/// Why a set of parameters failed the contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterMismatch {
    /// A declared parameter was not supplied.
    Missing(String),
    /// A supplied parameter was not declared.
    Unexpected(String),
}

impl ParameterMismatch {
    /// The offending parameter name.
    pub fn key(&self) -> &str {
        match self {
            ParameterMismatch::Missing(key) | ParameterMismatch::Unexpected(key) => key,
        }
    }
}

impl std::fmt::Display for ParameterMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParameterMismatch::Missing(key) => write!(f, "missing required parameter `{}`", key),
            ParameterMismatch::Unexpected(key) => write!(f, "unexpected parameter `{}`", key),
        }
    }
}

impl From<ParameterMismatch> for RoutingError {
    fn from(mismatch: ParameterMismatch) -> Self {
        RoutingError::MissingParameters(mismatch.to_string())
    }
}

/// Checks that `supplied` carries exactly the `required` names.
pub fn check_parameters(
    required: &[String],
    supplied: Option<&Parameters>,
) -> Result<(), ParameterMismatch> {
    let empty = Parameters::new();
    let supplied = supplied.unwrap_or(&empty);

    if let Some(missing) = required.iter().find(|name| !supplied.contains_key(name.as_str())) {
        return Err(ParameterMismatch::Missing(missing.clone()));
    }

    let mut unexpected: Vec<&String> = supplied
        .keys()
        .filter(|key| !required.iter().any(|name| name == *key))
        .collect();
    unexpected.sort();

    match unexpected.first() {
        Some(key) => Err(ParameterMismatch::Unexpected((*key).clone())),
        None => Ok(()),
    }
}
