//! Route template matching.
//!
//! # Responsibilities
//! - Compile a route template (`/users/:id`, `/items/:id:show`) into a regex
//! - Test whether a path belongs to the template
//! - Extract named parameters in declaration order
//!
//! # Design Decisions
//! - A placeholder is `:` followed by a run of characters other than `/` and `?`
//! - Each placeholder captures one or more non-`/` characters
//! - Literal template text is escaped, so `.` in a template is a dot
//! - A placeholder declaring several names (`:id:show`) captures a packed
//!   `id=5:show=true` value that is split on `:` and then on `=`
//! - Lenient extraction keeps a packed value it cannot split under the joined
//!   names (`id:show`) instead of failing
//! - Matching is case-sensitive here; callers normalize both sides

use regex::Regex;
use thiserror::Error;

use crate::error::RoutingError;
use crate::routing::parameters::Parameters;

/// Errors raised while compiling a template.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("invalid route template `{template}`: {source}")]
    Invalid {
        template: String,
        #[source]
        source: regex::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    /// Names declared by one placeholder, in order.
    Placeholder(Vec<String>),
}

/// Entry point for compiling route templates.
pub struct PathPattern;

impl PathPattern {
    /// Compile `template`. When `exact` is set the pattern must consume the
    /// whole input.
    pub fn compile(template: &str, exact: bool) -> Result<CompiledMatcher, PatternError> {
        let tokens = tokenize(template);

        let mut pattern = String::new();
        let mut placeholders = Vec::new();
        for token in tokens {
            match token {
                Token::Literal(text) => pattern.push_str(&regex::escape(&text)),
                Token::Placeholder(names) => {
                    pattern.push_str("([^/]+)");
                    placeholders.push(names);
                }
            }
        }

        if pattern.is_empty() {
            pattern.push_str(r"\.?");
        }
        if exact {
            pattern = format!("^{}$", pattern);
        }

        let regex = Regex::new(&pattern).map_err(|source| PatternError::Invalid {
            template: template.to_string(),
            source,
        })?;

        Ok(CompiledMatcher {
            regex,
            placeholders,
        })
    }

    /// Returns true if the template contains a `:` that introduces no name
    /// (`/users/:` or `/users/:/edit`).
    pub fn has_empty_placeholder(template: &str) -> bool {
        template
            .match_indices(':')
            .any(|(index, _)| matches!(template[index + 1..].chars().next(), None | Some('/') | Some('?')))
    }
}

/// A compiled template: membership test plus parameter extraction.
#[derive(Debug, Clone)]
pub struct CompiledMatcher {
    regex: Regex,
    placeholders: Vec<Vec<String>>,
}

impl CompiledMatcher {
    /// The generated regular expression.
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Declared parameter names, flattened in declaration order.
    pub fn parameter_names(&self) -> Vec<&str> {
        self.placeholders
            .iter()
            .flat_map(|names| names.iter().map(String::as_str))
            .collect()
    }

    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Extract parameters from `path`.
    ///
    /// Returns `Ok(None)` when the path does not match. A packed value with a
    /// token lacking `=` is an [`RoutingError::Unknown`].
    pub fn extract(&self, path: &str) -> Result<Option<Parameters>, RoutingError> {
        self.extract_with(path, true)
    }

    /// Like [`extract`](Self::extract), but a packed value that cannot be
    /// split is stored whole under its joined names.
    pub fn extract_lenient(&self, path: &str) -> Option<Parameters> {
        self.extract_with(path, false).ok().flatten()
    }

    fn extract_with(&self, path: &str, strict: bool) -> Result<Option<Parameters>, RoutingError> {
        let Some(captures) = self.regex.captures(path) else {
            return Ok(None);
        };

        let mut parameters = Parameters::new();
        for (names, group) in self.placeholders.iter().zip(captures.iter().skip(1)) {
            let Some(group) = group else {
                continue;
            };
            match names.as_slice() {
                [name] => {
                    parameters.insert(name.clone(), group.as_str().to_string());
                }
                _ => {
                    let mut unpacked = Parameters::new();
                    match unpack(group.as_str(), &mut unpacked) {
                        Ok(()) => parameters.extend(unpacked),
                        Err(e) if strict => return Err(e),
                        Err(_) => {
                            parameters.insert(names.join(":"), group.as_str().to_string());
                        }
                    }
                }
            }
        }

        Ok(Some(parameters))
    }
}

fn unpack(packed: &str, into: &mut Parameters) -> Result<(), RoutingError> {
    for token in packed.split(':').filter(|token| !token.is_empty()) {
        let (key, value) = token.split_once('=').ok_or_else(|| {
            RoutingError::Unknown(format!("malformed packed parameter `{}`", token))
        })?;
        into.insert(key.to_string(), value.to_string());
    }
    Ok(())
}

fn tokenize(template: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut rest = template;

    while let Some(index) = rest.find(':') {
        literal.push_str(&rest[..index]);
        let after = &rest[index + 1..];
        let end = after.find(|c: char| c == '/' || c == '?').unwrap_or(after.len());

        if end == 0 {
            literal.push(':');
            rest = after;
            continue;
        }

        if !literal.is_empty() {
            tokens.push(Token::Literal(std::mem::take(&mut literal)));
        }
        let names = after[..end]
            .split(':')
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        tokens.push(Token::Placeholder(names));
        rest = &after[end..];
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    tokens
}
