//! # Rule Chain Tokenizer
//!
//! Splits a textual rule chain into raw tokens.
//!
//! A chain is a comma-separated list of rule applications. Each token
//! is a rule name, optionally followed by `=` and a parameter. The
//! parameter keeps everything after the first `=`, so formats like
//! `datetime=%Y-%m-%d` survive intact. Tokenizing resolves nothing:
//! names are checked against the registry when the chain is compiled.

use crate::errors::{ConfigError, ConfigResult};

/// Directive: apply the rest of the chain to each entry of a
/// sequence or mapping instead of the value itself.
pub(crate) const DIVE: &str = "dive";

/// Directive: open a sub-chain that applies to mapping keys.
pub(crate) const KEYS: &str = "keys";

/// Directive: close the sub-chain opened by [`KEYS`].
pub(crate) const END_KEYS: &str = "endkeys";

/// True for the three structural directives. Directive names are
/// reserved: they cannot be registered as rules or aliases.
pub(crate) fn is_directive(name: &str) -> bool {
    name == DIVE || name == KEYS || name == END_KEYS
}

/// One token of a rule chain, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawRule {
    pub name: String,
    pub param: Option<String>,
}

/// Tokenizes a rule chain.
///
/// An empty chain is valid and yields no tokens. Empty rule names
/// (a leading, trailing, or doubled comma) and parameters on
/// directives are rejected.
pub(crate) fn tokenize(chain: &str) -> ConfigResult<Vec<RawRule>> {
    if chain.is_empty() {
        return Ok(Vec::new());
    }

    chain
        .split(',')
        .map(|token| {
            let (name, param) = match token.split_once('=') {
                Some((name, param)) => (name, Some(param.to_string())),
                None => (token, None),
            };
            if name.is_empty() {
                return Err(ConfigError::EmptyRule {
                    chain: chain.to_string(),
                });
            }
            if is_directive(name) && param.is_some() {
                return Err(ConfigError::UnexpectedParam {
                    rule: name.to_string(),
                });
            }
            Ok(RawRule {
                name: name.to_string(),
                param,
            })
        })
        .collect()
}
