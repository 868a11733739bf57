//! # Rule Registry
//!
//! Name resolution for rules and aliases.
//!
//! The registry is the single lookup the chain compiler consults. It
//! starts populated with the built-in rule set; custom rules and
//! aliases land in the same table, so re-registering a name silently
//! replaces the previous meaning, built-ins included. Directive names
//! and chain syntax characters are reserved and never resolvable.

mod builtin;
mod rule;

pub use rule::RuleContext;
pub(crate) use rule::{ParamKind, RuleDef, RuleFn};

use std::collections::HashMap;

use crate::errors::{ConfigError, ConfigResult};
use crate::tag::{self, RawRule};

/// What a name resolves to.
pub(crate) enum Entry {
    /// A rule predicate with its parameter contract.
    Rule(RuleDef),
    /// An alias: tokenized chain fragment expanded during compilation.
    Alias(Vec<RawRule>),
}

/// Name table for rules and aliases.
pub(crate) struct Registry {
    entries: HashMap<String, Entry>,
}

impl Registry {
    /// Creates a registry populated with the built-in rules.
    pub(crate) fn with_builtins() -> Self {
        let mut registry = Self {
            entries: HashMap::new(),
        };
        builtin::install(&mut registry);
        registry
    }

    /// Rejects names that can never be registered: the empty name,
    /// directive names, and names containing chain syntax.
    pub(crate) fn ensure_registrable(name: &str) -> ConfigResult<()> {
        if name.is_empty() || tag::is_directive(name) || name.contains(',') || name.contains('=') {
            return Err(ConfigError::ReservedName {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Inserts or replaces a rule under `name`.
    pub(crate) fn insert_rule(&mut self, name: &str, def: RuleDef) {
        self.entries.insert(name.to_string(), Entry::Rule(def));
    }

    /// Inserts or replaces an alias under `name`.
    pub(crate) fn insert_alias(&mut self, name: &str, tokens: Vec<RawRule>) {
        self.entries.insert(name.to_string(), Entry::Alias(tokens));
    }

    pub(crate) fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_names_rejected() {
        assert!(Registry::ensure_registrable("").is_err());
        assert!(Registry::ensure_registrable("dive").is_err());
        assert!(Registry::ensure_registrable("keys").is_err());
        assert!(Registry::ensure_registrable("endkeys").is_err());
        assert!(Registry::ensure_registrable("a,b").is_err());
        assert!(Registry::ensure_registrable("a=b").is_err());

        assert!(Registry::ensure_registrable("username").is_ok());
        assert!(Registry::ensure_registrable("required").is_ok());
    }

    #[test]
    fn test_registration_replaces_silently() {
        let mut registry = Registry::with_builtins();

        // A custom rule may shadow a built-in.
        registry.insert_rule("required", RuleDef::new(|_: &RuleContext| true, ParamKind::None));
        assert!(matches!(registry.get("required"), Some(Entry::Rule(_))));

        // An alias may shadow a rule, and vice versa.
        registry.insert_alias("required", Vec::new());
        assert!(matches!(registry.get("required"), Some(Entry::Alias(_))));
    }

    #[test]
    fn test_lookup_misses_return_none() {
        let registry = Registry::with_builtins();
        assert!(registry.get("no-such-rule").is_none());
    }
}
