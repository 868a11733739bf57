//! # Validation Engine
//!
//! The public entry point: registration on one side, validation on
//! the other.
//!
//! Registration (`register`, `register_with_param`, `alias`) takes
//! `&mut self` and happens during setup. Validation takes `&self`, so
//! a configured engine can sit behind an `Arc` and serve calls
//! concurrently.
//!
//! Every validation call compiles its chains completely before the
//! value is walked. Misconfiguration therefore always surfaces as
//! `Err(ConfigError)` with no report, never as a partial report.

mod compile;
mod walk;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::descriptor::{StructRules, Validate};
use crate::errors::{ConfigError, ConfigResult};
use crate::inspect;
use crate::registry::{ParamKind, Registry, RuleContext, RuleDef};
use crate::report::Report;
use crate::tag;

use compile::Mode;
use walk::Walker;

/// A rule registry plus the machinery to run chains against values.
pub struct Engine {
    registry: Registry,
}

impl Engine {
    /// Creates an engine with the built-in rule set.
    pub fn new() -> Self {
        Self {
            registry: Registry::with_builtins(),
        }
    }

    /// Registers a custom rule.
    ///
    /// The rule may take a free-form parameter; it receives whatever
    /// the chain supplies, unchecked. Registering an existing name,
    /// built-ins included, silently replaces it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReservedName`] for the empty name,
    /// directive names, and names containing `,` or `=`.
    pub fn register<F>(&mut self, name: &str, rule: F) -> ConfigResult<()>
    where
        F: Fn(&RuleContext<'_>) -> bool + Send + Sync + 'static,
    {
        Registry::ensure_registrable(name)?;
        self.registry
            .insert_rule(name, RuleDef::new(rule, ParamKind::Literal));
        debug!(rule = name, "registered custom rule");
        Ok(())
    }

    /// Registers a custom rule whose parameter is required and
    /// checked at compile time.
    ///
    /// A chain using the rule with a parameter that fails `check`
    /// (or with no parameter at all) is rejected when it compiles,
    /// before any value is validated.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReservedName`] as [`register`](Self::register).
    pub fn register_with_param<F>(
        &mut self,
        name: &str,
        check: fn(&str) -> bool,
        rule: F,
    ) -> ConfigResult<()>
    where
        F: Fn(&RuleContext<'_>) -> bool + Send + Sync + 'static,
    {
        Registry::ensure_registrable(name)?;
        self.registry
            .insert_rule(name, RuleDef::new(rule, ParamKind::Checked(check)));
        debug!(rule = name, "registered custom rule with checked parameter");
        Ok(())
    }

    /// Registers `name` as shorthand for a chain fragment.
    ///
    /// The fragment is tokenized now but resolved when a chain using
    /// it compiles, so an alias may mention rules registered later.
    /// Failures report the underlying rule names, not the alias.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReservedName`] for unregistrable names
    /// and tokenizer errors for a malformed fragment.
    pub fn alias(&mut self, name: &str, chain: &str) -> ConfigResult<()> {
        Registry::ensure_registrable(name)?;
        let tokens = tag::tokenize(chain)?;
        self.registry.insert_alias(name, tokens);
        debug!(alias = name, chain, "registered alias");
        Ok(())
    }

    /// Validates a single value against a rule chain.
    ///
    /// The value is ingested through its `Serialize` impl. An empty
    /// chain passes everything.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for malformed chains or a chain/value
    /// shape mismatch. Rule failures are not errors: they arrive in
    /// the `Ok` report.
    pub fn validate_var<T>(&self, value: &T, chain: &str) -> ConfigResult<Report>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_value(value)?;
        let compiled = compile::compile_chain(&self.registry, chain, Mode::Var)?;
        let mut walker = Walker::new(None);
        walker.apply("", &value, &compiled, None, None)?;
        Ok(walker.into_report())
    }

    /// Validates a value against a chain with an explicit comparand
    /// for cross-field rules, which take no parameter here.
    ///
    /// # Errors
    ///
    /// As [`validate_var`](Self::validate_var).
    pub fn validate_var_pair<T, U>(&self, value: &T, other: &U, chain: &str) -> ConfigResult<Report>
    where
        T: Serialize + ?Sized,
        U: Serialize + ?Sized,
    {
        let value = serde_json::to_value(value)?;
        let other = serde_json::to_value(other)?;
        let compiled = compile::compile_chain(&self.registry, chain, Mode::Pair)?;
        let mut walker = Walker::new(Some(&other));
        walker.apply("", &value, &compiled, None, None)?;
        Ok(walker.into_report())
    }

    /// Validates a struct-shaped value against a descriptor.
    ///
    /// Declared fields validate in declaration order; fields missing
    /// from the value validate as null; undeclared fields on the
    /// value are ignored.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the descriptor fails to
    /// compile, when the value is not a mapping, or on a chain/value
    /// shape mismatch during the walk.
    pub fn validate_struct(&self, value: &Value, rules: &StructRules) -> ConfigResult<Report> {
        let compiled = compile::compile_struct(&self.registry, rules)?;
        let obj = value
            .as_object()
            .ok_or_else(|| ConfigError::ExpectedStruct {
                path: "$root".to_string(),
                found: inspect::kind_name(value),
            })?;

        let mut walker = Walker::new(None);
        walker.walk_struct("", obj, &compiled)?;
        let report = walker.into_report();
        debug!(
            type_name = rules.type_name(),
            failures = report.len(),
            "validated struct"
        );
        Ok(report)
    }

    /// Validates a value that carries its own rules.
    ///
    /// # Errors
    ///
    /// As [`validate_struct`](Self::validate_struct).
    pub fn validate<T: Validate>(&self, value: &T) -> ConfigResult<Report> {
        let json = serde_json::to_value(value)?;
        self.validate_struct(&json, &T::rules())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
