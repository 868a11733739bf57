//! # Rule Primitives
//!
//! The shape of a rule: the context it runs against, the predicate
//! type, and the compile-time contract for its parameter.

use serde_json::Value;
use std::sync::Arc;

/// Everything a rule sees for one check.
///
/// Rules are pure predicates over this context: they return `true`
/// when the value passes and must not panic or hold state. The same
/// context type is passed to built-in and custom rules.
#[derive(Debug)]
pub struct RuleContext<'a> {
    value: &'a Value,
    other: Option<&'a Value>,
    param: Option<&'a str>,
    composite: bool,
}

impl<'a> RuleContext<'a> {
    pub(crate) fn new(
        value: &'a Value,
        other: Option<&'a Value>,
        param: Option<&'a str>,
        composite: bool,
    ) -> Self {
        Self {
            value,
            other,
            param,
            composite,
        }
    }

    /// The value under inspection.
    pub fn value(&self) -> &'a Value {
        self.value
    }

    /// The comparand for cross-field rules: the referenced sibling
    /// field, or the second value of a pair validation. Absent
    /// sibling fields resolve to null.
    pub fn other(&self) -> Option<&'a Value> {
        self.other
    }

    /// The parameter the rule was compiled with, if any.
    pub fn param(&self) -> Option<&'a str> {
        self.param
    }

    /// True when the value stands for a nested struct rather than a
    /// plain mapping. `required` uses this to check composites deeply.
    pub fn is_composite(&self) -> bool {
        self.composite
    }
}

/// Shared predicate form stored in the registry and in compiled
/// chains. `Arc` keeps compiled chains cheap to build from it.
pub(crate) type RuleFn = Arc<dyn Fn(&RuleContext<'_>) -> bool + Send + Sync>;

/// Compile-time contract for a rule's parameter.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ParamKind {
    /// No parameter allowed.
    None,
    /// Parameter required, must parse as a finite number.
    Numeric,
    /// Parameter names a sibling field; omitted in pair validation.
    Field,
    /// Free-form optional parameter, passed through unchecked.
    Literal,
    /// Parameter required, must pass the given check.
    Checked(fn(&str) -> bool),
}

/// A registered rule: predicate plus parameter contract.
#[derive(Clone)]
pub(crate) struct RuleDef {
    pub func: RuleFn,
    pub param: ParamKind,
}

impl RuleDef {
    pub(crate) fn new<F>(func: F, param: ParamKind) -> Self
    where
        F: Fn(&RuleContext<'_>) -> bool + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            param,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_context_exposes_value_and_param() {
        let value = json!(5);
        let ctx = RuleContext::new(&value, None, Some("10"), false);

        assert_eq!(ctx.value(), &json!(5));
        assert_eq!(ctx.param(), Some("10"));
        assert_eq!(ctx.other(), None);
        assert!(!ctx.is_composite());
    }

    #[test]
    fn test_rule_def_wraps_closures_and_fns() {
        let def = RuleDef::new(|ctx: &RuleContext| ctx.value().is_string(), ParamKind::None);
        let value = json!("hello");
        let ctx = RuleContext::new(&value, None, None, false);
        assert!((def.func)(&ctx));
    }
}
