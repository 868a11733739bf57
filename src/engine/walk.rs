//! # Value Traversal
//!
//! Applies compiled chains to values and collects rule failures.
//!
//! The walk never short-circuits: every rule at every reachable
//! location runs, and failures accumulate in traversal order. Fields
//! walk in declaration order, sequence elements in index order, and
//! mapping entries in sorted key order, so the same value always
//! produces the same report.
//!
//! Shape mismatches between chain and value (a dive into a scalar, a
//! keys block over a sequence, nested rules on a non-composite) abort
//! the walk with a configuration error instead of a report.

use serde_json::{Map, Value};

use crate::errors::{ConfigError, ConfigResult};
use crate::inspect;
use crate::registry::RuleContext;
use crate::report::{FieldError, Report};

use super::compile::{CompiledChain, CompiledStruct, DiveSpec, SiblingRef};

/// One validation pass over one value.
pub(crate) struct Walker<'a> {
    pair: Option<&'a Value>,
    report: Report,
}

impl<'a> Walker<'a> {
    pub(crate) fn new(pair: Option<&'a Value>) -> Self {
        Self {
            pair,
            report: Report::new(),
        }
    }

    pub(crate) fn into_report(self) -> Report {
        self.report
    }

    /// Applies a chain level to one value: the level's rules first,
    /// then its dive or the nested struct rules bound at this level.
    pub(crate) fn apply(
        &mut self,
        path: &str,
        value: &Value,
        chain: &CompiledChain,
        nested: Option<&CompiledStruct>,
        siblings: Option<&Map<String, Value>>,
    ) -> ConfigResult<()> {
        // The value stands for a nested struct only where the nested
        // rules bind, which is the level without a further dive.
        let composite = nested.is_some() && chain.dive.is_none();

        for rule in &chain.rules {
            let other = match &rule.sibling {
                SiblingRef::None => None,
                SiblingRef::PairOther => self.pair,
                SiblingRef::Field(name) => {
                    Some(siblings.and_then(|m| m.get(name)).unwrap_or(&Value::Null))
                }
            };
            let ctx = RuleContext::new(value, other, rule.param.as_deref(), composite);
            if !(rule.func)(&ctx) {
                self.report
                    .push(FieldError::new(path, &rule.name, rule.param.clone()));
            }
        }

        match &chain.dive {
            Some(spec) => self.dive(path, value, spec, nested),
            None => match nested {
                Some(rules) => self.descend(path, value, rules),
                None => Ok(()),
            },
        }
    }

    /// Iterates a sequence or mapping, applying the dive's sub-chains
    /// to each entry. Null traverses as empty; any other kind cannot
    /// be traversed.
    fn dive(
        &mut self,
        path: &str,
        value: &Value,
        spec: &DiveSpec,
        nested: Option<&CompiledStruct>,
    ) -> ConfigResult<()> {
        match value {
            Value::Array(items) => {
                if spec.keys.is_some() {
                    return Err(ConfigError::KeysOnSequence {
                        path: err_path(path),
                    });
                }
                for (i, item) in items.iter().enumerate() {
                    let entry_path = indexed_path(path, i);
                    self.apply(&entry_path, item, &spec.values, nested, None)?;
                }
                Ok(())
            }
            Value::Object(map) => {
                for (key, entry) in map {
                    let entry_path = keyed_path(path, key);
                    if let Some(key_chain) = &spec.keys {
                        let key_value = Value::String(key.clone());
                        self.apply(&entry_path, &key_value, key_chain, None, None)?;
                    }
                    self.apply(&entry_path, entry, &spec.values, nested, None)?;
                }
                Ok(())
            }
            Value::Null => Ok(()),
            other => Err(ConfigError::CannotTraverse {
                path: err_path(path),
                found: inspect::kind_name(other),
            }),
        }
    }

    /// Recurses into a composite under nested struct rules. Null
    /// descends as an empty composite so the nested fields still
    /// report their own failures.
    fn descend(
        &mut self,
        path: &str,
        value: &Value,
        rules: &CompiledStruct,
    ) -> ConfigResult<()> {
        match value {
            Value::Object(map) => self.walk_struct(path, map, rules),
            Value::Null => {
                let empty = Map::new();
                self.walk_struct(path, &empty, rules)
            }
            other => Err(ConfigError::ExpectedStruct {
                path: err_path(path),
                found: inspect::kind_name(other),
            }),
        }
    }

    /// Validates every declared field of a struct, in declaration
    /// order. Undeclared fields on the value are ignored; declared
    /// fields missing from the value validate as null.
    pub(crate) fn walk_struct(
        &mut self,
        path: &str,
        obj: &Map<String, Value>,
        rules: &CompiledStruct,
    ) -> ConfigResult<()> {
        for field in &rules.fields {
            let field_path = field_path(path, &field.name);
            let value = obj.get(&field.name).unwrap_or(&Value::Null);
            self.apply(
                &field_path,
                value,
                &field.chain,
                field.nested.as_ref(),
                Some(obj),
            )?;
        }
        Ok(())
    }
}

/// Appends a field name to a path prefix.
fn field_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}

/// Path of a sequence element.
fn indexed_path(prefix: &str, index: usize) -> String {
    format!("{}[{}]", prefix, index)
}

/// Path of a mapping entry; keys and values share it.
fn keyed_path(prefix: &str, key: &str) -> String {
    format!("{}[{}]", prefix, key)
}

/// Root values have an empty path; diagnostics show them as `$root`.
fn err_path(path: &str) -> String {
    if path.is_empty() {
        "$root".to_string()
    } else {
        path.to_string()
    }
}
