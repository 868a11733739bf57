//! # Chain Compilation
//!
//! Resolves tokenized chains and descriptors into executable form.
//!
//! Compilation front-loads every configuration check:
//! - every name resolves to a rule, with aliases expanded in place
//! - every parameter satisfies its rule's contract
//! - directives are well-placed and balanced
//! - cross-field references name declared siblings
//!
//! A descriptor compiles completely before any value is walked, so a
//! misconfigured chain can never leave a half-validated report. The
//! only errors left for walk time are shape mismatches between the
//! chain and the actual value.

use std::collections::HashSet;

use crate::descriptor::StructRules;
use crate::errors::{ConfigError, ConfigResult};
use crate::registry::{Entry, ParamKind, Registry, RuleFn};
use crate::tag::{self, RawRule};

/// Aliases may reference other aliases up to this depth.
const MAX_ALIAS_DEPTH: usize = 8;

/// Where a chain is compiled, deciding how cross-field references
/// resolve.
#[derive(Clone, Copy)]
pub(crate) enum Mode<'a> {
    /// Single value: no siblings exist, cross-field rules error.
    Var,
    /// Value plus one comparand: cross-field rules take no parameter.
    Pair,
    /// Struct field: cross-field rules name a declared sibling.
    Struct(&'a StructRules),
}

/// One resolved rule application.
pub(crate) struct CompiledRule {
    pub name: String,
    pub param: Option<String>,
    pub sibling: SiblingRef,
    pub func: RuleFn,
}

/// How a rule's comparand resolves at walk time.
pub(crate) enum SiblingRef {
    None,
    /// The second value of a pair validation.
    PairOther,
    /// A sibling field of the enclosing struct, by name.
    Field(String),
}

/// A compiled chain level: rules applied to the value itself, then
/// optionally a dive into its entries.
pub(crate) struct CompiledChain {
    pub rules: Vec<CompiledRule>,
    pub dive: Option<Box<DiveSpec>>,
}

/// What a dive does with each traversed entry.
pub(crate) struct DiveSpec {
    /// Chain for mapping keys, from a `keys`...`endkeys` block.
    pub keys: Option<CompiledChain>,
    /// Chain for each sequence element or mapping value.
    pub values: CompiledChain,
}

/// A fully compiled struct descriptor.
pub(crate) struct CompiledStruct {
    pub fields: Vec<CompiledField>,
}

pub(crate) struct CompiledField {
    pub name: String,
    pub chain: CompiledChain,
    pub nested: Option<CompiledStruct>,
}

/// Compiles a textual chain for a single-value or pair validation.
pub(crate) fn compile_chain(
    registry: &Registry,
    chain: &str,
    mode: Mode,
) -> ConfigResult<CompiledChain> {
    let tokens = tag::tokenize(chain)?;
    let tokens = expand(registry, &tokens, 0)?;
    build_chain(registry, &tokens, mode)
}

/// Compiles a struct descriptor, fields in declaration order.
pub(crate) fn compile_struct(
    registry: &Registry,
    rules: &StructRules,
) -> ConfigResult<CompiledStruct> {
    let mut seen = HashSet::new();
    let mut fields = Vec::with_capacity(rules.fields.len());

    for field in &rules.fields {
        if !seen.insert(field.name.as_str()) {
            return Err(ConfigError::DuplicateField {
                type_name: rules.type_name.clone(),
                field: field.name.clone(),
            });
        }

        let tokens = tag::tokenize(&field.chain)?;
        let tokens = expand(registry, &tokens, 0)?;
        let mut chain = build_chain(registry, &tokens, Mode::Struct(rules))?;

        let nested = match &field.nested {
            Some(sub) => {
                collapse_redundant_dive(&mut chain);
                Some(compile_struct(registry, sub)?)
            }
            None => None,
        };

        fields.push(CompiledField {
            name: field.name.clone(),
            chain,
            nested,
        });
    }

    Ok(CompiledStruct { fields })
}

/// Replaces alias tokens with their stored fragments, recursively.
/// Directives pass through untouched; unknown names pass through to
/// be rejected during resolution.
fn expand(registry: &Registry, tokens: &[RawRule], depth: usize) -> ConfigResult<Vec<RawRule>> {
    let mut out = Vec::with_capacity(tokens.len());
    for token in tokens {
        if tag::is_directive(&token.name) {
            out.push(token.clone());
            continue;
        }
        match registry.get(&token.name) {
            Some(Entry::Alias(fragment)) => {
                if token.param.is_some() {
                    return Err(ConfigError::UnexpectedParam {
                        rule: token.name.clone(),
                    });
                }
                if depth >= MAX_ALIAS_DEPTH {
                    return Err(ConfigError::AliasDepth {
                        name: token.name.clone(),
                    });
                }
                out.extend(expand(registry, fragment, depth + 1)?);
            }
            _ => out.push(token.clone()),
        }
    }
    Ok(out)
}

/// Parses the directive structure of an expanded token stream.
fn build_chain(registry: &Registry, tokens: &[RawRule], mode: Mode) -> ConfigResult<CompiledChain> {
    let mut rules = Vec::new();
    let mut after_dive = None;

    for (i, token) in tokens.iter().enumerate() {
        match token.name.as_str() {
            tag::DIVE => {
                after_dive = Some(&tokens[i + 1..]);
                break;
            }
            tag::KEYS => return Err(ConfigError::MisplacedKeys),
            tag::END_KEYS => return Err(ConfigError::UnbalancedKeys),
            _ => rules.push(compile_rule(registry, token, mode)?),
        }
    }

    let rest = match after_dive {
        Some(rest) => rest,
        None => return Ok(CompiledChain { rules, dive: None }),
    };

    // A keys block may only open immediately after the dive. Inside
    // the dive, sibling context is gone: key and value sub-chains
    // compile in single-value mode.
    let (keys, value_tokens) = if rest.first().map_or(false, |t| t.name == tag::KEYS) {
        let body = &rest[1..];
        let end = body
            .iter()
            .position(|t| t.name == tag::END_KEYS)
            .ok_or(ConfigError::UnbalancedKeys)?;
        if body[..end].iter().any(|t| t.name == tag::KEYS) {
            return Err(ConfigError::MisplacedKeys);
        }
        let key_chain = build_chain(registry, &body[..end], Mode::Var)?;
        (Some(key_chain), &body[end + 1..])
    } else {
        (None, rest)
    };

    let values = build_chain(registry, value_tokens, Mode::Var)?;
    Ok(CompiledChain {
        rules,
        dive: Some(Box::new(DiveSpec { keys, values })),
    })
}

/// Resolves one token against the registry and checks its parameter.
fn compile_rule(registry: &Registry, token: &RawRule, mode: Mode) -> ConfigResult<CompiledRule> {
    let def = match registry.get(&token.name) {
        Some(Entry::Rule(def)) => def,
        _ => {
            return Err(ConfigError::UnknownRule {
                name: token.name.clone(),
            })
        }
    };

    let mut sibling = SiblingRef::None;
    match def.param {
        ParamKind::None => {
            if token.param.is_some() {
                return Err(ConfigError::UnexpectedParam {
                    rule: token.name.clone(),
                });
            }
        }
        ParamKind::Numeric => {
            let param = require_param(token)?;
            if !param.parse::<f64>().map_or(false, |n| n.is_finite()) {
                return Err(ConfigError::InvalidParam {
                    rule: token.name.clone(),
                    param: param.to_string(),
                });
            }
        }
        ParamKind::Field => match mode {
            Mode::Struct(rules) => {
                let param = require_param(token)?;
                if !rules.fields.iter().any(|f| f.name == param) {
                    return Err(ConfigError::UnknownField {
                        rule: token.name.clone(),
                        field: param.to_string(),
                    });
                }
                sibling = SiblingRef::Field(param.to_string());
            }
            Mode::Pair => {
                if token.param.is_some() {
                    return Err(ConfigError::UnexpectedParam {
                        rule: token.name.clone(),
                    });
                }
                sibling = SiblingRef::PairOther;
            }
            Mode::Var => {
                return Err(ConfigError::UnresolvedReference {
                    rule: token.name.clone(),
                });
            }
        },
        ParamKind::Literal => {}
        ParamKind::Checked(check) => {
            let param = require_param(token)?;
            if !check(param) {
                return Err(ConfigError::InvalidParam {
                    rule: token.name.clone(),
                    param: param.to_string(),
                });
            }
        }
    }

    Ok(CompiledRule {
        name: token.name.clone(),
        param: token.param.clone(),
        sibling,
        func: def.func.clone(),
    })
}

fn require_param(token: &RawRule) -> ConfigResult<&str> {
    token
        .param
        .as_deref()
        .ok_or_else(|| ConfigError::MissingParam {
            rule: token.name.clone(),
        })
}

/// Nested struct rules bind at the innermost dive level. When that
/// level is a bare trailing dive carrying no keys block and no rules
/// of its own, it would push the binding one traversal level too
/// deep, so it collapses into the level above. The sole dive of a
/// chain never collapses: there the dive itself is the iteration.
fn collapse_redundant_dive(chain: &mut CompiledChain) {
    if let Some(top) = chain.dive.as_deref_mut() {
        collapse_in(top);
    }
}

fn collapse_in(spec: &mut DiveSpec) {
    let child_is_innermost = match &spec.values.dive {
        Some(inner) => inner.values.dive.is_none(),
        None => return,
    };
    if child_is_innermost {
        if spec.values.dive.as_deref().map_or(false, vacuous) {
            spec.values.dive = None;
        }
    } else if let Some(inner) = spec.values.dive.as_deref_mut() {
        collapse_in(inner);
    }
}

fn vacuous(spec: &DiveSpec) -> bool {
    spec.keys.is_none() && spec.values.rules.is_empty() && spec.values.dive.is_none()
}
