//! Engine Invariant Tests
//!
//! Cross-cutting guarantees:
//! - identical input yields an identical report, run after run
//! - a shared engine validates concurrently without interference
//! - configuration errors never produce a partial report
//! - aliases resolve against the registry at compile time, not
//!   at registration time

use std::sync::Arc;
use std::thread;

use fieldcheck::{ConfigError, Engine, Report, RuleContext, StructRules};
use serde::Serialize;
use serde_json::{json, Value};

// =============================================================================
// Fixtures
// =============================================================================

fn account_rules() -> StructRules {
    StructRules::new("Account")
        .field("Username", "required,email")
        .field("Password", "required,min=5")
        .field("ConfirmPassword", "required,eqfield=Password")
        .nested(
            "Address",
            "required",
            StructRules::new("Address")
                .field("City", "required")
                .field("Country", "required"),
        )
        .field("Hobbies", "required,dive,required,min=3")
        .field("Wallet", "dive,keys,required,endkeys,required,gt=1000")
}

fn account_value() -> Value {
    json!({
        "Username": "masuk",
        "Password": "rahasia",
        "ConfirmPassword": "rahasi",
        "Address": {
            "City": "Semarang",
            "Country": ""
        },
        "Hobbies": ["Gaming", "X"],
        "Wallet": {
            "BCA": 1000000,
            "MANDIRI": 0,
            "": 1001
        }
    })
}

fn expected_hits() -> Vec<(String, String)> {
    vec![
        ("Username".into(), "email".into()),
        ("ConfirmPassword".into(), "eqfield".into()),
        ("Address.Country".into(), "required".into()),
        ("Hobbies[1]".into(), "min".into()),
        ("Wallet[]".into(), "required".into()),
        ("Wallet[MANDIRI]".into(), "required".into()),
        ("Wallet[MANDIRI]".into(), "gt".into()),
    ]
}

fn hits(report: &Report) -> Vec<(String, String)> {
    report
        .iter()
        .map(|e| (e.path().to_string(), e.rule().to_string()))
        .collect()
}

// =============================================================================
// Determinism
// =============================================================================

/// The same value and rules produce the same report, every run.
#[test]
fn test_reports_are_deterministic() {
    let engine = Engine::new();
    let rules = account_rules();
    let value = account_value();

    let first = engine.validate_struct(&value, &rules).unwrap();
    assert_eq!(hits(&first), expected_hits());

    for _ in 0..100 {
        let report = engine.validate_struct(&value, &rules).unwrap();
        assert_eq!(report, first);
    }
}

/// Mapping keys are visited in sorted order regardless of insertion
/// order in the source document.
#[test]
fn test_mapping_order_is_independent_of_insertion() {
    let engine = Engine::new();
    let chain = "dive,required";

    let forward = json!({"a": "", "b": "", "c": ""});
    let backward = json!({"c": "", "b": "", "a": ""});

    let lhs = engine.validate_var(&forward, chain).unwrap();
    let rhs = engine.validate_var(&backward, chain).unwrap();
    assert_eq!(lhs, rhs);
    assert_eq!(
        hits(&lhs),
        [
            ("[a]".to_string(), "required".to_string()),
            ("[b]".to_string(), "required".to_string()),
            ("[c]".to_string(), "required".to_string()),
        ]
    );
}

// =============================================================================
// Concurrency
// =============================================================================

/// A shared engine produces identical reports from many threads.
#[test]
fn test_shared_engine_validates_concurrently() {
    let engine = Arc::new(Engine::new());
    let rules = account_rules();
    let value = account_value();
    let expected = engine.validate_struct(&value, &rules).unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let engine = Arc::clone(&engine);
        let rules = rules.clone();
        let value = value.clone();
        let expected = expected.clone();
        handles.push(thread::spawn(move || {
            for _ in 0..50 {
                let report = engine.validate_struct(&value, &rules).unwrap();
                assert_eq!(report, expected);
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// A bad chain anywhere in the rule set fails the whole call, even
/// when other fields would have validated cleanly.
#[test]
fn test_config_error_yields_no_partial_report() {
    let engine = Engine::new();
    let rules = StructRules::new("Account")
        .field("Username", "required")
        .field("Age", "min=abc");

    let value = json!({
        "Username": "",
        "Age": 3
    });
    let result = engine.validate_struct(&value, &rules);
    assert!(matches!(
        result,
        Err(ConfigError::InvalidParam { rule, param }) if rule == "min" && param == "abc"
    ));
}

/// Rules are checked before the value is inspected at all.
#[test]
fn test_rules_are_checked_before_the_value() {
    let engine = Engine::new();
    let rules = StructRules::new("Account").field("Age", "nosuchrule");

    let result = engine.validate_struct(&json!(5), &rules);
    assert!(matches!(
        result,
        Err(ConfigError::UnknownRule { name }) if name == "nosuchrule"
    ));
}

/// A config error leaves the engine fully usable.
#[test]
fn test_engine_is_stateless_across_failures() {
    let engine = Engine::new();

    let result = engine.validate_var("x", "min=abc");
    assert!(result.is_err());

    let report = engine.validate_var("x", "required").unwrap();
    assert!(report.is_empty());
}

// =============================================================================
// Registry Resolution
// =============================================================================

/// Aliases resolve when a chain compiles, so an alias may be
/// registered before the rules it names.
#[test]
fn test_alias_binds_at_compile_time() {
    let mut engine = Engine::new();
    engine.alias("handle", "required,username").unwrap();

    let result = engine.validate_var("CUSTOM", "handle");
    assert!(matches!(
        result,
        Err(ConfigError::UnknownRule { name }) if name == "username"
    ));

    engine
        .register("username", |ctx: &RuleContext| {
            ctx.value().as_str().map_or(true, |s| s.chars().count() >= 5)
        })
        .unwrap();

    assert!(engine.validate_var("CUSTOM", "handle").unwrap().is_empty());
    assert_eq!(engine.validate_var("CUST", "handle").unwrap().len(), 1);
}

/// Directive names are reserved and cannot be registered.
#[test]
fn test_directive_names_are_reserved() {
    let mut engine = Engine::new();

    for name in ["dive", "keys", "endkeys"] {
        let result = engine.register(name, |_: &RuleContext| true);
        assert!(matches!(
            result,
            Err(ConfigError::ReservedName { name: n }) if n == name
        ));
        let result = engine.alias(name, "required");
        assert!(matches!(
            result,
            Err(ConfigError::ReservedName { name: n }) if n == name
        ));
    }
}

// =============================================================================
// Ingestion
// =============================================================================

/// Values arrive through serde, so absent options and numeric zeros
/// land as their empty encodings.
#[test]
fn test_serialized_input_maps_to_empty_values() {
    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    struct Profile {
        nickname: Option<String>,
        age: u8,
    }

    let engine = Engine::new();
    let rules = StructRules::new("Profile")
        .field("Nickname", "required")
        .field("Age", "required");

    let profile = Profile {
        nickname: None,
        age: 0,
    };
    let value = serde_json::to_value(&profile).unwrap();
    let report = engine.validate_struct(&value, &rules).unwrap();
    assert_eq!(
        hits(&report),
        [
            ("Nickname".to_string(), "required".to_string()),
            ("Age".to_string(), "required".to_string()),
        ]
    );
}

/// `Engine::default` carries the built-in rule set.
#[test]
fn test_default_engine_has_builtins() {
    let engine = Engine::default();
    let report = engine.validate_var("x", "required,min=1").unwrap();
    assert!(report.is_empty());
}
