//! # Built-in Rules
//!
//! The rule set every engine starts with:
//! - `required` rejects zero values (deep for composites)
//! - `min` / `max` / `gt` / `gte` / `lt` / `lte` compare magnitudes
//! - `numeric` accepts numbers and digits-only strings
//! - `email` / `uuid` / `datetime` check string formats
//! - `eqfield` compares against another field
//! - `number` is an alias for `numeric`
//!
//! All of them are kind-driven: a rule applied to a kind it cannot
//! judge fails rather than erroring, so one chain can serve values of
//! several shapes.

use std::sync::LazyLock;

use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde_json::Value;

use crate::inspect;
use crate::tag::RawRule;

use super::rule::{ParamKind, RuleContext, RuleDef};
use super::Registry;

static DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").unwrap());
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// Installs the built-in rule set into a fresh registry.
pub(super) fn install(registry: &mut Registry) {
    registry.insert_rule("required", RuleDef::new(required, ParamKind::None));

    registry.insert_rule("min", RuleDef::new(min, ParamKind::Numeric));
    registry.insert_rule("max", RuleDef::new(max, ParamKind::Numeric));
    registry.insert_rule("gt", RuleDef::new(gt, ParamKind::Numeric));
    registry.insert_rule("gte", RuleDef::new(gte, ParamKind::Numeric));
    registry.insert_rule("lt", RuleDef::new(lt, ParamKind::Numeric));
    registry.insert_rule("lte", RuleDef::new(lte, ParamKind::Numeric));

    registry.insert_rule("numeric", RuleDef::new(numeric, ParamKind::None));
    registry.insert_rule("email", RuleDef::new(email, ParamKind::None));
    registry.insert_rule("uuid", RuleDef::new(uuid, ParamKind::None));
    registry.insert_rule(
        "datetime",
        RuleDef::new(datetime, ParamKind::Checked(datetime_format_ok)),
    );

    registry.insert_rule("eqfield", RuleDef::new(eqfield, ParamKind::Field));

    registry.insert_alias(
        "number",
        vec![RawRule {
            name: "numeric".into(),
            param: None,
        }],
    );
}

/// Value must not be zero. Composites are checked deeply: a struct
/// whose fields are all recursively zero counts as absent.
fn required(ctx: &RuleContext) -> bool {
    if ctx.is_composite() {
        !inspect::is_deep_zero(ctx.value())
    } else {
        !inspect::is_zero(ctx.value())
    }
}

/// Shared body of the bound rules. Values without a magnitude and
/// unparseable bounds fail; the compiler rejects the latter up front,
/// so only custom callers can reach that arm.
fn bound(ctx: &RuleContext, cmp: fn(f64, f64) -> bool) -> bool {
    let limit = ctx.param().and_then(|p| p.parse::<f64>().ok());
    match (inspect::magnitude(ctx.value()), limit) {
        (Some(m), Some(b)) => cmp(m, b),
        _ => false,
    }
}

fn min(ctx: &RuleContext) -> bool {
    bound(ctx, |m, b| m >= b)
}

fn max(ctx: &RuleContext) -> bool {
    bound(ctx, |m, b| m <= b)
}

fn gt(ctx: &RuleContext) -> bool {
    bound(ctx, |m, b| m > b)
}

fn gte(ctx: &RuleContext) -> bool {
    bound(ctx, |m, b| m >= b)
}

fn lt(ctx: &RuleContext) -> bool {
    bound(ctx, |m, b| m < b)
}

fn lte(ctx: &RuleContext) -> bool {
    bound(ctx, |m, b| m <= b)
}

/// Any number, or a string of one or more ASCII digits.
fn numeric(ctx: &RuleContext) -> bool {
    match ctx.value() {
        Value::Number(_) => true,
        Value::String(s) => DIGITS_RE.is_match(s),
        _ => false,
    }
}

fn email(ctx: &RuleContext) -> bool {
    match ctx.value() {
        Value::String(s) => EMAIL_RE.is_match(s),
        _ => false,
    }
}

fn uuid(ctx: &RuleContext) -> bool {
    match ctx.value() {
        Value::String(s) => uuid::Uuid::parse_str(s).is_ok(),
        _ => false,
    }
}

/// String must parse under the strftime format given as parameter.
/// Date-only and time-only formats are accepted alongside full
/// datetimes.
fn datetime(ctx: &RuleContext) -> bool {
    match (ctx.value(), ctx.param()) {
        (Value::String(s), Some(fmt)) => {
            NaiveDateTime::parse_from_str(s, fmt).is_ok()
                || NaiveDate::parse_from_str(s, fmt).is_ok()
                || NaiveTime::parse_from_str(s, fmt).is_ok()
        }
        _ => false,
    }
}

/// Parameter check for `datetime`: the format itself must be a
/// well-formed strftime string, so a typo fails the chain instead of
/// failing every value at runtime.
fn datetime_format_ok(fmt: &str) -> bool {
    !StrftimeItems::new(fmt).any(|item| matches!(item, Item::Error))
}

/// Value must equal the resolved comparand exactly.
fn eqfield(ctx: &RuleContext) -> bool {
    ctx.other().map_or(false, |other| other == ctx.value())
}
