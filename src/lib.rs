//! fieldcheck - A strict, deterministic rule-chain validation engine
//!
//! Values are judged by declarative rule chains such as
//! `"required,email"` or `"required,dive,required,min=3"`, either
//! directly or through struct descriptors that mirror a type's shape.
//!
//! The contract:
//! - Rule failures are data: a completed pass returns `Ok(Report)`,
//!   empty when the value passed.
//! - Misconfiguration is fatal: bad chains, unknown rules, and
//!   chain/value shape mismatches return `Err(ConfigError)` and never
//!   a partial report.
//! - Validation is deterministic: the same value and rules always
//!   produce the same report, in the same order.
//! - Rules are kind-driven: they judge what a value is, not what its
//!   field is called.
//!
//! ```
//! use fieldcheck::Engine;
//!
//! let engine = Engine::new();
//! let report = engine.validate_var("994444", "required,numeric,min=5,max=10")?;
//!
//! assert_eq!(report.len(), 1);
//! assert_eq!(report.errors()[0].rule(), "max");
//! # Ok::<(), fieldcheck::ConfigError>(())
//! ```

pub mod descriptor;
pub mod engine;
pub mod errors;
pub mod registry;
pub mod report;

mod inspect;
mod tag;

pub use descriptor::{StructRules, Validate};
pub use engine::Engine;
pub use errors::{ConfigError, ConfigResult};
pub use registry::RuleContext;
pub use report::{FieldError, Report};
