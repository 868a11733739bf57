//! # Struct Descriptors
//!
//! Declarative rules for struct-shaped values.
//!
//! A descriptor lists a type's fields in declaration order, each with
//! a rule chain and, for fields holding further structs, nested
//! descriptors. Descriptors are plain data: nothing is resolved or
//! checked until an engine compiles them, so one descriptor can be
//! reused across engines with different rule sets.

use serde::Serialize;

/// Validation rules for one named struct type.
#[derive(Debug, Clone)]
pub struct StructRules {
    pub(crate) type_name: String,
    pub(crate) fields: Vec<FieldRules>,
}

/// Rules for a single field of a described type.
#[derive(Debug, Clone)]
pub struct FieldRules {
    pub(crate) name: String,
    pub(crate) chain: String,
    pub(crate) nested: Option<StructRules>,
}

impl StructRules {
    /// Starts a descriptor for the named type. The name appears in
    /// diagnostics only; it carries no resolution semantics.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    /// Declares a field with a rule chain. Fields validate in the
    /// order they are declared. An empty chain declares the field
    /// without applying any rule to it.
    pub fn field(mut self, name: impl Into<String>, chain: impl Into<String>) -> Self {
        self.fields.push(FieldRules {
            name: name.into(),
            chain: chain.into(),
            nested: None,
        });
        self
    }

    /// Declares a field whose value holds further structs. When the
    /// chain has no `dive`, the nested rules apply to the field value
    /// itself; with `dive`, they apply to each traversed entry.
    pub fn nested(
        mut self,
        name: impl Into<String>,
        chain: impl Into<String>,
        rules: StructRules,
    ) -> Self {
        self.fields.push(FieldRules {
            name: name.into(),
            chain: chain.into(),
            nested: Some(rules),
        });
        self
    }

    /// Name of the described type.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}

/// Types that carry their own validation rules.
///
/// Implementors pair a serializable shape with the descriptor that
/// judges it, letting [`Engine::validate`](crate::Engine::validate)
/// take the value alone.
pub trait Validate: Serialize {
    /// The rules describing this type.
    fn rules() -> StructRules;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_keep_declaration_order() {
        let rules = StructRules::new("LoginStruct")
            .field("Email", "required,email")
            .field("Password", "required,min=8");

        assert_eq!(rules.type_name(), "LoginStruct");
        assert_eq!(rules.fields.len(), 2);
        assert_eq!(rules.fields[0].name, "Email");
        assert_eq!(rules.fields[1].name, "Password");
        assert_eq!(rules.fields[1].chain, "required,min=8");
    }

    #[test]
    fn test_nested_rules_attach_to_their_field() {
        let address = StructRules::new("Address")
            .field("City", "required")
            .field("Country", "required");
        let user = StructRules::new("User")
            .field("Id", "required")
            .nested("Address", "required", address);

        assert!(user.fields[0].nested.is_none());
        let nested = user.fields[1].nested.as_ref().unwrap();
        assert_eq!(nested.type_name(), "Address");
        assert_eq!(nested.fields.len(), 2);
    }
}
