//! Name-keyed value validation.

use crate::error::{Error, Result};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Broad JSON type of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Integer,
    Float,
    String,
    Array,
    Object,
}

impl ValueKind {
    /// Classify a value. Numbers with a fractional representation are `Float`.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(n) if n.is_f64() => ValueKind::Float,
            Value::Number(_) => ValueKind::Integer,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }
}

type Check = Box<dyn Fn(&Value) -> bool + Send + Sync>;

/// A predicate, optionally tied to the kind of value it accepts.
pub struct Rule {
    expected: Option<ValueKind>,
    check: Check,
}

impl Rule {
    /// Rule that only runs `check`.
    pub fn new(check: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Self {
            expected: None,
            check: Box::new(check),
        }
    }

    /// Rule that passes when `check` passes and the value is of kind `expected`.
    pub fn typed(
        expected: ValueKind,
        check: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            expected: Some(expected),
            check: Box::new(check),
        }
    }

    /// Evaluate the rule against `value`.
    pub fn accepts(&self, value: &Value) -> bool {
        (self.check)(value) && self.expected.is_none_or(|kind| ValueKind::of(value) == kind)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("expected", &self.expected)
            .finish_non_exhaustive()
    }
}

/// Validates values by looking up a [`Rule`] by name.
#[derive(Debug, Default)]
pub struct Validator {
    rules: HashMap<String, Rule>,
    always_valid: HashSet<ValueKind>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `rule` under `key`, replacing any previous rule.
    pub fn rule(mut self, key: impl Into<String>, rule: Rule) -> Self {
        self.rules.insert(key.into(), rule);
        self
    }

    /// Treat every value of `kind` as valid, whatever the key.
    pub fn always_valid(mut self, kind: ValueKind) -> Self {
        self.always_valid.insert(kind);
        self
    }

    /// Check `value` against the rule registered under `key`.
    ///
    /// Fails with [`Error::UndefinedKey`] when no rule exists for `key`, unless
    /// the value's kind is always valid.
    pub fn is_valid(&self, key: &str, value: &Value) -> Result<bool> {
        if self.always_valid.contains(&ValueKind::of(value)) {
            return Ok(true);
        }

        self.rules
            .get(key)
            .map(|rule| rule.accepts(value))
            .ok_or_else(|| Error::undefined_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn int_validator() -> Validator {
        Validator::new().rule("x", Rule::new(|v| ValueKind::of(v) == ValueKind::Integer))
    }

    #[test]
    fn test_is_valid() {
        assert!(int_validator().is_valid("x", &json!(5)).unwrap());
    }

    #[test]
    fn test_is_valid_false() {
        assert!(!int_validator().is_valid("x", &json!("5")).unwrap());
    }

    #[test]
    fn test_is_valid_missing_key() {
        let result = int_validator().is_valid("y", &json!(5));
        assert!(matches!(result, Err(Error::UndefinedKey { key }) if key == "y"));
    }

    #[test]
    fn test_typed_rule() {
        let rule = Rule::typed(ValueKind::Float, |v| v.as_f64().is_some_and(|n| n > 1.0));

        assert!(rule.accepts(&json!(1.1)));
        assert!(!rule.accepts(&json!(0.1)));
        // Right magnitude, wrong kind
        assert!(!rule.accepts(&json!(2)));
    }

    #[test]
    fn test_always_valid_kinds() {
        let validator = int_validator().always_valid(ValueKind::Null);

        assert!(validator.is_valid("x", &Value::Null).unwrap());
        assert!(validator.is_valid("undefined", &Value::Null).unwrap());
        assert!(validator.is_valid("undefined", &json!(1)).is_err());
    }

    #[test]
    fn test_value_kind_of() {
        assert_eq!(ValueKind::of(&json!(true)), ValueKind::Bool);
        assert_eq!(ValueKind::of(&json!(-3)), ValueKind::Integer);
        assert_eq!(ValueKind::of(&json!(2.5)), ValueKind::Float);
        assert_eq!(ValueKind::of(&json!([1, 2])), ValueKind::Array);
        assert_eq!(ValueKind::of(&json!({"a": 1})), ValueKind::Object);
    }
}
