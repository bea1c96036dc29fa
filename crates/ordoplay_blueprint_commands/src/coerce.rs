// SPDX-License-Identifier: MIT OR Apache-2.0
//! Coercion of loose JSON values into pin literals.
//!
//! Every (pin lane, JSON kind) pair maps to one rule in [`rule_for`]. A rule
//! either stores a literal on the pin, skips the value (best effort, logged
//! by the caller), or fails the whole command. Rules only ever touch the
//! pin's default literal, never its links.

use crate::resolve::{ResolveError, TypeResolver};
use crate::schema;
use ordoplay_blueprint_graph::{Pin, PinCategory, PinSubType};
use serde_json::Value;

/// How a pin's literal is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lane {
    /// Class reference, resolved by name
    ClassRef,
    /// Integer, rounded
    Int,
    /// Float, canonical text
    Float,
    /// Boolean, `true`/`false`
    Bool,
    /// 3-component vector struct
    Vector,
    /// Anything else, via the generic setter
    Other,
}

impl Lane {
    /// Lane of a pin
    pub fn of(pin: &Pin) -> Self {
        if pin.pin_type.is_vector() {
            return Self::Vector;
        }
        match pin.pin_type.category {
            PinCategory::Class => Self::ClassRef,
            PinCategory::Int => Self::Int,
            PinCategory::Float => Self::Float,
            PinCategory::Boolean => Self::Bool,
            _ => Self::Other,
        }
    }
}

/// JSON value kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// `null`
    Null,
    /// `true`/`false`
    Bool,
    /// Any number
    Number,
    /// Any string
    String,
    /// Any array
    Array,
    /// Any object
    Object,
}

impl ValueKind {
    /// Kind of a JSON value
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    /// Lower-case name used in messages
    pub fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

/// Outcome of a coercion that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Coercion {
    /// The literal was stored
    Applied,
    /// The value was ignored; the reason is meant for logs
    Skipped(&'static str),
}

/// Error that fails the whole command
#[derive(Debug, thiserror::Error)]
pub enum CoerceError {
    /// The value cannot be stored on this pin
    #[error("Type mismatch on pin '{pin}': expected {expected}, got {found}")]
    TypeMismatch {
        /// Pin name
        pin: String,
        /// Expected value shape
        expected: String,
        /// JSON kind received
        found: &'static str,
    },

    /// A class reference did not resolve
    #[error(transparent)]
    Resolution(#[from] ResolveError),
}

type Rule = fn(&mut Pin, &Value, &TypeResolver<'_>) -> Result<Coercion, CoerceError>;

/// Rule for a (lane, kind) pair
pub fn rule_for(lane: Lane, kind: ValueKind) -> Rule {
    use Lane as L;
    use ValueKind as K;
    match (lane, kind) {
        (L::ClassRef, K::String) => class_from_name,
        (L::ClassRef, K::Array) => skip_array,
        (L::ClassRef, _) => mismatch,
        (L::Int, K::Number | K::String) => int_from_number,
        (L::Float, K::Number | K::String) => float_from_number,
        (L::Bool, K::Bool | K::Number | K::String) => bool_from_value,
        (L::Vector, K::Array) => vector_from_array,
        (L::Vector, K::String) => generic_from_string,
        (L::Int | L::Float | L::Bool | L::Vector, K::Null | K::Object) => skip_unsupported,
        (L::Int | L::Float | L::Vector, K::Bool) | (L::Vector, K::Number) => mismatch,
        (L::Int | L::Float | L::Bool | L::Other, K::Array) => skip_array,
        (L::Other, K::String) => generic_from_string,
        (L::Other, K::Number) => float_from_number,
        (L::Other, K::Bool) => bool_from_value,
        (L::Other, K::Null | K::Object) => skip_unsupported,
    }
}

/// Store `value` on `pin` using the pin's lane
pub fn coerce_pin(pin: &mut Pin, value: &Value, resolver: &TypeResolver<'_>) -> Result<Coercion, CoerceError> {
    let rule = rule_for(Lane::of(pin), ValueKind::of(value));
    rule(pin, value, resolver)
}

/// Canonical float text: shortest round-trip digits, always with a
/// fractional part (`1.0`, `0.5`, `-2.25`)
pub fn sanitize_float(value: f32) -> String {
    let text = value.to_string();
    if text.contains(['.', 'i', 'N']) {
        text
    } else {
        format!("{text}.0")
    }
}

/// Round half up, the way literal integers are produced
pub fn round_to_int(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

/// Vector literal, six decimals per component
pub fn vector_literal(x: f32, y: f32, z: f32) -> String {
    format!("(X={x:.6},Y={y:.6},Z={z:.6})")
}

fn mismatch_error(pin: &Pin, expected: impl Into<String>, value: &Value) -> CoerceError {
    CoerceError::TypeMismatch {
        pin: pin.name.clone(),
        expected: expected.into(),
        found: ValueKind::of(value).name(),
    }
}

fn number_of(pin: &Pin, value: &Value) -> Result<f64, CoerceError> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| mismatch_error(pin, "a finite number", value)),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| mismatch_error(pin, "a numeric string", value)),
        _ => Err(mismatch_error(pin, "a number", value)),
    }
}

fn mismatch(pin: &mut Pin, value: &Value, _: &TypeResolver<'_>) -> Result<Coercion, CoerceError> {
    let expected = match Lane::of(pin) {
        Lane::ClassRef => "a class name".to_string(),
        Lane::Vector => "a 3-element numeric array".to_string(),
        _ => pin.pin_type.to_string(),
    };
    Err(mismatch_error(pin, expected, value))
}

fn skip_unsupported(_: &mut Pin, _: &Value, _: &TypeResolver<'_>) -> Result<Coercion, CoerceError> {
    Ok(Coercion::Skipped("value kind not supported for this pin"))
}

fn skip_array(_: &mut Pin, _: &Value, _: &TypeResolver<'_>) -> Result<Coercion, CoerceError> {
    Ok(Coercion::Skipped("array parameter type not supported"))
}

fn class_from_name(pin: &mut Pin, value: &Value, resolver: &TypeResolver<'_>) -> Result<Coercion, CoerceError> {
    let name = value.as_str().unwrap_or_default();
    let class = resolver.resolve_class(name)?;

    if let Some(PinSubType::Class(base)) = &pin.pin_type.sub_type {
        if !resolver.is_child_of(class, &base.name) {
            return Err(CoerceError::TypeMismatch {
                pin: pin.name.clone(),
                expected: format!("a subclass of {}", base.name),
                found: "class name",
            });
        }
    }

    pin.default_value = class.path.clone();
    pin.default_object = Some(class.to_ref());
    Ok(Coercion::Applied)
}

fn int_from_number(pin: &mut Pin, value: &Value, _: &TypeResolver<'_>) -> Result<Coercion, CoerceError> {
    let number = number_of(pin, value)?;
    pin.default_value = round_to_int(number).to_string();
    Ok(Coercion::Applied)
}

fn float_from_number(pin: &mut Pin, value: &Value, _: &TypeResolver<'_>) -> Result<Coercion, CoerceError> {
    let number = number_of(pin, value)?;
    pin.default_value = sanitize_float(number as f32);
    Ok(Coercion::Applied)
}

fn bool_from_value(pin: &mut Pin, value: &Value, _: &TypeResolver<'_>) -> Result<Coercion, CoerceError> {
    let flag = match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => true,
            "false" | "no" | "0" => false,
            _ => return Err(mismatch_error(pin, "true or false", value)),
        },
        _ => return Err(mismatch_error(pin, "true or false", value)),
    };
    pin.default_value = if flag { "true" } else { "false" }.to_string();
    Ok(Coercion::Applied)
}

fn vector_from_array(pin: &mut Pin, value: &Value, _: &TypeResolver<'_>) -> Result<Coercion, CoerceError> {
    let Some(items) = value.as_array() else {
        return Ok(Coercion::Skipped("array parameter type not supported"));
    };
    let components: Option<Vec<f64>> = items.iter().map(Value::as_f64).collect();
    match components.as_deref() {
        Some(&[x, y, z]) => {
            pin.default_value = vector_literal(x as f32, y as f32, z as f32);
            Ok(Coercion::Applied)
        }
        _ => Ok(Coercion::Skipped("array parameter type not supported")),
    }
}

fn generic_from_string(pin: &mut Pin, value: &Value, _: &TypeResolver<'_>) -> Result<Coercion, CoerceError> {
    let text = value.as_str().unwrap_or_default();
    if schema::try_set_default_value(pin, text) {
        Ok(Coercion::Applied)
    } else {
        Ok(Coercion::Skipped("pin does not take a literal"))
    }
}
