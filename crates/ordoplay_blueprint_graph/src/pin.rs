// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pin definitions for node inputs/outputs.

use crate::types::{ClassRef, StructRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PinId(pub Uuid);

impl PinId {
    /// Create a new random pin ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PinId {
    fn default() -> Self {
        Self::new()
    }
}

/// Pin direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PinDirection {
    /// Input pin
    Input,
    /// Output pin
    Output,
}

/// Category tag of a pin type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PinCategory {
    /// Execution flow
    Exec,
    /// Boolean value
    Boolean,
    /// 32-bit integer
    Int,
    /// Floating point value
    Float,
    /// Name value
    Name,
    /// String value
    String,
    /// Localized text
    Text,
    /// Struct value (sub-type names the struct)
    Struct,
    /// Object reference (sub-type names the class)
    Object,
    /// Class reference (sub-type names the base class)
    Class,
    /// Delegate binding
    Delegate,
    /// Any type
    Wildcard,
}

impl PinCategory {
    /// Lower-case tag used in logs and responses
    pub fn tag(self) -> &'static str {
        match self {
            Self::Exec => "exec",
            Self::Boolean => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Name => "name",
            Self::String => "string",
            Self::Text => "text",
            Self::Struct => "struct",
            Self::Object => "object",
            Self::Class => "class",
            Self::Delegate => "delegate",
            Self::Wildcard => "wildcard",
        }
    }
}

impl fmt::Display for PinCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Optional sub-type carried by struct/object/class pins
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PinSubType {
    /// Struct sub-type
    Struct(StructRef),
    /// Class sub-type
    Class(ClassRef),
}

/// Type descriptor of a pin
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PinType {
    /// Category tag
    pub category: PinCategory,
    /// Sub-type reference
    #[serde(default)]
    pub sub_type: Option<PinSubType>,
    /// Whether the pin carries an array of the category
    #[serde(default)]
    pub is_array: bool,
}

impl PinType {
    /// Create a pin type with no sub-type
    pub fn new(category: PinCategory) -> Self {
        Self {
            category,
            sub_type: None,
            is_array: false,
        }
    }

    /// Execution flow
    pub fn exec() -> Self {
        Self::new(PinCategory::Exec)
    }

    /// Boolean value
    pub fn boolean() -> Self {
        Self::new(PinCategory::Boolean)
    }

    /// Integer value
    pub fn int() -> Self {
        Self::new(PinCategory::Int)
    }

    /// Float value
    pub fn float() -> Self {
        Self::new(PinCategory::Float)
    }

    /// String value
    pub fn string() -> Self {
        Self::new(PinCategory::String)
    }

    /// Struct value of the given struct
    pub fn structure(struct_ref: StructRef) -> Self {
        Self {
            category: PinCategory::Struct,
            sub_type: Some(PinSubType::Struct(struct_ref)),
            is_array: false,
        }
    }

    /// 3-component vector struct
    pub fn vector() -> Self {
        Self::structure(StructRef::vector())
    }

    /// Object reference of the given class
    pub fn object(class: ClassRef) -> Self {
        Self {
            category: PinCategory::Object,
            sub_type: Some(PinSubType::Class(class)),
            is_array: false,
        }
    }

    /// Class reference constrained to the given base class
    pub fn class(base: ClassRef) -> Self {
        Self {
            category: PinCategory::Class,
            sub_type: Some(PinSubType::Class(base)),
            is_array: false,
        }
    }

    /// Delegate binding
    pub fn delegate() -> Self {
        Self::new(PinCategory::Delegate)
    }

    /// Mark as array
    pub fn array(mut self) -> Self {
        self.is_array = true;
        self
    }

    /// Whether this is the 3-component vector struct type
    pub fn is_vector(&self) -> bool {
        self.category == PinCategory::Struct
            && !self.is_array
            && matches!(&self.sub_type, Some(PinSubType::Struct(s)) if s.is_vector())
    }

    /// Check if this type can connect to another type
    pub fn can_connect_to(&self, other: &PinType) -> bool {
        // Wildcards adapt to anything
        if self.category == PinCategory::Wildcard || other.category == PinCategory::Wildcard {
            return true;
        }

        if self.is_array != other.is_array {
            return false;
        }

        match (self.category, other.category) {
            (PinCategory::Exec, PinCategory::Exec) => true,
            (PinCategory::Exec, _) | (_, PinCategory::Exec) => false,
            // Numeric conversions
            (PinCategory::Int, PinCategory::Float) | (PinCategory::Float, PinCategory::Int) => true,
            (PinCategory::Struct, PinCategory::Struct) => self.sub_type == other.sub_type,
            (a, b) => a == b,
        }
    }
}

impl fmt::Display for PinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.sub_type {
            Some(PinSubType::Struct(s)) => write!(f, "{}<{}>", self.category, s.name)?,
            Some(PinSubType::Class(c)) => write!(f, "{}<{}>", self.category, c.name)?,
            None => write!(f, "{}", self.category)?,
        }
        if self.is_array {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

/// A pin on a node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pin {
    /// Unique pin ID
    pub id: PinId,
    /// Pin name, unique within its node
    pub name: String,
    /// Pin direction
    pub direction: PinDirection,
    /// Type descriptor
    pub pin_type: PinType,
    /// Literal used when the pin is unconnected
    #[serde(default)]
    pub default_value: String,
    /// Class literal for class-reference pins
    #[serde(default)]
    pub default_object: Option<ClassRef>,
}

impl Pin {
    /// Create a new pin
    pub fn new(name: impl Into<String>, direction: PinDirection, pin_type: PinType) -> Self {
        Self {
            id: PinId::new(),
            name: name.into(),
            direction,
            pin_type,
            default_value: String::new(),
            default_object: None,
        }
    }

    /// Create a new input pin
    pub fn input(name: impl Into<String>, pin_type: PinType) -> Self {
        Self::new(name, PinDirection::Input, pin_type)
    }

    /// Create a new output pin
    pub fn output(name: impl Into<String>, pin_type: PinType) -> Self {
        Self::new(name, PinDirection::Output, pin_type)
    }

    /// Set the default literal
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = value.into();
        self
    }

    /// Whether this is an execution pin
    pub fn is_exec(&self) -> bool {
        self.pin_type.category == PinCategory::Exec
    }

    /// Whether the pin may hold more than one link.
    ///
    /// Exec outputs and data inputs take a single link; exec inputs and
    /// data outputs fan in/out freely.
    pub fn accepts_multiple_links(&self) -> bool {
        match self.direction {
            PinDirection::Output => !self.is_exec(),
            PinDirection::Input => self.is_exec(),
        }
    }

    /// Check if a link to another pin is valid
    pub fn can_connect(&self, other: &Pin) -> bool {
        // Must be opposite directions
        if self.direction == other.direction {
            return false;
        }

        self.pin_type.can_connect_to(&other.pin_type)
    }
}
