// SPDX-License-Identifier: MIT OR Apache-2.0
//! Handles to catalog types stamped onto nodes and pins.
//!
//! A handle records the short name and the full object path of a class,
//! struct or function. Handles are produced by type resolution and never
//! point back into the catalog.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Object path of the built-in 3-component vector struct
pub const VECTOR_STRUCT_PATH: &str = "/Script/CoreUObject.Vector";

/// Reference to a class
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassRef {
    /// Short class name (e.g. `UGameplayStatics`)
    pub name: String,
    /// Full object path (e.g. `/Script/Engine.GameplayStatics`)
    pub path: String,
}

impl ClassRef {
    /// Create a new class reference
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

impl fmt::Display for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Reference to a struct
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructRef {
    /// Short struct name (e.g. `FVector`)
    pub name: String,
    /// Full object path (e.g. `/Script/CoreUObject.Vector`)
    pub path: String,
}

impl StructRef {
    /// Create a new struct reference
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// The built-in 3-component vector struct
    pub fn vector() -> Self {
        Self::new("FVector", VECTOR_STRUCT_PATH)
    }

    /// Whether this is the 3-component vector struct
    pub fn is_vector(&self) -> bool {
        self.path == VECTOR_STRUCT_PATH
    }
}

impl fmt::Display for StructRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Reference to a member function
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionRef {
    /// Class that declares the function
    pub owner: ClassRef,
    /// Function name
    pub name: String,
}

impl FunctionRef {
    /// Create a new function reference
    pub fn new(owner: ClassRef, name: impl Into<String>) -> Self {
        Self {
            owner,
            name: name.into(),
        }
    }
}

impl fmt::Display for FunctionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.owner.name, self.name)
    }
}
