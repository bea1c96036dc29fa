// SPDX-License-Identifier: MIT OR Apache-2.0
//! Symbolic type resolution.
//!
//! Names arrive hand-typed: with or without the conventional prefix, as a
//! short name or a full object path, in any case. Each lookup walks an
//! ordered list of strategies and stops at the first hit:
//!
//! 1. Exact short name
//! 2. Full object path, when the name looks like one
//! 3. Short name with a conventional prefix prepended
//! 4. Case-insensitive scan of every entry, comparing full names and names
//!    with the prefix stripped on both sides
//!
//! Resolution never mutates the catalog. For a fixed catalog the same name
//! always yields the same entry; ambiguous scans take the first entry in
//! catalog order.

use crate::catalog::{CatalogEntry, ClassDef, DelegateDef, FunctionDef, StructDef, TypeCatalog};

/// Prefix marking a full script object path
pub const SCRIPT_PATH_PREFIX: &str = "/Script/";

/// Conventional class name prefixes, tried in order
pub const CLASS_PREFIXES: &[&str] = &["U", "A"];

/// Conventional struct name prefixes
pub const STRUCT_PREFIXES: &[&str] = &["F"];

/// Error when a name cannot be resolved
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// No class matched
    #[error("Failed to resolve class: {0}")]
    Class(String),

    /// No struct matched
    #[error("Failed to resolve struct type: {0}")]
    Struct(String),

    /// No function matched on the owner's chain
    #[error("Function not found: {function} in target {owner}")]
    Function {
        /// Requested function name
        function: String,
        /// Requested owner, or the blueprint when none was given
        owner: String,
    },
}

/// Resolves names against a catalog snapshot
#[derive(Clone, Copy)]
pub struct TypeResolver<'a> {
    catalog: &'a dyn TypeCatalog,
}

impl<'a> TypeResolver<'a> {
    /// Create a resolver over a catalog
    pub fn new(catalog: &'a dyn TypeCatalog) -> Self {
        Self { catalog }
    }

    /// Resolve a class name
    pub fn resolve_class(&self, name: &str) -> Result<&'a ClassDef, ResolveError> {
        let catalog = self.catalog;
        resolve_entry(
            name,
            "class",
            CLASS_PREFIXES,
            &[],
            catalog.classes(),
            |n| catalog.find_class(n),
            |p| catalog.load_class(p),
        )
        .ok_or_else(|| ResolveError::Class(name.trim().to_string()))
    }

    /// Resolve a struct name
    pub fn resolve_struct(&self, name: &str) -> Result<&'a StructDef, ResolveError> {
        let catalog = self.catalog;
        resolve_entry(
            name,
            "struct",
            STRUCT_PREFIXES,
            &[],
            catalog.structs(),
            |n| catalog.find_struct(n),
            |p| catalog.load_struct(p),
        )
        .ok_or_else(|| ResolveError::Struct(name.trim().to_string()))
    }

    /// Resolve the owner class of a function call target.
    ///
    /// Same as [`resolve_class`](Self::resolve_class), with the component
    /// spellings `U<Target>Component` and `<Target>Component` tried right
    /// after the prefixed lookup.
    pub fn resolve_call_target(&self, target: &str) -> Result<&'a ClassDef, ResolveError> {
        let catalog = self.catalog;
        let trimmed = target.trim();
        let component_spellings = [format!("U{trimmed}Component"), format!("{trimmed}Component")];
        resolve_entry(
            target,
            "call target",
            CLASS_PREFIXES,
            &component_spellings,
            catalog.classes(),
            |n| catalog.find_class(n),
            |p| catalog.load_class(p),
        )
        .ok_or_else(|| ResolveError::Class(trimmed.to_string()))
    }

    /// A class followed by its ancestors, nearest first.
    ///
    /// `class` need not live in the catalog (a blueprint's generated class
    /// does not); its parents are looked up by name. Unknown parents end
    /// the chain, as does a cycle.
    pub fn ancestors<'b>(&self, class: &'b ClassDef) -> Vec<&'b ClassDef>
    where
        'a: 'b,
    {
        let mut chain = vec![class];
        let mut current = class;
        while let Some(parent) = current
            .super_class
            .as_deref()
            .and_then(|name| self.catalog.find_class(name))
        {
            if chain.iter().any(|c| c.name == parent.name) {
                tracing::warn!(class = %class.name, parent = %parent.name, "class hierarchy cycles");
                break;
            }
            chain.push(parent);
            current = parent;
        }
        chain
    }

    /// Whether `class` is `base` or descends from it
    pub fn is_child_of(&self, class: &ClassDef, base: &str) -> bool {
        self.ancestors(class).iter().any(|c| c.name == base)
    }

    /// Find a function on `owner` or its ancestors.
    ///
    /// Each class is searched for an exact name first and then
    /// case-insensitively before moving on to its parent. Returns the
    /// declaring class with the function.
    pub fn resolve_function<'b>(
        &self,
        owner: &'b ClassDef,
        name: &str,
    ) -> Option<(&'b ClassDef, &'b FunctionDef)>
    where
        'a: 'b,
    {
        for class in self.ancestors(owner) {
            let exact = class.functions.iter().find(|f| f.name == name);
            let found = exact.or_else(|| {
                class
                    .functions
                    .iter()
                    .find(|f| f.name.eq_ignore_ascii_case(name))
            });
            if let Some(function) = found {
                tracing::debug!(function = %function.name, class = %class.name, "resolved function");
                return Some((class, function));
            }
        }
        None
    }

    /// Find a delegate property on `owner` or its ancestors (exact name)
    pub fn find_delegate<'b>(&self, owner: &'b ClassDef, name: &str) -> Option<(&'b ClassDef, &'b DelegateDef)>
    where
        'a: 'b,
    {
        self.ancestors(owner).into_iter().find_map(|class| {
            class
                .delegates
                .iter()
                .find(|d| d.name == name)
                .map(|d| (class, d))
        })
    }
}

/// Whether `name` already carries `prefix` (prefix followed by an upper-case
/// letter, so `Actor` does not count as `A`-prefixed)
fn has_prefix(name: &str, prefix: &str) -> bool {
    name.strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_uppercase()))
}

fn strip_prefix<'s>(name: &'s str, prefixes: &[&str]) -> &'s str {
    prefixes
        .iter()
        .find(|p| has_prefix(name, p))
        .map_or(name, |p| &name[p.len()..])
}

fn resolve_entry<'a, T: CatalogEntry>(
    name: &str,
    category: &'static str,
    prefixes: &[&str],
    extra_spellings: &[String],
    entries: &'a [T],
    find: impl Fn(&str) -> Option<&'a T>,
    load: impl Fn(&str) -> Option<&'a T>,
) -> Option<&'a T> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    if let Some(found) = find(name) {
        tracing::debug!(category, name, strategy = "exact", "resolved");
        return Some(found);
    }

    if name.starts_with(SCRIPT_PATH_PREFIX) {
        if let Some(found) = load(name) {
            tracing::debug!(category, name, strategy = "path", "resolved");
            return Some(found);
        }
    }

    for prefix in prefixes {
        if has_prefix(name, prefix) {
            continue;
        }
        if let Some(found) = find(&format!("{prefix}{name}")) {
            tracing::debug!(category, name, prefix, strategy = "prefixed", "resolved");
            return Some(found);
        }
    }

    for spelling in extra_spellings {
        if let Some(found) = find(spelling) {
            tracing::debug!(category, name, spelling = %spelling, strategy = "spelling", "resolved");
            return Some(found);
        }
    }

    // `AIController` reads as `A`-prefixed, so the unstripped name is
    // compared as well
    let wanted = strip_prefix(name, prefixes);
    let found = entries.iter().find(|entry| {
        entry.name().eq_ignore_ascii_case(name)
            || entry.path().eq_ignore_ascii_case(name)
            || {
                let bare = strip_prefix(entry.name(), prefixes);
                bare.eq_ignore_ascii_case(wanted) || bare.eq_ignore_ascii_case(name)
            }
    });
    match found {
        Some(entry) => tracing::debug!(category, name, resolved = entry.name(), strategy = "scan", "resolved"),
        None => tracing::debug!(category, name, "no match after every strategy"),
    }
    found
}
