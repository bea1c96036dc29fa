// SPDX-License-Identifier: MIT OR Apache-2.0
//! Command engine for `OrdoPlay` blueprint event graphs.
//!
//! Callers submit named commands with a JSON parameter map and get back a
//! JSON result map or a typed error. This crate provides:
//! - A type catalog abstraction with a built-in engine snapshot
//! - Symbolic type resolution with fallback spellings
//! - Default pin allocation per node kind
//! - Coercion of loose JSON values into pin literals
//! - The command table and its handlers
//!
//! ## Architecture
//!
//! Handlers are plain functions looked up by name. They hold no state
//! between calls: every call receives the blueprint store, a resolver over
//! a read-only catalog snapshot, and the request parameters.

pub mod catalog;
pub mod coerce;
pub mod dispatch;
pub mod error;
mod handlers;
pub mod params;
pub mod resolve;
pub mod response;
pub mod schema;
pub mod store;

#[cfg(test)]
mod test_support;

pub use catalog::{ClassDef, DelegateDef, FunctionDef, ParamDef, StaticCatalog, StructDef, TypeCatalog};
pub use coerce::{coerce_pin, CoerceError, Coercion};
pub use dispatch::{Dispatcher, Handler};
pub use error::CommandError;
pub use params::Params;
pub use resolve::{ResolveError, TypeResolver};
pub use response::{Payload, Request, Response};
pub use store::{Blueprint, BlueprintStore, InMemoryStore, VariableDef};
