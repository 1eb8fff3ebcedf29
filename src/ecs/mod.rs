//! Entity/component substrate
//!
//! A closed tagged-union component model: the store is keyed by
//! `ComponentKind` so queries are exhaustive at compile time.

pub mod components;
pub mod store;

pub use components::*;
pub use store::{Component, ComponentKind, EntityStore};
