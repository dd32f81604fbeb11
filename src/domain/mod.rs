//! Domain layer containing the wizard's business rules and types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machines)
//! - `taxonomy` - Reference vocabularies, normalization, and selection
//! - `listing` - The draft entity, its field catalog, and its persisted/wire shapes
//! - `validation` - Pure field rules with focus hints
//! - `wizard` - Step ordering and lifecycle status

pub mod foundation;
pub mod listing;
pub mod taxonomy;
pub mod validation;
pub mod wizard;
