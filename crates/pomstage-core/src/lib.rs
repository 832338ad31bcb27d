//! Core data types for pomstage.
//!
//! This crate defines the values that flow through every resolution stage:
//! dependency scopes, packaging types, artifact coordinates and their
//! identity keys, exclusions, immutable dependency declarations, and the
//! global tool configuration.
//!
//! This crate is intentionally free of XML handling and resolution logic.

pub mod config;
pub mod coordinate;
pub mod dependency;
pub mod packaging;
pub mod scope;
