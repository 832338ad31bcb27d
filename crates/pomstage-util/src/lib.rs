//! Shared utilities for pomstage.
//!
//! This crate provides the cross-cutting concerns used by every other pomstage
//! crate: the error taxonomy raised by the resolution stages, a couple of
//! filesystem helpers for locating project descriptors and settings files,
//! and Cargo-style status lines for the command-line front end.

pub mod errors;
pub mod fs;
pub mod progress;
