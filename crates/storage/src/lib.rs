//! Storage layer for Clipbook
//!
//! This crate provides the on-device persistence used by the client:
//! a sled-backed key-value store with JSON-encoded values.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod kv;
