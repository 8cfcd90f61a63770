//! Core application logic for Clipbook
//!
//! This crate contains shared business logic for authentication,
//! booking, profile editing, and form validation.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod auth;
pub mod booking;
pub mod profile;
pub mod validation;
