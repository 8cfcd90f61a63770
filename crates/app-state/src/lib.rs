//! Application state management for Clipbook
//!
//! This crate provides reactive state for the booking flow, tracking
//! the selected provider and day and deriving the schedule the
//! screens render.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod availability;
