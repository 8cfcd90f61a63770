//! Clipbook Booking Client Library
//!
//! This crate provides the client side of the Clipbook booking service,
//! including the REST transport, typed endpoint calls through the
//! BookingAgent, and persistent session management.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod agent;
pub mod rest;
pub mod session;
pub mod types;

pub use agent::BookingAgent;
pub use types::{AvailabilitySlot, Provider, User};
