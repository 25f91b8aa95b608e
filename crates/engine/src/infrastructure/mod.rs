//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod clock;
pub mod config;
pub mod correlation;
pub mod fragments;
pub mod localizer;
pub mod ports;
pub mod sqlite;
