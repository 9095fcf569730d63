//! Atelier Verde Core - Shared types library.
//!
//! This crate provides common types used across all Atelier Verde components:
//! - `cart` - Client-held cart model and price calculator
//! - `client` - HTTP client for the storefront backend
//! - `cli` - Command-line shopping and management tool
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients,
//! no storage access. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
