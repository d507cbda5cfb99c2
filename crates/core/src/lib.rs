//! Lynora Core - Shared domain types.
//!
//! This crate provides common types used across the Lynora components:
//! - `storefront` - Cart, catalog, checkout and customization flows
//! - `cli` - Command-line shopper for the storefront
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no storage.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, session identifiers,
//!   order numbers, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
