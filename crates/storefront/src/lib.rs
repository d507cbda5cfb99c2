//! Lynora Storefront library.
//!
//! Session identity, the session-scoped cart, catalog filtering, checkout and
//! customization requests, over a hosted data service. Front ends (the CLI)
//! build an [`state::AppState`] and drive the services it hands out.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod customize;
pub mod error;
pub mod models;
pub mod session;
pub mod state;
pub mod store;
pub mod supabase;

#[cfg(test)]
mod test_support;
