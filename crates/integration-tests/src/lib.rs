//! Integration tests for the Lynora storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p lynora-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `shopping_flow` - browse, cart and checkout against the in-memory store
//! - `checkout_flow` - order pricing, validation and failure handling
//! - `data_service` - the HTTP client against a fake `PostgREST` server
//! - `session_identity` - session persistence on disk
//!
//! No external services are needed: [`fake_postgrest::FakePostgrest`] serves
//! the REST interface from memory on a random local port.

pub mod fake_postgrest;
pub mod fixtures;
