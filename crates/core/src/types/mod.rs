//! Core types for Lynora.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod order_number;
pub mod price;
pub mod session;
pub mod status;

pub use id::*;
pub use order_number::{OrderNumber, OrderNumberError};
pub use price::Price;
pub use session::SessionId;
pub use status::*;
