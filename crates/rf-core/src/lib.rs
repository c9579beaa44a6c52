//! rusty-fund/crates/rf-core/src/lib.rs
//!
//! The central domain logic and interface definitions for Rusty-Fund:
//! funding aggregation, discovery and search over the `ProjectRepo` port.

pub mod models;
pub mod traits;
pub mod error;
pub mod funding;
pub mod discovery;
pub mod search;

// Re-exporting for easier access in other crates
pub use models::*;
pub use traits::*;
pub use error::*;
