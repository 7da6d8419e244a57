//! dittotrip-admin/crates/dt-core/src/lib.rs
//!
//! The central console logic and interface definitions for the DittoTrip
//! admin console: records, drafts, ports, and the screen controllers the web
//! layer drives.

pub mod display;
pub mod drafts;
pub mod error;
pub mod list;
pub mod models;
pub mod overlay;
pub mod pagination;
pub mod resources;
pub mod search;
pub mod selection;
pub mod session;
pub mod traits;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use traits::*;
