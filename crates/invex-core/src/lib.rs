//! invex-core — inventory explorer core library.
//!
//! This crate holds everything that does not touch a terminal or a socket:
//! the inventory document model, the filter engine, the chunking helper used
//! by the tree renderer, the dumpsys report importer, and configuration.
//!
//! # Data flow
//!
//! ```text
//! Source ──► serde_json::Value ──► Inventory ──► filter() ──► FilterOutcome ──► UI
//!                  ▲
//!   dumpsys ───────┘
//! ```
//!
//! The filter engine is a pure function; loading and rendering live in the
//! `invex-sources` and `invex-tui` crates.

pub mod chunk;
pub mod config;
pub mod dumpsys;
pub mod error;
pub mod filter;
pub mod types;

pub use error::InvexError;
pub use filter::filter;
pub use types::{
    Characteristic, Device, DeviceId, FilterOutcome, FilterResult, FilteredDevice, Inventory,
    MatchCounts,
};
