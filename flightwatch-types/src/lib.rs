//! # flightwatch-types
//!
//! Core types for vessel flight-data tracking. This crate defines the
//! universal schema shared between the tracking engine, persistence, and any
//! display frontend: scoped flight-data records, per-part histories with the
//! max-merge accumulation rule, and the live status structures.
//!
//! ## Design Goals
//!
//! - **Zero required dependencies**: Core types work without any serialization framework
//! - **Optional serialization**: Enable the `serde` feature for the structured persisted form
//! - **Host agnostic**: Knows nothing about any particular simulation; identity is opaque
//! - **Versioned schema**: Persisted state embeds version info for forward compatibility
//! - **Legacy compatible**: The packed-string history codec reads records written by
//!   older releases
//!
//! ## Features
//!
//! - `std` (default): Standard library support
//! - `serde`: Structured (de)serialization of histories and status snapshots
//!
//! ## Example
//!
//! ```rust
//! use flightwatch_types::PartHistory;
//!
//! let mut history = PartHistory::new("liquidEngine2");
//! history.add_sample("atmosphere", 12.5);
//! history.add_sample("space", 40.0);
//! history.add_sample("atmosphere", 9.0); // lower sample, credit is kept at 12.5
//!
//! assert_eq!(history.data_for_scope("atmosphere"), Some(12.5));
//! assert_eq!(history.to_string(), "liquidEngine2:atmosphere,12.5,0 space,40,0 ");
//! ```
//!
//! ## Schema Version
//!
//! The current schema version is **1**. The version is embedded in persisted
//! state so consumers can handle format evolution gracefully.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod history;
mod status;
mod version;

pub use history::*;
pub use status::*;
pub use version::*;

/// Current schema version.
///
/// Increment this when making breaking changes to the persisted state format.
/// Consumers should check this version and handle older formats appropriately.
pub const SCHEMA_VERSION: u32 = 1;
