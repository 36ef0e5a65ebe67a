//! # tribunal-types
//!
//! Shared types, errors, and configuration for the **Tribunal** settlement core.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Settlement terms**: [`Mandate`], [`Compact`], [`Claim`]
//! - **Decay curves**: [`DecaySegment`] and its packed 256-bit word layout
//! - **Disposition model**: [`Disposition`]
//! - **Execution context**: [`BlockContext`], [`CallContext`]
//! - **Events**: [`SettlementEvent`]
//! - **Configuration**: [`SettlementConfig`]
//! - **Errors**: [`TribunalError`] with `TB_ERR_` prefix codes
//! - **Constants**: type strings, WAD unit, packing widths

pub mod compact;
pub mod config;
pub mod constants;
pub mod context;
pub mod decay;
pub mod disposition;
pub mod error;
pub mod event;
pub mod mandate;

// Re-export all primary types at crate root for ergonomic imports:
//   use tribunal_types::{Mandate, Compact, Disposition, ...};

pub use compact::*;
pub use config::*;
pub use context::*;
pub use decay::*;
pub use disposition::*;
pub use error::*;
pub use event::*;
pub use mandate::*;

// Primitive types used across every public signature.
pub use alloy_primitives::{Address, B256, Bytes, U256};

// Constants are accessed via `tribunal_types::constants::FOO`
// (not re-exported to avoid name collisions).
