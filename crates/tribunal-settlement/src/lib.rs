//! # tribunal-settlement
//!
//! **Settlement plane**: claim disposition, reentrancy protection, and the
//! fill / cancel / quote entry points.
//!
//! ## Architecture
//!
//! [`SettlementOrchestrator`] receives a claim and its mandate and:
//! 1. Rejects reentrant calls ([`ReentrancyLock`])
//! 2. Validates expiry and the target block designation
//! 3. Evaluates the decay curve and scales amounts by priority fee
//! 4. Records the disposition exactly once ([`ClaimRegistry`])
//! 5. Pays the recipient through the [`Ledger`]
//! 6. Relays the outcome through the [`DirectiveProcessor`]
//!
//! Hosts supply the collaborators. [`InMemoryLedger`] and
//! [`NoopDirectiveProcessor`] cover single-process use and tests.

pub mod collaborators;
pub mod ledger;
pub mod orchestrator;
pub mod reentrancy;
pub mod registry;

pub use collaborators::{
    Checkpoint, DirectiveContext, DirectiveProcessor, Ledger, NoopDirectiveProcessor,
    SponsorAuthenticator,
};
pub use ledger::{InMemoryLedger, LedgerSnapshot};
pub use orchestrator::{FillOutcome, FillTarget, SettlementOrchestrator};
pub use reentrancy::{ReentrancyGuard, ReentrancyLock};
pub use registry::ClaimRegistry;
