//! Mint gate pipeline for the Soul registry.
//!
//! Every public or privileged mint passes through the gate before a
//! registry creates a token. The gate runs an ordered pipeline of stages
//! (mode, restriction, window, supply, per-source) and stops at the first
//! failure.
//!
//! # Quick Start
//!
//! ```rust
//! use soul_gate::{GateContext, MintConfig, MintGate, MintRequest};
//! use soul_types::{Address, Timestamp};
//!
//! let gate = MintGate::with_default_stages();
//! let config = MintConfig::open(10_000, 1);
//! let request = MintRequest::public(Address::from_raw([1u8; 32]), 0);
//! assert!(gate.check(&config, &request, &GateContext::new(Timestamp(100))).is_ok());
//! ```

pub mod config;
pub mod error;
pub mod gate;
pub mod stage;
pub mod stages;

pub use config::{MintConfig, MintMode};
pub use error::GatingError;
pub use gate::{GateResult, MintGate};
pub use stage::{GateContext, GateStage, MintRequest, StageDecision, StageResult, TokenHolder};
pub use stages::{ModeStage, PerSourceCapStage, RestrictionStage, SupplyStage, WindowStage};
