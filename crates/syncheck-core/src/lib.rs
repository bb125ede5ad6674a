//! Core types for answering batched synonym queries.
//!
//! Provides input framing ([`input`]), the neighbor-set relation engine
//! ([`engine::NeighborMapping`], [`engine::evaluate`]), the per-phase driver
//! ([`phase::run_phases`]), and TOML/env configuration.

pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod phase;

pub use error::{Result, SyncheckError};
