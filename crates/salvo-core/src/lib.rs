//! Core types and definitions for the SALVO engagement engine.
//!
//! This crate defines the vocabulary shared by the engine and its callers:
//! kinematics, weapon and defense components, commands, events, per-tick
//! reports, constants and the fatal error type. It has no ECS or RNG dependency.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;

pub use error::{EngineError, Result};
