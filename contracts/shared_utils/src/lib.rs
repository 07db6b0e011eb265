#![no_std]

//! Shared utility library for the vault and registry contracts
//!
//! This library provides common functions, helpers, and patterns used across
//! the contracts in this workspace including:
//! - Math utilities (checked math, basis-point shares)
//! - Time utilities (timestamps, durations)
//! - Validation utilities
//! - Error event helpers
//! - Access control patterns (two-step ownership)
//! - Emergency pause pattern

pub mod access_control;
pub mod error_codes;
pub mod math;
pub mod pausable;
pub mod time;
pub mod validation;


pub use access_control::AccessControl;
pub use error_codes::emit_error_event;
pub use math::SafeMath;
pub use pausable::Pausable;
pub use time::TimeUtils;
pub use validation::Validation;
