//! Core infrastructure for breakwater.
//!
//! This crate provides shared functionality used across all breakwater crates:
//! - Event system for observability
//! - The [`Fault`] taxonomy that classifies outbound-operation failures
//! - [`Settings`], the shared tuning knobs loaded from configuration

pub mod events;
mod fault;
mod settings;

pub use events::{EventListener, PatternEvent};
pub use fault::{FailureKind, Fault, FaultClass};
pub use settings::Settings;
