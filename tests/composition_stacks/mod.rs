//! Scenario modules for pattern composition.
//!
//! - [`delivery_pipeline`]: clients from a registry fanned out through one
//!   shared rate limiter.
//! - [`provider_budget`]: a provider send quota enforced through dispatch
//!   pacing.
//! - [`settings_wiring`]: a single settings document configuring every
//!   pattern builder.

mod delivery_pipeline;
mod provider_budget;
