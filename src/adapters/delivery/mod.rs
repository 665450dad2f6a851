//! Conversion delivery endpoints
//!
//! - [`ConversionDelivery`] - the capability the uploader retries against
//! - [`SimulatedDelivery`] - probabilistic stand-in for the ads API
//! - [`ScriptedDelivery`] - deterministic per-record attempt scripts

pub mod scripted;
pub mod simulated;
pub mod traits;

pub use scripted::{ScriptedAttempt, ScriptedDelivery};
pub use simulated::SimulatedDelivery;
pub use traits::ConversionDelivery;
