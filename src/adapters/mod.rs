//! External system integrations for the relay.
//!
//! - [`tabular`] - CSV input and output artifacts
//! - [`delivery`] - Endpoints that accept conversions (trait-based)
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies and
//! enable testing with deterministic implementations. The uploader only sees
//! the [`delivery::ConversionDelivery`] trait, so the simulated endpoint can be
//! swapped for a real ads API client.
//!
//! ```rust,no_run
//! use conversion_relay::adapters::delivery::SimulatedDelivery;
//! use conversion_relay::adapters::tabular::read_clean_records;
//! use conversion_relay::config::SimulationConfig;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let records = read_clean_records(Path::new("output/cleaned_conversions.csv"))?;
//! let delivery = SimulatedDelivery::from_config(&SimulationConfig::default())?;
//! println!("{} records ready for {:?}", records.len(), delivery);
//! # Ok(())
//! # }
//! ```

pub mod delivery;
pub mod tabular;
