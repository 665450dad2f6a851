//! Domain models and types for the relay.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`ClickId`], [`ActionId`])
//! - **Conversion records** ([`RawConversionRecord`], [`CleanConversionRecord`])
//! - **Upload outcomes** ([`UploadOutcome`], [`UploadStatus`])
//! - **Error types** ([`RelayError`], [`DeliveryError`])
//! - **Result type alias** ([`Result`])
//!
//! # Invariants
//!
//! A [`CleanConversionRecord`] can only be built from a non-empty click ID and
//! a strictly positive value, so code that receives one never re-checks them:
//!
//! ```rust
//! use conversion_relay::domain::{CleanConversionRecord, ClickId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let gclid = ClickId::new("ABC123")?;
//! assert!(CleanConversionRecord::new(gclid, None, 0.0, "spring_sale").is_err());
//! # Ok(())
//! # }
//! ```

pub mod conversion;
pub mod errors;
pub mod ids;
pub mod outcome;
pub mod result;

// Re-export commonly used types for convenience
pub use conversion::{CleanConversionRecord, ConversionTime, RawConversionRecord, ValueCategory};
pub use errors::{DeliveryError, RelayError};
pub use ids::{ActionId, ClickId};
pub use outcome::{UploadOutcome, UploadStatus, PERSISTENT_FAILURE_MESSAGE};
pub use result::Result;
