//! Error handling for plenum-engine
//!
//! Engine entry points return the canonical fault envelope. The granular
//! [`plenum_core::errors::ApiError`] values raised by core operations
//! convert at the boundary through `?`.

use plenum_core::errors::ApiFault;

/// Result type alias using ApiFault
pub type Result<T> = std::result::Result<T, ApiFault>;
