//! Core traits shared across the Solseed crates.

use crate::SolseedResult;

/// Trait for validatable objects
pub trait Validatable {
    /// Validate this object
    fn validate(&self) -> SolseedResult<()>;

    /// Check if this object is valid
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}
