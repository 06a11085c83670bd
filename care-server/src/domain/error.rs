//! Domain error types.
//!
//! These errors represent validation failures in the domain layer.
//! They are distinct from storage and web errors.

use super::{FacilityId, ProviderId};

/// Domain-level validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DomainError {
    /// A slot's start time is not strictly before its end time
    #[error("slot for provider {provider} at facility {facility} must have start < end")]
    InvalidSlotInterval {
        provider: ProviderId,
        facility: FacilityId,
    },
}
