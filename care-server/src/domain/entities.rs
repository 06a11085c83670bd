//! Facility and provider records.

use super::{Coordinate, FacilityId, ProviderId};

/// A hospital or clinic location with a fixed coordinate.
#[derive(Debug, Clone)]
pub struct Facility {
    pub id: FacilityId,
    pub name: String,
    pub address: String,
    pub location: Coordinate,
    pub phone: Option<String>,
}

/// A doctor or specialist offering service at one or more facilities
/// on a weekly schedule.
#[derive(Debug, Clone)]
pub struct Provider {
    pub id: ProviderId,
    pub name: String,

    /// Specialization, matched case-insensitively by substring.
    pub category: String,
}
