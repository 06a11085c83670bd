//! Weekly schedule types: ISO days of week and availability slots.

use chrono::{Datelike, NaiveDate, NaiveTime};

use super::error::DomainError;
use super::{FacilityId, ProviderId};

/// Error returned when a day-of-week number is out of range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid ISO day of week: {0} (expected 1-7)")]
pub struct InvalidDay(pub u8);

/// An ISO day of week: Monday = 1 through Sunday = 7.
///
/// Always derived from a calendar date or a validated number, never
/// from a weekday name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DayOfWeek(u8);

impl DayOfWeek {
    /// Validate an ISO day number (1-7).
    pub fn new(n: u8) -> Result<Self, InvalidDay> {
        if (1..=7).contains(&n) {
            Ok(Self(n))
        } else {
            Err(InvalidDay(n))
        }
    }

    /// The ISO day of week for a calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.weekday().number_from_monday() as u8)
    }

    /// The ISO day number, 1-7.
    pub fn as_u8(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A weekly interval during which a provider is present at a facility.
///
/// Overlapping slots for the same provider and day are tolerated; they
/// just mean duplicate availability.
#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilitySlot {
    pub provider_id: ProviderId,
    pub facility_id: FacilityId,
    pub day_of_week: DayOfWeek,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl AvailabilitySlot {
    /// Create a slot, enforcing `start_time < end_time`.
    pub fn new(
        provider_id: ProviderId,
        facility_id: FacilityId,
        day_of_week: DayOfWeek,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<Self, DomainError> {
        if start_time >= end_time {
            return Err(DomainError::InvalidSlotInterval {
                provider: provider_id,
                facility: facility_id,
            });
        }
        Ok(Self {
            provider_id,
            facility_id,
            day_of_week,
            start_time,
            end_time,
        })
    }

    /// Whether the slot covers the given clock time.
    ///
    /// Coverage is half-open: `[start_time, end_time)`.
    pub fn covers(&self, time: NaiveTime) -> bool {
        self.start_time <= time && time < self.end_time
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Every number 1-7 is a valid ISO day; everything else is not.
        #[test]
        fn day_validity(n in 0u8..=255) {
            let result = DayOfWeek::new(n);
            if (1..=7).contains(&n) {
                prop_assert_eq!(result.unwrap().as_u8(), n);
            } else {
                prop_assert!(result.is_err());
            }
        }

        /// Any date maps to a day in 1-7, and consecutive dates differ by
        /// one (modulo the week).
        #[test]
        fn day_from_date_in_range(days in 0i64..20_000) {
            let base = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
            let date = base + chrono::Duration::days(days);
            let day = DayOfWeek::from_date(date).as_u8();
            prop_assert!((1..=7).contains(&day));

            let next = DayOfWeek::from_date(date + chrono::Duration::days(1)).as_u8();
            prop_assert_eq!(next, day % 7 + 1);
        }
    }
}
