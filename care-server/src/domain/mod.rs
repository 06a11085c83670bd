//! Domain types for the availability search engine.
//!
//! This module contains the core model types representing validated
//! geographic and scheduling data. Invariants are enforced at
//! construction time, so code that receives these types can trust
//! their validity.

mod coord;
mod entities;
mod error;
mod ids;
mod schedule;

pub use coord::Coordinate;
pub use entities::{Facility, Provider};
pub use error::DomainError;
pub use ids::{FacilityId, NodeId, ProviderId};
pub use schedule::{AvailabilitySlot, DayOfWeek, InvalidDay};
