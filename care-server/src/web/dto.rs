//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::availability::FacilitySchedule;
use crate::domain::AvailabilitySlot;
use crate::engine::{ProviderMatches, SearchResult, Suggestion};

/// Query for the initial (unfiltered) hospital listing.
#[derive(Debug, Deserialize)]
pub struct InitialHospitalsQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,

    #[serde(rename = "radiusKm")]
    pub radius_km: Option<f64>,
}

/// Query for the filtered search.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,

    /// Free-text query: doctor name, specialization, or hospital name
    pub q: Option<String>,

    /// Specialization-only filter
    pub specialty: Option<String>,

    /// Date in YYYY-MM-DD
    pub date: Option<String>,

    /// Clock time in HH:MM
    pub time: Option<String>,

    #[serde(rename = "withinMinutes")]
    pub within_minutes: Option<i64>,

    #[serde(rename = "radiusKm")]
    pub radius_km: Option<f64>,
}

/// Query for the per-hospital doctor listing.
#[derive(Debug, Deserialize)]
pub struct DoctorsQuery {
    /// Date in YYYY-MM-DD; selects the flat single-day shape
    pub date: Option<String>,

    /// Doctor name or specialization filter
    pub q: Option<String>,
}

/// Query for autocomplete suggestions.
#[derive(Debug, Deserialize)]
pub struct AutocompleteQuery {
    pub q: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// One ranked hospital in a search response.
#[derive(Debug, Serialize)]
pub struct HospitalResult {
    pub hospital_id: u32,
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lon: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    pub route_distance_meters: f64,
    pub travel_time_minutes: u32,

    /// Present on unfiltered searches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_count: Option<usize>,

    /// Present on filtered searches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matching_doctors: Option<Vec<DoctorSummary>>,
}

impl HospitalResult {
    pub fn from_result(result: &SearchResult) -> Self {
        let (doctor_count, matching_doctors) = match &result.providers {
            ProviderMatches::Count(n) => (Some(*n), None),
            ProviderMatches::Listed(providers) => (
                None,
                Some(providers.iter().map(DoctorSummary::from_provider).collect()),
            ),
        };

        Self {
            hospital_id: result.facility.id.0,
            name: result.facility.name.clone(),
            address: result.facility.address.clone(),
            lat: result.facility.location.lat,
            lon: result.facility.location.lon,
            phone: result.facility.phone.clone(),
            route_distance_meters: result.route_distance_meters,
            travel_time_minutes: result.travel_time_minutes,
            doctor_count,
            matching_doctors,
        }
    }
}

/// A doctor reference in a search result.
#[derive(Debug, Serialize)]
pub struct DoctorSummary {
    pub doctor_id: u32,
    pub name: String,
    pub specialization: String,
}

impl DoctorSummary {
    fn from_provider(provider: &crate::domain::Provider) -> Self {
        Self {
            doctor_id: provider.id.0,
            name: provider.name.clone(),
            specialization: provider.category.clone(),
        }
    }
}

/// A weekly slot as `HH:MM` strings.
#[derive(Debug, Serialize)]
pub struct SlotDto {
    pub day_of_week: u8,
    pub start_time: String,
    pub end_time: String,
}

impl SlotDto {
    fn from_slot(slot: &AvailabilitySlot) -> Self {
        Self {
            day_of_week: slot.day_of_week.as_u8(),
            start_time: slot.start_time.format("%H:%M").to_string(),
            end_time: slot.end_time.format("%H:%M").to_string(),
        }
    }
}

/// One row in a doctor listing; shape follows the response's
/// `isGroupedByDoctor` flag.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum DoctorEntry {
    /// All weekly slots for one doctor
    Grouped {
        doctor_id: u32,
        name: String,
        specialization: String,
        slots: Vec<SlotDto>,
    },
    /// One slot on the requested day, with the doctor's full set of
    /// working days at this hospital
    ForDay {
        doctor_id: u32,
        name: String,
        specialization: String,
        start_time: String,
        end_time: String,
        available_days: Vec<u8>,
    },
}

/// Doctor listing for one hospital.
#[derive(Debug, Serialize)]
pub struct DoctorListingResponse {
    #[serde(rename = "isGroupedByDoctor")]
    pub is_grouped_by_doctor: bool,
    pub doctors: Vec<DoctorEntry>,
}

impl DoctorListingResponse {
    pub fn from_schedule(schedule: FacilitySchedule) -> Self {
        match schedule {
            FacilitySchedule::Grouped(schedules) => Self {
                is_grouped_by_doctor: true,
                doctors: schedules
                    .into_iter()
                    .map(|s| DoctorEntry::Grouped {
                        doctor_id: s.provider.id.0,
                        name: s.provider.name,
                        specialization: s.provider.category,
                        slots: s.slots.iter().map(SlotDto::from_slot).collect(),
                    })
                    .collect(),
            },
            FacilitySchedule::FlatForDay(rows) => Self {
                is_grouped_by_doctor: false,
                doctors: rows
                    .into_iter()
                    .map(|row| DoctorEntry::ForDay {
                        doctor_id: row.provider.id.0,
                        name: row.provider.name,
                        specialization: row.provider.category,
                        start_time: row.slot.start_time.format("%H:%M").to_string(),
                        end_time: row.slot.end_time.format("%H:%M").to_string(),
                        available_days: row.available_days.iter().map(|d| d.as_u8()).collect(),
                    })
                    .collect(),
            },
        }
    }
}

/// One autocomplete suggestion on the wire.
#[derive(Debug, Serialize)]
pub struct SuggestionDto {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub id: String,
    pub primary_text: String,
    pub secondary_text: String,
    pub tertiary_text: String,
    pub priority: u8,
}

impl SuggestionDto {
    pub fn from_suggestion(suggestion: Suggestion) -> Self {
        Self {
            kind: suggestion.kind.as_str(),
            id: suggestion.id,
            primary_text: suggestion.primary_text,
            secondary_text: suggestion.secondary_text,
            tertiary_text: suggestion.tertiary_text,
            priority: suggestion.kind.priority(),
        }
    }
}

/// Error body returned by all endpoints.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::{DaySlot, ProviderSchedule};
    use crate::domain::{DayOfWeek, FacilityId, Provider, ProviderId};
    use chrono::NaiveTime;

    fn provider() -> Provider {
        Provider {
            id: ProviderId(4),
            name: "Asha Rao".to_string(),
            category: "Cardiology".to_string(),
        }
    }

    fn slot(day: u8) -> AvailabilitySlot {
        AvailabilitySlot::new(
            ProviderId(4),
            FacilityId(7),
            DayOfWeek::new(day).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn grouped_listing_sets_flag_and_nests_slots() {
        let schedule = FacilitySchedule::Grouped(vec![ProviderSchedule {
            provider: provider(),
            slots: vec![slot(1), slot(3)],
        }]);

        let response = DoctorListingResponse::from_schedule(schedule);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["isGroupedByDoctor"], true);
        assert_eq!(json["doctors"][0]["doctor_id"], 4);
        assert_eq!(json["doctors"][0]["slots"][0]["day_of_week"], 1);
        assert_eq!(json["doctors"][0]["slots"][0]["start_time"], "09:00");
    }

    #[test]
    fn flat_listing_carries_available_days() {
        let schedule = FacilitySchedule::FlatForDay(vec![DaySlot {
            provider: provider(),
            slot: slot(3),
            available_days: vec![
                DayOfWeek::new(1).unwrap(),
                DayOfWeek::new(3).unwrap(),
                DayOfWeek::new(5).unwrap(),
            ],
        }]);

        let response = DoctorListingResponse::from_schedule(schedule);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["isGroupedByDoctor"], false);
        assert_eq!(
            json["doctors"][0]["available_days"],
            serde_json::json!([1, 3, 5])
        );
        assert_eq!(json["doctors"][0]["end_time"], "13:00");
    }

    fn facility(phone: Option<&str>) -> crate::domain::Facility {
        use crate::domain::{Coordinate, Facility};
        Facility {
            id: FacilityId(7),
            name: "District General".to_string(),
            address: "Main Rd".to_string(),
            location: Coordinate::new(22.35, 87.31),
            phone: phone.map(str::to_string),
        }
    }

    #[test]
    fn hospital_result_carries_phone_when_present() {
        let with_phone = SearchResult {
            facility: facility(Some("03222-255190")),
            route_distance_meters: 4000.0,
            travel_time_minutes: 6,
            providers: ProviderMatches::Count(3),
        };
        let json = serde_json::to_value(HospitalResult::from_result(&with_phone)).unwrap();
        assert_eq!(json["phone"], "03222-255190");

        let without = SearchResult {
            facility: facility(None),
            route_distance_meters: 4000.0,
            travel_time_minutes: 6,
            providers: ProviderMatches::Count(3),
        };
        let json = serde_json::to_value(HospitalResult::from_result(&without)).unwrap();
        assert!(json.get("phone").is_none());
    }

    #[test]
    fn count_and_list_are_mutually_exclusive_on_the_wire() {
        let facility = facility(None);

        let counted = SearchResult {
            facility: facility.clone(),
            route_distance_meters: 4000.0,
            travel_time_minutes: 6,
            providers: ProviderMatches::Count(3),
        };
        let json = serde_json::to_value(HospitalResult::from_result(&counted)).unwrap();
        assert_eq!(json["doctor_count"], 3);
        assert!(json.get("matching_doctors").is_none());

        let listed = SearchResult {
            facility,
            route_distance_meters: 4000.0,
            travel_time_minutes: 6,
            providers: ProviderMatches::Listed(vec![provider()]),
        };
        let json = serde_json::to_value(HospitalResult::from_result(&listed)).unwrap();
        assert!(json.get("doctor_count").is_none());
        assert_eq!(json["matching_doctors"][0]["name"], "Asha Rao");
    }
}
