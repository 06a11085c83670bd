//! Availability index: weekly provider schedules per facility.
//!
//! A read-only view over providers and their availability slots,
//! rebuilt whenever a snapshot is loaded. Category matching is
//! case-insensitive substring matching throughout, mirroring how the
//! data is queried by clients ("cardio" finds "Cardiology").

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveTime;

use crate::domain::{AvailabilitySlot, DayOfWeek, FacilityId, Provider, ProviderId};

/// An instant a matching provider must cover: an ISO day and,
/// optionally, a clock time that must fall within `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityPredicate {
    pub day: DayOfWeek,
    pub time: Option<NaiveTime>,
}

impl AvailabilityPredicate {
    /// Whether one slot satisfies this predicate.
    pub fn matches(&self, slot: &AvailabilitySlot) -> bool {
        slot.day_of_week == self.day && self.time.is_none_or(|t| slot.covers(t))
    }
}

/// One provider's weekly slots at a single facility.
#[derive(Debug, Clone)]
pub struct ProviderSchedule {
    pub provider: Provider,
    pub slots: Vec<AvailabilitySlot>,
}

/// A single-day listing row: the provider, the slot on that day, and
/// every ISO day the provider works at the facility (so clients can
/// render "also available on ...").
#[derive(Debug, Clone)]
pub struct DaySlot {
    pub provider: Provider,
    pub slot: AvailabilitySlot,
    pub available_days: Vec<DayOfWeek>,
}

/// Schedule listing for one facility.
///
/// The shape depends on whether a day filter was given; consumers
/// pattern-match instead of branching on a flag.
#[derive(Debug, Clone)]
pub enum FacilitySchedule {
    /// No day filter: one entry per provider, all weekly slots nested.
    Grouped(Vec<ProviderSchedule>),
    /// Day filter: flat (provider, slot) rows for that single day.
    FlatForDay(Vec<DaySlot>),
}

/// Read-only index over providers and their weekly availability.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityIndex {
    providers: HashMap<ProviderId, Provider>,
    /// Slots grouped per facility, each facility's slots ordered by
    /// (provider id, day, start time) for deterministic listings.
    by_facility: HashMap<FacilityId, Vec<AvailabilitySlot>>,
}

impl AvailabilityIndex {
    /// Build the index. Slots referencing unknown providers must have
    /// been rejected by the snapshot loader.
    pub fn new(providers: Vec<Provider>, mut slots: Vec<AvailabilitySlot>) -> Self {
        slots.sort_by(|a, b| {
            (a.provider_id, a.day_of_week, a.start_time).cmp(&(
                b.provider_id,
                b.day_of_week,
                b.start_time,
            ))
        });

        let mut by_facility: HashMap<FacilityId, Vec<AvailabilitySlot>> = HashMap::new();
        for slot in slots {
            by_facility.entry(slot.facility_id).or_default().push(slot);
        }

        Self {
            providers: providers.into_iter().map(|p| (p.id, p)).collect(),
            by_facility,
        }
    }

    /// Look up a provider by id.
    pub fn provider(&self, id: ProviderId) -> Option<&Provider> {
        self.providers.get(&id)
    }

    /// All providers, in unspecified order.
    pub fn providers(&self) -> impl Iterator<Item = &Provider> {
        self.providers.values()
    }

    /// Providers whose category contains `category` (case-insensitive),
    /// paired with each facility where they hold at least one slot.
    ///
    /// With a day given, only pairs holding a slot on that day count.
    pub fn find_by_category(
        &self,
        category: &str,
        day: Option<DayOfWeek>,
    ) -> BTreeSet<(ProviderId, FacilityId)> {
        let needle = category.to_lowercase();
        let mut pairs = BTreeSet::new();

        for (facility, slots) in &self.by_facility {
            for slot in slots {
                if day.is_some_and(|d| slot.day_of_week != d) {
                    continue;
                }
                let Some(provider) = self.providers.get(&slot.provider_id) else {
                    continue;
                };
                if provider.category.to_lowercase().contains(&needle) {
                    pairs.insert((provider.id, *facility));
                }
            }
        }

        pairs
    }

    /// The schedule listing for one facility.
    ///
    /// `query` restricts rows to providers whose name or category
    /// contains it (case-insensitive). Without a day the result groups
    /// all weekly slots per provider; with a day it is a flat list of
    /// that day's slots, each annotated with the provider's full set of
    /// working days at this facility, ordered by (category, name) as
    /// the listing is displayed.
    pub fn slots_for(
        &self,
        facility: FacilityId,
        day: Option<DayOfWeek>,
        query: Option<&str>,
    ) -> FacilitySchedule {
        let needle = query.map(str::to_lowercase);
        let slots = self
            .by_facility
            .get(&facility)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let mut grouped: BTreeMap<ProviderId, Vec<&AvailabilitySlot>> = BTreeMap::new();
        for slot in slots {
            grouped.entry(slot.provider_id).or_default().push(slot);
        }

        let matches_query = |provider: &Provider| {
            needle.as_deref().is_none_or(|n| {
                provider.name.to_lowercase().contains(n)
                    || provider.category.to_lowercase().contains(n)
            })
        };

        match day {
            None => {
                let mut schedules: Vec<ProviderSchedule> = grouped
                    .into_iter()
                    .filter_map(|(provider_id, slots)| {
                        let provider = self.providers.get(&provider_id)?;
                        if !matches_query(provider) {
                            return None;
                        }
                        Some(ProviderSchedule {
                            provider: provider.clone(),
                            slots: slots.into_iter().cloned().collect(),
                        })
                    })
                    .collect();
                schedules.sort_by(|a, b| {
                    (&a.provider.name, a.provider.id).cmp(&(&b.provider.name, b.provider.id))
                });
                FacilitySchedule::Grouped(schedules)
            }
            Some(day) => {
                let mut rows: Vec<DaySlot> = Vec::new();
                for (provider_id, provider_slots) in &grouped {
                    let Some(provider) = self.providers.get(provider_id) else {
                        continue;
                    };
                    if !matches_query(provider) {
                        continue;
                    }
                    let available_days: Vec<DayOfWeek> = provider_slots
                        .iter()
                        .map(|s| s.day_of_week)
                        .collect::<BTreeSet<_>>()
                        .into_iter()
                        .collect();
                    for slot in provider_slots {
                        if slot.day_of_week == day {
                            rows.push(DaySlot {
                                provider: provider.clone(),
                                slot: (*slot).clone(),
                                available_days: available_days.clone(),
                            });
                        }
                    }
                }
                rows.sort_by(|a, b| {
                    (&a.provider.category, &a.provider.name, a.slot.start_time).cmp(&(
                        &b.provider.category,
                        &b.provider.name,
                        b.slot.start_time,
                    ))
                });
                FacilitySchedule::FlatForDay(rows)
            }
        }
    }

    /// Providers at `facility` passing all the given filters, ordered
    /// by name (then id).
    ///
    /// `text` matches provider name or category; `category` matches the
    /// category only; both are case-insensitive substrings. Every
    /// predicate must be covered by at least one of the provider's
    /// slots at this facility.
    pub fn matching_providers(
        &self,
        facility: FacilityId,
        text: Option<&str>,
        category: Option<&str>,
        predicates: &[AvailabilityPredicate],
    ) -> Vec<Provider> {
        let text = text.map(str::to_lowercase);
        let category = category.map(str::to_lowercase);

        let slots = self
            .by_facility
            .get(&facility)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let mut grouped: BTreeMap<ProviderId, Vec<&AvailabilitySlot>> = BTreeMap::new();
        for slot in slots {
            grouped.entry(slot.provider_id).or_default().push(slot);
        }

        let mut matched: Vec<Provider> = grouped
            .into_iter()
            .filter_map(|(provider_id, provider_slots)| {
                let provider = self.providers.get(&provider_id)?;

                if let Some(needle) = text.as_deref() {
                    let hit = provider.name.to_lowercase().contains(needle)
                        || provider.category.to_lowercase().contains(needle);
                    if !hit {
                        return None;
                    }
                }
                if let Some(needle) = category.as_deref() {
                    if !provider.category.to_lowercase().contains(needle) {
                        return None;
                    }
                }
                let available = predicates
                    .iter()
                    .all(|p| provider_slots.iter().any(|s| p.matches(s)));
                if !available {
                    return None;
                }

                Some(provider.clone())
            })
            .collect();

        matched.sort_by(|a, b| (&a.name, a.id).cmp(&(&b.name, b.id)));
        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AvailabilitySlot;

    fn time(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    fn day(n: u8) -> DayOfWeek {
        DayOfWeek::new(n).unwrap()
    }

    fn provider(id: u32, name: &str, category: &str) -> Provider {
        Provider {
            id: ProviderId(id),
            name: name.to_string(),
            category: category.to_string(),
        }
    }

    fn slot(provider: u32, facility: u32, d: u8, start: &str, end: &str) -> AvailabilitySlot {
        AvailabilitySlot::new(
            ProviderId(provider),
            FacilityId(facility),
            day(d),
            time(start),
            time(end),
        )
        .unwrap()
    }

    /// Provider 1 (cardiology) works Mon/Wed/Fri at facility 7;
    /// provider 2 (orthopedics) works Wed at facility 7 and Tue at 8.
    fn fixture() -> AvailabilityIndex {
        AvailabilityIndex::new(
            vec![
                provider(1, "Asha Rao", "Cardiology"),
                provider(2, "Bimal Sen", "Orthopedics"),
            ],
            vec![
                slot(1, 7, 1, "09:00", "13:00"),
                slot(1, 7, 3, "09:00", "13:00"),
                slot(1, 7, 5, "14:00", "18:00"),
                slot(2, 7, 3, "10:00", "16:00"),
                slot(2, 8, 2, "10:00", "16:00"),
            ],
        )
    }

    #[test]
    fn category_match_is_case_insensitive_substring() {
        let index = fixture();

        let pairs = index.find_by_category("cardio", None);
        assert_eq!(
            pairs.into_iter().collect::<Vec<_>>(),
            vec![(ProviderId(1), FacilityId(7))]
        );

        let pairs = index.find_by_category("ORTHO", None);
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn category_day_filter_requires_a_slot_on_that_day() {
        let index = fixture();

        // Provider 1 has no Tuesday slot anywhere.
        assert!(index.find_by_category("cardio", Some(day(2))).is_empty());

        // Provider 2 works Tuesday only at facility 8.
        let pairs = index.find_by_category("ortho", Some(day(2)));
        assert_eq!(
            pairs.into_iter().collect::<Vec<_>>(),
            vec![(ProviderId(2), FacilityId(8))]
        );
    }

    #[test]
    fn grouped_listing_nests_all_weekly_slots() {
        let index = fixture();

        let FacilitySchedule::Grouped(schedules) = index.slots_for(FacilityId(7), None, None)
        else {
            panic!("expected grouped shape without a day filter");
        };

        assert_eq!(schedules.len(), 2);
        assert_eq!(schedules[0].provider.id, ProviderId(1));
        assert_eq!(schedules[0].slots.len(), 3);
        assert_eq!(schedules[1].provider.id, ProviderId(2));
        assert_eq!(schedules[1].slots.len(), 1);
    }

    #[test]
    fn day_listing_is_flat_and_annotated_with_available_days() {
        let index = fixture();

        let FacilitySchedule::FlatForDay(rows) =
            index.slots_for(FacilityId(7), Some(day(3)), None)
        else {
            panic!("expected flat shape with a day filter");
        };

        // Exactly one Wednesday row per provider; provider 1's row is
        // annotated with the full Mon/Wed/Fri working set.
        assert_eq!(rows.len(), 2);
        let p1_row = rows.iter().find(|r| r.provider.id == ProviderId(1)).unwrap();
        assert_eq!(
            p1_row
                .available_days
                .iter()
                .map(|d| d.as_u8())
                .collect::<Vec<_>>(),
            vec![1, 3, 5]
        );
        assert_eq!(p1_row.slot.day_of_week, day(3));
    }

    #[test]
    fn day_listing_sorted_by_category_then_name() {
        let index = fixture();

        let FacilitySchedule::FlatForDay(rows) =
            index.slots_for(FacilityId(7), Some(day(3)), None)
        else {
            panic!("expected flat shape");
        };

        let categories: Vec<&str> = rows.iter().map(|r| r.provider.category.as_str()).collect();
        assert_eq!(categories, vec!["Cardiology", "Orthopedics"]);
    }

    #[test]
    fn listing_query_filters_by_name_or_category() {
        let index = fixture();

        let FacilitySchedule::Grouped(schedules) =
            index.slots_for(FacilityId(7), None, Some("asha"))
        else {
            panic!("expected grouped shape");
        };
        assert_eq!(schedules.len(), 1);
        assert_eq!(schedules[0].provider.name, "Asha Rao");

        let FacilitySchedule::Grouped(schedules) =
            index.slots_for(FacilityId(7), None, Some("ortho"))
        else {
            panic!("expected grouped shape");
        };
        assert_eq!(schedules.len(), 1);
        assert_eq!(schedules[0].provider.id, ProviderId(2));
    }

    #[test]
    fn unknown_facility_has_empty_listing() {
        let index = fixture();
        let FacilitySchedule::Grouped(schedules) = index.slots_for(FacilityId(999), None, None)
        else {
            panic!("expected grouped shape");
        };
        assert!(schedules.is_empty());
    }

    #[test]
    fn matching_providers_applies_time_predicates_half_open() {
        let index = fixture();
        let at = |d: u8, t: &str| AvailabilityPredicate {
            day: day(d),
            time: Some(time(t)),
        };

        // 12:59 on Monday is inside provider 1's 09:00-13:00 slot.
        let matched = index.matching_providers(FacilityId(7), None, None, &[at(1, "12:59")]);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, ProviderId(1));

        // 13:00 is the exclusive end of that slot.
        let matched = index.matching_providers(FacilityId(7), None, None, &[at(1, "13:00")]);
        assert!(matched.is_empty());
    }

    #[test]
    fn matching_providers_requires_every_predicate() {
        let index = fixture();
        let on = |d: u8| AvailabilityPredicate {
            day: day(d),
            time: None,
        };

        // Provider 1 works both Monday and Friday at facility 7.
        let matched = index.matching_providers(FacilityId(7), None, None, &[on(1), on(5)]);
        assert_eq!(matched.len(), 1);

        // Nobody at facility 7 works both Monday and Tuesday.
        let matched = index.matching_providers(FacilityId(7), None, None, &[on(1), on(2)]);
        assert!(matched.is_empty());
    }

    #[test]
    fn matching_providers_text_matches_name_or_category() {
        let index = fixture();

        let matched = index.matching_providers(FacilityId(7), Some("sen"), None, &[]);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, ProviderId(2));

        let matched = index.matching_providers(FacilityId(7), Some("cardio"), None, &[]);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, ProviderId(1));
    }
}
