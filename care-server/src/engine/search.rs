//! Facility search and ranking.
//!
//! One query flows through a fixed pipeline: snap the origin, build the
//! candidate facility set (text/category filters, availability
//! predicates, straight-line geofence), run a single batched Dijkstra
//! for every candidate, then rank by road distance.
//!
//! The radius filter is deliberately a crow-flies geofence while the
//! ranking metric is road distance. A facility slightly farther by road
//! but closer as the crow flies can be included while one just outside
//! the geofence is excluded; that asymmetry is documented behavior, not
//! a bug.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

use crate::availability::{AvailabilityIndex, AvailabilityPredicate};
use crate::domain::{Coordinate, DayOfWeek, Facility, NodeId, Provider};
use crate::network::{NetworkError, RoadNetwork};
use crate::router::shortest_paths;

use super::config::EngineConfig;

/// Error from a facility search.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SearchError {
    /// Invalid input, rejected before any computation
    #[error("invalid search input: {0}")]
    InvalidInput(String),

    /// The road network cannot answer the query
    #[error(transparent)]
    Network(#[from] NetworkError),
}

/// Optional filters applied to a search.
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    /// Free-text query matching provider name, provider category, or
    /// facility name.
    pub query: Option<String>,

    /// Category (specialization) substring filter.
    pub category: Option<String>,

    /// Restrict to providers available on this date.
    pub date: Option<NaiveDate>,

    /// With `date`: the clock time that must fall inside a slot.
    /// A time with no date is rejected as invalid input.
    pub time: Option<NaiveTime>,

    /// Restrict to providers available at `now + N minutes`.
    pub within_minutes: Option<i64>,

    /// Straight-line geofence radius around the origin, in kilometers.
    pub radius_km: Option<f64>,
}

impl SearchFilters {
    /// Filters that keep every facility.
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether any text or category restriction is present.
    fn has_text_filter(&self) -> bool {
        self.query.is_some() || self.category.is_some()
    }

    /// Resolve the date/time and within-minutes filters into instant
    /// predicates. The two are independent and are ANDed together.
    ///
    /// Rejects a `time` without a `date` and a `within_minutes` that
    /// would overflow the calendar, so the engine never computes
    /// against a half-formed filter.
    fn predicates(&self, now: NaiveDateTime) -> Result<Vec<AvailabilityPredicate>, SearchError> {
        let mut predicates = Vec::new();

        if self.time.is_some() && self.date.is_none() {
            return Err(SearchError::InvalidInput(
                "time filter requires a date".to_string(),
            ));
        }
        if let Some(date) = self.date {
            predicates.push(AvailabilityPredicate {
                day: DayOfWeek::from_date(date),
                time: self.time,
            });
        }
        if let Some(minutes) = self.within_minutes {
            let instant = Duration::try_minutes(minutes)
                .and_then(|offset| now.checked_add_signed(offset))
                .ok_or_else(|| {
                    SearchError::InvalidInput(format!("withinMinutes out of range: {minutes}"))
                })?;
            predicates.push(AvailabilityPredicate {
                day: DayOfWeek::from_date(instant.date()),
                time: Some(instant.time()),
            });
        }

        Ok(predicates)
    }
}

/// Providers attached to one result.
#[derive(Debug, Clone)]
pub enum ProviderMatches {
    /// Unfiltered search: just how many providers work at the facility.
    Count(usize),
    /// Filtered search: the matching providers, capped, ordered by name.
    Listed(Vec<Provider>),
}

/// One ranked search result.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub facility: Facility,
    pub route_distance_meters: f64,
    pub travel_time_minutes: u32,
    pub providers: ProviderMatches,
}

/// The search engine: a pure query layer over one immutable snapshot.
///
/// Holds no mutable state, so any number of searches may run
/// concurrently against the same snapshot.
pub struct SearchEngine<'a> {
    pub(super) network: &'a RoadNetwork,
    pub(super) availability: &'a AvailabilityIndex,
    pub(super) facilities: &'a [Facility],
    pub(super) config: &'a EngineConfig,
}

impl<'a> SearchEngine<'a> {
    /// Create an engine over one snapshot's stores.
    pub fn new(
        network: &'a RoadNetwork,
        availability: &'a AvailabilityIndex,
        facilities: &'a [Facility],
        config: &'a EngineConfig,
    ) -> Self {
        Self {
            network,
            availability,
            facilities,
            config,
        }
    }

    /// Find facilities matching the filters, ranked by road distance
    /// from `origin` (ties broken by facility id).
    ///
    /// `now` anchors the `within_minutes` filter; callers pass the wall
    /// clock, tests pass a fixed instant.
    pub fn search(
        &self,
        origin: Coordinate,
        filters: &SearchFilters,
        now: NaiveDateTime,
    ) -> Result<Vec<SearchResult>, SearchError> {
        if !origin.is_valid() {
            return Err(SearchError::InvalidInput(
                "origin latitude/longitude out of range".to_string(),
            ));
        }

        let predicates = filters.predicates(now)?;

        // Resolve the origin once; every candidate shares this source.
        let origin_node = self.network.nearest_node(&origin)?;

        // Category pre-restriction via the availability index. This is
        // a superset of the final per-facility match (it ignores the
        // clock-time part of the predicates) used to skip facilities
        // cheaply.
        let category_facilities: Option<HashSet<_>> = filters.category.as_deref().map(|c| {
            self.availability
                .find_by_category(c, filters.date.map(DayOfWeek::from_date))
                .into_iter()
                .map(|(_, facility)| facility)
                .collect()
        });

        let unfiltered = !filters.has_text_filter() && predicates.is_empty();
        let query_lower = filters.query.as_deref().map(str::to_lowercase);

        // Candidate set construction must finish before routing so the
        // router runs exactly once per query.
        let mut candidates: Vec<(&Facility, Vec<Provider>, NodeId)> = Vec::new();
        let mut target_nodes: HashSet<NodeId> = HashSet::new();

        for facility in self.facilities {
            if let Some(radius_km) = filters.radius_km {
                // Crow-flies geofence, independent of road distance.
                if facility.location.haversine_meters(&origin) > radius_km * 1000.0 {
                    continue;
                }
            }
            if let Some(allowed) = &category_facilities {
                if !allowed.contains(&facility.id) {
                    continue;
                }
            }

            // A facility whose own name matches the text query counts
            // even when no provider name/category does; its matching
            // providers are then everyone available at the right time.
            let name_match = query_lower
                .as_deref()
                .is_some_and(|q| facility.name.to_lowercase().contains(q));

            let matching = self.availability.matching_providers(
                facility.id,
                if name_match {
                    None
                } else {
                    filters.query.as_deref()
                },
                filters.category.as_deref(),
                &predicates,
            );

            if !unfiltered && matching.is_empty() {
                continue;
            }

            let node = self.network.nearest_node(&facility.location)?;
            target_nodes.insert(node);
            candidates.push((facility, matching, node));
        }

        // One Dijkstra run for the whole batch.
        let costs = shortest_paths(self.network, origin_node, &target_nodes);

        let mut results: Vec<SearchResult> = Vec::with_capacity(candidates.len());
        for (facility, matching, node) in candidates {
            // Unreachable candidates are silently excluded.
            let Some(cost) = costs.get(&node) else {
                continue;
            };

            let providers = if filters.has_text_filter() {
                let mut listed = matching;
                listed.truncate(self.config.max_listed_providers);
                ProviderMatches::Listed(listed)
            } else {
                ProviderMatches::Count(matching.len())
            };

            results.push(SearchResult {
                facility: facility.clone(),
                route_distance_meters: cost.distance_meters,
                travel_time_minutes: self.config.travel_time_minutes(cost.distance_meters),
                providers,
            });
        }

        results.sort_by(|a, b| {
            a.route_distance_meters
                .total_cmp(&b.route_distance_meters)
                .then_with(|| a.facility.id.cmp(&b.facility.id))
        });

        debug!(
            candidates = target_nodes.len(),
            results = results.len(),
            "search complete"
        );

        Ok(results)
    }
}
