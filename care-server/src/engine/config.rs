//! Engine tuning parameters.
//!
//! The average-speed constant lives here rather than inside the travel
//! time formula so tests can vary it deterministically.

/// Configuration for search, ranking, and suggestions.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Assumed average road speed used to derive travel time (km/h).
    pub avg_speed_kmh: f64,

    /// Floor for derived travel time (minutes).
    pub min_travel_minutes: u32,

    /// Cap on providers listed per facility in filtered results.
    pub max_listed_providers: usize,

    /// Per-source cap for autocomplete suggestions.
    pub suggestions_per_source: usize,

    /// Global cap for the merged autocomplete list.
    pub suggestions_total: usize,
}

impl EngineConfig {
    /// Create a configuration with the given parameters.
    pub fn new(
        avg_speed_kmh: f64,
        min_travel_minutes: u32,
        max_listed_providers: usize,
        suggestions_per_source: usize,
        suggestions_total: usize,
    ) -> Self {
        Self {
            avg_speed_kmh,
            min_travel_minutes,
            max_listed_providers,
            suggestions_per_source,
            suggestions_total,
        }
    }

    /// Derive a travel time estimate from a road distance.
    ///
    /// `max(floor, round((km / speed) * 60))` — time is a function of
    /// distance and the configured speed, never a second routing metric.
    pub fn travel_time_minutes(&self, distance_meters: f64) -> u32 {
        let minutes = (distance_meters / 1000.0 / self.avg_speed_kmh * 60.0).round() as u32;
        minutes.max(self.min_travel_minutes)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            avg_speed_kmh: 40.0,
            min_travel_minutes: 5,
            max_listed_providers: 10,
            suggestions_per_source: 5,
            suggestions_total: 7,
        }
    }
}
