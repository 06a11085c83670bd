//! Cross-entity autocomplete suggestions.
//!
//! Three independent sources (providers, categories, facilities), each
//! capped, merged in fixed priority order and truncated. This path is
//! best-effort: it never fails the caller, it just returns fewer (or
//! zero) suggestions.

use std::collections::BTreeMap;

use crate::domain::Coordinate;

use super::search::SearchEngine;

/// What a suggestion points at. Variant order fixes display priority:
/// providers before categories before facilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SuggestionKind {
    Provider,
    Category,
    Facility,
}

impl SuggestionKind {
    /// Fixed merge priority: provider(1) < category(2) < facility(3).
    pub fn priority(self) -> u8 {
        match self {
            SuggestionKind::Provider => 1,
            SuggestionKind::Category => 2,
            SuggestionKind::Facility => 3,
        }
    }

    /// Wire name of the entity type.
    pub fn as_str(self) -> &'static str {
        match self {
            SuggestionKind::Provider => "doctor",
            SuggestionKind::Category => "specialty",
            SuggestionKind::Facility => "hospital",
        }
    }
}

/// One autocomplete suggestion.
///
/// `id` is the entity id for providers/facilities and the category
/// name itself for categories.
#[derive(Debug, Clone)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub id: String,
    pub primary_text: String,
    pub secondary_text: String,
    pub tertiary_text: String,
}

impl<'a> SearchEngine<'a> {
    /// Suggest entities matching `prefix`, merged by priority.
    ///
    /// An empty or whitespace prefix yields an empty list, not an
    /// error; autocomplete degrades silently.
    pub fn suggest(&self, prefix: &str, origin: Coordinate) -> Vec<Suggestion> {
        let needle = prefix.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let per_source = self.config.suggestions_per_source;
        let mut suggestions = Vec::new();

        // Providers by name.
        let mut providers: Vec<_> = self
            .availability
            .providers()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .collect();
        providers.sort_by(|a, b| (&a.name, a.id).cmp(&(&b.name, b.id)));
        providers.truncate(per_source);
        suggestions.extend(providers.into_iter().map(|p| Suggestion {
            kind: SuggestionKind::Provider,
            id: p.id.to_string(),
            primary_text: p.name.clone(),
            secondary_text: p.category.clone(),
            tertiary_text: String::new(),
        }));

        // Categories by substring, with a provider count aggregate.
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for provider in self.availability.providers() {
            if provider.category.to_lowercase().contains(&needle) {
                *counts.entry(provider.category.as_str()).or_default() += 1;
            }
        }
        let mut categories: Vec<(&str, usize)> = counts.into_iter().collect();
        categories.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        categories.truncate(per_source);
        suggestions.extend(categories.into_iter().map(|(name, count)| Suggestion {
            kind: SuggestionKind::Category,
            id: name.to_string(),
            primary_text: name.to_string(),
            secondary_text: format!("{count} doctors"),
            tertiary_text: String::new(),
        }));

        // Facilities by name, nearest (straight-line) first.
        let mut facilities: Vec<_> = self
            .facilities
            .iter()
            .filter(|f| f.name.to_lowercase().contains(&needle))
            .map(|f| (f, f.location.haversine_meters(&origin)))
            .collect();
        facilities.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.id.cmp(&b.0.id)));
        facilities.truncate(per_source);
        suggestions.extend(facilities.into_iter().map(|(f, distance)| Suggestion {
            kind: SuggestionKind::Facility,
            id: f.id.to_string(),
            primary_text: f.name.clone(),
            secondary_text: f.address.clone(),
            tertiary_text: format!("{:.1} km", distance / 1000.0),
        }));

        // Sources were appended in priority order already; the stable
        // sort keeps each source's internal ordering.
        suggestions.sort_by_key(|s| s.kind.priority());
        suggestions.truncate(self.config.suggestions_total);
        suggestions
    }
}
