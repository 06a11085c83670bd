//! Search, ranking, and suggestion engine.
//!
//! Composes the road network, router, and availability index into
//! ranked facility results and autocomplete suggestions. The engine
//! owns nothing and mutates nothing: it borrows one snapshot for the
//! duration of one query.

mod config;
mod search;
mod suggest;


pub use config::EngineConfig;
pub use search::{ProviderMatches, SearchEngine, SearchError, SearchFilters, SearchResult};
pub use suggest::{Suggestion, SuggestionKind};
