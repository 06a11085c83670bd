//! Geospatial availability search server.
//!
//! A web service that answers: "from where I am standing, which hospitals
//! with a matching doctor can I reach soonest by road?"

pub mod availability;
pub mod domain;
pub mod engine;
pub mod network;
pub mod router;
pub mod store;
pub mod web;
