//! On-disk snapshot format.
//!
//! A snapshot is a single JSON document produced by the batch import
//! pipeline (road network extract plus the facility/provider/schedule
//! catalog). Raw records are validated here and converted into domain
//! types; nothing downstream ever sees unvalidated data.

use std::collections::HashSet;

use chrono::NaiveTime;
use serde::Deserialize;

use crate::availability::AvailabilityIndex;
use crate::domain::{
    AvailabilitySlot, Coordinate, DayOfWeek, Facility, FacilityId, Provider, ProviderId,
};
use crate::network::{GraphEdge, GraphNode, RoadNetwork};

use super::error::StoreError;
use super::Snapshot;

/// Top-level snapshot document.
#[derive(Debug, Deserialize)]
pub struct RawSnapshot {
    pub nodes: Vec<RawNode>,
    pub edges: Vec<RawEdge>,
    pub hospitals: Vec<RawFacility>,
    pub doctors: Vec<RawProvider>,
    pub availability: Vec<RawSlot>,
}

#[derive(Debug, Deserialize)]
pub struct RawNode {
    pub id: u64,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Deserialize)]
pub struct RawEdge {
    pub id: u64,
    pub source: u64,
    pub target: u64,
    pub length_m: f64,
    pub cost_s: f64,
}

#[derive(Debug, Deserialize)]
pub struct RawFacility {
    pub hospital_id: u32,
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawProvider {
    pub doctor_id: u32,
    pub name: String,
    pub specialization: String,
}

#[derive(Debug, Deserialize)]
pub struct RawSlot {
    pub doctor_id: u32,
    pub hospital_id: u32,
    pub day_of_week: u8,
    pub start_time: String,
    pub end_time: String,
}

/// Parse a schedule clock time, accepting `HH:MM` or `HH:MM:SS`.
fn parse_clock(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

/// Validate a raw snapshot and build the in-memory stores.
pub fn build_snapshot(raw: RawSnapshot) -> Result<Snapshot, StoreError> {
    // Nodes: unique ids, valid coordinates.
    let mut node_ids: HashSet<u64> = HashSet::new();
    let mut nodes = Vec::with_capacity(raw.nodes.len());
    for n in raw.nodes {
        if !node_ids.insert(n.id) {
            return Err(StoreError::Validation(format!("duplicate node id {}", n.id)));
        }
        let location = Coordinate::new(n.lat, n.lon);
        if !location.is_valid() {
            return Err(StoreError::Validation(format!(
                "node {} has invalid coordinates ({}, {})",
                n.id, n.lat, n.lon
            )));
        }
        nodes.push(GraphNode {
            id: crate::domain::NodeId(n.id),
            location,
        });
    }

    // Edges: both endpoints known, non-negative weights.
    let mut edges = Vec::with_capacity(raw.edges.len());
    for e in raw.edges {
        for endpoint in [e.source, e.target] {
            if !node_ids.contains(&endpoint) {
                return Err(StoreError::Validation(format!(
                    "edge {} references unknown node {endpoint}",
                    e.id
                )));
            }
        }
        let weights_ok = e.length_m.is_finite()
            && e.length_m >= 0.0
            && e.cost_s.is_finite()
            && e.cost_s >= 0.0;
        if !weights_ok {
            return Err(StoreError::Validation(format!(
                "edge {} has a negative or non-finite weight",
                e.id
            )));
        }
        edges.push(GraphEdge {
            id: e.id,
            source: crate::domain::NodeId(e.source),
            target: crate::domain::NodeId(e.target),
            length_meters: e.length_m,
            time_cost_seconds: e.cost_s,
        });
    }

    // Facilities: unique ids, valid coordinates. Every facility must be
    // snappable, which requires a non-empty graph.
    if nodes.is_empty() && !raw.hospitals.is_empty() {
        return Err(StoreError::Validation(
            "snapshot has facilities but no road nodes to snap them to".to_string(),
        ));
    }
    let mut facility_ids: HashSet<u32> = HashSet::new();
    let mut facilities = Vec::with_capacity(raw.hospitals.len());
    for h in raw.hospitals {
        if !facility_ids.insert(h.hospital_id) {
            return Err(StoreError::Validation(format!(
                "duplicate hospital id {}",
                h.hospital_id
            )));
        }
        let location = Coordinate::new(h.lat, h.lon);
        if !location.is_valid() {
            return Err(StoreError::Validation(format!(
                "hospital {} has invalid coordinates ({}, {})",
                h.hospital_id, h.lat, h.lon
            )));
        }
        facilities.push(Facility {
            id: FacilityId(h.hospital_id),
            name: h.name,
            address: h.address,
            location,
            phone: h.phone,
        });
    }
    facilities.sort_by_key(|f| f.id);

    // Providers: unique ids.
    let mut provider_ids: HashSet<u32> = HashSet::new();
    let mut providers = Vec::with_capacity(raw.doctors.len());
    for d in raw.doctors {
        if !provider_ids.insert(d.doctor_id) {
            return Err(StoreError::Validation(format!(
                "duplicate doctor id {}",
                d.doctor_id
            )));
        }
        providers.push(Provider {
            id: ProviderId(d.doctor_id),
            name: d.name,
            category: d.specialization,
        });
    }

    // Slots: known provider and facility, valid day, start < end.
    let mut slots = Vec::with_capacity(raw.availability.len());
    for s in raw.availability {
        if !provider_ids.contains(&s.doctor_id) {
            return Err(StoreError::Validation(format!(
                "availability references unknown doctor {}",
                s.doctor_id
            )));
        }
        if !facility_ids.contains(&s.hospital_id) {
            return Err(StoreError::Validation(format!(
                "availability references unknown hospital {}",
                s.hospital_id
            )));
        }
        let day = DayOfWeek::new(s.day_of_week)
            .map_err(|e| StoreError::Validation(e.to_string()))?;
        let start = parse_clock(&s.start_time).ok_or_else(|| {
            StoreError::Validation(format!("unparseable start_time {:?}", s.start_time))
        })?;
        let end = parse_clock(&s.end_time).ok_or_else(|| {
            StoreError::Validation(format!("unparseable end_time {:?}", s.end_time))
        })?;
        let slot = AvailabilitySlot::new(
            ProviderId(s.doctor_id),
            FacilityId(s.hospital_id),
            day,
            start,
            end,
        )
        .map_err(|e| StoreError::Validation(e.to_string()))?;
        slots.push(slot);
    }

    Ok(Snapshot {
        network: RoadNetwork::new(nodes, edges),
        availability: AvailabilityIndex::new(providers, slots),
        facilities,
    })
}
