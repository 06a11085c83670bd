//! Spatial index for nearest-node lookup.
//!
//! A static k-d tree over node coordinates, built once per snapshot and
//! never mutated. Comparisons use squared Euclidean distance in degrees,
//! which agrees with geodesic nearest-neighbour at the city scale the
//! graph covers. Ties break on ascending node id so lookups are
//! deterministic.

use crate::domain::{Coordinate, NodeId};

#[derive(Debug, Clone)]
struct Entry {
    id: NodeId,
    lat: f64,
    lon: f64,
}

impl Entry {
    fn axis_value(&self, axis: usize) -> f64 {
        if axis == 0 { self.lat } else { self.lon }
    }
}

/// An implicit k-d tree: each slice's median element is the splitting
/// node, with the left and right halves forming the subtrees.
#[derive(Debug, Clone, Default)]
pub struct SpatialIndex {
    entries: Vec<Entry>,
}

impl SpatialIndex {
    /// Build the index over a set of nodes.
    pub fn build(points: impl IntoIterator<Item = (NodeId, Coordinate)>) -> Self {
        let mut entries: Vec<Entry> = points
            .into_iter()
            .map(|(id, c)| Entry {
                id,
                lat: c.lat,
                lon: c.lon,
            })
            .collect();
        arrange(&mut entries, 0);
        Self { entries }
    }

    /// The node nearest to `at`, or `None` for an empty index.
    ///
    /// Equidistant candidates resolve to the smallest node id.
    pub fn nearest(&self, at: &Coordinate) -> Option<NodeId> {
        let mut best: Option<(f64, NodeId)> = None;
        search(&self.entries, 0, at, &mut best);
        best.map(|(_, id)| id)
    }
}

/// Recursively arrange a slice into implicit k-d tree order.
fn arrange(entries: &mut [Entry], axis: usize) {
    if entries.len() <= 1 {
        return;
    }
    let mid = entries.len() / 2;
    entries.select_nth_unstable_by(mid, |a, b| {
        a.axis_value(axis)
            .total_cmp(&b.axis_value(axis))
            .then_with(|| a.id.cmp(&b.id))
    });
    let (left, rest) = entries.split_at_mut(mid);
    arrange(left, axis ^ 1);
    arrange(&mut rest[1..], axis ^ 1);
}

fn search(entries: &[Entry], axis: usize, at: &Coordinate, best: &mut Option<(f64, NodeId)>) {
    if entries.is_empty() {
        return;
    }
    let mid = entries.len() / 2;
    let entry = &entries[mid];

    let d_lat = entry.lat - at.lat;
    let d_lon = entry.lon - at.lon;
    let dist2 = d_lat * d_lat + d_lon * d_lon;

    let better = match best {
        None => true,
        Some((best_dist, best_id)) => {
            dist2 < *best_dist || (dist2 == *best_dist && entry.id < *best_id)
        }
    };
    if better {
        *best = Some((dist2, entry.id));
    }

    let diff = if axis == 0 {
        at.lat - entry.lat
    } else {
        at.lon - entry.lon
    };
    let (near, far) = if diff < 0.0 {
        (&entries[..mid], &entries[mid + 1..])
    } else {
        (&entries[mid + 1..], &entries[..mid])
    };

    search(near, axis ^ 1, at, best);

    // The far side can only win (or tie on id) if the splitting plane is
    // within the best distance found so far.
    if let Some((best_dist, _)) = best {
        if diff * diff <= *best_dist {
            search(far, axis ^ 1, at, best);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(points: &[(u64, f64, f64)]) -> SpatialIndex {
        SpatialIndex::build(
            points
                .iter()
                .map(|&(id, lat, lon)| (NodeId(id), Coordinate::new(lat, lon))),
        )
    }

    #[test]
    fn empty_index_has_no_nearest() {
        let idx = index(&[]);
        assert_eq!(idx.nearest(&Coordinate::new(0.0, 0.0)), None);
    }

    #[test]
    fn single_node() {
        let idx = index(&[(7, 22.34, 87.31)]);
        assert_eq!(idx.nearest(&Coordinate::new(0.0, 0.0)), Some(NodeId(7)));
    }

    #[test]
    fn picks_closest_of_several() {
        let idx = index(&[
            (1, 22.30, 87.30),
            (2, 22.34, 87.31),
            (3, 22.40, 87.40),
            (4, 23.00, 88.00),
        ]);
        assert_eq!(
            idx.nearest(&Coordinate::new(22.341, 87.312)),
            Some(NodeId(2))
        );
        assert_eq!(idx.nearest(&Coordinate::new(23.1, 88.1)), Some(NodeId(4)));
    }

    #[test]
    fn equidistant_nodes_resolve_to_smallest_id() {
        // Two nodes symmetric about the query point, using exactly
        // representable offsets so the distances compare equal.
        let idx = index(&[(9, 22.0, 87.0), (4, 22.0, 87.5)]);
        assert_eq!(idx.nearest(&Coordinate::new(22.0, 87.25)), Some(NodeId(4)));
    }
}
