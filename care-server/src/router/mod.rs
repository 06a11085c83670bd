//! Single-source, multi-target shortest paths over the road network.
//!
//! One Dijkstra run serves a whole batch of targets. Edge length in
//! meters is the only weight the search optimises; the time cost is
//! accumulated along the distance-optimal path so that exactly one
//! metric stays canonical for ranking. The run terminates as soon as
//! every requested target is settled rather than exhausting the graph.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use tracing::trace;

use crate::domain::NodeId;
use crate::network::RoadNetwork;

/// Cost of the best route from the source to one target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteCost {
    pub distance_meters: f64,
    pub time_seconds: f64,
}

/// Min-heap entry, ordered by ascending route distance.
#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    distance: f64,
    time: f64,
    node: NodeId,
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap pops the smallest distance first.
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

/// Compute best-known route costs from `source` to each node in `targets`.
///
/// Targets unreachable from the source (or absent from the graph) are
/// simply missing from the result map; callers must treat absence as
/// "excluded", never as failure of the whole batch.
pub fn shortest_paths(
    network: &RoadNetwork,
    source: NodeId,
    targets: &HashSet<NodeId>,
) -> HashMap<NodeId, RouteCost> {
    let mut found: HashMap<NodeId, RouteCost> = HashMap::new();

    let mut remaining: HashSet<NodeId> = targets
        .iter()
        .copied()
        .filter(|t| network.contains(*t))
        .collect();
    if remaining.is_empty() || !network.contains(source) {
        return found;
    }

    let mut settled: HashSet<NodeId> = HashSet::new();
    let mut best: HashMap<NodeId, f64> = HashMap::new();
    let mut heap = BinaryHeap::new();

    best.insert(source, 0.0);
    heap.push(QueueEntry {
        distance: 0.0,
        time: 0.0,
        node: source,
    });

    while let Some(entry) = heap.pop() {
        if !settled.insert(entry.node) {
            continue; // Stale heap entry
        }

        if remaining.remove(&entry.node) {
            found.insert(
                entry.node,
                RouteCost {
                    distance_meters: entry.distance,
                    time_seconds: entry.time,
                },
            );
            if remaining.is_empty() {
                break; // All targets settled
            }
        }

        for edge in network.neighbors(entry.node) {
            let next_distance = entry.distance + edge.length_meters;
            let improves = best.get(&edge.to).is_none_or(|d| next_distance < *d);
            if improves {
                best.insert(edge.to, next_distance);
                heap.push(QueueEntry {
                    distance: next_distance,
                    time: entry.time + edge.time_cost_seconds,
                    node: edge.to,
                });
            }
        }
    }

    trace!(
        targets = targets.len(),
        resolved = found.len(),
        settled = settled.len(),
        "multi-target dijkstra complete"
    );

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinate;
    use crate::network::{GraphEdge, GraphNode};

    fn node(id: u64) -> GraphNode {
        // Geometry is irrelevant to routing; spread nodes on a line.
        GraphNode {
            id: NodeId(id),
            location: Coordinate::new(22.0, 87.0 + id as f64 * 0.01),
        }
    }

    fn edge(id: u64, source: u64, target: u64, length: f64, time: f64) -> GraphEdge {
        GraphEdge {
            id,
            source: NodeId(source),
            target: NodeId(target),
            length_meters: length,
            time_cost_seconds: time,
        }
    }

    fn targets(ids: &[u64]) -> HashSet<NodeId> {
        ids.iter().map(|&id| NodeId(id)).collect()
    }

    /// Line: 1 -2km- 2 -3km- 3 -1km- 4, plus isolated node 9.
    fn line_network() -> RoadNetwork {
        RoadNetwork::new(
            vec![node(1), node(2), node(3), node(4), node(9)],
            vec![
                edge(1, 1, 2, 2000.0, 180.0),
                edge(2, 2, 3, 3000.0, 270.0),
                edge(3, 3, 4, 1000.0, 90.0),
            ],
        )
    }

    #[test]
    fn costs_accumulate_along_the_line() {
        let network = line_network();
        let costs = shortest_paths(&network, NodeId(1), &targets(&[2, 3, 4]));

        assert_eq!(costs.len(), 3);
        assert_eq!(costs[&NodeId(2)].distance_meters, 2000.0);
        assert_eq!(costs[&NodeId(3)].distance_meters, 5000.0);
        assert_eq!(costs[&NodeId(4)].distance_meters, 6000.0);
        assert_eq!(costs[&NodeId(4)].time_seconds, 540.0);
    }

    #[test]
    fn unreachable_target_is_absent_not_an_error() {
        let network = line_network();
        let costs = shortest_paths(&network, NodeId(1), &targets(&[4, 9]));

        assert_eq!(costs.len(), 1);
        assert!(costs.contains_key(&NodeId(4)));
        assert!(!costs.contains_key(&NodeId(9)));
    }

    #[test]
    fn source_as_target_costs_zero() {
        let network = line_network();
        let costs = shortest_paths(&network, NodeId(1), &targets(&[1]));

        assert_eq!(costs[&NodeId(1)].distance_meters, 0.0);
        assert_eq!(costs[&NodeId(1)].time_seconds, 0.0);
    }

    #[test]
    fn unknown_target_is_ignored() {
        let network = line_network();
        let costs = shortest_paths(&network, NodeId(1), &targets(&[2, 777]));

        assert_eq!(costs.len(), 1);
        assert!(costs.contains_key(&NodeId(2)));
    }

    #[test]
    fn empty_target_set_yields_empty_map() {
        let network = line_network();
        let costs = shortest_paths(&network, NodeId(1), &HashSet::new());
        assert!(costs.is_empty());
    }

    #[test]
    fn distance_decides_between_parallel_routes() {
        // Two routes from 1 to 3: via 2 (4km, slow) or direct (5km, fast).
        // The shorter route wins and its time is reported, even though
        // the direct edge would be quicker on the clock.
        let network = RoadNetwork::new(
            vec![node(1), node(2), node(3)],
            vec![
                edge(1, 1, 2, 2000.0, 600.0),
                edge(2, 2, 3, 2000.0, 600.0),
                edge(3, 1, 3, 5000.0, 100.0),
            ],
        );
        let costs = shortest_paths(&network, NodeId(1), &targets(&[3]));

        assert_eq!(costs[&NodeId(3)].distance_meters, 4000.0);
        assert_eq!(costs[&NodeId(3)].time_seconds, 1200.0);
    }

    #[test]
    fn shorter_path_found_across_a_cycle() {
        // Square 1-2-3-4-1 with a long diagonal.
        let network = RoadNetwork::new(
            vec![node(1), node(2), node(3), node(4)],
            vec![
                edge(1, 1, 2, 1000.0, 90.0),
                edge(2, 2, 3, 1000.0, 90.0),
                edge(3, 3, 4, 1000.0, 90.0),
                edge(4, 4, 1, 1000.0, 90.0),
                edge(5, 1, 3, 5000.0, 450.0),
            ],
        );
        let costs = shortest_paths(&network, NodeId(1), &targets(&[3]));

        assert_eq!(costs[&NodeId(3)].distance_meters, 2000.0);
        assert_eq!(costs[&NodeId(3)].time_seconds, 180.0);
    }
}
