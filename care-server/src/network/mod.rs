//! Road network store.
//!
//! An immutable weighted graph of road segments with a spatial index
//! over its nodes. Built once per snapshot; all lookups are read-only,
//! so arbitrarily many queries may run against it concurrently.

mod index;

use std::collections::HashMap;

use crate::domain::{Coordinate, NodeId};

use index::SpatialIndex;

/// Error from road network lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    /// Nearest-node lookup on a graph with no nodes
    #[error("road network has no nodes")]
    EmptyGraph,
}

/// A node of the road graph.
#[derive(Debug, Clone)]
pub struct GraphNode {
    pub id: NodeId,
    pub location: Coordinate,
}

/// An undirected road segment between two nodes.
#[derive(Debug, Clone)]
pub struct GraphEdge {
    pub id: u64,
    pub source: NodeId,
    pub target: NodeId,
    pub length_meters: f64,
    pub time_cost_seconds: f64,
}

/// The weight of traversing one edge in one direction.
#[derive(Debug, Clone, Copy)]
pub struct EdgeWeight {
    pub to: NodeId,
    pub length_meters: f64,
    pub time_cost_seconds: f64,
}

/// Immutable road graph supporting nearest-node snapping and
/// neighbour traversal.
///
/// Edges are undirected: each segment is stored in both directions.
/// The snapshot loader guarantees node ids are unique and that every
/// edge endpoint refers to a known node.
#[derive(Debug, Clone, Default)]
pub struct RoadNetwork {
    nodes: HashMap<NodeId, GraphNode>,
    adjacency: HashMap<NodeId, Vec<EdgeWeight>>,
    index: SpatialIndex,
}

impl RoadNetwork {
    /// Build a network from validated nodes and edges.
    pub fn new(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        let index = SpatialIndex::build(nodes.iter().map(|n| (n.id, n.location)));
        let nodes: HashMap<NodeId, GraphNode> = nodes.into_iter().map(|n| (n.id, n)).collect();

        let mut adjacency: HashMap<NodeId, Vec<EdgeWeight>> = HashMap::new();
        for edge in edges {
            adjacency.entry(edge.source).or_default().push(EdgeWeight {
                to: edge.target,
                length_meters: edge.length_meters,
                time_cost_seconds: edge.time_cost_seconds,
            });
            adjacency.entry(edge.target).or_default().push(EdgeWeight {
                to: edge.source,
                length_meters: edge.length_meters,
                time_cost_seconds: edge.time_cost_seconds,
            });
        }

        Self {
            nodes,
            adjacency,
            index,
        }
    }

    /// Snap a coordinate to the nearest graph node.
    ///
    /// Deterministic: equidistant nodes resolve to the smallest id.
    pub fn nearest_node(&self, at: &Coordinate) -> Result<NodeId, NetworkError> {
        self.index.nearest(at).ok_or(NetworkError::EmptyGraph)
    }

    /// Outgoing edge weights from a node. Empty for unknown nodes.
    pub fn neighbors(&self, node: NodeId) -> &[EdgeWeight] {
        self.adjacency.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether the node id exists in the graph.
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    /// Number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
