//! Shortest-path engine — single-source Dijkstra over the network graph
//!
//! Latencies are unsigned, so the non-negative weight precondition always holds.
//! Nodes that cannot be reached are simply absent from the resulting map.

use crate::topology::{NetworkGraph, NodeId};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

/// Cumulative latency along a path
pub type Distance = u64;

/// Minimal distances from one source to every node it can reach
#[derive(Debug, Clone)]
pub struct DistanceMap {
    source: NodeId,
    distances: HashMap<NodeId, Distance>,
    /// Node → the node it was reached from on its shortest path
    predecessors: HashMap<NodeId, NodeId>,
}

impl DistanceMap {
    fn empty(source: NodeId) -> Self {
        Self {
            source,
            distances: HashMap::new(),
            predecessors: HashMap::new(),
        }
    }

    /// Distance to `target`, or `None` if it is unreachable
    pub fn distance_to(&self, target: NodeId) -> Option<Distance> {
        self.distances.get(&target).copied()
    }

    pub fn is_reachable(&self, target: NodeId) -> bool {
        self.distances.contains_key(&target)
    }

    /// Number of reachable nodes, the source included
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// Node sequence from the source to `target`, both ends included
    pub fn path_to(&self, target: NodeId) -> Option<Vec<NodeId>> {
        if !self.is_reachable(target) {
            return None;
        }

        let mut path = vec![target];
        let mut current = target;
        while current != self.source {
            current = *self.predecessors.get(&current)?;
            path.push(current);
        }
        path.reverse();
        Some(path)
    }
}

/// Compute minimal latency from `source` to every reachable node.
///
/// An unknown source yields an empty map.
pub fn shortest_paths(graph: &NetworkGraph, source: NodeId) -> DistanceMap {
    let mut map = DistanceMap::empty(source);
    if !graph.contains(source) {
        return map;
    }

    let mut frontier = BinaryHeap::new();
    map.distances.insert(source, 0);
    frontier.push(Reverse((0 as Distance, source)));

    while let Some(Reverse((current_dist, current))) = frontier.pop() {
        // Stale entry: a shorter path was recorded after this one was queued
        match map.distances.get(&current) {
            Some(&best) if current_dist > best => continue,
            _ => {}
        }

        for link in graph.neighbors(current) {
            let candidate = current_dist + Distance::from(link.latency);
            let improved = match map.distances.get(&link.neighbor) {
                Some(&known) => candidate < known,
                None => true,
            };
            if improved {
                map.distances.insert(link.neighbor, candidate);
                map.predecessors.insert(link.neighbor, current);
                frontier.push(Reverse((candidate, link.neighbor)));
            }
        }
    }

    map
}
