//! Backbone planner — minimum spanning tree over infrastructure nodes
//!
//! Grows a tree from the origin (Prim): the cheapest edge leaving the tree onto a
//! not-yet-included infrastructure node is taken next. Users never join the tree
//! and edges through users are never considered.
//!
//! A disconnected backbone is not an error. The planner returns whatever tree it
//! could grow from the origin and `BackbonePlan::is_spanning` reports `false`.

use crate::routing::Distance;
use crate::topology::{Latency, NetworkGraph, NodeId};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackboneError {
    #[error("No origin server registered")]
    NoOrigin,
}

/// One tree edge, directed away from the origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackboneEdge {
    /// Node already in the tree
    pub from: NodeId,
    /// Node the edge brought into the tree
    pub to: NodeId,
    pub cost: Latency,
}

/// Result of a backbone computation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackbonePlan {
    /// Tree edges in the order they were added
    pub edges: Vec<BackboneEdge>,
    /// Infrastructure nodes in the whole network, reachable or not
    pub node_count: usize,
    pub total_cost: Distance,
}

impl BackbonePlan {
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether the tree reaches every infrastructure node
    pub fn is_spanning(&self) -> bool {
        self.edges.len() + 1 >= self.node_count
    }
}

/// Compute the minimum-cost backbone rooted at the origin
pub fn plan_backbone(graph: &NetworkGraph) -> Result<BackbonePlan, BackboneError> {
    let root = graph.origin().ok_or(BackboneError::NoOrigin)?;

    let node_count = graph
        .nodes()
        .filter(|node| node.role.is_infrastructure())
        .count();
    let eligible = |id: NodeId| {
        graph
            .role_of(id)
            .map(|role| role.is_infrastructure())
            .unwrap_or(false)
    };

    let mut in_tree: HashSet<NodeId> = HashSet::with_capacity(node_count);
    let mut frontier: BinaryHeap<Reverse<(Latency, NodeId, NodeId)>> = BinaryHeap::new();
    let mut edges = Vec::with_capacity(node_count.saturating_sub(1));
    let mut total_cost: Distance = 0;

    in_tree.insert(root);
    for link in graph.neighbors(root) {
        if eligible(link.neighbor) {
            frontier.push(Reverse((link.latency, link.neighbor, root)));
        }
    }

    while edges.len() + 1 < node_count {
        let Some(Reverse((cost, candidate, connector))) = frontier.pop() else {
            break;
        };
        // Stale: reached through a cheaper edge already
        if !in_tree.insert(candidate) {
            continue;
        }

        edges.push(BackboneEdge {
            from: connector,
            to: candidate,
            cost,
        });
        total_cost += Distance::from(cost);
        debug!("Backbone edge {} -> {} ({}ms)", connector, candidate, cost);

        for link in graph.neighbors(candidate) {
            if eligible(link.neighbor) && !in_tree.contains(&link.neighbor) {
                frontier.push(Reverse((link.latency, link.neighbor, candidate)));
            }
        }
    }

    let plan = BackbonePlan {
        edges,
        node_count,
        total_cost,
    };
    if !plan.is_spanning() {
        warn!(
            "Backbone is disconnected: tree covers {} of {} nodes",
            plan.edge_count() + 1,
            plan.node_count
        );
    }
    Ok(plan)
}
