//! Network graph — node registry plus undirected weighted adjacency
//!
//! Structural rules are enforced when nodes and edges are added:
//! - node ids are unique
//! - both edge endpoints must already exist and must differ
//! - two users never connect directly
//!
//! Rejected operations leave the graph untouched. Only one origin is tracked;
//! registering another one moves the origin and logs a warning.

use super::node::{Latency, Link, Node, NodeId, NodeRole};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TopologyError {
    #[error("Node {0} already exists")]
    DuplicateNode(NodeId),
    #[error("Cannot link {from} and {to}: node {missing} does not exist")]
    UnknownNode {
        from: NodeId,
        to: NodeId,
        missing: NodeId,
    },
    #[error("Cannot link node {0} to itself")]
    SelfLoop(NodeId),
    #[error("Cannot create a direct edge between two users ({0}, {1})")]
    UserToUser(NodeId, NodeId),
}

/// The delivery network
#[derive(Debug, Default)]
pub struct NetworkGraph {
    /// Nodes in registration order
    nodes: Vec<Node>,
    /// Node id → position in `nodes`
    index: HashMap<NodeId, usize>,
    /// Node id → incident links (both directions stored)
    adjacency: HashMap<NodeId, Vec<Link>>,
    /// Most recently registered origin
    origin: Option<NodeId>,
    edge_count: usize,
}

impl NetworkGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node.
    ///
    /// `capacity` sizes the cache of an edge server and is ignored otherwise.
    pub fn add_node(
        &mut self,
        id: NodeId,
        role: NodeRole,
        capacity: usize,
    ) -> Result<(), TopologyError> {
        if self.index.contains_key(&id) {
            return Err(TopologyError::DuplicateNode(id));
        }

        if role == NodeRole::Origin {
            if let Some(previous) = self.origin {
                warn!(
                    "Multiple origin servers added. Using the last one: {} (was {})",
                    id, previous
                );
            }
            self.origin = Some(id);
        }

        self.index.insert(id, self.nodes.len());
        self.nodes.push(Node::new(id, role, capacity));
        debug!("Registered {} {} (capacity {})", role, id, capacity);
        Ok(())
    }

    /// Connect two registered nodes with an undirected edge
    pub fn add_edge(&mut self, u: NodeId, v: NodeId, latency: Latency) -> Result<(), TopologyError> {
        let u_role = self.role_of(u).ok_or(TopologyError::UnknownNode {
            from: u,
            to: v,
            missing: u,
        })?;
        let v_role = self.role_of(v).ok_or(TopologyError::UnknownNode {
            from: u,
            to: v,
            missing: v,
        })?;

        if u == v {
            return Err(TopologyError::SelfLoop(u));
        }
        if u_role == NodeRole::User && v_role == NodeRole::User {
            return Err(TopologyError::UserToUser(u, v));
        }

        self.adjacency.entry(u).or_default().push(Link {
            neighbor: v,
            latency,
        });
        self.adjacency.entry(v).or_default().push(Link {
            neighbor: u,
            latency,
        });
        self.edge_count += 1;
        debug!("Linked {} <-> {} ({}ms)", u, v, latency);
        Ok(())
    }

    /// Links leaving `id`; empty for isolated or unknown nodes
    pub fn neighbors(&self, id: NodeId) -> &[Link] {
        self.adjacency.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.index.get(&id).map(|&pos| &self.nodes[pos])
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let pos = *self.index.get(&id)?;
        self.nodes.get_mut(pos)
    }

    pub fn role_of(&self, id: NodeId) -> Option<NodeRole> {
        self.node(id).map(|node| node.role)
    }

    /// The authoritative origin (last one registered)
    pub fn origin(&self) -> Option<NodeId> {
        self.origin
    }

    /// All nodes in registration order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Edge servers in registration order
    pub fn edge_servers(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|node| node.is_edge_server())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }
}
