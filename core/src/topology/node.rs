// Node types — the vertices of the delivery network

use crate::cache::EvictionCache;
use crate::content::ContentId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique node identifier
pub type NodeId = u32;

/// Link latency in milliseconds
pub type Latency = u32;

/// Content bytes as handed out by the origin
pub type Payload = String;

/// What a node does in the network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeRole {
    /// Issues content requests; may only link to infrastructure
    User,
    /// Caches content close to users
    EdgeServer,
    /// Pure connectivity, no cache
    Gateway,
    /// Authoritative source of all content
    Origin,
}

impl NodeRole {
    /// Every role except `User` belongs to the backbone
    pub fn is_infrastructure(self) -> bool {
        !matches!(self, NodeRole::User)
    }
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeRole::User => "user",
            NodeRole::EdgeServer => "edge server",
            NodeRole::Gateway => "gateway",
            NodeRole::Origin => "origin",
        };
        f.write_str(name)
    }
}

/// One half of an undirected edge, as seen from its owning node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub neighbor: NodeId,
    pub latency: Latency,
}

/// A registered node.
///
/// Edge servers own their cache outright; it lives and dies with the node.
#[derive(Debug)]
pub struct Node {
    pub id: NodeId,
    pub role: NodeRole,
    cache: Option<EvictionCache<ContentId, Payload>>,
}

impl Node {
    /// Create a node. `capacity` only matters for edge servers.
    pub fn new(id: NodeId, role: NodeRole, capacity: usize) -> Self {
        let cache = match role {
            NodeRole::EdgeServer => Some(EvictionCache::new(capacity)),
            _ => None,
        };
        Self { id, role, cache }
    }

    pub fn is_user(&self) -> bool {
        self.role == NodeRole::User
    }

    pub fn is_edge_server(&self) -> bool {
        self.role == NodeRole::EdgeServer
    }

    /// The content cache, present only on edge servers
    pub fn cache(&self) -> Option<&EvictionCache<ContentId, Payload>> {
        self.cache.as_ref()
    }

    pub fn cache_mut(&mut self) -> Option<&mut EvictionCache<ContentId, Payload>> {
        self.cache.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_edge_servers_own_a_cache() {
        assert!(Node::new(1, NodeRole::EdgeServer, 4).cache().is_some());
        assert!(Node::new(2, NodeRole::Gateway, 4).cache().is_none());
        assert!(Node::new(3, NodeRole::Origin, 4).cache().is_none());
        assert!(Node::new(4, NodeRole::User, 4).cache().is_none());
    }

    #[test]
    fn test_cache_capacity_follows_registration() {
        let node = Node::new(1, NodeRole::EdgeServer, 3);
        assert_eq!(node.cache().map(|c| c.capacity()), Some(3));
    }

    #[test]
    fn test_infrastructure_roles() {
        assert!(!NodeRole::User.is_infrastructure());
        assert!(NodeRole::EdgeServer.is_infrastructure());
        assert!(NodeRole::Gateway.is_infrastructure());
        assert!(NodeRole::Origin.is_infrastructure());
    }
}
