//! Request resolver — serve one content request end to end
//!
//! Resolution order for every request:
//! 1. **Validate**: the requester must be a registered user
//! 2. **Route to server**: shortest paths from the user, closest edge server wins
//! 3. **Cache check**: a hit is served straight from the edge
//! 4. **Route to origin**: on a miss, shortest paths from the server to the origin,
//!    fetch the payload and store it in the server's cache
//!
//! Only a successful miss mutates a cache. Hits and failures leave every cache as
//! it was.

use super::origin::OriginFetcher;
use crate::content::{ContentId, ContentRegistry};
use crate::routing::{shortest_paths, Distance, DistanceMap};
use crate::topology::{NetworkGraph, Node, NodeId};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Why a request could not be served
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestError {
    #[error("User {0} does not exist")]
    UserInvalid(NodeId),
    #[error("No path from user {user} to any edge server")]
    NoServerReachable { user: NodeId },
    #[error("Server {server} has no path to the origin")]
    OriginUnreachable {
        server: NodeId,
        /// `None` when no origin was ever registered
        origin: Option<NodeId>,
    },
}

/// Whether the edge server already had the content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CacheStatus {
    Hit,
    Miss,
}

/// Latency components of a served request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencyBreakdown {
    /// User → edge server
    pub to_server: Distance,
    /// Edge server → origin, only paid on a miss
    pub to_origin: Option<Distance>,
}

impl LatencyBreakdown {
    pub fn total(&self) -> Distance {
        self.to_server + self.to_origin.unwrap_or(0)
    }
}

/// A successfully served request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    pub user_id: NodeId,
    pub server_id: NodeId,
    pub content_id: ContentId,
    pub content_name: String,
    pub status: CacheStatus,
    pub latency: LatencyBreakdown,
    /// Nodes from the user to the serving edge server
    pub server_route: Vec<NodeId>,
    /// Nodes from the edge server to the origin (misses only)
    pub origin_route: Option<Vec<NodeId>>,
    /// Content pushed out of the server's cache to make room (misses only)
    pub evicted: Option<ContentId>,
}

impl Delivery {
    pub fn is_hit(&self) -> bool {
        self.status == CacheStatus::Hit
    }

    pub fn total_latency(&self) -> Distance {
        self.latency.total()
    }
}

/// Closest edge server in `distances`.
///
/// Ties go to the server registered first.
pub fn closest_edge_server(graph: &NetworkGraph, distances: &DistanceMap) -> Option<(NodeId, Distance)> {
    let mut best: Option<(NodeId, Distance)> = None;
    for server in graph.edge_servers() {
        let Some(dist) = distances.distance_to(server.id) else {
            continue;
        };
        match best {
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => best = Some((server.id, dist)),
        }
    }
    best
}

/// Serve `content_name` to `user_id`.
pub fn resolve_request(
    graph: &mut NetworkGraph,
    registry: &mut ContentRegistry,
    origin: &dyn OriginFetcher,
    user_id: NodeId,
    content_name: &str,
) -> Result<Delivery, RequestError> {
    if !graph.node(user_id).is_some_and(Node::is_user) {
        return Err(RequestError::UserInvalid(user_id));
    }

    let content_id = registry.get_or_create_id(content_name);
    debug!(
        "Request: user {} -> '{}' (content {})",
        user_id, content_name, content_id
    );

    let from_user = shortest_paths(graph, user_id);
    let (server_id, to_server) = closest_edge_server(graph, &from_user)
        .ok_or(RequestError::NoServerReachable { user: user_id })?;
    let server_route = from_user.path_to(server_id).unwrap_or_default();
    debug!("Optimal server: {} ({}ms)", server_id, to_server);

    let hit = graph
        .node_mut(server_id)
        .and_then(Node::cache_mut)
        .map(|cache| cache.get(&content_id).is_some())
        .unwrap_or(false);

    if hit {
        info!(
            "Cache HIT: content {} served from server {} in {}ms",
            content_id, server_id, to_server
        );
        return Ok(Delivery {
            user_id,
            server_id,
            content_id,
            content_name: content_name.to_string(),
            status: CacheStatus::Hit,
            latency: LatencyBreakdown {
                to_server,
                to_origin: None,
            },
            server_route,
            origin_route: None,
            evicted: None,
        });
    }

    debug!(
        "Cache MISS: content {} not on server {}, fetching from origin",
        content_id, server_id
    );

    let unreachable = RequestError::OriginUnreachable {
        server: server_id,
        origin: graph.origin(),
    };
    let origin_id = graph.origin().ok_or_else(|| unreachable.clone())?;
    let from_server = shortest_paths(graph, server_id);
    let to_origin = from_server.distance_to(origin_id).ok_or(unreachable)?;
    let origin_route = from_server.path_to(origin_id);

    let payload = origin.fetch(content_id, content_name);
    let evicted = graph
        .node_mut(server_id)
        .and_then(Node::cache_mut)
        .and_then(|cache| cache.put(content_id, payload))
        .map(|(evicted_id, _)| evicted_id);

    if let Some(evicted_id) = evicted {
        debug!("Server {} evicted content {}", server_id, evicted_id);
    }
    info!(
        "Cache MISS: content {} cached on server {}, {}ms ({}ms to server + {}ms to origin)",
        content_id,
        server_id,
        to_server + to_origin,
        to_server,
        to_origin
    );

    Ok(Delivery {
        user_id,
        server_id,
        content_id,
        content_name: content_name.to_string(),
        status: CacheStatus::Miss,
        latency: LatencyBreakdown {
            to_server,
            to_origin: Some(to_origin),
        },
        server_route,
        origin_route,
        evicted,
    })
}
