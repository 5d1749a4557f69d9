// cdnsim core — latency-weighted content delivery simulation
//
// Users request content, requests travel the shortest path to the closest edge
// server, edge servers cache with LRU eviction, and misses are fetched from a
// single origin. The backbone planner prices the infrastructure as a minimum
// spanning tree.
//
// Everything here is single-threaded and synchronous: one request or one
// backbone computation runs to completion before the next begins.

pub mod backbone;
pub mod cache;
pub mod content;
pub mod delivery;
pub mod routing;
pub mod topology;

pub use backbone::{BackboneEdge, BackboneError, BackbonePlan};
pub use cache::EvictionCache;
pub use content::{ContentId, ContentRegistry};
pub use delivery::{
    CacheStatus, Delivery, DeliveryStats, LatencyBreakdown, OriginFetcher, RequestError,
    SyntheticOrigin,
};
pub use routing::{Distance, DistanceMap};
pub use topology::{Latency, NetworkGraph, NodeId, NodeRole, TopologyError};

// ============================================================================
// SIMULATOR
// ============================================================================

/// The programmatic surface of the simulator.
///
/// Owns the network, the content registry, the origin and the running
/// delivery counters. Configuration loaders and shells drive it through
/// these methods and render the outcomes themselves.
pub struct CdnSimulator {
    graph: NetworkGraph,
    contents: ContentRegistry,
    origin: Box<dyn OriginFetcher>,
    stats: DeliveryStats,
}

impl Default for CdnSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl CdnSimulator {
    /// Empty network with the synthetic origin
    pub fn new() -> Self {
        Self::with_origin_fetcher(Box::new(SyntheticOrigin))
    }

    /// Empty network fetching misses through `origin`
    pub fn with_origin_fetcher(origin: Box<dyn OriginFetcher>) -> Self {
        Self {
            graph: NetworkGraph::new(),
            contents: ContentRegistry::new(),
            origin,
            stats: DeliveryStats::default(),
        }
    }

    // ------------------------------------------------------------------------
    // Topology
    // ------------------------------------------------------------------------

    /// Register a node; `capacity` sizes an edge server's cache
    pub fn add_node(
        &mut self,
        id: NodeId,
        role: NodeRole,
        capacity: usize,
    ) -> Result<(), TopologyError> {
        self.graph.add_node(id, role, capacity)
    }

    /// Connect two registered nodes
    pub fn add_edge(&mut self, u: NodeId, v: NodeId, latency: Latency) -> Result<(), TopologyError> {
        self.graph.add_edge(u, v, latency)
    }

    /// Register a user and attach it to one existing node.
    ///
    /// If the link is rejected the user stays registered, just unconnected.
    pub fn add_user(
        &mut self,
        id: NodeId,
        connect_to: NodeId,
        latency: Latency,
    ) -> Result<(), TopologyError> {
        self.graph.add_node(id, NodeRole::User, 0)?;
        self.graph.add_edge(id, connect_to, latency)
    }

    // ------------------------------------------------------------------------
    // Delivery
    // ------------------------------------------------------------------------

    /// Serve `content_name` to `user_id` and record the outcome
    pub fn resolve_request(
        &mut self,
        user_id: NodeId,
        content_name: &str,
    ) -> Result<Delivery, RequestError> {
        let outcome = delivery::resolve_request(
            &mut self.graph,
            &mut self.contents,
            &*self.origin,
            user_id,
            content_name,
        );
        if let Err(ref err) = outcome {
            tracing::info!("Request failed: {}", err);
        }
        self.stats.record(&outcome);
        outcome
    }

    // ------------------------------------------------------------------------
    // Backbone
    // ------------------------------------------------------------------------

    /// Minimum spanning tree over infrastructure nodes, rooted at the origin
    pub fn compute_backbone(&self) -> Result<BackbonePlan, BackboneError> {
        backbone::plan_backbone(&self.graph)
    }

    // ------------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------------

    /// Contents cached on `server_id`, most recently used first.
    ///
    /// `None` unless `server_id` is an edge server. Recency is left untouched.
    pub fn cached_contents(&self, server_id: NodeId) -> Option<Vec<(ContentId, String)>> {
        let cache = self.graph.node(server_id)?.cache()?;
        let entries = cache
            .keys_by_recency()
            .into_iter()
            .map(|&id| {
                let name = self.contents.name_of(id).unwrap_or_default();
                (id, name.to_string())
            })
            .collect();
        Some(entries)
    }

    pub fn graph(&self) -> &NetworkGraph {
        &self.graph
    }

    pub fn contents(&self) -> &ContentRegistry {
        &self.contents
    }

    pub fn stats(&self) -> &DeliveryStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedOrigin;

    impl OriginFetcher for FixedOrigin {
        fn fetch(&self, _content_id: ContentId, content_name: &str) -> String {
            format!("bytes of {}", content_name)
        }
    }

    fn simulator() -> CdnSimulator {
        let mut sim = CdnSimulator::new();
        sim.add_node(1, NodeRole::Origin, 0).unwrap();
        sim.add_node(2, NodeRole::EdgeServer, 1).unwrap();
        sim.add_edge(1, 2, 10).unwrap();
        sim
    }

    #[test]
    fn test_add_user_links_to_existing_node() {
        let mut sim = simulator();
        sim.add_user(100, 2, 5).unwrap();

        assert_eq!(sim.graph().role_of(100), Some(NodeRole::User));
        assert_eq!(sim.graph().neighbors(100).len(), 1);
    }

    #[test]
    fn test_add_user_keeps_node_when_link_fails() {
        let mut sim = simulator();
        let err = sim.add_user(100, 42, 5).unwrap_err();

        assert!(matches!(err, TopologyError::UnknownNode { missing: 42, .. }));
        assert_eq!(sim.graph().role_of(100), Some(NodeRole::User));
        assert!(sim.graph().neighbors(100).is_empty());
    }

    #[test]
    fn test_add_user_to_user_is_rejected() {
        let mut sim = simulator();
        sim.add_user(100, 2, 5).unwrap();
        assert_eq!(
            sim.add_user(101, 100, 1),
            Err(TopologyError::UserToUser(101, 100))
        );
    }

    #[test]
    fn test_resolve_updates_stats() {
        let mut sim = simulator();
        sim.add_user(100, 2, 5).unwrap();

        sim.resolve_request(100, "a.mp4").unwrap();
        sim.resolve_request(100, "a.mp4").unwrap();
        assert!(sim.resolve_request(7, "a.mp4").is_err());

        let stats = sim.stats();
        assert_eq!(stats.requests, 3);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.failures, 1);
    }

    #[test]
    fn test_custom_origin_fetcher() {
        let mut sim = CdnSimulator::with_origin_fetcher(Box::new(FixedOrigin));
        sim.add_node(1, NodeRole::Origin, 0).unwrap();
        sim.add_node(2, NodeRole::EdgeServer, 1).unwrap();
        sim.add_edge(1, 2, 10).unwrap();
        sim.add_user(100, 2, 5).unwrap();

        let delivery = sim.resolve_request(100, "a.mp4").unwrap();
        let cache = sim
            .graph()
            .node(2)
            .and_then(|node| node.cache())
            .unwrap();
        assert_eq!(
            cache.peek(&delivery.content_id).map(String::as_str),
            Some("bytes of a.mp4")
        );
    }

    #[test]
    fn test_cached_contents_by_recency() {
        let mut sim = simulator();
        sim.add_node(3, NodeRole::EdgeServer, 2).unwrap();
        sim.add_edge(1, 3, 1).unwrap();
        sim.add_user(100, 3, 5).unwrap();

        sim.resolve_request(100, "a.mp4").unwrap();
        sim.resolve_request(100, "b.mp4").unwrap();
        sim.resolve_request(100, "a.mp4").unwrap();

        assert_eq!(
            sim.cached_contents(3),
            Some(vec![(1, "a.mp4".to_string()), (2, "b.mp4".to_string())])
        );
        // Listing does not promote: b is still the next victim
        sim.resolve_request(100, "c.mp4").unwrap();
        assert_eq!(
            sim.cached_contents(3),
            Some(vec![(3, "c.mp4".to_string()), (1, "a.mp4".to_string())])
        );
    }

    #[test]
    fn test_cached_contents_only_for_edge_servers() {
        let sim = simulator();
        assert_eq!(sim.cached_contents(2), Some(Vec::new()));
        assert_eq!(sim.cached_contents(1), None);
        assert_eq!(sim.cached_contents(42), None);
    }

    #[test]
    fn test_add_user_with_existing_id_adds_no_link() {
        let mut sim = simulator();
        assert_eq!(sim.add_user(2, 1, 3), Err(TopologyError::DuplicateNode(2)));
        assert_eq!(sim.graph().role_of(2), Some(NodeRole::EdgeServer));
        assert_eq!(sim.graph().neighbors(1).len(), 1);
        assert_eq!(sim.graph().edge_count(), 1);
    }

    #[test]
    fn test_compute_backbone_through_facade() {
        let sim = simulator();
        let plan = sim.compute_backbone().unwrap();
        assert_eq!(plan.total_cost, 10);
        assert!(plan.is_spanning());
    }
}
