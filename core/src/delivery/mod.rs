// Delivery module — request resolution against edge caches and the origin

pub mod origin;
pub mod resolver;
pub mod stats;

pub use origin::{OriginFetcher, SyntheticOrigin};
pub use resolver::{
    closest_edge_server, resolve_request, CacheStatus, Delivery, LatencyBreakdown, RequestError,
};
pub use stats::DeliveryStats;
