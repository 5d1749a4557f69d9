//! Routing — latency-weighted shortest paths over the delivery network
//!
//! The resolver runs one computation from the requesting user to find the closest
//! edge server, and on a cache miss a second one from that server to the origin.

pub mod shortest_path;

pub use shortest_path::{shortest_paths, Distance, DistanceMap};
