// Topology module — who exists in the network and how they are linked

pub mod graph;
pub mod node;

pub use graph::{NetworkGraph, TopologyError};
pub use node::{Latency, Link, Node, NodeId, NodeRole, Payload};
