// Cache module — per-edge-server content storage

pub mod lru;

pub use lru::EvictionCache;
