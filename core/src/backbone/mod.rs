// Backbone module — infrastructure layout cost

pub mod mst;

pub use mst::{plan_backbone, BackboneEdge, BackboneError, BackbonePlan};
