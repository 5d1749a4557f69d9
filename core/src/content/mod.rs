// Content module — naming of deliverable content

pub mod registry;

pub use registry::{ContentId, ContentRegistry};
