// Origin fetch — where edge servers get content they do not have yet

use crate::content::ContentId;
use crate::topology::Payload;

/// Source of content payloads on a cache miss.
///
/// The simulator never performs real I/O; implementations must be
/// deterministic for a given content id.
pub trait OriginFetcher {
    fn fetch(&self, content_id: ContentId, content_name: &str) -> Payload;
}

/// Default fetcher: a fixed placeholder payload per content id
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticOrigin;

impl OriginFetcher for SyntheticOrigin {
    fn fetch(&self, content_id: ContentId, _content_name: &str) -> Payload {
        format!("DataPayload(ContentID:{})", content_id)
    }
}
