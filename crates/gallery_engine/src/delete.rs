use gallery_core::{HitId, SearchError};

/// Remote delete of one object. Fails with `Transport` or `NotFound`.
#[async_trait::async_trait]
pub trait Deleter: Send + Sync {
    async fn delete_by_id(&self, id: &HitId) -> Result<(), SearchError>;
}
