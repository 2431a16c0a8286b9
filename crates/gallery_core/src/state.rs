use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::view_model::GalleryViewModel;
use crate::{HitId, HitStore, Query, RemovedHit, SearchError};

/// What happens around a delete once the remote call resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeletePolicy {
    /// Re-fetch the first page after every confirmed delete.
    pub refresh_after_delete: bool,
    /// Put the hit back at its old position when the delete fails.
    pub restore_on_failure: bool,
}

impl Default for DeletePolicy {
    fn default() -> Self {
        Self {
            refresh_after_delete: false,
            restore_on_failure: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GalleryState {
    store: HitStore,
    pending_deletes: HashMap<HitId, RemovedHit>,
    policy: DeletePolicy,
    last_error: Option<SearchError>,
    dirty: bool,
}

impl GalleryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: DeletePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn store(&self) -> &HitStore {
        &self.store
    }

    pub fn policy(&self) -> DeletePolicy {
        self.policy
    }

    pub fn last_error(&self) -> Option<&SearchError> {
        self.last_error.as_ref()
    }

    pub fn is_delete_pending(&self, id: &HitId) -> bool {
        self.pending_deletes.contains_key(id)
    }

    /// True while a fetch or a delete is outstanding.
    pub fn is_busy(&self) -> bool {
        self.store.status() != crate::Status::Idle || !self.pending_deletes.is_empty()
    }

    pub fn view(&self) -> GalleryViewModel {
        GalleryViewModel {
            query: self.store.query().clone(),
            hits: self.store.hits().to_vec(),
            has_more: self.store.has_more(),
            status: self.store.status(),
            pending_deletes: self.pending_deletes.len(),
            last_error: self.last_error.as_ref().map(ToString::to_string),
            dirty: self.dirty,
        }
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn store_mut(&mut self) -> &mut HitStore {
        &mut self.store
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn reset_query(&mut self, query: Query) {
        self.store.reset_query(query);
        self.dirty = true;
        self.pending_deletes.clear();
        self.last_error = None;
    }

    pub(crate) fn track_delete(&mut self, removed: RemovedHit) {
        self.pending_deletes.insert(removed.hit.id.clone(), removed);
    }

    pub(crate) fn take_pending_delete(&mut self, id: &HitId) -> Option<RemovedHit> {
        self.pending_deletes.remove(id)
    }

    pub(crate) fn set_error(&mut self, error: Option<SearchError>) {
        if self.last_error != error {
            self.last_error = error;
            self.dirty = true;
        }
    }
}
