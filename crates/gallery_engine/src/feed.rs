use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use gallery_core::{
    DeletePolicy, FailureKind, FetchTicket, Hit, HitId, HitStore, Query, RemovedHit, SearchError,
    Snapshot,
};
use gallery_logging::{gallery_debug, gallery_warn};
use tokio_util::sync::CancellationToken;

use crate::{Deleter, Fetcher};

/// Async front for a [`HitStore`] bound to one fetcher.
///
/// All methods take `&self`, so a refresh can be awaited while a load-more is
/// still pending. The store lock is never held across an await.
pub struct HitFeed {
    fetcher: Arc<dyn Fetcher>,
    store: Mutex<HitStore>,
    /// Generation and cancel token of the fetch currently awaited, if any.
    in_flight: Mutex<Option<(u64, CancellationToken)>>,
}

impl HitFeed {
    pub fn new(fetcher: Arc<dyn Fetcher>, query: Query) -> Self {
        Self {
            fetcher,
            store: Mutex::new(HitStore::new(query)),
            in_flight: Mutex::new(None),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.lock_store().snapshot()
    }

    pub fn query(&self) -> Query {
        self.lock_store().query().clone()
    }

    pub fn is_fetching(&self) -> bool {
        self.lock_in_flight().is_some()
    }

    /// Fetches the next page. Returns the unchanged snapshot when busy or exhausted.
    pub async fn load_more(&self) -> Result<Snapshot, SearchError> {
        let (ticket, query) = {
            let mut store = self.lock_store();
            match store.begin_load_more() {
                Some(ticket) => (ticket, store.query().clone()),
                None => return Ok(store.snapshot()),
            }
        };
        self.run(ticket, query).await
    }

    /// Re-fetches the first page and replaces everything on success.
    ///
    /// An outstanding load-more is cancelled and its page, if any, discarded.
    pub async fn refresh(&self) -> Result<Snapshot, SearchError> {
        let (ticket, query) = {
            let mut store = self.lock_store();
            match store.begin_refresh() {
                Some(ticket) => (ticket, store.query().clone()),
                None => return Ok(store.snapshot()),
            }
        };
        self.run(ticket, query).await
    }

    /// Switches to a new query, dropping hits and any in-flight fetch.
    pub fn set_query(&self, query: Query) {
        if let Some((_, token)) = self.lock_in_flight().take() {
            token.cancel();
        }
        self.lock_store().reset_query(query);
    }

    pub fn remove_optimistic(&self, id: &HitId) -> Option<RemovedHit> {
        self.lock_store().remove_optimistic(id)
    }

    pub fn undo_remove(&self, hit: Hit, index: usize) -> bool {
        self.lock_store().undo_remove(hit, index)
    }

    /// Undoes a removal through its handle; refused once the query has changed.
    pub fn restore(&self, removed: RemovedHit) -> bool {
        self.lock_store().restore(removed)
    }

    /// Removes the hit locally, then deletes it remotely, reconciling per `policy`.
    ///
    /// `NotFound` from the service counts as success.
    pub async fn delete_hit(
        &self,
        deleter: &dyn Deleter,
        id: &HitId,
        policy: DeletePolicy,
    ) -> Result<Snapshot, SearchError> {
        let removed = self.remove_optimistic(id);
        match deleter.delete_by_id(id).await {
            Err(err) if err.kind != FailureKind::NotFound => {
                gallery_warn!("Deleting hit {} failed: {}", id, err);
                if let (Some(removed), true) = (removed, policy.restore_on_failure) {
                    self.restore(removed);
                }
                Err(err)
            }
            _ if policy.refresh_after_delete => self.refresh().await,
            _ => Ok(self.snapshot()),
        }
    }

    async fn run(&self, ticket: FetchTicket, query: Query) -> Result<Snapshot, SearchError> {
        let token = CancellationToken::new();
        if let Some((_, previous)) = self
            .lock_in_flight()
            .replace((ticket.generation, token.clone()))
        {
            previous.cancel();
        }

        let fetched = tokio::select! {
            biased;
            _ = token.cancelled() => None,
            result = self.fetcher.fetch(&query, ticket.cursor.as_ref()) => Some(result),
        };

        {
            let mut in_flight = self.lock_in_flight();
            if matches!(&*in_flight, Some((generation, _)) if *generation == ticket.generation) {
                *in_flight = None;
            }
        }

        let Some(result) = fetched else {
            gallery_debug!(
                "{:?} fetch of generation {} was cancelled",
                ticket.kind,
                ticket.generation
            );
            return Ok(self.snapshot());
        };

        let mut store = self.lock_store();
        store.complete(ticket, result)?;
        Ok(store.snapshot())
    }

    fn lock_store(&self) -> MutexGuard<'_, HitStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_in_flight(&self) -> MutexGuard<'_, Option<(u64, CancellationToken)>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
