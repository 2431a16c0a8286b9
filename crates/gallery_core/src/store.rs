use std::collections::HashSet;

use gallery_logging::{gallery_debug, gallery_trace};

use crate::{Cursor, Hit, HitId, Page, Query, SearchError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    LoadingMore,
    Refreshing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    LoadMore,
    Refresh,
}

/// Tag carried by an in-flight fetch. Only the ticket matching the store's
/// current generation may change accumulated state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub kind: FetchKind,
    pub cursor: Option<Cursor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The page was merged; `added` counts hits that were actually new.
    Applied { added: usize },
    /// A newer operation owns the store; the page was dropped.
    Superseded,
}

/// Reconciliation handle returned by an optimistic removal.
///
/// `epoch` names the query the hit was removed from; [`HitStore::restore`]
/// refuses handles from an earlier query.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedHit {
    pub hit: Hit,
    pub index: usize,
    pub epoch: u64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    pub hits: Vec<Hit>,
    pub has_more: bool,
    pub status: Status,
}

impl Snapshot {
    pub fn ids(&self) -> Vec<&str> {
        self.hits.iter().map(|hit| hit.id.as_str()).collect()
    }
}

/// Ordered, deduplicated accumulation of hits for one query.
///
/// The store never performs IO. Callers ask for a [`FetchTicket`], run the
/// fetch however they like, and hand the result back through
/// [`HitStore::complete`].
#[derive(Debug, Clone)]
pub struct HitStore {
    query: Query,
    hits: Vec<Hit>,
    ids: HashSet<HitId>,
    tombstones: HashSet<HitId>,
    next: Option<Cursor>,
    has_more: bool,
    status: Status,
    generation: u64,
    epoch: u64,
}

impl Default for HitStore {
    fn default() -> Self {
        Self::new(Query::default())
    }
}

impl HitStore {
    pub fn new(query: Query) -> Self {
        Self {
            query,
            hits: Vec::new(),
            ids: HashSet::new(),
            tombstones: HashSet::new(),
            next: None,
            has_more: true,
            status: Status::Idle,
            generation: 0,
            epoch: 0,
        }
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Bumped only when the query changes.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn hits(&self) -> &[Hit] {
        &self.hits
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn contains(&self, id: &HitId) -> bool {
        self.ids.contains(id)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            hits: self.hits.clone(),
            has_more: self.has_more,
            status: self.status,
        }
    }

    /// Discards everything accumulated for the previous query.
    pub fn reset_query(&mut self, query: Query) {
        gallery_debug!("Resetting hit store for query {}", query);
        self.generation += 1;
        self.epoch += 1;
        self.query = query;
        self.hits.clear();
        self.ids.clear();
        self.tombstones.clear();
        self.next = None;
        self.has_more = true;
        self.status = Status::Idle;
    }

    /// Starts fetching the next page, or returns `None` when busy or exhausted.
    pub fn begin_load_more(&mut self) -> Option<FetchTicket> {
        if self.status != Status::Idle || !self.has_more {
            return None;
        }
        self.generation += 1;
        self.status = Status::LoadingMore;
        Some(FetchTicket {
            generation: self.generation,
            kind: FetchKind::LoadMore,
            cursor: self.next.clone(),
        })
    }

    /// Starts fetching the first page again. Supersedes an outstanding load-more.
    pub fn begin_refresh(&mut self) -> Option<FetchTicket> {
        if self.status == Status::Refreshing {
            return None;
        }
        if self.status == Status::LoadingMore {
            gallery_debug!(
                "Refresh supersedes load-more of generation {}",
                self.generation
            );
        }
        self.generation += 1;
        self.status = Status::Refreshing;
        Some(FetchTicket {
            generation: self.generation,
            kind: FetchKind::Refresh,
            cursor: None,
        })
    }

    /// Applies the outcome of a fetch started by `begin_load_more` or `begin_refresh`.
    ///
    /// A stale ticket never touches state and always yields
    /// [`Completion::Superseded`], even when its fetch failed.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<Page, SearchError>,
    ) -> Result<Completion, SearchError> {
        if ticket.generation != self.generation || self.status == Status::Idle {
            match &result {
                Ok(_) => gallery_debug!(
                    "Discarding {:?} response of generation {} (current {})",
                    ticket.kind,
                    ticket.generation,
                    self.generation
                ),
                Err(err) => gallery_debug!(
                    "Discarding {:?} error of generation {} (current {}): {}",
                    ticket.kind,
                    ticket.generation,
                    self.generation,
                    err
                ),
            }
            return Ok(Completion::Superseded);
        }

        self.status = Status::Idle;
        let page = result?;
        let added = match ticket.kind {
            FetchKind::LoadMore => self.append(page.hits),
            FetchKind::Refresh => self.replace(page.hits),
        };
        self.has_more = page.next.is_some();
        self.next = page.next;
        gallery_trace!(
            "Applied {:?} page: added={} total={} has_more={}",
            ticket.kind,
            added,
            self.hits.len(),
            self.has_more
        );
        Ok(Completion::Applied { added })
    }

    /// Removes the hit locally, whatever the current status.
    pub fn remove_optimistic(&mut self, id: &HitId) -> Option<RemovedHit> {
        let index = self.hits.iter().position(|hit| &hit.id == id)?;
        let hit = self.hits.remove(index);
        self.ids.remove(id);
        self.tombstones.insert(id.clone());
        Some(RemovedHit {
            hit,
            index,
            epoch: self.epoch,
        })
    }

    /// Undoes a removal through its handle, unless the query changed since.
    pub fn restore(&mut self, removed: RemovedHit) -> bool {
        if removed.epoch != self.epoch {
            gallery_debug!(
                "Not restoring hit {} from an earlier query (epoch {}, current {})",
                removed.hit.id,
                removed.epoch,
                self.epoch
            );
            return false;
        }
        self.undo_remove(removed.hit, removed.index)
    }

    /// Puts a removed hit back, clamping `index` to the current length.
    ///
    /// Returns `false` if a hit with the same id is already present.
    pub fn undo_remove(&mut self, hit: Hit, index: usize) -> bool {
        if self.ids.contains(&hit.id) {
            return false;
        }
        self.tombstones.remove(&hit.id);
        self.ids.insert(hit.id.clone());
        let index = index.min(self.hits.len());
        self.hits.insert(index, hit);
        true
    }

    fn append(&mut self, incoming: Vec<Hit>) -> usize {
        let before = self.hits.len();
        for hit in incoming {
            if self.tombstones.contains(&hit.id) || self.ids.contains(&hit.id) {
                continue;
            }
            self.ids.insert(hit.id.clone());
            self.hits.push(hit);
        }
        self.hits.len() - before
    }

    fn replace(&mut self, incoming: Vec<Hit>) -> usize {
        self.hits.clear();
        self.ids.clear();
        self.tombstones.clear();
        self.append(incoming)
    }
}
