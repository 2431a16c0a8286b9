use crate::{FetchTicket, HitId, Query};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch one page; the ticket comes back unchanged in `Msg::PageLoaded`.
    FetchPage { ticket: FetchTicket, query: Query },
    /// Ask the service to delete an object that was already removed locally.
    DeleteHit { id: HitId },
}
