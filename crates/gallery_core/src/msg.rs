use crate::{FetchTicket, HitId, Page, Query, SearchError};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User submitted a new search.
    QueryChanged(Query),
    /// The grid scrolled to its last row.
    EndReached,
    /// Pull-to-refresh.
    RefreshRequested,
    /// User tapped a hit, which deletes it.
    HitTapped { id: HitId },
    /// Engine finished a page fetch.
    PageLoaded {
        ticket: FetchTicket,
        result: Result<Page, SearchError>,
    },
    /// Engine finished a delete call.
    DeleteCompleted {
        id: HitId,
        result: Result<(), SearchError>,
    },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
