use gallery_core::{FetchTicket, HitId, Page, SearchError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    PageFetched {
        ticket: FetchTicket,
        result: Result<Page, SearchError>,
    },
    DeleteCompleted {
        id: HitId,
        result: Result<(), SearchError>,
    },
}

impl From<EngineEvent> for gallery_core::Msg {
    fn from(event: EngineEvent) -> Self {
        match event {
            EngineEvent::PageFetched { ticket, result } => Self::PageLoaded { ticket, result },
            EngineEvent::DeleteCompleted { id, result } => Self::DeleteCompleted { id, result },
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid search service url: {0}")]
    InvalidBaseUrl(String),
    #[error("failed to build http client: {0}")]
    Client(String),
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
}
