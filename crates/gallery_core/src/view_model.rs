use crate::{Hit, Query, Status};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GalleryViewModel {
    pub query: Query,
    pub hits: Vec<Hit>,
    pub has_more: bool,
    pub status: Status,
    pub pending_deletes: usize,
    pub last_error: Option<String>,
    pub dirty: bool,
}

impl GalleryViewModel {
    /// Lays the hits out in grid rows of `columns` cells; the last row may be short.
    pub fn rows(&self, columns: usize) -> Vec<&[Hit]> {
        self.hits.chunks(columns.max(1)).collect()
    }

    pub fn is_refreshing(&self) -> bool {
        self.status == Status::Refreshing
    }
}
