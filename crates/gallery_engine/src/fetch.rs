use std::time::Duration;

use gallery_core::{Cursor, Page, Query, SearchError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    /// Root of the search service, e.g. `https://search.example.com/1`.
    pub base_url: String,
    pub index: String,
    pub application_id: Option<String>,
    pub api_key: Option<String>,
    pub hits_per_page: u32,
    /// Field of each hit object holding its id.
    pub id_field: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:7700".to_string(),
            index: "photos".to_string(),
            application_id: None,
            api_key: None,
            hits_per_page: 30,
            id_field: "objectID".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 2 * 1024 * 1024,
        }
    }
}

/// One remote page fetch. `cursor == None` asks for the first page.
///
/// Implementations do not retry; that is up to the caller.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, query: &Query, cursor: Option<&Cursor>) -> Result<Page, SearchError>;
}
