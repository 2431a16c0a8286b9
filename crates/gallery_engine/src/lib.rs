//! Gallery engine: remote fetch/delete boundaries and the drivers that run them.
mod delete;
mod engine;
mod feed;
mod fetch;
mod http;
mod types;

pub use delete::Deleter;
pub use engine::EngineHandle;
pub use feed::HitFeed;
pub use fetch::{FetchSettings, Fetcher};
pub use http::HttpSearchClient;
pub use types::{EngineError, EngineEvent};
