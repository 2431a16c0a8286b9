//! Gallery core: paginated hit store, pure update loop and view-model helpers.
mod effect;
mod error;
mod msg;
mod state;
mod store;
mod types;
mod update;
mod view_model;

pub use effect::Effect;
pub use error::{FailureKind, SearchError};
pub use msg::Msg;
pub use state::{DeletePolicy, GalleryState};
pub use store::{Completion, FetchKind, FetchTicket, HitStore, RemovedHit, Snapshot, Status};
pub use types::{Cursor, Hit, HitId, Page, Query};
pub use update::update;
pub use view_model::GalleryViewModel;
