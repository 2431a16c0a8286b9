use gallery_logging::{gallery_debug, gallery_info, gallery_warn};

use crate::{Completion, Effect, FailureKind, GalleryState, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: GalleryState, msg: Msg) -> (GalleryState, Vec<Effect>) {
    let effects = match msg {
        Msg::QueryChanged(query) => {
            gallery_info!("Query changed to {}", query);
            state.reset_query(query);
            load_more(&mut state)
        }
        Msg::EndReached => load_more(&mut state),
        Msg::RefreshRequested => refresh(&mut state),
        Msg::HitTapped { id } => match state.store_mut().remove_optimistic(&id) {
            Some(removed) => {
                gallery_debug!("Removed hit {} at index {}", id, removed.index);
                state.track_delete(removed);
                state.mark_dirty();
                vec![Effect::DeleteHit { id }]
            }
            None => Vec::new(),
        },
        Msg::PageLoaded { ticket, result } => {
            match state.store_mut().complete(ticket, result) {
                Ok(Completion::Applied { .. }) => {
                    state.mark_dirty();
                    state.set_error(None);
                }
                Ok(Completion::Superseded) => {}
                Err(err) => {
                    gallery_warn!("Page fetch failed: {}", err);
                    state.mark_dirty();
                    state.set_error(Some(err));
                }
            }
            Vec::new()
        }
        Msg::DeleteCompleted { id, result } => {
            let removed = state.take_pending_delete(&id);
            match result {
                Err(err) if err.kind != FailureKind::NotFound => {
                    gallery_warn!("Deleting hit {} failed: {}", id, err);
                    if let Some(removed) = removed {
                        if state.policy().restore_on_failure
                            && state.store_mut().restore(removed)
                        {
                            state.mark_dirty();
                        }
                    }
                    state.set_error(Some(err));
                    Vec::new()
                }
                _ => {
                    gallery_info!("Deleted hit {}", id);
                    state.mark_dirty();
                    if state.policy().refresh_after_delete {
                        refresh(&mut state)
                    } else {
                        Vec::new()
                    }
                }
            }
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Only asks for the next page when the store is idle and not exhausted.
fn load_more(state: &mut GalleryState) -> Vec<Effect> {
    let query = state.store().query().clone();
    match state.store_mut().begin_load_more() {
        Some(ticket) => {
            state.mark_dirty();
            vec![Effect::FetchPage { ticket, query }]
        }
        None => Vec::new(),
    }
}

fn refresh(state: &mut GalleryState) -> Vec<Effect> {
    let query = state.store().query().clone();
    match state.store_mut().begin_refresh() {
        Some(ticket) => {
            state.mark_dirty();
            vec![Effect::FetchPage { ticket, query }]
        }
        None => Vec::new(),
    }
}
