mod support;

use gallery_core::{
    update, Cursor, DeletePolicy, Effect, FetchKind, FetchTicket, GalleryState, HitId, Msg, Query,
    SearchError, Status,
};
use pretty_assertions::assert_eq;
use support::{init_logging, page};

fn single_fetch(effects: Vec<Effect>) -> (FetchTicket, Query) {
    match effects.as_slice() {
        [Effect::FetchPage { ticket, query }] => (ticket.clone(), query.clone()),
        other => panic!("expected one fetch effect, got {other:?}"),
    }
}

/// Starts a search and feeds the first page back in.
fn searched(policy: DeletePolicy, ids: &[&str], next: Option<&str>) -> GalleryState {
    let (state, effects) = update(
        GalleryState::with_policy(policy),
        Msg::QueryChanged(Query::new("beach")),
    );
    let (ticket, _) = single_fetch(effects);
    let (mut state, effects) = update(
        state,
        Msg::PageLoaded {
            ticket,
            result: Ok(page(ids, next)),
        },
    );
    assert!(effects.is_empty());
    state.consume_dirty();
    state
}

#[test]
fn query_change_requests_the_first_page() {
    init_logging();
    let (mut state, effects) = update(
        GalleryState::new(),
        Msg::QueryChanged(Query::new("beach").with_filter("orientation", "square")),
    );

    let (ticket, query) = single_fetch(effects);
    assert_eq!(ticket.kind, FetchKind::LoadMore);
    assert_eq!(ticket.cursor, None);
    assert_eq!(query.term, "beach");
    assert_eq!(state.view().status, Status::LoadingMore);
    assert!(state.consume_dirty());
}

#[test]
fn end_reached_fetches_next_page_until_exhausted() {
    init_logging();
    let state = searched(DeletePolicy::default(), &["a", "b"], Some("c2"));

    let (state, effects) = update(state, Msg::EndReached);
    let (ticket, _) = single_fetch(effects);
    assert_eq!(ticket.cursor, Some(Cursor::new("c2")));

    // Scrolling again while the page is in flight does nothing.
    let (mut state, effects) = update(state, Msg::EndReached);
    assert!(effects.is_empty());
    assert!(state.consume_dirty());

    let (state, _) = update(
        state,
        Msg::PageLoaded {
            ticket,
            result: Ok(page(&["b", "c"], None)),
        },
    );
    let view = state.view();
    let ids: Vec<_> = view.hits.iter().map(|hit| hit.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert!(!view.has_more);

    let (mut state, effects) = update(state, Msg::EndReached);
    assert!(effects.is_empty());
    state.consume_dirty();
    let (mut state, effects) = update(state, Msg::EndReached);
    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
}

#[test]
fn refresh_during_load_more_discards_the_late_page() {
    init_logging();
    let state = searched(DeletePolicy::default(), &["a", "b"], Some("c2"));

    let (state, effects) = update(state, Msg::EndReached);
    let (load_more, _) = single_fetch(effects);
    let (state, effects) = update(state, Msg::RefreshRequested);
    let (refresh, _) = single_fetch(effects);
    assert_eq!(refresh.kind, FetchKind::Refresh);
    assert!(state.view().is_refreshing());

    let (state, _) = update(
        state,
        Msg::PageLoaded {
            ticket: refresh,
            result: Ok(page(&["n1", "n2"], Some("m2"))),
        },
    );
    let (mut state, _) = update(
        state,
        Msg::PageLoaded {
            ticket: load_more,
            result: Ok(page(&["c", "d"], Some("c3"))),
        },
    );

    let view = state.view();
    let ids: Vec<_> = view.hits.iter().map(|hit| hit.id.as_str()).collect();
    assert_eq!(ids, vec!["n1", "n2"]);
    assert_eq!(view.status, Status::Idle);
    assert!(state.consume_dirty());
}

#[test]
fn late_error_from_superseded_load_more_is_not_reported() {
    init_logging();
    let state = searched(DeletePolicy::default(), &["a", "b"], Some("c2"));

    let (state, effects) = update(state, Msg::EndReached);
    let (load_more, _) = single_fetch(effects);
    let (state, effects) = update(state, Msg::RefreshRequested);
    let (refresh, _) = single_fetch(effects);
    let (mut state, _) = update(
        state,
        Msg::PageLoaded {
            ticket: refresh,
            result: Ok(page(&["n1"], None)),
        },
    );
    state.consume_dirty();

    let (mut state, effects) = update(
        state,
        Msg::PageLoaded {
            ticket: load_more,
            result: Err(SearchError::transport("stale")),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.last_error(), None);
    assert_eq!(state.view().last_error, None);
    assert_eq!(state.view().hits.len(), 1);
    assert!(!state.consume_dirty());
}

#[test]
fn fetch_error_is_reported_and_cleared_by_next_success() {
    init_logging();
    let state = searched(DeletePolicy::default(), &["a"], Some("c2"));

    let (state, effects) = update(state, Msg::EndReached);
    let (ticket, _) = single_fetch(effects);
    let (state, _) = update(
        state,
        Msg::PageLoaded {
            ticket,
            result: Err(SearchError::transport("connection refused")),
        },
    );
    assert_eq!(
        state.view().last_error.as_deref(),
        Some("transport error: connection refused")
    );
    assert_eq!(state.view().hits.len(), 1);

    let (state, effects) = update(state, Msg::EndReached);
    let (ticket, _) = single_fetch(effects);
    let (state, _) = update(
        state,
        Msg::PageLoaded {
            ticket,
            result: Ok(page(&["b"], None)),
        },
    );
    assert_eq!(state.view().last_error, None);
    assert_eq!(state.view().hits.len(), 2);
}

#[test]
fn tapping_a_hit_removes_it_and_requests_delete() {
    init_logging();
    let state = searched(DeletePolicy::default(), &["a", "b", "c"], None);

    let (mut state, effects) = update(state, Msg::HitTapped { id: HitId::new("b") });
    assert_eq!(effects, vec![Effect::DeleteHit { id: HitId::new("b") }]);
    assert_eq!(state.view().hits.len(), 2);
    assert_eq!(state.view().pending_deletes, 1);
    assert!(state.is_delete_pending(&HitId::new("b")));
    assert!(state.is_busy());
    assert!(state.consume_dirty());

    let (mut state, effects) = update(
        state,
        Msg::DeleteCompleted {
            id: HitId::new("b"),
            result: Ok(()),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().pending_deletes, 0);
    assert_eq!(state.view().hits.len(), 2);
    assert!(!state.is_busy());
    assert!(state.consume_dirty());
}

#[test]
fn tapping_an_unknown_hit_does_nothing() {
    init_logging();
    let state = searched(DeletePolicy::default(), &["a"], None);

    let (mut state, effects) = update(state, Msg::HitTapped { id: HitId::new("zz") });
    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
}

#[test]
fn not_found_counts_as_deleted() {
    init_logging();
    let state = searched(DeletePolicy::default(), &["a", "b"], None);
    let (state, _) = update(state, Msg::HitTapped { id: HitId::new("a") });

    let (state, effects) = update(
        state,
        Msg::DeleteCompleted {
            id: HitId::new("a"),
            result: Err(SearchError::not_found("object a does not exist")),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().hits.len(), 1);
    assert_eq!(state.view().last_error, None);
}

#[test]
fn failed_delete_restores_hit_at_prior_position() {
    init_logging();
    let state = searched(DeletePolicy::default(), &["a", "b", "c"], None);
    let (state, _) = update(state, Msg::HitTapped { id: HitId::new("b") });

    let (state, effects) = update(
        state,
        Msg::DeleteCompleted {
            id: HitId::new("b"),
            result: Err(SearchError::transport("Not enough rights to delete an object")),
        },
    );
    assert!(effects.is_empty());
    let view = state.view();
    let ids: Vec<_> = view.hits.iter().map(|hit| hit.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert!(view.last_error.is_some());
}

#[test]
fn failed_delete_stays_removed_without_restore_policy() {
    init_logging();
    let policy = DeletePolicy {
        restore_on_failure: false,
        ..DeletePolicy::default()
    };
    let state = searched(policy, &["a", "b"], None);
    let (state, _) = update(state, Msg::HitTapped { id: HitId::new("a") });

    let (state, _) = update(
        state,
        Msg::DeleteCompleted {
            id: HitId::new("a"),
            result: Err(SearchError::transport("timeout")),
        },
    );
    assert_eq!(state.view().hits.len(), 1);
    assert!(state.view().last_error.is_some());
}

#[test]
fn refresh_after_delete_policy_refetches_first_page() {
    init_logging();
    let policy = DeletePolicy {
        refresh_after_delete: true,
        ..DeletePolicy::default()
    };
    let state = searched(policy, &["a", "b"], Some("c2"));
    let (state, _) = update(state, Msg::HitTapped { id: HitId::new("a") });

    let (state, effects) = update(
        state,
        Msg::DeleteCompleted {
            id: HitId::new("a"),
            result: Ok(()),
        },
    );
    let (ticket, query) = single_fetch(effects);
    assert_eq!(ticket.kind, FetchKind::Refresh);
    assert_eq!(query, Query::new("beach"));
    assert!(state.view().is_refreshing());
}

#[test]
fn view_rows_follow_grid_columns() {
    init_logging();
    let state = searched(DeletePolicy::default(), &["a", "b", "c", "d"], None);
    let view = state.view();

    let rows = view.rows(3);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].len(), 3);
    assert_eq!(rows[1][0].id, HitId::new("d"));
    assert_eq!(view.rows(0).len(), 4);
}
