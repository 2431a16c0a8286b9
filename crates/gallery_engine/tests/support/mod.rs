#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, Once};

use gallery_core::{Cursor, Hit, HitId, Page, Query, SearchError};
use gallery_engine::{Deleter, Fetcher};
use serde_json::json;
use tokio::sync::Notify;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(gallery_logging::initialize_for_tests);
}

pub fn page(ids: &[&str], next: Option<&str>) -> Page {
    Page::new(
        ids.iter()
            .map(|id| Hit::new(*id, json!({ "image": format!("https://img.example/{id}.jpg") })))
            .collect(),
        next.map(Cursor::new),
    )
}

type Key = Option<String>;

/// Fetcher answering from per-cursor queues, optionally holding a cursor
/// until its gate is opened.
#[derive(Default)]
pub struct ScriptedFetcher {
    responses: Mutex<HashMap<Key, VecDeque<Result<Page, SearchError>>>>,
    gates: Mutex<HashMap<Key, Arc<Notify>>>,
    calls: Mutex<Vec<(Query, Key)>>,
}

impl ScriptedFetcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, cursor: Option<&str>, result: Result<Page, SearchError>) {
        self.responses
            .lock()
            .unwrap()
            .entry(cursor.map(str::to_string))
            .or_default()
            .push_back(result);
    }

    /// Holds fetches for `cursor` until the returned gate is notified.
    pub fn gate(&self, cursor: Option<&str>) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(cursor.map(str::to_string), gate.clone());
        gate
    }

    pub fn cursors_requested(&self) -> Vec<Key> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, cursor)| cursor.clone())
            .collect()
    }

    pub fn queries_requested(&self) -> Vec<Query> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(query, _)| query.clone())
            .collect()
    }

    pub async fn wait_for_calls(&self, count: usize) {
        while self.calls.lock().unwrap().len() < count {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait::async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, query: &Query, cursor: Option<&Cursor>) -> Result<Page, SearchError> {
        let key = cursor.map(|cursor| cursor.as_str().to_string());
        self.calls.lock().unwrap().push((query.clone(), key.clone()));
        let gate = self.gates.lock().unwrap().get(&key).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.responses
            .lock()
            .unwrap()
            .get_mut(&key)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(SearchError::transport(format!("no scripted page for {key:?}"))))
    }
}

/// Deleter that answers every call with the same result, optionally held
/// until its gate is opened.
pub struct ScriptedDeleter {
    result: Result<(), SearchError>,
    gate: Mutex<Option<Arc<Notify>>>,
    deleted: Mutex<Vec<HitId>>,
}

impl ScriptedDeleter {
    pub fn new(result: Result<(), SearchError>) -> Arc<Self> {
        Arc::new(Self {
            result,
            gate: Mutex::new(None),
            deleted: Mutex::new(Vec::new()),
        })
    }

    /// Holds every delete until the returned gate is notified.
    pub fn gate(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn deleted(&self) -> Vec<HitId> {
        self.deleted.lock().unwrap().clone()
    }

    pub async fn wait_for_deletes(&self, count: usize) {
        while self.deleted.lock().unwrap().len() < count {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait::async_trait]
impl Deleter for ScriptedDeleter {
    async fn delete_by_id(&self, id: &HitId) -> Result<(), SearchError> {
        self.deleted.lock().unwrap().push(id.clone());
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.result.clone()
    }
}
