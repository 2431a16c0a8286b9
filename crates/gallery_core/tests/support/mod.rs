#![allow(dead_code)]

use std::sync::Once;

use gallery_core::{Cursor, Hit, Page};
use serde_json::json;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(gallery_logging::initialize_for_tests);
}

pub fn hit(id: &str) -> Hit {
    Hit::new(id, json!({ "image": format!("https://img.example/{id}.jpg") }))
}

pub fn page(ids: &[&str], next: Option<&str>) -> Page {
    Page::new(ids.iter().map(|id| hit(id)).collect(), next.map(Cursor::new))
}
