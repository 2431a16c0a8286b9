use gallery_core::{GalleryViewModel, Hit, Status};

const EMPTY_CELL: &str = "-";

/// Renders the view as text lines: a status line, one line per grid row,
/// and the last error if there is one.
pub fn render(view: &GalleryViewModel, columns: usize, image_field: &str) -> Vec<String> {
    let mut lines = Vec::with_capacity(view.hits.len() / columns.max(1) + 3);
    lines.push(status_line(view));
    for row in view.rows(columns) {
        let cells: Vec<String> = row.iter().map(|hit| cell(hit, image_field)).collect();
        lines.push(cells.join(" | "));
    }
    if let Some(error) = &view.last_error {
        lines.push(format!("error: {error}"));
    }
    lines
}

fn status_line(view: &GalleryViewModel) -> String {
    let status = match view.status {
        Status::Idle => "idle",
        Status::LoadingMore => "loading more",
        Status::Refreshing => "refreshing",
    };
    let more = if view.has_more { "more available" } else { "end of results" };
    let mut line = format!(
        "{} | {} hits | {} | {}",
        view.query,
        view.hits.len(),
        more,
        status
    );
    if view.pending_deletes > 0 {
        line.push_str(&format!(" | {} deletes pending", view.pending_deletes));
    }
    line
}

fn cell(hit: &Hit, image_field: &str) -> String {
    format!(
        "[{}] {}",
        hit.id,
        hit.payload_str(image_field).unwrap_or(EMPTY_CELL)
    )
}
