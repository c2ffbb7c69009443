mod backup;
mod edit;
mod page;
mod report;

use axum::{routing::{get, post}, Router};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(page::profile))
        .route("/edit", get(edit::edit_page).post(edit::edit))
        .route("/memories", post(edit::add_memory))
        .route("/logout", post(edit::logout))
        .route("/export", get(backup::export))
        .route("/import", post(backup::import))
        .route("/report", post(report::report))
}

pub fn host_router() -> Router<AppState> {
    Router::new().route("/{host_id}", get(page::host))
}
