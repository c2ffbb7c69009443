mod inbox;
mod msg;

use axum::{routing::get, Router};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(inbox::inbox))
        .route("/{id}", get(msg::chat).post(msg::send))
}
