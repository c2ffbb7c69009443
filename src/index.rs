use axum::{
    debug_handler,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::{hub::SharedHub, include_res, res, view::{View, VIEW}, AppResult};

/// Entry screen when signed out, otherwise back to the last view.
#[debug_handler(state = crate::AppState)]
pub async fn index(State(hub): State<SharedHub>, session: Session) -> AppResult<Response> {
    if hub.lock().await.current_user().is_none() {
        return Ok(Html(res::page("DateHub", include_res!(str, "/pages/entry.html"))).into_response());
    }

    let view = session.get::<View>(VIEW).await?.unwrap_or_default();
    Ok(Redirect::to(view.path()).into_response())
}

#[debug_handler]
pub async fn privacy() -> impl IntoResponse {
    Html(res::page(
        "Privacy",
        &res::markdown(include_res!(str, "/pages/privacy.md")),
    ))
}
