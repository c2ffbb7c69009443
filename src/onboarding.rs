use axum::{
    debug_handler,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use tower_sessions::Session;

use crate::{
    hub::{OnboardingForm, SharedHub},
    include_res, res,
    view::{View, VIEW},
    AppResult,
};

#[debug_handler(state = crate::AppState)]
pub async fn onboarding_page(State(hub): State<SharedHub>) -> AppResult<Response> {
    if hub.lock().await.current_user().is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    Ok(Html(res::page(
        "Join DateHub",
        include_res!(str, "/pages/onboarding.html"),
    ))
    .into_response())
}

#[debug_handler(state = crate::AppState)]
pub async fn onboard(
    State(hub): State<SharedHub>,
    session: Session,
    Form(form): Form<OnboardingForm>,
) -> AppResult<Redirect> {
    hub.lock().await.onboard(form).await?;
    session.insert(VIEW, View::Discover).await?;

    Ok(Redirect::to(View::Discover.path()))
}
