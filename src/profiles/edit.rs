use axum::{
    debug_handler,
    extract::State,
    response::{Html, Redirect},
    Form,
};
use tower_sessions::Session;

use crate::{
    hub::{MemoryForm, ProfileForm, SharedHub},
    include_res, res,
    view::View,
    AppResult,
};

#[debug_handler(state = crate::AppState)]
pub(crate) async fn edit_page(State(hub): State<SharedHub>) -> AppResult<Html<String>> {
    let hub = hub.lock().await;
    let user = hub.user()?;

    let body = res::fill(
        include_res!(str, "/pages/profiles/edit.html"),
        &[
            ("name", res::escape(&user.name).as_str()),
            ("bio", res::escape(&user.bio).as_str()),
            ("photo", res::escape(user.photo()).as_str()),
        ],
    );

    Ok(Html(res::view_page(View::Profile, "Edit profile", &body)))
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn edit(
    State(hub): State<SharedHub>,
    Form(form): Form<ProfileForm>,
) -> AppResult<Redirect> {
    hub.lock().await.update_profile(form).await?;
    Ok(Redirect::to(View::Profile.path()))
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn add_memory(
    State(hub): State<SharedHub>,
    Form(form): Form<MemoryForm>,
) -> AppResult<Redirect> {
    hub.lock().await.add_memory(form).await?;
    Ok(Redirect::to(View::Profile.path()))
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn logout(State(hub): State<SharedHub>, session: Session) -> AppResult<Redirect> {
    hub.lock().await.logout().await;
    session.clear().await;
    Ok(Redirect::to("/"))
}
