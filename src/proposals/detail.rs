use axum::{
    debug_handler,
    extract::{Path, State},
    response::{Html, Redirect},
    Form,
};
use tower_sessions::Session;

use crate::{
    hub::{ReviewForm, SharedHub},
    include_res, res,
    view::{View, ACTIVE_CHAT_ID, VIEW},
    AppResult,
};

use super::cover;

#[debug_handler(state = crate::AppState)]
pub(crate) async fn detail(
    State(hub): State<SharedHub>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let hub = hub.lock().await;
    let user = hub.user()?;
    let proposal = hub.proposal(&id)?;

    let host = proposal.host.as_ref();
    let actions = if proposal.host_id == user.id {
        "<p class=\"note\">This is your date. Requests show up in your inbox.</p>".to_owned()
    } else {
        res::fill(
            include_res!(str, "/pages/proposals/actions.html"),
            &[("id", res::escape(&proposal.id).as_str())],
        )
    };
    let video = proposal
        .video_url
        .as_ref()
        .map(|url| format!("<video src=\"{}\" controls muted></video>", res::escape(url)))
        .unwrap_or_default();

    let body = res::fill(
        include_res!(str, "/pages/proposals/detail.html"),
        &[
            ("actions", actions.as_str()),
            ("video", video.as_str()),
            ("id", res::escape(&proposal.id).as_str()),
            ("cover", res::escape(&cover(proposal)).as_str()),
            ("host_id", res::escape(&proposal.host_id).as_str()),
            ("host", res::escape(host.map(|h| h.name.as_str()).unwrap_or("Host")).as_str()),
            ("activity", proposal.activity_type.label()),
            ("price", proposal.price.to_string().as_str()),
            ("payment", proposal.payment_preference.label()),
            ("when", res::escape(&format!("{} {}", proposal.date, proposal.time)).as_str()),
            ("location", res::escape(&proposal.location).as_str()),
            ("title", res::escape(&proposal.title).as_str()),
            ("description", res::escape(&proposal.description).as_str()),
        ],
    );

    Ok(Html(res::page(&proposal.title, &body)))
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn quick_chat(
    State(hub): State<SharedHub>,
    session: Session,
    Path(id): Path<String>,
) -> AppResult<Redirect> {
    let chat_id = hub.lock().await.quick_chat(&id).await?;

    session.insert(ACTIVE_CHAT_ID, &chat_id).await?;
    session.insert(VIEW, View::Inbox).await?;

    Ok(Redirect::to(&format!("/c/{chat_id}")))
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn review(
    State(hub): State<SharedHub>,
    Path(id): Path<String>,
    Form(form): Form<ReviewForm>,
) -> AppResult<Redirect> {
    let mut hub = hub.lock().await;
    hub.review_host(&id, form).await?;
    let host_id = hub.proposal(&id)?.host_id.clone();

    Ok(Redirect::to(&format!("/h/{host_id}")))
}
