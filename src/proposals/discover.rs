use axum::{debug_handler, extract::State, response::Html};
use tower_sessions::Session;

use crate::{
    hub::SharedHub,
    include_res, res,
    view::{View, VIEW},
    AppResult,
};

use super::{card, cover};

#[debug_handler(state = crate::AppState)]
pub(crate) async fn discover(
    State(hub): State<SharedHub>,
    session: Session,
) -> AppResult<Html<String>> {
    let hub = hub.lock().await;
    let here = hub.user()?.coords();
    session.insert(VIEW, View::Discover).await?;

    let cards: String = hub.proposals().iter().map(|p| card(p, here)).collect();
    let body = res::fill(
        include_res!(str, "/pages/proposals/discover.html"),
        &[("cards", cards.as_str())],
    );

    Ok(Html(res::view_page(View::Discover, "Discover", &body)))
}

/// Every proposal, full screen: its video when it has one, the host photo
/// otherwise.
#[debug_handler(state = crate::AppState)]
pub(crate) async fn reels(
    State(hub): State<SharedHub>,
    session: Session,
) -> AppResult<Html<String>> {
    let hub = hub.lock().await;
    hub.user()?;
    session.insert(VIEW, View::Reels).await?;

    let mut items = String::new();
    for proposal in hub.proposals() {
        let media = match &proposal.video_url {
            Some(url) => format!(
                "<video src=\"{}\" poster=\"{}\" loop muted playsinline autoplay></video>",
                res::escape(url),
                res::escape(&cover(proposal)),
            ),
            None => format!("<img src=\"{}\" alt=\"Host\">", res::escape(&cover(proposal))),
        };
        let host = proposal.host.as_ref().map(|h| h.name.as_str()).unwrap_or("Host");

        items += &res::fill(
            include_res!(str, "/pages/proposals/reel.html"),
            &[
                ("id", res::escape(&proposal.id).as_str()),
                ("host_id", res::escape(&proposal.host_id).as_str()),
                ("media", media.as_str()),
                ("host", res::escape(host).as_str()),
                ("title", res::escape(&proposal.title).as_str()),
                ("price", proposal.price.to_string().as_str()),
            ],
        );
    }
    if items.is_empty() {
        items = "<p class=\"empty\">No dates yet. Be the first to post one.</p>".to_owned();
    }

    Ok(Html(res::view_page(View::Reels, "Reels", &items)))
}
