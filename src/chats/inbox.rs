use axum::{debug_handler, extract::State, response::Html};
use tower_sessions::Session;

use crate::{
    hub::{Hub, SharedHub},
    include_res, res,
    view::{View, ACTIVE_CHAT_ID, VIEW},
    AppResult,
};

/// Chat list with `active` highlighted.
pub(crate) fn chat_list(hub: &Hub, user_id: &str, active: Option<&str>) -> String {
    let items: String = hub
        .chats()
        .iter()
        .map(|chat| {
            let name = chat.counterpart(user_id).map(|u| u.name.as_str()).unwrap_or("?");
            let class = if Some(chat.id.as_str()) == active { "chat current" } else { "chat" };
            res::fill(
                include_res!(str, "/pages/chats/chat_item.html"),
                &[
                    ("class", class),
                    ("id", res::escape(&chat.id).as_str()),
                    ("name", res::escape(name).as_str()),
                    ("last_message", res::escape(&chat.last_message).as_str()),
                ],
            )
        })
        .collect();

    if items.is_empty() {
        "<p class=\"empty\">No chats yet. Send a date request to start one.</p>".to_owned()
    } else {
        items
    }
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn inbox(State(hub): State<SharedHub>, session: Session) -> AppResult<Html<String>> {
    let hub = hub.lock().await;
    let user = hub.user()?;
    session.insert(VIEW, View::Inbox).await?;
    let active = session.get::<String>(ACTIVE_CHAT_ID).await?;

    let body = res::fill(
        include_res!(str, "/pages/chats/inbox.html"),
        &[
            ("chats", chat_list(&hub, &user.id, active.as_deref()).as_str()),
            ("window", "<div class=\"placeholder\">Select a chat to begin planning</div>"),
        ],
    );

    Ok(Html(res::view_page(View::Inbox, "Inbox", &body)))
}
