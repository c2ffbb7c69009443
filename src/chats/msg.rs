use axum::{
    debug_handler,
    extract::{Path, State},
    response::{Html, Redirect},
    Form,
};
use serde::Deserialize;
use time::macros::format_description;
use tower_sessions::Session;

use crate::{
    genai::Assist,
    hub::SharedHub,
    include_res,
    model::Message,
    res,
    view::{View, ACTIVE_CHAT_ID, VIEW},
    AppResult,
};

use super::inbox::chat_list;

#[derive(Deserialize)]
pub(crate) struct SendMessageForm {
    text: String,
}

pub(crate) fn msg_to_html(message: &Message, user_id: &str) -> String {
    let class = if message.sender_id == user_id { "msg mine" } else { "msg theirs" };
    let at = message
        .timestamp
        .format(format_description!("[hour]:[minute]"))
        .unwrap_or_default();

    res::fill(
        include_res!(str, "/pages/chats/message.html"),
        &[
            ("class", class),
            ("at", at.as_str()),
            ("content", res::markdown(&message.text).as_str()),
        ],
    )
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn chat(
    State(hub): State<SharedHub>,
    session: Session,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let hub = hub.lock().await;
    let user = hub.user()?;
    let chat = hub.chat(&id)?;
    session.insert(VIEW, View::Inbox).await?;
    session.insert(ACTIVE_CHAT_ID, &chat.id).await?;

    let other = chat.counterpart(&user.id);
    let messages: String = if chat.messages.is_empty() {
        "<p class=\"empty\">Say hi and lock in a time.</p>".to_owned()
    } else {
        chat.messages.iter().map(|m| msg_to_html(m, &user.id)).collect()
    };

    let window = res::fill(
        include_res!(str, "/pages/chats/chat.html"),
        &[
            ("id", res::escape(&chat.id).as_str()),
            ("photo", res::escape(other.map(|u| u.photo()).unwrap_or_default()).as_str()),
            ("name", res::escape(other.map(|u| u.name.as_str()).unwrap_or("?")).as_str()),
            ("messages", messages.as_str()),
        ],
    );
    let body = res::fill(
        include_res!(str, "/pages/chats/inbox.html"),
        &[
            ("chats", chat_list(&hub, &user.id, Some(&chat.id)).as_str()),
            ("window", window.as_str()),
        ],
    );

    Ok(Html(res::view_page(View::Inbox, "Inbox", &body)))
}

/// Sends the message, then lets the host answer through the assist helper.
/// The lock is released while the reply is generated.
#[debug_handler(state = crate::AppState)]
pub(crate) async fn send(
    State(hub): State<SharedHub>,
    State(assist): State<Assist>,
    Path(id): Path<String>,
    Form(SendMessageForm { text }): Form<SendMessageForm>,
) -> AppResult<Redirect> {
    let back = Redirect::to(&format!("/c/{id}"));

    let (persona, context) = {
        let mut hub = hub.lock().await;
        if hub.send_message(&id, &text).await?.is_none() {
            return Ok(back);
        }

        let user_id = hub.user()?.id.clone();
        let chat = hub.chat(&id)?;
        let persona = chat
            .counterpart(&user_id)
            .map(|u| u.name.clone())
            .unwrap_or_default();
        let context = hub
            .proposal(&chat.proposal_id)
            .map(|p| p.title.clone())
            .unwrap_or_else(|_| "a date".to_owned());
        (persona, context)
    };

    let reply = assist.generate_chat_reply(&persona, &context, &text).await;
    hub.lock().await.receive_reply(&id, &reply).await?;

    Ok(back)
}
