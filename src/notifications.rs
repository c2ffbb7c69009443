use axum::{
    debug_handler,
    extract::{Path, State},
    response::{Html, Redirect},
    routing::{get, post},
    Router,
};
use time::macros::format_description;

use crate::{
    hub::SharedHub,
    include_res,
    model::{AppNotification, NotificationKind},
    res, AppResult, AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/{id}/read", post(read))
        .route("/clear", post(clear))
}

fn icon(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Reminder => "⏰",
        NotificationKind::Message => "💬",
        NotificationKind::Status => "✔",
    }
}

fn item(notification: &AppNotification) -> String {
    let at = notification
        .timestamp
        .format(format_description!("[day] [month repr:short], [hour]:[minute]"))
        .unwrap_or_default();

    res::fill(
        include_res!(str, "/pages/notification.html"),
        &[
            ("class", if notification.is_read { "notice read" } else { "notice unread" }),
            ("icon", icon(notification.kind)),
            ("id", res::escape(&notification.id).as_str()),
            ("title", res::escape(&notification.title).as_str()),
            ("message", res::escape(&notification.message).as_str()),
            ("at", at.as_str()),
        ],
    )
}

#[debug_handler(state = crate::AppState)]
async fn list(State(hub): State<SharedHub>) -> AppResult<Html<String>> {
    let hub = hub.lock().await;
    hub.user()?;

    let items: String = hub.notifications().iter().map(item).collect();
    let body = format!(
        "<h1>Notifications <small>{} unread</small></h1>\
         <form method=\"post\" action=\"/n/clear\"><button>Clear all</button></form>{}",
        hub.unread_notifications(),
        if items.is_empty() { "<p class=\"empty\">You're all caught up.</p>".to_owned() } else { items },
    );

    Ok(Html(res::page("Notifications", &body)))
}

#[debug_handler(state = crate::AppState)]
async fn read(State(hub): State<SharedHub>, Path(id): Path<String>) -> AppResult<Redirect> {
    hub.lock().await.mark_notification_read(&id).await?;
    Ok(Redirect::to("/n"))
}

#[debug_handler(state = crate::AppState)]
async fn clear(State(hub): State<SharedHub>) -> AppResult<Redirect> {
    hub.lock().await.clear_notifications().await;
    Ok(Redirect::to("/n"))
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn unread_items_offer_mark_read() {
        let mut notification = AppNotification {
            id: "n1".to_owned(),
            kind: NotificationKind::Message,
            title: "New message from Ananya S.".to_owned(),
            message: "see you there".to_owned(),
            timestamp: datetime!(2024-12-01 19:30 UTC),
            is_read: false,
        };

        let html = item(&notification);
        assert!(html.contains("notice unread"));
        assert!(html.contains("/n/n1/read"));
        assert!(html.contains("01 Dec, 19:30"));

        notification.is_read = true;
        assert!(item(&notification).contains("notice read"));

        notification.title = "{message}".to_owned();
        let html = item(&notification);
        assert!(html.contains("<h3>{message}</h3>"));
    }
}
