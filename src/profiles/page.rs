use axum::{
    debug_handler,
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
};
use tower_sessions::Session;

use crate::{
    genai::Assist,
    hub::SharedHub,
    include_res,
    model::{DateMemory, Review, User},
    proposals::card,
    res,
    view::{View, VIEW},
    AppResult,
};

fn header(user: &User) -> String {
    res::fill(
        include_res!(str, "/pages/profiles/header.html"),
        &[
            ("photo", res::escape(user.photo()).as_str()),
            ("name", res::escape(&user.name).as_str()),
            ("age", user.age.to_string().as_str()),
            ("location", res::escape(&user.location).as_str()),
            ("rating", format!("{:.1}", user.rating).as_str()),
            ("review_count", user.review_count.to_string().as_str()),
            ("bio", res::escape(&user.bio).as_str()),
        ],
    )
}

pub(crate) fn reviews_html(reviews: &[Review]) -> String {
    if reviews.is_empty() {
        return "<p class=\"empty\">No reviews yet.</p>".to_owned();
    }

    reviews
        .iter()
        .map(|review| {
            let filled = usize::from(review.rating.min(5));
            let stars = "★".repeat(filled) + &"☆".repeat(5 - filled);
            res::fill(
                include_res!(str, "/pages/profiles/review.html"),
                &[
                    ("photo", res::escape(&review.reviewer_photo).as_str()),
                    ("name", res::escape(&review.reviewer_name).as_str()),
                    ("stars", stars.as_str()),
                    ("timestamp", res::escape(&review.timestamp).as_str()),
                    ("comment", res::escape(&review.comment).as_str()),
                ],
            )
        })
        .collect()
}

pub(crate) fn memories_html(memories: &[DateMemory]) -> String {
    if memories.is_empty() {
        return "<p class=\"empty\">No memories yet.</p>".to_owned();
    }

    memories
        .iter()
        .map(|memory| {
            format!(
                "<figure class=\"memory\"><img src=\"{}\" alt=\"\"><figcaption>{} <small>{}</small></figcaption></figure>",
                res::escape(&memory.photo_url),
                res::escape(&memory.activity_title),
                res::escape(&memory.date),
            )
        })
        .collect()
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn profile(State(hub): State<SharedHub>, session: Session) -> AppResult<Html<String>> {
    let hub = hub.lock().await;
    let user = hub.user()?;
    session.insert(VIEW, View::Profile).await?;

    let mine: String = hub
        .my_proposals()
        .into_iter()
        .map(|p| card(p, user.coords()))
        .collect();

    let body = res::fill(
        include_res!(str, "/pages/profiles/me.html"),
        &[
            ("header", header(user).as_str()),
            (
                "proposals",
                if mine.is_empty() {
                    "<p class=\"empty\">You haven't posted a date yet.</p>"
                } else {
                    mine.as_str()
                },
            ),
            ("memories", memories_html(user.memories()).as_str()),
        ],
    );

    Ok(Html(res::view_page(View::Profile, "Profile", &body)))
}

/// Public profile of a host, with a one line read on their reviews.
#[debug_handler(state = crate::AppState)]
pub(crate) async fn host(
    State(hub): State<SharedHub>,
    State(assist): State<Assist>,
    Path(host_id): Path<String>,
) -> AppResult<Response> {
    let host = {
        let hub = hub.lock().await;
        hub.user()?;
        hub.host_profile(&host_id).cloned()
    };
    let Some(host) = host else {
        return Ok(res::sorry("profile"));
    };

    let vibe = assist
        .summarize_reviews(host.reviews())
        .await
        .map(|summary| format!("<p class=\"vibe\">{}</p>", res::escape(&summary)))
        .unwrap_or_default();

    let body = res::fill(
        include_res!(str, "/pages/profiles/host.html"),
        &[
            ("header", header(&host).as_str()),
            ("vibe", vibe.as_str()),
            ("reviews", reviews_html(host.reviews()).as_str()),
            ("memories", memories_html(host.memories()).as_str()),
        ],
    );

    Ok(Html(res::page(&host.name, &body)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[test]
    fn reviews_render_stars() {
        let review = Review {
            id: "r1".to_owned(),
            reviewer_name: "Kabir".to_owned(),
            reviewer_photo: String::new(),
            rating: 4,
            comment: "<b>fun</b>".to_owned(),
            timestamp: "01/12/2024".to_owned(),
        };

        let html = reviews_html(&[review]);
        assert!(html.contains("★★★★☆"));
        assert!(html.contains("&lt;b&gt;fun&lt;/b&gt;"));
        assert!(reviews_html(&[]).contains("No reviews yet"));
    }

    #[test]
    fn header_keeps_braces_in_bio() {
        let mut user = seed::users().remove(0);
        user.bio = "{name} lover".to_owned();

        let html = header(&user);
        assert!(html.contains("{name} lover"));
        assert!(!html.contains("Ananya S. lover"));
    }

    #[test]
    fn memories_show_titles() {
        let user = seed::users().remove(0);
        let html = memories_html(user.memories());
        for memory in user.memories() {
            assert!(html.contains(&res::escape(&memory.activity_title)));
        }
    }
}
