use axum::{
    debug_handler,
    extract::State,
    response::{Html, Redirect},
    Form,
};
use serde::Deserialize;
use tracing::debug;

use crate::{
    genai::Assist,
    hub::{ProposalForm, SharedHub},
    include_res,
    model::{ActivityType, PaymentPreference},
    res, AppResult,
};

/// Whatever the create form currently holds, valid or not. The AI buttons
/// post it back so the form can be shown again with their suggestion applied.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Draft {
    #[serde(default)]
    title: String,
    #[serde(default)]
    activity_type: String,
    #[serde(default)]
    description: String,
    #[serde(default = "default_price")]
    price: String,
    #[serde(default)]
    payment_preference: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    time: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    video_url: String,
}

fn default_price() -> String {
    "1500".to_owned()
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            title: String::new(),
            activity_type: ActivityType::Dining.label().to_owned(),
            description: String::new(),
            price: default_price(),
            payment_preference: PaymentPreference::IPay.label().to_owned(),
            date: String::new(),
            time: String::new(),
            location: String::new(),
            video_url: String::new(),
        }
    }
}

fn options<'a>(labels: impl Iterator<Item = &'a str>, selected: &str) -> String {
    labels
        .map(|label| {
            let mark = if label == selected { " selected" } else { "" };
            format!("<option value=\"{label}\"{mark}>{label}</option>")
        })
        .collect()
}

fn render(draft: &Draft) -> Html<String> {
    let activity_options = options(ActivityType::ALL.iter().map(|a| a.label()), &draft.activity_type);
    let payment_options = options(
        PaymentPreference::ALL.iter().map(|p| p.label()),
        &draft.payment_preference,
    );
    let form = res::fill(
        include_res!(str, "/pages/proposals/new.html"),
        &[
            ("activity_options", activity_options.as_str()),
            ("payment_options", payment_options.as_str()),
            ("price", res::escape(&draft.price).as_str()),
            ("date", res::escape(&draft.date).as_str()),
            ("time", res::escape(&draft.time).as_str()),
            ("location", res::escape(&draft.location).as_str()),
            ("video_url", res::escape(&draft.video_url).as_str()),
            ("title", res::escape(&draft.title).as_str()),
            ("description", res::escape(&draft.description).as_str()),
        ],
    );

    Html(res::page("Post a Date", &form))
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn new_proposal_page(State(hub): State<SharedHub>) -> AppResult<Html<String>> {
    hub.lock().await.user()?;
    Ok(render(&Draft::default()))
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn publish(
    State(hub): State<SharedHub>,
    Form(form): Form<ProposalForm>,
) -> AppResult<Redirect> {
    let proposal = hub.lock().await.publish_proposal(form).await?;
    Ok(Redirect::to(&format!("/p/{}", proposal.id)))
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn enhance(
    State(hub): State<SharedHub>,
    State(assist): State<Assist>,
    Form(mut draft): Form<Draft>,
) -> AppResult<Html<String>> {
    hub.lock().await.user()?;
    if draft.description.trim().is_empty() {
        return Ok(render(&draft));
    }

    debug!(activity = %draft.activity_type, "enhancing description");
    draft.description = assist
        .enhance_description(&draft.activity_type, &draft.description)
        .await;

    Ok(render(&draft))
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn suggest(
    State(hub): State<SharedHub>,
    State(assist): State<Assist>,
    Form(mut draft): Form<Draft>,
) -> AppResult<Html<String>> {
    hub.lock().await.user()?;

    let idea = assist.suggest_date_idea("adventurous and unique").await;
    draft.title = idea.title;
    draft.description = idea.description;

    Ok(render(&draft))
}
