use axum::{debug_handler, extract::State, response::Html, Form};
use serde::Deserialize;
use tracing::info;

use crate::{
    genai::Assist,
    hub::SharedHub,
    include_res,
    model::NotificationKind,
    res, AppResult,
};

#[derive(Deserialize)]
pub(crate) struct ReportForm {
    reason: String,
    #[serde(default)]
    details: String,
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn report(
    State(hub): State<SharedHub>,
    State(assist): State<Assist>,
    Form(ReportForm { reason, details }): Form<ReportForm>,
) -> AppResult<Html<String>> {
    hub.lock().await.user()?;

    let verdict = assist.analyze_safety_report(&reason, &details).await;
    let risk = verdict.risk.map(|r| r.label()).unwrap_or("Pending");
    info!(%reason, risk, "safety report filed");

    hub.lock()
        .await
        .notify(NotificationKind::Status, "Report submitted", &verdict.summary)
        .await;

    let body = res::fill(
        include_res!(str, "/pages/profiles/report.html"),
        &[("risk", risk), ("summary", res::escape(&verdict.summary).as_str())],
    );

    Ok(Html(res::page("Report received", &body)))
}
