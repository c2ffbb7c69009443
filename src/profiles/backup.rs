use axum::{
    debug_handler,
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tracing::warn;

use crate::{hub::SharedHub, persistence::Backup, res, AppResult};

#[derive(Deserialize)]
pub(crate) struct ImportForm {
    backup: String,
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn export(State(hub): State<SharedHub>) -> AppResult<Response> {
    let backup = hub.lock().await.export_backup()?;
    let body = serde_json::to_string_pretty(&backup)?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", backup.file_name()),
            ),
        ],
        body,
    )
        .into_response())
}

fn rejected(reason: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Html(res::page(
            "Import failed",
            &format!(
                "<h1>Import failed</h1><p>That file isn't a DateHub backup: {}</p><p><a href=\"/me\">back to profile</a></p>",
                res::escape(reason)
            ),
        )),
    )
        .into_response()
}

/// Restores a pasted backup. A bad file leaves everything as it was.
#[debug_handler(state = crate::AppState)]
pub(crate) async fn import(
    State(hub): State<SharedHub>,
    Form(ImportForm { backup }): Form<ImportForm>,
) -> AppResult<Response> {
    let backup = match serde_json::from_str::<Backup>(&backup) {
        Ok(backup) => backup,
        Err(err) => {
            warn!(error = %err, "unreadable backup");
            return Ok(rejected(&err.to_string()));
        }
    };

    if let Err(err) = hub.lock().await.import_backup(&backup).await {
        warn!(error = %err, "backup rejected");
        return Ok(rejected(&err.to_string()));
    }

    Ok(Redirect::to("/").into_response())
}
