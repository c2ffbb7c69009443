use axum::{http::StatusCode, response::{Html, IntoResponse, Redirect, Response}};

use crate::{hub::HubError, res};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(err) = self.0.downcast_ref::<HubError>() {
            use HubError::*;
            return match err {
                NotAuthenticated => Redirect::to("/").into_response(),
                UnknownProposal(_) => res::sorry("date"),
                UnknownChat(_) => res::sorry("chat"),
                UnknownNotification(_) => res::sorry("notification"),
                OwnProposal | MissingHost(_) | Invalid { .. } => (
                    StatusCode::BAD_REQUEST,
                    Html(res::page("Hold on", &format!(
                        "<h1>Hold on</h1><p>{}</p><p><a href=\"javascript:history.back()\">go back</a></p>",
                        res::escape(&err.to_string())
                    ))),
                )
                    .into_response(),
            };
        }

        tracing::error!(error = %self.0, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("{}\n\n{}", self.0, self.0.backtrace()),
        )
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
