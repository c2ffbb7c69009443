pub mod appresult;
pub mod chats;
pub mod config;
pub mod genai;
pub mod geo;
pub mod hub;
pub mod index;
pub mod model;
pub mod notifications;
pub mod onboarding;
pub mod persistence;
pub mod profiles;
pub mod proposals;
pub mod res;
pub mod seed;
pub mod storage;
pub mod view;

use axum::{extract::FromRef, routing::get, Router};
use tower_http::trace::TraceLayer;
use tower_sessions::{cookie::SameSite, Expiry, MemoryStore, SessionManagerLayer};

pub use appresult::{AppError, AppResult};

use crate::{genai::Assist, hub::SharedHub};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub hub: SharedHub,
    pub assist: Assist,
}

/// The whole app: routes, session layer and request tracing.
pub fn app(app_state: AppState) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::days(1)));

    router()
        .with_state(app_state)
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
}

fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index::index))
        .route("/privacy", get(index::privacy))
        .route("/style.css", get(res::stylesheet))
        .route(
            "/onboarding",
            get(onboarding::onboarding_page).post(onboarding::onboard),
        )
        .nest("/p", proposals::router())
        .nest("/h", profiles::host_router())
        .nest("/c", chats::router())
        .nest("/me", profiles::router())
        .nest("/n", notifications::router())
}
