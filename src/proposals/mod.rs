mod detail;
mod discover;
mod new;

use axum::{routing::{get, post}, Router};

use crate::{geo, include_res, model::DateProposal, res, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(discover::discover))
        .route("/reels", get(discover::reels))
        .route("/new", get(new::new_proposal_page).post(new::publish))
        .route("/new/enhance", post(new::enhance))
        .route("/new/suggest", post(new::suggest))
        .route("/{id}", get(detail::detail))
        .route("/{id}/chat", post(detail::quick_chat))
        .route("/{id}/review", post(detail::review))
}

/// Photo shown for a proposal: its host's, or a placeholder keyed on the id.
pub(crate) fn cover(proposal: &DateProposal) -> String {
    proposal
        .host
        .as_ref()
        .map(|host| host.photo().to_owned())
        .filter(|photo| !photo.is_empty())
        .unwrap_or_else(|| format!("https://picsum.photos/seed/{}/400/500", proposal.id))
}

pub(crate) fn card(proposal: &DateProposal, from: Option<(f64, f64)>) -> String {
    let distance = from
        .map(|here| geo::distance_label(geo::distance_km(here, (proposal.lat, proposal.lng))))
        .unwrap_or_default();

    res::fill(
        include_res!(str, "/pages/proposals/card.html"),
        &[
            ("id", res::escape(&proposal.id).as_str()),
            ("cover", res::escape(&cover(proposal)).as_str()),
            ("activity", proposal.activity_type.label()),
            ("distance", distance.as_str()),
            ("price", proposal.price.to_string().as_str()),
            ("location", res::escape(&proposal.location).as_str()),
            ("title", res::escape(&proposal.title).as_str()),
            ("description", res::escape(&proposal.description).as_str()),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[test]
    fn card_shows_distance_when_known() {
        let proposal = seed::proposals().remove(0);

        let near = card(&proposal, Some((19.0760, 72.8777)));
        assert!(near.contains("Nearby"));
        assert!(near.contains("Rooftop Dinner"));

        let unknown = card(&proposal, None);
        assert!(!unknown.contains("Nearby"));
    }

    #[test]
    fn card_keeps_braces_in_user_text() {
        let mut proposal = seed::proposals().remove(0);
        proposal.location = "Table {title} at {description}".to_owned();

        let html = card(&proposal, None);
        assert!(html.contains("Table {title} at {description}"));
        assert!(!html.contains("Table Rooftop Dinner"));
    }

    #[test]
    fn cover_falls_back_to_placeholder() {
        let mut proposal = seed::proposals().remove(0);
        assert_eq!(cover(&proposal), "https://picsum.photos/seed/a1/400/500");

        proposal.host = None;
        assert_eq!(cover(&proposal), "https://picsum.photos/seed/p1/400/500");
    }
}
