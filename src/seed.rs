use crate::model::{ActivityType, DateMemory, DateProposal, PaymentPreference, User};

pub fn users() -> Vec<User> {
    vec![User {
        id: "u1".to_owned(),
        name: "Ananya S.".to_owned(),
        age: 25,
        bio: "Architect & Traveler.".to_owned(),
        photos: vec!["https://picsum.photos/seed/a1/400/500".to_owned()],
        location: "Mumbai".to_owned(),
        lat: None,
        lng: None,
        rating: 4.8,
        review_count: 12,
        reviews: None,
        memories: Some(vec![DateMemory {
            id: "m1".to_owned(),
            photo_url: "https://picsum.photos/seed/m1/400/400".to_owned(),
            activity_title: "Italian Dinner".to_owned(),
            date: "Sep 12".to_owned(),
        }]),
    }]
}

/// What Discover shows on a fresh install.
pub fn proposals() -> Vec<DateProposal> {
    let host = users().remove(0);

    vec![DateProposal {
        id: "p1".to_owned(),
        host_id: host.id.clone(),
        activity_type: ActivityType::Dining,
        title: "Rooftop Dinner".to_owned(),
        description: "Beautiful views and great pasta.".to_owned(),
        price: 2500,
        payment_preference: PaymentPreference::IPay,
        date: "2024-12-01".to_owned(),
        time: "20:00".to_owned(),
        location: "Bandra, Mumbai".to_owned(),
        lat: 19.07,
        lng: 72.87,
        host: Some(host),
        video_url: Some(
            "https://storage.googleapis.com/gtv-videos-bucket/sample/ElephantsDream.mp4".to_owned(),
        ),
    }]
}
