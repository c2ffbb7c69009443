use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Fresh collection-local id, e.g. `c0192f...` for a chat.
pub fn new_id(prefix: &str) -> String {
    format!("{prefix}{}", Uuid::now_v7().simple())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityType {
    Dining,
    Movie,
    Outdoor,
    Coffee,
    Concert,
    Gaming,
    Other,
}

impl ActivityType {
    pub const ALL: [ActivityType; 7] = [
        ActivityType::Dining,
        ActivityType::Movie,
        ActivityType::Outdoor,
        ActivityType::Coffee,
        ActivityType::Concert,
        ActivityType::Gaming,
        ActivityType::Other,
    ];

    pub fn label(&self) -> &'static str {
        use ActivityType::*;
        match self {
            Dining => "Dining",
            Movie => "Movie",
            Outdoor => "Outdoor",
            Coffee => "Coffee",
            Concert => "Concert",
            Gaming => "Gaming",
            Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentPreference {
    #[serde(rename = "I will pay")]
    IPay,
    #[serde(rename = "You pay")]
    YouPay,
}

impl PaymentPreference {
    pub const ALL: [PaymentPreference; 2] = [PaymentPreference::IPay, PaymentPreference::YouPay];

    pub fn label(&self) -> &'static str {
        match self {
            PaymentPreference::IPay => "I will pay",
            PaymentPreference::YouPay => "You pay",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub reviewer_name: String,
    pub reviewer_photo: String,
    /// 1 to 5 stars.
    pub rating: u8,
    pub comment: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateMemory {
    pub id: String,
    pub photo_url: String,
    pub activity_title: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub age: u8,
    pub bio: String,
    pub photos: Vec<String>,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    pub rating: f32,
    pub review_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<Vec<Review>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memories: Option<Vec<DateMemory>>,
}

impl User {
    pub fn photo(&self) -> &str {
        self.photos.first().map(String::as_str).unwrap_or_default()
    }

    pub fn coords(&self) -> Option<(f64, f64)> {
        Some((self.lat?, self.lng?))
    }

    pub fn reviews(&self) -> &[Review] {
        self.reviews.as_deref().unwrap_or_default()
    }

    pub fn memories(&self) -> &[DateMemory] {
        self.memories.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateProposal {
    pub id: String,
    pub host_id: String,
    pub activity_type: ActivityType,
    pub title: String,
    pub description: String,
    pub price: u32,
    pub payment_preference: PaymentPreference,
    pub date: String,
    pub time: String,
    pub location: String,
    pub lat: f64,
    pub lng: f64,
    /// Profile card of the host as it was shown when the proposal was posted.
    /// `host_id` stays authoritative.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub sender_id: String,
    pub text: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: String,
    pub proposal_id: String,
    /// Always two distinct users: whoever opened the chat, then the host.
    pub participants: Vec<User>,
    pub messages: Vec<Message>,
    pub last_message: String,
}

impl Chat {
    pub fn has_participant(&self, user_id: &str) -> bool {
        self.participants.iter().any(|p| p.id == user_id)
    }

    /// The participant who isn't `user_id`.
    pub fn counterpart(&self, user_id: &str) -> Option<&User> {
        self.participants
            .iter()
            .find(|p| p.id != user_id)
            .or(self.participants.first())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Reminder,
    Message,
    Status,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppNotification {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub is_read: bool,
}
