use std::sync::Arc;

use rand::Rng;
use serde::Deserialize;
use thiserror::Error;
use time::{macros::format_description, OffsetDateTime};
use tokio::sync::Mutex;
use tracing::info;

use crate::{
    model::{
        new_id, ActivityType, AppNotification, Chat, DateMemory, DateProposal, Message,
        NotificationKind, PaymentPreference, Review, User,
    },
    persistence::{Backup, Persistence, Snapshot},
};

/// Where new users are placed until they tell us otherwise.
pub const DEFAULT_COORDS: (f64, f64) = (19.0760, 72.8777);
pub const CHAT_STARTED: &str = "Chat started!";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HubError {
    #[error("sign in first")]
    NotAuthenticated,
    #[error("no proposal {0}")]
    UnknownProposal(String),
    #[error("no chat {0}")]
    UnknownChat(String),
    #[error("no notification {0}")]
    UnknownNotification(String),
    #[error("that's your own date")]
    OwnProposal,
    #[error("proposal {0} has no host profile")]
    MissingHost(String),
    #[error("{field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

fn required(field: &'static str, value: &str) -> Result<(), HubError> {
    if value.trim().is_empty() {
        return Err(HubError::Invalid {
            field,
            reason: "required",
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize)]
pub struct OnboardingForm {
    pub name: String,
    pub age: u32,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub photo: String,
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProposalForm {
    pub title: String,
    pub activity_type: ActivityType,
    pub description: String,
    pub price: i64,
    pub payment_preference: PaymentPreference,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    pub location: String,
    #[serde(default)]
    pub video_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileForm {
    pub name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub photo: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MemoryForm {
    pub photo_url: String,
    pub activity_title: String,
    #[serde(default)]
    pub date: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewForm {
    pub rating: u8,
    pub comment: String,
}

/// Owner of the app state. Every change goes through here and is written to
/// storage before the call returns.
pub struct Hub {
    state: Snapshot,
    persistence: Persistence,
}

pub type SharedHub = Arc<Mutex<Hub>>;

impl Hub {
    pub async fn load(persistence: Persistence) -> Self {
        let state = persistence.load().await;
        info!(
            signed_in = state.user.is_some(),
            proposals = state.prop_list.len(),
            chats = state.chat_list.len(),
            "state hydrated"
        );
        Self { state, persistence }
    }

    pub fn shared(self) -> SharedHub {
        Arc::new(Mutex::new(self))
    }

    async fn commit(&self) {
        self.persistence.save(&self.state).await;
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.state
    }

    pub fn current_user(&self) -> Option<&User> {
        self.state.user.as_ref()
    }

    pub fn user(&self) -> Result<&User, HubError> {
        self.current_user().ok_or(HubError::NotAuthenticated)
    }

    pub fn proposals(&self) -> &[DateProposal] {
        &self.state.prop_list
    }

    pub fn proposal(&self, id: &str) -> Result<&DateProposal, HubError> {
        self.state
            .prop_list
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| HubError::UnknownProposal(id.to_owned()))
    }

    pub fn chats(&self) -> &[Chat] {
        &self.state.chat_list
    }

    pub fn chat(&self, id: &str) -> Result<&Chat, HubError> {
        self.state
            .chat_list
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| HubError::UnknownChat(id.to_owned()))
    }

    pub fn notifications(&self) -> &[AppNotification] {
        &self.state.notifications
    }

    pub fn unread_notifications(&self) -> usize {
        self.state.notifications.iter().filter(|n| !n.is_read).count()
    }

    /// Proposals posted by the signed-in user.
    pub fn my_proposals(&self) -> Vec<&DateProposal> {
        let Some(user) = self.current_user() else {
            return Vec::new();
        };
        self.state
            .prop_list
            .iter()
            .filter(|p| p.host_id == user.id)
            .collect()
    }

    pub fn host_profile(&self, host_id: &str) -> Option<&User> {
        if let Some(user) = self.current_user().filter(|u| u.id == host_id) {
            return Some(user);
        }
        self.state
            .prop_list
            .iter()
            .filter(|p| p.host_id == host_id)
            .find_map(|p| p.host.as_ref())
    }

    pub async fn enter(&mut self, user: User) {
        info!(user_id = %user.id, "signed in");
        self.state.user = Some(user);
        self.commit().await;
    }

    pub async fn onboard(&mut self, form: OnboardingForm) -> Result<User, HubError> {
        required("name", &form.name)?;
        if !(18..=100).contains(&form.age) {
            return Err(HubError::Invalid {
                field: "age",
                reason: "must be between 18 and 100",
            });
        }

        let id = new_id("u-");
        let photo = if form.photo.trim().is_empty() {
            let seed: u32 = rand::rng().random_range(0..100_000);
            format!("https://picsum.photos/seed/{seed}/400/400")
        } else {
            form.photo.trim().to_owned()
        };
        let location = if form.location.trim().is_empty() {
            "Mumbai, India".to_owned()
        } else {
            form.location.trim().to_owned()
        };

        let user = User {
            id,
            name: form.name.trim().to_owned(),
            age: form.age as u8,
            bio: form.bio.trim().to_owned(),
            photos: vec![photo],
            location,
            lat: Some(DEFAULT_COORDS.0),
            lng: Some(DEFAULT_COORDS.1),
            rating: 5.0,
            review_count: 0,
            reviews: Some(Vec::new()),
            memories: Some(Vec::new()),
        };

        self.enter(user.clone()).await;
        Ok(user)
    }

    /// Signs out. Proposals and chats stay.
    pub async fn logout(&mut self) {
        if let Some(user) = self.state.user.take() {
            info!(user_id = %user.id, "signed out");
        }
        self.commit().await;
    }

    /// Edits the signed-in profile, along with the copies of it carried by the
    /// user's own proposals and chats.
    pub async fn update_profile(&mut self, form: ProfileForm) -> Result<User, HubError> {
        required("name", &form.name)?;

        let Some(user) = self.state.user.as_mut() else {
            return Err(HubError::NotAuthenticated);
        };
        user.name = form.name.trim().to_owned();
        user.bio = form.bio.trim().to_owned();
        if !form.photo.trim().is_empty() {
            match user.photos.first_mut() {
                Some(first) => *first = form.photo.trim().to_owned(),
                None => user.photos.push(form.photo.trim().to_owned()),
            }
        }
        let user = user.clone();

        for proposal in self.state.prop_list.iter_mut().filter(|p| p.host_id == user.id) {
            proposal.host = Some(user.clone());
        }
        for participant in self
            .state
            .chat_list
            .iter_mut()
            .flat_map(|c| c.participants.iter_mut())
            .filter(|p| p.id == user.id)
        {
            *participant = user.clone();
        }

        self.commit().await;
        Ok(user)
    }

    pub async fn add_memory(&mut self, form: MemoryForm) -> Result<DateMemory, HubError> {
        required("photo_url", &form.photo_url)?;
        required("activity_title", &form.activity_title)?;

        let Some(user) = self.state.user.as_mut() else {
            return Err(HubError::NotAuthenticated);
        };
        let memory = DateMemory {
            id: new_id("m"),
            photo_url: form.photo_url.trim().to_owned(),
            activity_title: form.activity_title.trim().to_owned(),
            date: form.date.trim().to_owned(),
        };
        user.memories.get_or_insert_with(Vec::new).push(memory.clone());

        self.commit().await;
        Ok(memory)
    }

    pub async fn publish_proposal(&mut self, form: ProposalForm) -> Result<DateProposal, HubError> {
        let host = self.user()?.clone();
        required("title", &form.title)?;
        required("description", &form.description)?;
        required("location", &form.location)?;
        let price = u32::try_from(form.price).map_err(|_| HubError::Invalid {
            field: "price",
            reason: if form.price < 0 { "must be zero or more" } else { "is too large" },
        })?;

        let (lat, lng) = host.coords().unwrap_or(DEFAULT_COORDS);
        let proposal = DateProposal {
            id: new_id("p"),
            host_id: host.id.clone(),
            activity_type: form.activity_type,
            title: form.title.trim().to_owned(),
            description: form.description.trim().to_owned(),
            price,
            payment_preference: form.payment_preference,
            date: form.date.trim().to_owned(),
            time: form.time.trim().to_owned(),
            location: form.location.trim().to_owned(),
            lat,
            lng,
            host: Some(host),
            video_url: form
                .video_url
                .map(|url| url.trim().to_owned())
                .filter(|url| !url.is_empty()),
        };

        info!(proposal_id = %proposal.id, "proposal published");
        self.state.prop_list.push(proposal.clone());
        self.commit().await;
        Ok(proposal)
    }

    /// Opens the chat for a proposal, creating it the first time. Returns the
    /// chat id.
    pub async fn quick_chat(&mut self, proposal_id: &str) -> Result<String, HubError> {
        let user = self.user()?.clone();
        let proposal = self.proposal(proposal_id)?;

        if let Some(existing) = self
            .state
            .chat_list
            .iter()
            .find(|c| c.proposal_id == proposal.id && c.has_participant(&user.id))
        {
            return Ok(existing.id.clone());
        }

        if proposal.host_id == user.id {
            return Err(HubError::OwnProposal);
        }
        let Some(host) = proposal.host.clone() else {
            return Err(HubError::MissingHost(proposal.id.clone()));
        };
        let title = proposal.title.clone();

        let chat = Chat {
            id: new_id("c"),
            proposal_id: proposal.id.clone(),
            participants: vec![user, host],
            messages: Vec::new(),
            last_message: CHAT_STARTED.to_owned(),
        };
        let chat_id = chat.id.clone();

        info!(%chat_id, proposal_id, "chat started");
        self.state.chat_list.insert(0, chat);
        self.push_notification(NotificationKind::Status, "Date request sent", &title);
        self.commit().await;
        Ok(chat_id)
    }

    /// Appends the signed-in user's message. Blank text is ignored.
    pub async fn send_message(&mut self, chat_id: &str, text: &str) -> Result<Option<Message>, HubError> {
        let sender_id = self.user()?.id.clone();
        self.chat(chat_id)?;
        if text.trim().is_empty() {
            return Ok(None);
        }

        let message = self.append(chat_id, sender_id, text);
        self.commit().await;
        Ok(Some(message))
    }

    /// Appends a message from the other side of the chat.
    pub async fn receive_reply(&mut self, chat_id: &str, text: &str) -> Result<Option<Message>, HubError> {
        let user_id = self.user()?.id.clone();
        let chat = self.chat(chat_id)?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        let Some(from) = chat.counterpart(&user_id).cloned() else {
            return Ok(None);
        };

        let message = self.append(chat_id, from.id, text);
        self.push_notification(NotificationKind::Message, &format!("New message from {}", from.name), text);
        self.commit().await;
        Ok(Some(message))
    }

    fn append(&mut self, chat_id: &str, sender_id: String, text: &str) -> Message {
        let message = Message {
            id: new_id("msg"),
            sender_id,
            text: text.to_owned(),
            timestamp: OffsetDateTime::now_utc(),
        };
        if let Some(chat) = self.state.chat_list.iter_mut().find(|c| c.id == chat_id) {
            chat.messages.push(message.clone());
            chat.last_message = message.text.clone();
        }
        message
    }

    /// Adds a review to the host of a proposal. The host's rating and review
    /// count are left as they are.
    pub async fn review_host(&mut self, proposal_id: &str, form: ReviewForm) -> Result<Review, HubError> {
        let reviewer = self.user()?.clone();
        let host_id = self.proposal(proposal_id)?.host_id.clone();
        if !(1..=5).contains(&form.rating) {
            return Err(HubError::Invalid {
                field: "rating",
                reason: "must be between 1 and 5",
            });
        }
        required("comment", &form.comment)?;
        if host_id == reviewer.id {
            return Err(HubError::OwnProposal);
        }

        let review = Review {
            id: new_id("r"),
            reviewer_name: reviewer.name.clone(),
            reviewer_photo: reviewer.photo().to_owned(),
            rating: form.rating,
            comment: form.comment.trim().to_owned(),
            timestamp: OffsetDateTime::now_utc()
                .format(format_description!("[month repr:short] [day padding:none]"))
                .unwrap_or_default(),
        };

        for host in self
            .state
            .prop_list
            .iter_mut()
            .filter(|p| p.host_id == host_id)
            .filter_map(|p| p.host.as_mut())
        {
            host.reviews.get_or_insert_with(Vec::new).push(review.clone());
        }

        self.commit().await;
        Ok(review)
    }

    fn push_notification(&mut self, kind: NotificationKind, title: &str, message: &str) -> AppNotification {
        let notification = AppNotification {
            id: new_id("n"),
            kind,
            title: title.to_owned(),
            message: message.to_owned(),
            timestamp: OffsetDateTime::now_utc(),
            is_read: false,
        };
        self.state.notifications.insert(0, notification.clone());
        notification
    }

    pub async fn notify(&mut self, kind: NotificationKind, title: &str, message: &str) -> AppNotification {
        let notification = self.push_notification(kind, title, message);
        self.commit().await;
        notification
    }

    pub async fn mark_notification_read(&mut self, id: &str) -> Result<(), HubError> {
        let notification = self
            .state
            .notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| HubError::UnknownNotification(id.to_owned()))?;
        notification.is_read = true;
        self.commit().await;
        Ok(())
    }

    pub async fn clear_notifications(&mut self) {
        self.state.notifications.clear();
        self.commit().await;
    }

    pub fn export_backup(&self) -> serde_json::Result<Backup> {
        Backup::export(&self.state, OffsetDateTime::now_utc())
    }

    /// Replaces the state with what the backup carries. Nothing changes when
    /// any part of it fails to parse.
    pub async fn import_backup(&mut self, backup: &Backup) -> serde_json::Result<()> {
        self.state = backup.restore(&self.state)?;
        info!(
            signed_in = self.state.user.is_some(),
            proposals = self.state.prop_list.len(),
            chats = self.state.chat_list.len(),
            "backup imported"
        );
        self.commit().await;
        Ok(())
    }
}
