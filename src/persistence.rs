use serde::{de::DeserializeOwned, Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::{
    model::{AppNotification, Chat, DateProposal, User},
    seed,
    storage::Storage,
};

/// Key of the one record holding the whole app state.
pub const STATE_KEY: &str = "datehub_data";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub user: Option<User>,
    pub chat_list: Vec<Chat>,
    pub prop_list: Vec<DateProposal>,
    #[serde(default)]
    pub notifications: Vec<AppNotification>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            user: None,
            chat_list: Vec::new(),
            prop_list: seed::proposals(),
            notifications: Vec::new(),
        }
    }
}

#[derive(Clone)]
pub struct Persistence {
    storage: Storage,
}

impl Persistence {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Reads the saved state. Missing or unreadable records hydrate the seed
    /// state instead.
    pub async fn load(&self) -> Snapshot {
        let saved = match self.storage.get(STATE_KEY).await {
            Ok(saved) => saved,
            Err(err) => {
                warn!(error = %err, "local storage unavailable, starting from seed data");
                return Snapshot::default();
            }
        };

        let Some(saved) = saved else {
            info!("no saved state, starting from seed data");
            return Snapshot::default();
        };

        match serde_json::from_str::<Snapshot>(&saved) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(error = %err, "saved state is corrupt, starting from seed data");
                Snapshot::default()
            }
        }
    }

    pub async fn try_save(&self, snapshot: &Snapshot) -> anyhow::Result<()> {
        let json = serde_json::to_string(snapshot)?;
        self.storage.set(STATE_KEY, &json).await?;
        Ok(())
    }

    /// Overwrites the saved record. A failed write keeps the app running on
    /// its in-memory state.
    pub async fn save(&self, snapshot: &Snapshot) {
        if let Err(err) = self.try_save(snapshot).await {
            warn!(error = %err, "failed to persist state, continuing in memory");
        }
    }
}

/// Downloadable backup. Every part is the serialized JSON of that part of the
/// state, so a file can carry any subset of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposals: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chats: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notifications: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub exported_at: Option<OffsetDateTime>,
}

impl Backup {
    pub fn export(snapshot: &Snapshot, exported_at: OffsetDateTime) -> serde_json::Result<Self> {
        Ok(Self {
            user: snapshot.user.as_ref().map(serde_json::to_string).transpose()?,
            proposals: Some(serde_json::to_string(&snapshot.prop_list)?),
            chats: Some(serde_json::to_string(&snapshot.chat_list)?),
            notifications: Some(serde_json::to_string(&snapshot.notifications)?),
            exported_at: Some(exported_at),
        })
    }

    /// Builds the state this backup restores on top of `current`. Parts the
    /// backup doesn't carry are kept from `current`; one bad part rejects the
    /// whole backup.
    pub fn restore(&self, current: &Snapshot) -> serde_json::Result<Snapshot> {
        fn part<T: DeserializeOwned + Clone>(raw: &Option<String>, keep: &T) -> serde_json::Result<T> {
            match raw {
                Some(raw) => serde_json::from_str(raw),
                None => Ok(keep.clone()),
            }
        }

        Ok(Snapshot {
            user: part(&self.user, &current.user)?,
            prop_list: part(&self.proposals, &current.prop_list)?,
            chat_list: part(&self.chats, &current.chat_list)?,
            notifications: part(&self.notifications, &current.notifications)?,
        })
    }

    pub fn file_name(&self) -> String {
        let date = self
            .exported_at
            .map(|at| at.date().to_string())
            .unwrap_or_else(|| "undated".to_owned());
        format!("datehub_backup_{date}.json")
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;
    use crate::{
        model::{new_id, Message, NotificationKind},
        storage::{memory_storage, unwritable_storage},
    };

    fn populated() -> Snapshot {
        let host = seed::users().remove(0);
        let mut me = host.clone();
        me.id = "me".to_owned();
        me.name = "Alex".to_owned();

        Snapshot {
            user: Some(me.clone()),
            chat_list: vec![Chat {
                id: "c1".to_owned(),
                proposal_id: "p1".to_owned(),
                participants: vec![me, host],
                messages: vec![Message {
                    id: new_id("m"),
                    sender_id: "me".to_owned(),
                    text: "hey!".to_owned(),
                    timestamp: datetime!(2024-11-30 18:00 UTC),
                }],
                last_message: "hey!".to_owned(),
            }],
            prop_list: seed::proposals(),
            notifications: vec![AppNotification {
                id: "n1".to_owned(),
                kind: NotificationKind::Status,
                title: "Date request sent".to_owned(),
                message: "Rooftop Dinner".to_owned(),
                timestamp: datetime!(2024-11-30 18:00 UTC),
                is_read: false,
            }],
        }
    }

    #[tokio::test]
    async fn empty_store_loads_seed_state() {
        let persistence = Persistence::new(memory_storage().await);

        let snapshot = persistence.load().await;

        assert_eq!(snapshot.user, None);
        assert!(snapshot.chat_list.is_empty());
        assert_eq!(snapshot.prop_list, seed::proposals());
    }

    #[tokio::test]
    async fn unwritable_store_loads_seed_and_swallows_saves() {
        let persistence = Persistence::new(unwritable_storage().await);

        assert_eq!(persistence.load().await, Snapshot::default());
        assert!(persistence.try_save(&populated()).await.is_err());
        persistence.save(&populated()).await;
    }

    #[tokio::test]
    async fn saved_state_loads_back() {
        let persistence = Persistence::new(memory_storage().await);
        let snapshot = populated();

        persistence.try_save(&snapshot).await.unwrap();

        assert_eq!(persistence.load().await, snapshot);
    }

    #[tokio::test]
    async fn corrupt_record_falls_back_to_seed() {
        let storage = memory_storage().await;
        storage.set(STATE_KEY, "{not json").await.unwrap();

        let snapshot = Persistence::new(storage).load().await;

        assert_eq!(snapshot, Snapshot::default());
    }

    #[tokio::test]
    async fn three_collection_record_still_loads() {
        let storage = memory_storage().await;
        storage
            .set(STATE_KEY, r#"{"user":null,"chatList":[],"propList":[]}"#)
            .await
            .unwrap();

        let snapshot = Persistence::new(storage).load().await;

        assert!(snapshot.prop_list.is_empty());
        assert!(snapshot.notifications.is_empty());
    }

    #[test]
    fn backup_restores_exported_state() {
        let snapshot = populated();
        let backup = Backup::export(&snapshot, datetime!(2024-12-02 09:30 UTC)).unwrap();
        let file = serde_json::to_string_pretty(&backup).unwrap();

        let parsed: Backup = serde_json::from_str(&file).unwrap();
        let restored = parsed.restore(&Snapshot::default()).unwrap();

        assert_eq!(restored, snapshot);
        assert_eq!(parsed.file_name(), "datehub_backup_2024-12-02.json");
    }

    #[test]
    fn backup_fields_hold_serialized_strings() {
        let backup = Backup::export(&populated(), datetime!(2024-12-02 09:30 UTC)).unwrap();
        let value = serde_json::to_value(&backup).unwrap();

        assert!(value["user"].as_str().unwrap().contains("\"name\":\"Alex\""));
        assert!(value["proposals"].as_str().unwrap().starts_with('['));
        assert_eq!(value["exportedAt"], "2024-12-02T09:30:00Z");
    }

    #[test]
    fn missing_parts_keep_current_state() {
        let current = populated();
        let backup: Backup = serde_json::from_str(r#"{"proposals":"[]"}"#).unwrap();

        let restored = backup.restore(&current).unwrap();

        assert!(restored.prop_list.is_empty());
        assert_eq!(restored.user, current.user);
        assert_eq!(restored.chat_list, current.chat_list);
        assert_eq!(restored.notifications, current.notifications);
    }

    #[test]
    fn one_bad_part_rejects_backup() {
        let backup: Backup =
            serde_json::from_str(r#"{"proposals":"[]","chats":"{oops"}"#).unwrap();

        assert!(backup.restore(&populated()).is_err());
    }
}
