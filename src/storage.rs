use sqlx::SqlitePool;
use tracing::debug;

/// String key-value store on top of SQLite, the app's local storage.
#[derive(Clone)]
pub struct Storage {
    db_pool: SqlitePool,
}

impl Storage {
    pub async fn new(db_pool: SqlitePool) -> anyhow::Result<Self> {
        let storage = Self { db_pool };
        storage.migrate().await?;
        Ok(storage)
    }

    async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS local_storage (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.db_pool)
        .await?;

        Ok(())
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, sqlx::Error> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM local_storage WHERE key=?")
            .bind(key)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(row.map(|(value,)| value))
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<(), sqlx::Error> {
        debug!(key, bytes = value.len(), "writing local storage");
        sqlx::query(
            "INSERT INTO local_storage (key,value) VALUES (?,?) ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(&self.db_pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
pub(crate) async fn memory_storage() -> Storage {
    let db_pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    Storage::new(db_pool).await.unwrap()
}

/// Storage whose table has been dropped, so every read and write fails.
#[cfg(test)]
pub(crate) async fn unwritable_storage() -> Storage {
    let storage = memory_storage().await;
    sqlx::query("DROP TABLE local_storage")
        .execute(&storage.db_pool)
        .await
        .unwrap();
    storage
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_overwrites_previous_value() {
        let storage = memory_storage().await;
        assert_eq!(storage.get("datehub_data").await.unwrap(), None);

        storage.set("datehub_data", "{\"a\":1}").await.unwrap();
        storage.set("datehub_data", "{\"a\":2}").await.unwrap();

        assert_eq!(
            storage.get("datehub_data").await.unwrap().as_deref(),
            Some("{\"a\":2}")
        );
    }

    #[tokio::test]
    async fn writes_fail_once_the_table_is_gone() {
        let storage = unwritable_storage().await;
        assert!(storage.set("datehub_data", "{}").await.is_err());
        assert!(storage.get("datehub_data").await.is_err());
    }
}
