use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};
use uuid::Uuid;

use shared::{
    domain::{EntityId, EntityKind},
    protocol::Entity,
};

const MEMORY_DATABASE_URL: &str = "sqlite::memory:";

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

#[derive(Debug, Clone)]
pub struct StoredEntity {
    pub id: EntityId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl From<StoredEntity> for Entity {
    fn from(value: StoredEntity) -> Self {
        Self {
            id: value.id,
            text: value.text,
        }
    }
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid sqlite database url '{database_url}'"))?
            .create_if_missing(true);
        let pool = pool_options(database_url)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run storage migrations")?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    /// Entities of one collection, oldest first.
    pub async fn list_entities(&self, kind: EntityKind) -> Result<Vec<StoredEntity>> {
        let sql = format!(
            "SELECT id, text, created_at FROM {} ORDER BY seq ASC",
            kind.collection()
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("failed to list {}", kind.collection()))?;
        Ok(rows.into_iter().map(|r| stored_entity_from_row(&r)).collect())
    }

    pub async fn insert_entity(&self, kind: EntityKind, text: &str) -> Result<StoredEntity> {
        let id = Uuid::new_v4().simple().to_string();
        let sql = format!(
            "INSERT INTO {} (id, text, created_at) VALUES (?, ?, ?)
             RETURNING id, text, created_at",
            kind.collection()
        );
        let row = sqlx::query(&sql)
            .bind(&id)
            .bind(text)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .with_context(|| format!("failed to insert {}", kind.label()))?;
        Ok(stored_entity_from_row(&row))
    }

    pub async fn find_entity(&self, kind: EntityKind, id: &EntityId) -> Result<Option<StoredEntity>> {
        let sql = format!(
            "SELECT id, text, created_at FROM {} WHERE id = ?",
            kind.collection()
        );
        let row = sqlx::query(&sql)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to load {} {id}", kind.label()))?;
        Ok(row.map(|r| stored_entity_from_row(&r)))
    }

    /// Returns `false` when no entity with `id` exists.
    pub async fn delete_entity(&self, kind: EntityKind, id: &EntityId) -> Result<bool> {
        let sql = format!("DELETE FROM {} WHERE id = ?", kind.collection());
        let result = sqlx::query(&sql)
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to delete {} {id}", kind.label()))?;
        Ok(result.rows_affected() > 0)
    }
}

/// Every in-memory connection is its own database, so a memory pool holds
/// exactly one connection and never lets the reaper replace it.
fn pool_options(database_url: &str) -> SqlitePoolOptions {
    if database_url.starts_with(MEMORY_DATABASE_URL) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    }
}

fn stored_entity_from_row(row: &sqlx::sqlite::SqliteRow) -> StoredEntity {
    StoredEntity {
        id: EntityId(row.get::<String, _>(0)),
        text: row.get::<String, _>(1),
        created_at: row.get::<DateTime<Utc>, _>(2),
    }
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with(MEMORY_DATABASE_URL) || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
