//! Persistent menu and suggestion tables
//!
//! Two fjall keyspaces back the service: `menus` holds one row per
//! restaurant (key = restaurant name, value = JSON menu entity with a
//! last-updated stamp) and `suggestions` holds one row per generated record
//! (key = `date/created-at` composite so same-day records never collide,
//! value = the JSON record). Keyspace creation is create-if-absent, so
//! opening storage is idempotent. Blocking store calls run on the blocking
//! pool to keep the async runtime free.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use fjall::Keyspace;
use serde::{Deserialize, Serialize};
use tokio::task;

use crate::Result;
use crate::error::MenuAiError;
use crate::models::{Menu, SuggestionRecord};

const MENU_TABLE: &str = "menus";
const SUGGESTION_TABLE: &str = "suggestions";

/// Menu persistence seam. Absence is a value, never an error.
#[async_trait]
pub trait MenuStore: Send + Sync {
    async fn get(&self, restaurant_name: &str) -> Result<Option<Menu>>;
    /// Create-or-replace keyed by restaurant name (last-write-wins).
    async fn put(&self, menu: &Menu) -> Result<()>;
}

/// Suggestion persistence seam. Records are insert-only.
#[async_trait]
pub trait SuggestionStore: Send + Sync {
    async fn insert(&self, record: &SuggestionRecord) -> Result<()>;
    /// All records written for the given calendar day.
    async fn for_date(&self, date: NaiveDate) -> Result<Vec<SuggestionRecord>>;
}

/// Stored menu row: the JSON-encoded menu plus its last-updated stamp.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredMenu {
    menu: Menu,
    last_updated: DateTime<Utc>,
}

/// Handle on the two backing tables.
pub struct Storage {
    menus: Keyspace,
    suggestions: Keyspace,
}

impl Storage {
    /// Open (creating if absent) both tables under the given directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let db = fjall::Database::builder(path).open().map_err(|e| {
            MenuAiError::persistence(format!(
                "Failed to open storage at {}: {e}",
                path.display()
            ))
        })?;

        let menus = db
            .keyspace(MENU_TABLE, fjall::KeyspaceCreateOptions::default)
            .map_err(|e| MenuAiError::persistence(format!("Failed to open menu table: {e}")))?;
        let suggestions = db
            .keyspace(SUGGESTION_TABLE, fjall::KeyspaceCreateOptions::default)
            .map_err(|e| {
                MenuAiError::persistence(format!("Failed to open suggestion table: {e}"))
            })?;

        Ok(Self { menus, suggestions })
    }

    #[must_use]
    pub fn menu_store(&self) -> MenuTable {
        MenuTable {
            store: self.menus.clone(),
        }
    }

    #[must_use]
    pub fn suggestion_store(&self) -> SuggestionTable {
        SuggestionTable {
            store: self.suggestions.clone(),
        }
    }
}

/// Fjall-backed [`MenuStore`].
#[derive(Clone)]
pub struct MenuTable {
    store: Keyspace,
}

#[async_trait]
impl MenuStore for MenuTable {
    async fn get(&self, restaurant_name: &str) -> Result<Option<Menu>> {
        let store = self.store.clone();
        let key = restaurant_name.as_bytes().to_vec();

        let maybe_bytes = task::spawn_blocking(
            move || -> std::result::Result<Option<Vec<u8>>, fjall::Error> {
                Ok(store.get(key)?.map(|v| v.to_vec()))
            },
        )
        .await
        .map_err(join_error)?
        .map_err(store_error)?;

        match maybe_bytes {
            Some(bytes) => {
                let entity: StoredMenu = serde_json::from_slice(&bytes).map_err(|e| {
                    MenuAiError::persistence(format!("Corrupt menu row for '{restaurant_name}': {e}"))
                })?;
                Ok(Some(entity.menu))
            }
            None => Ok(None),
        }
    }

    async fn put(&self, menu: &Menu) -> Result<()> {
        let entity = StoredMenu {
            menu: menu.clone(),
            last_updated: Utc::now(),
        };
        let bytes = serde_json::to_vec(&entity)
            .map_err(|e| MenuAiError::persistence(format!("Failed to encode menu: {e}")))?;

        let store = self.store.clone();
        let key = menu.restaurant_name.as_bytes().to_vec();
        task::spawn_blocking(move || store.insert(key, bytes))
            .await
            .map_err(join_error)?
            .map_err(store_error)
    }
}

/// Fjall-backed [`SuggestionStore`].
#[derive(Clone)]
pub struct SuggestionTable {
    store: Keyspace,
}

fn suggestion_key(record: &SuggestionRecord) -> Vec<u8> {
    format!(
        "{}/{}",
        record.date,
        record.created_at.to_rfc3339_opts(SecondsFormat::Nanos, true)
    )
    .into_bytes()
}

#[async_trait]
impl SuggestionStore for SuggestionTable {
    async fn insert(&self, record: &SuggestionRecord) -> Result<()> {
        let bytes = serde_json::to_vec(record)
            .map_err(|e| MenuAiError::persistence(format!("Failed to encode suggestion: {e}")))?;

        let store = self.store.clone();
        let key = suggestion_key(record);
        task::spawn_blocking(move || store.insert(key, bytes))
            .await
            .map_err(join_error)?
            .map_err(store_error)
    }

    async fn for_date(&self, date: NaiveDate) -> Result<Vec<SuggestionRecord>> {
        let store = self.store.clone();
        let prefix = format!("{date}/").into_bytes();

        let rows = task::spawn_blocking(
            move || -> std::result::Result<Vec<Vec<u8>>, fjall::Error> {
                let mut rows = Vec::new();
                for guard in store.prefix(prefix) {
                    let value = guard.value()?;
                    rows.push(value.to_vec());
                }
                Ok(rows)
            },
        )
        .await
        .map_err(join_error)?
        .map_err(store_error)?;

        rows.iter()
            .map(|bytes| {
                serde_json::from_slice(bytes).map_err(|e| {
                    MenuAiError::persistence(format!("Corrupt suggestion row for {date}: {e}"))
                })
            })
            .collect()
    }
}

fn store_error(err: fjall::Error) -> MenuAiError {
    MenuAiError::persistence(format!("Store operation failed: {err}"))
}

fn join_error(err: task::JoinError) -> MenuAiError {
    MenuAiError::persistence(format!("Store task failed: {err}"))
}
