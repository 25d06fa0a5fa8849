//! # Paging Store
//!
//! Persistence for pagings, the audit log, operator accounts and stations.
//!
//! ## Backends:
//! - **`Postgres`**: `deadpool-postgres` pool over `tokio-postgres`. Tables are
//!   created with `CREATE TABLE IF NOT EXISTS` on connect.
//! - **`Memory`**: tables behind a `tokio::sync::RwLock`, used when no database
//!   URL is configured and by the tests.
//!
//! There is no cross-request locking: a duplicate-belt check and the following
//! insert are two separate calls.

use paging_common::models::{PagingDraft, PagingEntry, PagingLogEntry, Station, UserAccount};
use thiserror::Error;
use tracing::info;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot create database pool: {0}")]
    CreatePool(#[from] deadpool_postgres::CreatePoolError),
    #[error("database pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),
    #[error("database error: {0}")]
    Db(#[from] tokio_postgres::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

pub enum Store {
    Memory(MemoryStore),
    Postgres(PgStore),
}

impl Store {
    /// Postgres when `database_url` is given, memory otherwise.
    pub async fn connect(database_url: Option<&str>) -> StoreResult<Self> {
        match database_url {
            Some(url) => {
                let store = PgStore::connect(url).await?;
                info!("Using PostgreSQL store");
                Ok(Store::Postgres(store))
            }
            None => {
                info!("No database URL configured, using in-memory store");
                Ok(Store::Memory(MemoryStore::default()))
            }
        }
    }

    pub fn backend(&self) -> &'static str {
        match self {
            Store::Memory(_) => "memory",
            Store::Postgres(_) => "postgres",
        }
    }

    /// All pagings ordered by id.
    pub async fn list_pagings(&self) -> StoreResult<Vec<PagingEntry>> {
        match self {
            Store::Memory(s) => Ok(s.list_pagings().await),
            Store::Postgres(s) => s.list_pagings().await,
        }
    }

    pub async fn get_paging(&self, id: i32) -> StoreResult<Option<PagingEntry>> {
        match self {
            Store::Memory(s) => Ok(s.get_paging(id).await),
            Store::Postgres(s) => s.get_paging(id).await,
        }
    }

    /// Whether any paging other than `exclude` uses `belt_no`.
    pub async fn belt_in_use(&self, belt_no: &str, exclude: Option<i32>) -> StoreResult<bool> {
        match self {
            Store::Memory(s) => Ok(s.belt_in_use(belt_no, exclude).await),
            Store::Postgres(s) => s.belt_in_use(belt_no, exclude).await,
        }
    }

    pub async fn insert_paging(&self, draft: &PagingDraft) -> StoreResult<PagingEntry> {
        match self {
            Store::Memory(s) => Ok(s.insert_paging(draft).await),
            Store::Postgres(s) => s.insert_paging(draft).await,
        }
    }

    /// Full replace of row `id`; `None` when it does not exist.
    pub async fn update_paging(&self, id: i32, draft: &PagingDraft) -> StoreResult<Option<PagingEntry>> {
        match self {
            Store::Memory(s) => Ok(s.update_paging(id, draft).await),
            Store::Postgres(s) => s.update_paging(id, draft).await,
        }
    }

    /// Removes row `id` and returns it as it was.
    pub async fn delete_paging(&self, id: i32) -> StoreResult<Option<PagingEntry>> {
        match self {
            Store::Memory(s) => Ok(s.delete_paging(id).await),
            Store::Postgres(s) => s.delete_paging(id).await,
        }
    }

    /// Case-insensitive substring match on `name_passenger`.
    pub async fn search_pagings(&self, name: &str) -> StoreResult<Vec<PagingEntry>> {
        match self {
            Store::Memory(s) => Ok(s.search_pagings(name).await),
            Store::Postgres(s) => s.search_pagings(name).await,
        }
    }

    pub async fn insert_log(&self, entry: &PagingEntry) -> StoreResult<()> {
        match self {
            Store::Memory(s) => {
                s.insert_log(entry).await;
                Ok(())
            }
            Store::Postgres(s) => s.insert_log(entry).await,
        }
    }

    /// Audit rows, newest first.
    pub async fn list_logs(&self) -> StoreResult<Vec<PagingLogEntry>> {
        match self {
            Store::Memory(s) => Ok(s.list_logs().await),
            Store::Postgres(s) => s.list_logs().await,
        }
    }

    pub async fn list_users(&self) -> StoreResult<Vec<UserAccount>> {
        match self {
            Store::Memory(s) => Ok(s.list_users().await),
            Store::Postgres(s) => s.list_users().await,
        }
    }

    pub async fn get_user(&self, id_usr: i32) -> StoreResult<Option<UserAccount>> {
        match self {
            Store::Memory(s) => Ok(s.get_user(id_usr).await),
            Store::Postgres(s) => s.get_user(id_usr).await,
        }
    }

    pub async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<UserAccount>> {
        match self {
            Store::Memory(s) => Ok(s.find_user_by_username(username).await),
            Store::Postgres(s) => s.find_user_by_username(username).await,
        }
    }

    /// Stores `user` under a fresh id, ignoring `user.id_usr`.
    pub async fn insert_user(&self, user: &UserAccount) -> StoreResult<UserAccount> {
        match self {
            Store::Memory(s) => Ok(s.insert_user(user).await),
            Store::Postgres(s) => s.insert_user(user).await,
        }
    }

    /// Replaces the row `user.id_usr`.
    pub async fn update_user(&self, user: &UserAccount) -> StoreResult<()> {
        match self {
            Store::Memory(s) => {
                s.update_user(user).await;
                Ok(())
            }
            Store::Postgres(s) => s.update_user(user).await,
        }
    }

    pub async fn delete_user(&self, id_usr: i32) -> StoreResult<bool> {
        match self {
            Store::Memory(s) => Ok(s.delete_user(id_usr).await),
            Store::Postgres(s) => s.delete_user(id_usr).await,
        }
    }

    /// Active stations ordered by code.
    pub async fn list_active_stations(&self) -> StoreResult<Vec<Station>> {
        match self {
            Store::Memory(s) => Ok(s.list_active_stations().await),
            Store::Postgres(s) => s.list_active_stations().await,
        }
    }
}
