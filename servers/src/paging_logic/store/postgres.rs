use chrono::{DateTime, SecondsFormat, Utc};
use deadpool_postgres::{Config as DeadpoolConfig, ManagerConfig, Pool, RecyclingMethod, Runtime};
use paging_common::models::{Handler, PagingDraft, PagingEntry, PagingLogEntry, Station, UserAccount};
use tokio_postgres::{NoTls, Row};
use tracing::{debug, info};

use super::StoreResult;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS tb_paging (
    id              SERIAL PRIMARY KEY,
    belt_no         TEXT NOT NULL,
    flight_no       TEXT NOT NULL DEFAULT '',
    name_passenger  TEXT NOT NULL DEFAULT '',
    handle_by       TEXT NOT NULL DEFAULT 'Jas',
    free_text       TEXT NOT NULL DEFAULT '',
    status          INTEGER NOT NULL DEFAULT 0
);
CREATE TABLE IF NOT EXISTS tb_paging_log (
    id              SERIAL PRIMARY KEY,
    belt_no         TEXT NOT NULL,
    flight_no       TEXT NOT NULL DEFAULT '',
    name_passenger  TEXT NOT NULL DEFAULT '',
    handle_by       TEXT NOT NULL DEFAULT 'Jas',
    free_text       TEXT NOT NULL DEFAULT '',
    status          INTEGER NOT NULL DEFAULT 0,
    last_update     TIMESTAMPTZ NOT NULL DEFAULT now()
);
CREATE TABLE IF NOT EXISTS tb_station (
    id_sts          SERIAL PRIMARY KEY,
    code_station    TEXT NOT NULL,
    name_station    TEXT NOT NULL DEFAULT '',
    is_active       INTEGER NOT NULL DEFAULT 1
);
CREATE TABLE IF NOT EXISTS tb_user (
    id_usr          SERIAL PRIMARY KEY,
    id_sts          INTEGER NOT NULL,
    fullname        TEXT NOT NULL,
    username        TEXT NOT NULL UNIQUE,
    password        TEXT NOT NULL,
    email           TEXT NOT NULL DEFAULT '',
    nohp            TEXT NOT NULL DEFAULT '',
    is_active       INTEGER NOT NULL DEFAULT 1
);
";

const PAGING_COLUMNS: &str = "id, belt_no, flight_no, name_passenger, handle_by, free_text, status";
const USER_COLUMNS: &str = "id_usr, id_sts, fullname, username, password, email, nohp, is_active";

/// PostgreSQL-backed tables.
pub struct PgStore {
    pool: Pool,
}

impl PgStore {
    /// Creates the pool and makes sure the tables exist.
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let mut pg_pool_config = DeadpoolConfig::new();
        pg_pool_config.url = Some(database_url.to_string());
        pg_pool_config.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });
        let pool = pg_pool_config.create_pool(Some(Runtime::Tokio1), NoTls)?;

        let client = pool.get().await?;
        client.batch_execute(SCHEMA).await?;
        info!("Database schema ready");

        Ok(Self { pool })
    }

    pub async fn list_pagings(&self) -> StoreResult<Vec<PagingEntry>> {
        let client = self.pool.get().await?;
        let rows = client
            .query(&format!("SELECT {PAGING_COLUMNS} FROM tb_paging ORDER BY id"), &[])
            .await?;
        debug!(rows = rows.len(), "Listed pagings");
        rows.iter().map(paging_from_row).collect()
    }

    pub async fn get_paging(&self, id: i32) -> StoreResult<Option<PagingEntry>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(&format!("SELECT {PAGING_COLUMNS} FROM tb_paging WHERE id = $1"), &[&id])
            .await?;
        row.as_ref().map(paging_from_row).transpose()
    }

    pub async fn belt_in_use(&self, belt_no: &str, exclude: Option<i32>) -> StoreResult<bool> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                "SELECT 1 FROM tb_paging WHERE belt_no = $1 AND ($2::INTEGER IS NULL OR id <> $2) LIMIT 1",
                &[&belt_no, &exclude],
            )
            .await?;
        Ok(row.is_some())
    }

    pub async fn insert_paging(&self, draft: &PagingDraft) -> StoreResult<PagingEntry> {
        let client = self.pool.get().await?;
        let handler = draft.handle_by.as_str();
        let row = client
            .query_one(
                &format!(
                    "INSERT INTO tb_paging (belt_no, flight_no, name_passenger, handle_by, free_text, status) \
                     VALUES ($1, $2, $3, $4, $5, $6) RETURNING {PAGING_COLUMNS}"
                ),
                &[
                    &draft.belt_no,
                    &draft.flight_no,
                    &draft.name_passenger,
                    &handler,
                    &draft.free_text,
                    &draft.status,
                ],
            )
            .await?;
        paging_from_row(&row)
    }

    pub async fn update_paging(&self, id: i32, draft: &PagingDraft) -> StoreResult<Option<PagingEntry>> {
        let client = self.pool.get().await?;
        let handler = draft.handle_by.as_str();
        let row = client
            .query_opt(
                &format!(
                    "UPDATE tb_paging SET belt_no = $2, flight_no = $3, name_passenger = $4, \
                     handle_by = $5, free_text = $6, status = $7 WHERE id = $1 RETURNING {PAGING_COLUMNS}"
                ),
                &[
                    &id,
                    &draft.belt_no,
                    &draft.flight_no,
                    &draft.name_passenger,
                    &handler,
                    &draft.free_text,
                    &draft.status,
                ],
            )
            .await?;
        row.as_ref().map(paging_from_row).transpose()
    }

    pub async fn delete_paging(&self, id: i32) -> StoreResult<Option<PagingEntry>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                &format!("DELETE FROM tb_paging WHERE id = $1 RETURNING {PAGING_COLUMNS}"),
                &[&id],
            )
            .await?;
        row.as_ref().map(paging_from_row).transpose()
    }

    pub async fn search_pagings(&self, name: &str) -> StoreResult<Vec<PagingEntry>> {
        let client = self.pool.get().await?;
        let pattern = format!("%{}%", escape_like(name));
        let rows = client
            .query(
                &format!("SELECT {PAGING_COLUMNS} FROM tb_paging WHERE name_passenger ILIKE $1 ORDER BY id"),
                &[&pattern],
            )
            .await?;
        rows.iter().map(paging_from_row).collect()
    }

    pub async fn insert_log(&self, entry: &PagingEntry) -> StoreResult<()> {
        let client = self.pool.get().await?;
        let handler = entry.handle_by.as_str();
        client
            .execute(
                "INSERT INTO tb_paging_log (belt_no, flight_no, name_passenger, handle_by, free_text, status) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
                &[
                    &entry.belt_no,
                    &entry.flight_no,
                    &entry.name_passenger,
                    &handler,
                    &entry.free_text,
                    &entry.status,
                ],
            )
            .await?;
        Ok(())
    }

    pub async fn list_logs(&self) -> StoreResult<Vec<PagingLogEntry>> {
        let client = self.pool.get().await?;
        let rows = client
            .query(
                "SELECT id, belt_no, flight_no, name_passenger, handle_by, free_text, status, last_update \
                 FROM tb_paging_log ORDER BY last_update DESC, id DESC",
                &[],
            )
            .await?;
        rows.iter()
            .map(|row| -> StoreResult<PagingLogEntry> {
                let entry = paging_from_row(row)?;
                let last_update: DateTime<Utc> = row.try_get("last_update")?;
                Ok(PagingLogEntry {
                    id: entry.id,
                    belt_no: entry.belt_no,
                    flight_no: entry.flight_no,
                    name_passenger: entry.name_passenger,
                    handle_by: entry.handle_by,
                    free_text: entry.free_text,
                    status: entry.status,
                    last_update: last_update.to_rfc3339_opts(SecondsFormat::Millis, true),
                })
            })
            .collect()
    }

    pub async fn list_users(&self) -> StoreResult<Vec<UserAccount>> {
        let client = self.pool.get().await?;
        let rows = client
            .query(&format!("SELECT {USER_COLUMNS} FROM tb_user ORDER BY id_usr"), &[])
            .await?;
        rows.iter().map(user_from_row).collect()
    }

    pub async fn get_user(&self, id_usr: i32) -> StoreResult<Option<UserAccount>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(&format!("SELECT {USER_COLUMNS} FROM tb_user WHERE id_usr = $1"), &[&id_usr])
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    pub async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<UserAccount>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(&format!("SELECT {USER_COLUMNS} FROM tb_user WHERE username = $1"), &[&username])
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    pub async fn insert_user(&self, user: &UserAccount) -> StoreResult<UserAccount> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                &format!(
                    "INSERT INTO tb_user (id_sts, fullname, username, password, email, nohp, is_active) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {USER_COLUMNS}"
                ),
                &[
                    &user.id_sts,
                    &user.fullname,
                    &user.username,
                    &user.password,
                    &user.email,
                    &user.nohp,
                    &user.is_active,
                ],
            )
            .await?;
        user_from_row(&row)
    }

    pub async fn update_user(&self, user: &UserAccount) -> StoreResult<()> {
        let client = self.pool.get().await?;
        client
            .execute(
                "UPDATE tb_user SET id_sts = $2, fullname = $3, username = $4, password = $5, \
                 email = $6, nohp = $7, is_active = $8 WHERE id_usr = $1",
                &[
                    &user.id_usr,
                    &user.id_sts,
                    &user.fullname,
                    &user.username,
                    &user.password,
                    &user.email,
                    &user.nohp,
                    &user.is_active,
                ],
            )
            .await?;
        Ok(())
    }

    pub async fn delete_user(&self, id_usr: i32) -> StoreResult<bool> {
        let client = self.pool.get().await?;
        let affected = client
            .execute("DELETE FROM tb_user WHERE id_usr = $1", &[&id_usr])
            .await?;
        Ok(affected > 0)
    }

    pub async fn list_active_stations(&self) -> StoreResult<Vec<Station>> {
        let client = self.pool.get().await?;
        let rows = client
            .query(
                "SELECT id_sts, code_station, name_station, is_active FROM tb_station \
                 WHERE is_active = 1 ORDER BY code_station",
                &[],
            )
            .await?;
        rows.iter()
            .map(|row| -> StoreResult<Station> {
                Ok(Station {
                    id_sts: row.try_get("id_sts")?,
                    code_station: text(row, "code_station")?,
                    name_station: text(row, "name_station")?,
                    is_active: row.try_get("is_active")?,
                })
            })
            .collect()
    }
}

/// Nullable text column as a plain string.
fn text(row: &Row, column: &str) -> Result<String, tokio_postgres::Error> {
    Ok(row.try_get::<_, Option<String>>(column)?.unwrap_or_default())
}

fn paging_from_row(row: &Row) -> StoreResult<PagingEntry> {
    Ok(PagingEntry {
        id: row.try_get("id")?,
        belt_no: text(row, "belt_no")?,
        flight_no: text(row, "flight_no")?,
        name_passenger: text(row, "name_passenger")?,
        handle_by: Handler::from_loose(&text(row, "handle_by")?),
        free_text: text(row, "free_text")?,
        status: row.try_get::<_, Option<i32>>("status")?.unwrap_or_default(),
    })
}

fn user_from_row(row: &Row) -> StoreResult<UserAccount> {
    Ok(UserAccount {
        id_usr: row.try_get("id_usr")?,
        id_sts: row.try_get("id_sts")?,
        fullname: text(row, "fullname")?,
        username: text(row, "username")?,
        password: text(row, "password")?,
        email: text(row, "email")?,
        nohp: text(row, "nohp")?,
        is_active: row.try_get("is_active")?,
    })
}

/// Escapes `ILIKE` wildcards so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
