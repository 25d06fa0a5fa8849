use chrono::{SecondsFormat, Utc};
use paging_common::models::{PagingDraft, PagingEntry, PagingLogEntry, Station, UserAccount};
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    pagings: Vec<PagingEntry>,
    logs: Vec<PagingLogEntry>,
    users: Vec<UserAccount>,
    stations: Vec<Station>,
    next_paging_id: i32,
    next_log_id: i32,
    next_user_id: i32,
}

fn next(counter: &mut i32) -> i32 {
    *counter += 1;
    *counter
}

/// In-process tables. Rows are kept in id order.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// A store preloaded with `stations`.
    pub fn with_stations(stations: Vec<Station>) -> Self {
        Self {
            tables: RwLock::new(Tables {
                stations,
                ..Default::default()
            }),
        }
    }

    pub async fn list_pagings(&self) -> Vec<PagingEntry> {
        self.tables.read().await.pagings.clone()
    }

    pub async fn get_paging(&self, id: i32) -> Option<PagingEntry> {
        self.tables.read().await.pagings.iter().find(|p| p.id == id).cloned()
    }

    pub async fn belt_in_use(&self, belt_no: &str, exclude: Option<i32>) -> bool {
        self.tables
            .read()
            .await
            .pagings
            .iter()
            .any(|p| p.belt_no == belt_no && Some(p.id) != exclude)
    }

    pub async fn insert_paging(&self, draft: &PagingDraft) -> PagingEntry {
        let mut tables = self.tables.write().await;
        let id = next(&mut tables.next_paging_id);
        let entry = draft.clone().into_entry(id);
        tables.pagings.push(entry.clone());
        entry
    }

    pub async fn update_paging(&self, id: i32, draft: &PagingDraft) -> Option<PagingEntry> {
        let mut tables = self.tables.write().await;
        let row = tables.pagings.iter_mut().find(|p| p.id == id)?;
        *row = draft.clone().into_entry(id);
        Some(row.clone())
    }

    pub async fn delete_paging(&self, id: i32) -> Option<PagingEntry> {
        let mut tables = self.tables.write().await;
        let pos = tables.pagings.iter().position(|p| p.id == id)?;
        Some(tables.pagings.remove(pos))
    }

    pub async fn search_pagings(&self, name: &str) -> Vec<PagingEntry> {
        let needle = name.to_lowercase();
        self.tables
            .read()
            .await
            .pagings
            .iter()
            .filter(|p| p.name_passenger.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    pub async fn insert_log(&self, entry: &PagingEntry) {
        let mut tables = self.tables.write().await;
        let id = next(&mut tables.next_log_id);
        tables.logs.push(PagingLogEntry {
            id,
            belt_no: entry.belt_no.clone(),
            flight_no: entry.flight_no.clone(),
            name_passenger: entry.name_passenger.clone(),
            handle_by: entry.handle_by,
            free_text: entry.free_text.clone(),
            status: entry.status,
            last_update: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        });
    }

    /// Newest first.
    pub async fn list_logs(&self) -> Vec<PagingLogEntry> {
        self.tables.read().await.logs.iter().rev().cloned().collect()
    }

    pub async fn list_users(&self) -> Vec<UserAccount> {
        self.tables.read().await.users.clone()
    }

    pub async fn get_user(&self, id_usr: i32) -> Option<UserAccount> {
        self.tables.read().await.users.iter().find(|u| u.id_usr == id_usr).cloned()
    }

    pub async fn find_user_by_username(&self, username: &str) -> Option<UserAccount> {
        self.tables
            .read()
            .await
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned()
    }

    pub async fn insert_user(&self, user: &UserAccount) -> UserAccount {
        let mut tables = self.tables.write().await;
        let id_usr = next(&mut tables.next_user_id);
        let stored = UserAccount {
            id_usr,
            ..user.clone()
        };
        tables.users.push(stored.clone());
        stored
    }

    pub async fn update_user(&self, user: &UserAccount) {
        let mut tables = self.tables.write().await;
        if let Some(row) = tables.users.iter_mut().find(|u| u.id_usr == user.id_usr) {
            *row = user.clone();
        }
    }

    pub async fn delete_user(&self, id_usr: i32) -> bool {
        let mut tables = self.tables.write().await;
        let before = tables.users.len();
        tables.users.retain(|u| u.id_usr != id_usr);
        tables.users.len() != before
    }

    pub async fn list_active_stations(&self) -> Vec<Station> {
        let mut stations: Vec<Station> = self
            .tables
            .read()
            .await
            .stations
            .iter()
            .filter(|s| s.is_active == 1)
            .cloned()
            .collect();
        stations.sort_by(|a, b| a.code_station.cmp(&b.code_station));
        stations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paging_common::models::{Handler, STATUS_SHOW};

    fn draft(belt: &str, names: &str) -> PagingDraft {
        PagingDraft {
            belt_no: belt.into(),
            flight_no: "GA123".into(),
            name_passenger: names.into(),
            status: STATUS_SHOW,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_ids_increase_and_survive_deletes() {
        let store = MemoryStore::default();
        let a = store.insert_paging(&draft("1", "Alice")).await;
        let b = store.insert_paging(&draft("2", "Bob")).await;
        assert_eq!((a.id, b.id), (1, 2));

        assert_eq!(store.delete_paging(2).await.map(|p| p.id), Some(2));
        let c = store.insert_paging(&draft("3", "Carol")).await;
        assert_eq!(c.id, 3);
        assert!(store.delete_paging(2).await.is_none());
    }

    #[tokio::test]
    async fn test_belt_in_use_excludes_self() {
        let store = MemoryStore::default();
        let a = store.insert_paging(&draft("7", "Alice")).await;
        assert!(store.belt_in_use("7", None).await);
        assert!(!store.belt_in_use("7", Some(a.id)).await);
        assert!(!store.belt_in_use("8", None).await);
    }

    #[tokio::test]
    async fn test_search_ignores_case() {
        let store = MemoryStore::default();
        store.insert_paging(&draft("1", "Alice SMITH, Bob")).await;
        store.insert_paging(&draft("2", "Carol")).await;
        let hits = store.search_pagings("smith").await;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].belt_no, "1");
    }

    #[tokio::test]
    async fn test_logs_newest_first() {
        let store = MemoryStore::default();
        let mut entry = store.insert_paging(&draft("1", "Alice")).await;
        store.insert_log(&entry).await;
        entry.handle_by = Handler::Gapura;
        store.insert_log(&entry).await;

        let logs = store.list_logs().await;
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].id, 2);
        assert_eq!(logs[0].handle_by, Handler::Gapura);
    }

    #[tokio::test]
    async fn test_active_stations_sorted_by_code() {
        let station = |id, code: &str, active| Station {
            id_sts: id,
            code_station: code.into(),
            name_station: String::new(),
            is_active: active,
        };
        let store = MemoryStore::with_stations(vec![
            station(1, "SUB", 1),
            station(2, "CGK", 1),
            station(3, "DPS", 0),
        ]);
        let codes: Vec<String> = store
            .list_active_stations()
            .await
            .into_iter()
            .map(|s| s.code_station)
            .collect();
        assert_eq!(codes, ["CGK", "SUB"]);
    }
}
