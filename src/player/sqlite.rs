//! SQLite-backed record store.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::StoreResult;
use crate::page::PageRequest;

use super::store::{sort_field, PlayerStore, StoredPage};
use super::types::{Player, PlayerField};

/// Schema for the catalog table.
const PLAYERS_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS players (
    playerid TEXT PRIMARY KEY NOT NULL,
    birthyear TEXT,
    birthmonth TEXT,
    birthday TEXT,
    birthcountry TEXT,
    birthstate TEXT,
    birthcity TEXT,
    deathyear TEXT,
    deathmonth TEXT,
    deathday TEXT,
    deathcountry TEXT,
    deathstate TEXT,
    deathcity TEXT,
    namefirst TEXT,
    namelast TEXT,
    namegiven TEXT,
    weight TEXT,
    height TEXT,
    bats TEXT,
    throws TEXT,
    debut TEXT,
    finalgame TEXT,
    retroid TEXT,
    bbrefid TEXT
);
"#;

/// SQLite-based store implementation.
pub struct SqliteStore {
  conn: Mutex<Connection>,
}

impl SqliteStore {
  /// Open (or create) the catalog database at `path`.
  pub fn open(path: &Path) -> StoreResult<Self> {
    if let Some(parent) = path.parent() {
      if !parent.as_os_str().is_empty() {
        std::fs::create_dir_all(parent)
          .map_err(|e| format!("Failed to create database directory: {}", e))?;
      }
    }

    let conn = Connection::open(path)
      .map_err(|e| format!("Failed to open database at {}: {}", path.display(), e))?;
    Self::from_connection(conn)
  }

  /// Open a private in-memory database.
  pub fn open_in_memory() -> StoreResult<Self> {
    Self::from_connection(Connection::open_in_memory()?)
  }

  /// Default database location under the user data directory.
  pub fn default_path() -> Option<PathBuf> {
    dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .map(|dir| dir.join("dugout").join("players.db"))
  }

  fn from_connection(conn: Connection) -> StoreResult<Self> {
    conn
      .execute_batch(PLAYERS_SCHEMA)
      .map_err(|e| format!("Failed to run migrations: {}", e))?;
    Ok(Self {
      conn: Mutex::new(conn),
    })
  }

  fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
    self
      .conn
      .lock()
      .map_err(|e| format!("Lock poisoned: {}", e).into())
  }
}

fn column_list() -> String {
  PlayerField::ALL
    .iter()
    .map(|field| field.column())
    .collect::<Vec<_>>()
    .join(", ")
}

fn player_from_row(row: &Row<'_>) -> rusqlite::Result<Player> {
  Ok(Player {
    player_id: row.get(0)?,
    birth_year: row.get(1)?,
    birth_month: row.get(2)?,
    birth_day: row.get(3)?,
    birth_country: row.get(4)?,
    birth_state: row.get(5)?,
    birth_city: row.get(6)?,
    death_year: row.get(7)?,
    death_month: row.get(8)?,
    death_day: row.get(9)?,
    death_country: row.get(10)?,
    death_state: row.get(11)?,
    death_city: row.get(12)?,
    first_name: row.get(13)?,
    last_name: row.get(14)?,
    given_name: row.get(15)?,
    weight: row.get(16)?,
    height: row.get(17)?,
    bats: row.get(18)?,
    throw_stats: row.get(19)?,
    debut: row.get(20)?,
    final_game: row.get(21)?,
    retro_id: row.get(22)?,
    bbref_id: row.get(23)?,
  })
}

impl PlayerStore for SqliteStore {
  fn find_by_id(&self, player_id: &str) -> StoreResult<Option<Player>> {
    let conn = self.conn()?;
    let sql = format!("SELECT {} FROM players WHERE playerid = ?", column_list());
    let player = conn
      .query_row(&sql, params![player_id], player_from_row)
      .optional()?;
    Ok(player)
  }

  fn find_all(&self) -> StoreResult<Vec<Player>> {
    let conn = self.conn()?;
    let sql = format!("SELECT {} FROM players ORDER BY rowid", column_list());
    let mut stmt = conn.prepare(&sql)?;
    let players = stmt
      .query_map([], player_from_row)?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(players)
  }

  fn find_page(&self, request: &PageRequest) -> StoreResult<StoredPage> {
    // Only whitelisted column names ever reach the ORDER BY clause
    let field = sort_field(request.sort_field())?;
    let conn = self.conn()?;

    let total: i64 = conn.query_row("SELECT COUNT(*) FROM players", [], |row| row.get(0))?;

    let sql = format!(
      "SELECT {} FROM players ORDER BY {} {}, playerid ASC LIMIT ? OFFSET ?",
      column_list(),
      field.column(),
      request.direction().as_sql(),
    );
    let limit = i64::try_from(request.size()).unwrap_or(i64::MAX);
    let offset = i64::try_from(request.offset()).unwrap_or(i64::MAX);

    let mut stmt = conn.prepare(&sql)?;
    let players = stmt
      .query_map(params![limit, offset], player_from_row)?
      .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(StoredPage {
      players,
      total_elements: total.max(0) as u64,
    })
  }

  fn save(&self, player: &Player) -> StoreResult<Player> {
    let conn = self.conn()?;
    let placeholders = vec!["?"; PlayerField::ALL.len()].join(", ");
    // Update in place when the row exists so rowid (and list order) is stable
    let sql = format!(
      "INSERT INTO players ({columns}) VALUES ({placeholders})
       ON CONFLICT(playerid) DO UPDATE SET {updates}",
      columns = column_list(),
      updates = PlayerField::ALL[1..]
        .iter()
        .map(|f| format!("{0} = excluded.{0}", f.column()))
        .collect::<Vec<_>>()
        .join(", "),
    );

    let values: Vec<Option<&str>> = PlayerField::ALL
      .iter()
      .map(|field| field.value(player))
      .collect();
    conn.execute(&sql, rusqlite::params_from_iter(values))?;

    Ok(player.clone())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn seeded() -> SqliteStore {
    let store = SqliteStore::open_in_memory().unwrap();
    store.save(&Player::new("C").with_name("Ty", "Cobb")).unwrap();
    store.save(&Player::new("A").with_name("Hank", "Aaron")).unwrap();
    store.save(&Player::new("B")).unwrap();
    store
  }

  fn ids(players: &[Player]) -> Vec<&str> {
    players.iter().map(|p| p.player_id.as_str()).collect()
  }

  #[test]
  fn test_find_by_id() {
    let store = seeded();
    let player = store.find_by_id("A").unwrap().unwrap();
    assert_eq!(player.last_name.as_deref(), Some("Aaron"));
    assert_eq!(store.find_by_id("Z").unwrap(), None);
  }

  #[test]
  fn test_find_all_in_insertion_order() {
    assert_eq!(ids(&seeded().find_all().unwrap()), vec!["C", "A", "B"]);
  }

  #[test]
  fn test_save_upserts() {
    let store = seeded();
    let mut updated = Player::new("A").with_name("Henry", "Aaron");
    updated.bats = Some("R".to_string());
    store.save(&updated).unwrap();

    assert_eq!(store.find_by_id("A").unwrap(), Some(updated));
    assert_eq!(ids(&store.find_all().unwrap()), vec!["C", "A", "B"]);
  }

  #[test]
  fn test_page_by_id_ascending() {
    let request = PageRequest::new(1, 2, None, None).unwrap();
    let page = seeded().find_page(&request).unwrap();
    assert_eq!(ids(&page.players), vec!["C"]);
    assert_eq!(page.total_elements, 3);
  }

  #[test]
  fn test_page_by_last_name_descending() {
    let request = PageRequest::new(0, 3, Some("lastName"), Some("DESC")).unwrap();
    let page = seeded().find_page(&request).unwrap();
    assert_eq!(ids(&page.players), vec!["C", "A", "B"]);
  }

  #[test]
  fn test_unknown_sort_field_rejected() {
    let request = PageRequest::new(0, 3, Some("1; DROP TABLE players"), None).unwrap();
    assert!(seeded().find_page(&request).is_err());
  }

  #[test]
  fn test_open_file_creates_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("players.db");
    {
      let store = SqliteStore::open(&path).unwrap();
      store.save(&Player::new("kept")).unwrap();
    }
    let reopened = SqliteStore::open(&path).unwrap();
    assert!(reopened.find_by_id("kept").unwrap().is_some());
  }
}
