use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use sql_middleware::middleware::{
    AsyncDatabaseExecutor, ConfigAndPool, CustomDbRow, MiddlewarePool, MiddlewarePoolConnection,
    ResultSet, RowValues,
};
use std::collections::HashMap;
use std::path::Path;

use super::{MatchFeed, MatchStream, Storage, StorageError};
use crate::model::{HoleInput, Match, Player, Round, Tournament, check_hole_number};

const SCHEMA: &str = include_str!("../sql/schema/sqlite/00_tables.sql");

/// SQLite-backed store on the sql-middleware pool. Hole inputs live one row
/// per hole, so a match's hole map always comes from a single select.
#[derive(Clone)]
pub struct SqliteStorage {
    config_and_pool: ConfigAndPool,
    feed: MatchFeed,
}

impl SqliteStorage {
    /// Opens (or creates) the database file and applies the schema.
    ///
    /// # Errors
    /// Returns an error if the pool cannot be built or the schema fails.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let db_name = path.as_ref().to_string_lossy().into_owned();
        let config_and_pool = ConfigAndPool::new_sqlite(db_name).await?;
        let storage = Self {
            config_and_pool,
            feed: MatchFeed::default(),
        };
        let mut conn = storage.connection().await?;
        conn.execute_batch(SCHEMA).await?;
        Ok(storage)
    }

    #[must_use]
    pub fn config_and_pool(&self) -> &ConfigAndPool {
        &self.config_and_pool
    }

    async fn connection(&self) -> Result<MiddlewarePoolConnection, StorageError> {
        let pool = self
            .config_and_pool
            .pool
            .get()
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        Ok(MiddlewarePool::get_connection(pool).await?)
    }
}

fn get_text(row: &CustomDbRow, field: &str) -> Option<String> {
    row.get(field)
        .and_then(|v| v.as_text())
        .map(ToString::to_string)
}

fn get_int(row: &CustomDbRow, field: &str) -> Option<i64> {
    row.get(field).and_then(|v| v.as_int()).copied()
}

fn text_param(value: &str) -> RowValues {
    RowValues::Text(value.to_string())
}

fn decode_doc<T: DeserializeOwned>(row: &CustomDbRow) -> Result<T, StorageError> {
    let doc = get_text(row, "doc")
        .ok_or_else(|| StorageError::Backend("row without doc column".to_string()))?;
    Ok(serde_json::from_str(&doc)?)
}

fn parse_timestamp(raw: Option<String>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|ts| ts.with_timezone(&Utc))
}

fn decode_round(row: &CustomDbRow) -> Result<Round, StorageError> {
    let mut round: Round = decode_doc(row)?;
    round.locked = get_int(row, "locked") == Some(1);
    Ok(round)
}

/// Hole rows that fail to decode are dropped, which reads as an undecided hole.
fn decode_holes(match_id: &str, rows: &ResultSet) -> HashMap<u8, HoleInput> {
    let mut holes = HashMap::new();
    for row in &rows.results {
        let Some(hole) = get_int(row, "hole").and_then(|h| u8::try_from(h).ok()) else {
            tracing::warn!(%match_id, "ignoring hole row without a valid hole number");
            continue;
        };
        let raw = get_text(row, "input").unwrap_or_default();
        match serde_json::from_str::<HoleInput>(&raw) {
            Ok(input) => {
                holes.insert(hole, input);
            }
            Err(e) => {
                tracing::warn!(%match_id, hole, error = %e, "ignoring undecodable hole input");
            }
        }
    }
    holes
}

async fn read_match(
    conn: &mut MiddlewarePoolConnection,
    match_id: &str,
) -> Result<Option<Match>, StorageError> {
    let res = conn
        .execute_select(
            "SELECT doc, updated_at FROM matches WHERE id = ?1;",
            &[text_param(match_id)],
        )
        .await?;
    let Some(row) = res.results.first() else {
        return Ok(None);
    };
    let mut m: Match = decode_doc(row)?;
    m.updated_at = parse_timestamp(get_text(row, "updated_at"));

    let hole_rows = conn
        .execute_select(
            "SELECT hole, input FROM match_holes WHERE match_id = ?1 ORDER BY hole;",
            &[text_param(match_id)],
        )
        .await?;
    m.holes = decode_holes(match_id, &hole_rows);
    Ok(Some(m))
}

async fn select_docs<T: DeserializeOwned>(
    conn: &mut MiddlewarePoolConnection,
    query: &str,
    params: &[RowValues],
) -> Result<Vec<T>, StorageError> {
    let res = conn.execute_select(query, params).await?;
    res.results.iter().map(decode_doc).collect()
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn get_match(&self, match_id: &str) -> Result<Option<Match>, StorageError> {
        let mut conn = self.connection().await?;
        read_match(&mut conn, match_id).await
    }

    async fn apply_hole_edit(
        &self,
        match_id: &str,
        hole: u8,
        input: HoleInput,
    ) -> Result<Match, StorageError> {
        check_hole_number(hole).map_err(|e| StorageError::InvalidInput(e.to_string()))?;
        let mut conn = self.connection().await?;

        let existing = conn
            .execute_select(
                "SELECT id FROM matches WHERE id = ?1;",
                &[text_param(match_id)],
            )
            .await?;
        if existing.results.is_empty() {
            return Err(StorageError::NotFound(format!("match {match_id}")));
        }

        // a single statement per hole, so the last write to a hole wins
        if input.is_empty() {
            conn.execute_dml(
                "DELETE FROM match_holes WHERE match_id = ?1 AND hole = ?2;",
                &[text_param(match_id), RowValues::Int(i64::from(hole))],
            )
            .await?;
        } else {
            conn.execute_dml(
                "INSERT INTO match_holes (match_id, hole, input) VALUES (?1, ?2, ?3) \
                 ON CONFLICT (match_id, hole) DO UPDATE SET input = excluded.input;",
                &[
                    text_param(match_id),
                    RowValues::Int(i64::from(hole)),
                    RowValues::Text(serde_json::to_string(&input)?),
                ],
            )
            .await?;
        }
        conn.execute_dml(
            "UPDATE matches SET updated_at = ?2 WHERE id = ?1;",
            &[text_param(match_id), RowValues::Text(Utc::now().to_rfc3339())],
        )
        .await?;

        let updated = read_match(&mut conn, match_id)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("match {match_id}")))?;
        self.feed.publish(&updated);
        Ok(updated)
    }

    fn subscribe(&self, match_id: &str) -> MatchStream {
        self.feed.subscribe(match_id)
    }

    async fn get_round(&self, round_id: &str) -> Result<Option<Round>, StorageError> {
        let mut conn = self.connection().await?;
        let res = conn
            .execute_select(
                "SELECT doc, locked FROM rounds WHERE id = ?1;",
                &[text_param(round_id)],
            )
            .await?;
        res.results.first().map(decode_round).transpose()
    }

    async fn rounds_for_tournament(
        &self,
        tournament_id: &str,
    ) -> Result<Vec<Round>, StorageError> {
        let mut conn = self.connection().await?;
        let res = conn
            .execute_select(
                "SELECT doc, locked FROM rounds WHERE tournament_id = ?1;",
                &[text_param(tournament_id)],
            )
            .await?;
        res.results.iter().map(decode_round).collect()
    }

    async fn matches_for_round(&self, round_id: &str) -> Result<Vec<Match>, StorageError> {
        let mut conn = self.connection().await?;
        let res = conn
            .execute_select(
                "SELECT id FROM matches WHERE round_id = ?1 ORDER BY id;",
                &[text_param(round_id)],
            )
            .await?;
        let ids: Vec<String> = res
            .results
            .iter()
            .filter_map(|row| get_text(row, "id"))
            .collect();

        let mut matches = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(m) = read_match(&mut conn, &id).await? {
                matches.push(m);
            }
        }
        Ok(matches)
    }

    async fn get_tournament(
        &self,
        tournament_id: &str,
    ) -> Result<Option<Tournament>, StorageError> {
        let mut conn = self.connection().await?;
        let docs = select_docs(
            &mut conn,
            "SELECT doc FROM tournaments WHERE id = ?1;",
            &[text_param(tournament_id)],
        )
        .await?;
        Ok(docs.into_iter().next())
    }

    async fn active_tournament(&self) -> Result<Option<Tournament>, StorageError> {
        let mut conn = self.connection().await?;
        let docs = select_docs(
            &mut conn,
            "SELECT doc FROM tournaments WHERE active = 1 ORDER BY id LIMIT 1;",
            &[],
        )
        .await?;
        Ok(docs.into_iter().next())
    }

    async fn get_players(&self, player_ids: &[String]) -> Result<Vec<Player>, StorageError> {
        let mut conn = self.connection().await?;
        let mut players = Vec::with_capacity(player_ids.len());
        for id in player_ids {
            let found: Vec<Player> = select_docs(
                &mut conn,
                "SELECT doc FROM players WHERE id = ?1;",
                &[text_param(id)],
            )
            .await?;
            players.extend(found);
        }
        Ok(players)
    }

    async fn set_round_locked(&self, round_id: &str, locked: bool) -> Result<(), StorageError> {
        let mut conn = self.connection().await?;
        let existing = conn
            .execute_select(
                "SELECT id FROM rounds WHERE id = ?1;",
                &[text_param(round_id)],
            )
            .await?;
        if existing.results.is_empty() {
            return Err(StorageError::NotFound(format!("round {round_id}")));
        }
        conn.execute_dml(
            "UPDATE rounds SET locked = ?2 WHERE id = ?1;",
            &[text_param(round_id), RowValues::Int(i64::from(locked))],
        )
        .await?;
        Ok(())
    }

    async fn put_tournament(&self, tournament: &Tournament) -> Result<(), StorageError> {
        let doc = serde_json::to_string(tournament)?;
        let mut conn = self.connection().await?;
        conn.execute_dml(
            "INSERT OR REPLACE INTO tournaments (id, active, doc) VALUES (?1, ?2, ?3);",
            &[
                text_param(&tournament.id),
                RowValues::Int(i64::from(tournament.active)),
                RowValues::Text(doc),
            ],
        )
        .await?;
        Ok(())
    }

    async fn put_round(&self, round: &Round) -> Result<(), StorageError> {
        let doc = serde_json::to_string(round)?;
        let tournament_id = round
            .tournament_id
            .as_deref()
            .map_or(RowValues::Null, text_param);
        let mut conn = self.connection().await?;
        conn.execute_dml(
            "INSERT OR REPLACE INTO rounds (id, tournament_id, locked, doc) VALUES (?1, ?2, ?3, ?4);",
            &[
                text_param(&round.id),
                tournament_id,
                RowValues::Int(i64::from(round.locked)),
                RowValues::Text(doc),
            ],
        )
        .await?;
        Ok(())
    }

    async fn put_match(&self, m: &Match) -> Result<(), StorageError> {
        let mut holes = Vec::with_capacity(m.holes.len());
        for (hole, input) in &m.holes {
            check_hole_number(*hole).map_err(|e| StorageError::InvalidInput(e.to_string()))?;
            holes.push((*hole, serde_json::to_string(input)?));
        }
        let mut doc_record = m.clone();
        doc_record.holes.clear();
        doc_record.updated_at = None;
        let doc = serde_json::to_string(&doc_record)?;
        let updated_at = m
            .updated_at
            .map_or(RowValues::Null, |ts| RowValues::Text(ts.to_rfc3339()));

        let mut conn = self.connection().await?;
        conn.execute_dml(
            "INSERT OR REPLACE INTO matches (id, round_id, updated_at, doc) VALUES (?1, ?2, ?3, ?4);",
            &[
                text_param(&m.id),
                text_param(&m.round_id),
                updated_at,
                RowValues::Text(doc),
            ],
        )
        .await?;
        conn.execute_dml(
            "DELETE FROM match_holes WHERE match_id = ?1;",
            &[text_param(&m.id)],
        )
        .await?;
        for (hole, input) in holes {
            conn.execute_dml(
                "INSERT INTO match_holes (match_id, hole, input) VALUES (?1, ?2, ?3);",
                &[
                    text_param(&m.id),
                    RowValues::Int(i64::from(hole)),
                    RowValues::Text(input),
                ],
            )
            .await?;
        }
        self.feed.publish(m);
        Ok(())
    }

    async fn put_player(&self, player: &Player) -> Result<(), StorageError> {
        let doc = serde_json::to_string(player)?;
        let mut conn = self.connection().await?;
        conn.execute_dml(
            "INSERT OR REPLACE INTO players (id, doc) VALUES (?1, ?2);",
            &[text_param(&player.id), RowValues::Text(doc)],
        )
        .await?;
        Ok(())
    }
}
