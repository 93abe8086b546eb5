pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::BoxStream;
use sql_middleware::SqlMiddlewareDbError;
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use crate::model::{HoleInput, Match, Player, Round, Tournament};

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

#[derive(Error, Debug, Clone)]
pub enum StorageError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    Backend(String),
}

impl From<SqlMiddlewareDbError> for StorageError {
    fn from(err: SqlMiddlewareDbError) -> Self {
        Self::Backend(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Backend(err.to_string())
    }
}

/// Updated snapshots of one match, in the order they were written.
pub type MatchStream = BoxStream<'static, Match>;

/// Score, round and roster store the engine reads from.
///
/// Hole edits are independent writes keyed by hole number; the last write to
/// a hole wins. Implementations must hand out whole match snapshots, never a
/// hole map that is half way through an update.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get_match(&self, match_id: &str) -> Result<Option<Match>, StorageError>;
    /// Replaces the input of one hole and returns the stored snapshot. An
    /// input without any gross clears the hole.
    async fn apply_hole_edit(
        &self,
        match_id: &str,
        hole: u8,
        input: HoleInput,
    ) -> Result<Match, StorageError>;
    fn subscribe(&self, match_id: &str) -> MatchStream;
    async fn get_round(&self, round_id: &str) -> Result<Option<Round>, StorageError>;
    async fn rounds_for_tournament(&self, tournament_id: &str)
    -> Result<Vec<Round>, StorageError>;
    async fn matches_for_round(&self, round_id: &str) -> Result<Vec<Match>, StorageError>;
    async fn get_tournament(&self, tournament_id: &str)
    -> Result<Option<Tournament>, StorageError>;
    async fn active_tournament(&self) -> Result<Option<Tournament>, StorageError>;
    async fn get_players(&self, player_ids: &[String]) -> Result<Vec<Player>, StorageError>;
    async fn set_round_locked(&self, round_id: &str, locked: bool) -> Result<(), StorageError>;
    async fn put_tournament(&self, tournament: &Tournament) -> Result<(), StorageError>;
    async fn put_round(&self, round: &Round) -> Result<(), StorageError>;
    async fn put_match(&self, m: &Match) -> Result<(), StorageError>;
    async fn put_player(&self, player: &Player) -> Result<(), StorageError>;
}

const FEED_CAPACITY: usize = 256;

/// Fan-out of stored match snapshots to subscribers.
#[derive(Clone)]
pub struct MatchFeed {
    tx: broadcast::Sender<Match>,
}

impl Default for MatchFeed {
    fn default() -> Self {
        Self::new(FEED_CAPACITY)
    }
}

impl MatchFeed {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn publish(&self, m: &Match) {
        // no subscribers is not an error
        let _ = self.tx.send(m.clone());
    }

    /// Snapshots of `match_id` written after this call. Dropping the stream
    /// ends the subscription.
    #[must_use]
    pub fn subscribe(&self, match_id: &str) -> MatchStream {
        let rx = self.tx.subscribe();
        let match_id = match_id.to_string();
        futures::stream::unfold(rx, move |mut rx| {
            let match_id = match_id.clone();
            async move {
                loop {
                    match rx.recv().await {
                        Ok(m) if m.id == match_id => return Some((m, rx)),
                        Ok(_) => {}
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(%match_id, skipped, "match subscriber lagged");
                        }
                        Err(RecvError::Closed) => return None,
                    }
                }
            }
        })
        .boxed()
    }
}
