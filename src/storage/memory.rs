use ahash::RandomState;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{MatchFeed, MatchStream, Storage, StorageError};
use crate::model::{HoleInput, Match, Player, Round, Tournament, check_hole_number};

#[derive(Default)]
struct Tables {
    tournaments: HashMap<String, Tournament, RandomState>,
    rounds: HashMap<String, Round, RandomState>,
    matches: HashMap<String, Match, RandomState>,
    players: HashMap<String, Player, RandomState>,
}

/// Process-local store. Every read clones a whole record under the lock, so a
/// reader never observes a partially applied edit.
#[derive(Default)]
pub struct MemoryStorage {
    tables: RwLock<Tables>,
    feed: MatchFeed,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get_match(&self, match_id: &str) -> Result<Option<Match>, StorageError> {
        Ok(self.tables.read().await.matches.get(match_id).cloned())
    }

    async fn apply_hole_edit(
        &self,
        match_id: &str,
        hole: u8,
        input: HoleInput,
    ) -> Result<Match, StorageError> {
        check_hole_number(hole).map_err(|e| StorageError::InvalidInput(e.to_string()))?;
        let updated = {
            let mut tables = self.tables.write().await;
            let m = tables
                .matches
                .get_mut(match_id)
                .ok_or_else(|| StorageError::NotFound(format!("match {match_id}")))?;
            if input.is_empty() {
                m.holes.remove(&hole);
            } else {
                m.holes.insert(hole, input);
            }
            m.updated_at = Some(Utc::now());
            m.clone()
        };
        self.feed.publish(&updated);
        Ok(updated)
    }

    fn subscribe(&self, match_id: &str) -> MatchStream {
        self.feed.subscribe(match_id)
    }

    async fn get_round(&self, round_id: &str) -> Result<Option<Round>, StorageError> {
        Ok(self.tables.read().await.rounds.get(round_id).cloned())
    }

    async fn rounds_for_tournament(
        &self,
        tournament_id: &str,
    ) -> Result<Vec<Round>, StorageError> {
        let tables = self.tables.read().await;
        Ok(tables
            .rounds
            .values()
            .filter(|r| r.tournament_id.as_deref() == Some(tournament_id))
            .cloned()
            .collect())
    }

    async fn matches_for_round(&self, round_id: &str) -> Result<Vec<Match>, StorageError> {
        let tables = self.tables.read().await;
        let mut matches: Vec<Match> = tables
            .matches
            .values()
            .filter(|m| m.round_id == round_id)
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(matches)
    }

    async fn get_tournament(
        &self,
        tournament_id: &str,
    ) -> Result<Option<Tournament>, StorageError> {
        Ok(self
            .tables
            .read()
            .await
            .tournaments
            .get(tournament_id)
            .cloned())
    }

    async fn active_tournament(&self) -> Result<Option<Tournament>, StorageError> {
        let tables = self.tables.read().await;
        let mut active: Vec<&Tournament> =
            tables.tournaments.values().filter(|t| t.active).collect();
        active.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(active.first().map(|t| (*t).clone()))
    }

    async fn get_players(&self, player_ids: &[String]) -> Result<Vec<Player>, StorageError> {
        let tables = self.tables.read().await;
        Ok(player_ids
            .iter()
            .filter_map(|id| tables.players.get(id).cloned())
            .collect())
    }

    async fn set_round_locked(&self, round_id: &str, locked: bool) -> Result<(), StorageError> {
        let mut tables = self.tables.write().await;
        let round = tables
            .rounds
            .get_mut(round_id)
            .ok_or_else(|| StorageError::NotFound(format!("round {round_id}")))?;
        round.locked = locked;
        Ok(())
    }

    async fn put_tournament(&self, tournament: &Tournament) -> Result<(), StorageError> {
        self.tables
            .write()
            .await
            .tournaments
            .insert(tournament.id.clone(), tournament.clone());
        Ok(())
    }

    async fn put_round(&self, round: &Round) -> Result<(), StorageError> {
        self.tables
            .write()
            .await
            .rounds
            .insert(round.id.clone(), round.clone());
        Ok(())
    }

    async fn put_match(&self, m: &Match) -> Result<(), StorageError> {
        for hole in m.holes.keys() {
            check_hole_number(*hole).map_err(|e| StorageError::InvalidInput(e.to_string()))?;
        }
        self.tables
            .write()
            .await
            .matches
            .insert(m.id.clone(), m.clone());
        self.feed.publish(m);
        Ok(())
    }

    async fn put_player(&self, player: &Player) -> Result<(), StorageError> {
        self.tables
            .write()
            .await
            .players
            .insert(player.id.clone(), player.clone());
        Ok(())
    }
}
