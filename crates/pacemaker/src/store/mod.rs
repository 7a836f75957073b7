//! Storage boundary.
//!
//! The crate never caches state: every read and write goes through a
//! [`Store`]. Implementations are expected to serialize concurrent updates
//! to the same key themselves; failures surface as [`Error::Storage`].
//!
//! [`Error::Storage`]: crate::Error::Storage

mod memory;

use serde::{Deserialize, Serialize};

use crate::dan::RankAchievement;
use crate::error::Result;
use crate::game::{DanRank, Discipline};
use crate::player::{ExtId, Machine, Profile, UserId};
use crate::score::{AttemptEntry, ChartKey, ScoreRecord};

pub use memory::MemoryStore;

/// Game and version a stored value belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    pub game: String,
    pub version: u32,
}

impl Scope {
    pub fn new(game: impl Into<String>, version: u32) -> Self {
        Self {
            game: game.into(),
            version,
        }
    }
}

/// Operations the reconciliation core needs from the record store
pub trait Store {
    fn best_score(
        &self,
        scope: &Scope,
        user: UserId,
        key: ChartKey,
    ) -> Result<Option<ScoreRecord>>;

    fn put_best_score(
        &self,
        scope: &Scope,
        user: UserId,
        location: Option<u32>,
        record: &ScoreRecord,
        is_best: bool,
    ) -> Result<()>;

    /// Append one history entry; `user` is `None` for anonymous plays
    fn put_attempt(
        &self,
        scope: &Scope,
        user: Option<UserId>,
        location: Option<u32>,
        entry: &AttemptEntry,
    ) -> Result<()>;

    /// Every player's best record for one chart, in no particular order
    fn all_scores(&self, scope: &Scope, key: ChartKey) -> Result<Vec<(UserId, ScoreRecord)>>;

    fn scores_for_user(&self, scope: &Scope, user: UserId) -> Result<Vec<ScoreRecord>>;

    fn profile(&self, scope: &Scope, user: UserId) -> Result<Option<Profile>>;

    fn put_profile(&self, scope: &Scope, user: UserId, profile: &Profile) -> Result<()>;

    /// Profile from any version of `game`, newest first
    fn any_profile(&self, game: &str, user: UserId) -> Result<Option<Profile>>;

    fn achievement(
        &self,
        scope: &Scope,
        user: UserId,
        rank: DanRank,
        discipline: Discipline,
    ) -> Result<Option<RankAchievement>>;

    fn put_achievement(
        &self,
        scope: &Scope,
        user: UserId,
        rank: DanRank,
        discipline: Discipline,
        achievement: &RankAchievement,
    ) -> Result<()>;

    /// Every player's achievement for one (rank, discipline) course
    fn achievements(
        &self,
        scope: &Scope,
        rank: DanRank,
        discipline: Discipline,
    ) -> Result<Vec<(UserId, RankAchievement)>>;

    fn user_from_ext_id(&self, scope: &Scope, ext_id: ExtId) -> Result<Option<UserId>>;

    fn machine(&self, id: u32) -> Result<Option<Machine>>;
}
