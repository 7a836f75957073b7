//! In-memory [`Store`] with JSON snapshots.

use std::fs;
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{Scope, Store};
use crate::dan::RankAchievement;
use crate::error::{Error, Result};
use crate::game::{DanRank, Discipline};
use crate::player::{ExtId, Machine, Profile, UserId};
use crate::score::{AttemptEntry, ChartKey, ScoreRecord};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredScore {
    scope: Scope,
    user: UserId,
    location: Option<u32>,
    record: ScoreRecord,
    /// Last write that tied or beat the stored points
    #[serde(default)]
    best_at: Option<DateTime<Utc>>,
}

/// One appended history row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAttempt {
    pub scope: Scope,
    pub user: Option<UserId>,
    pub location: Option<u32>,
    pub entry: AttemptEntry,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredProfile {
    scope: Scope,
    user: UserId,
    profile: Profile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredAchievement {
    scope: Scope,
    user: UserId,
    rank: DanRank,
    discipline: Discipline,
    achievement: RankAchievement,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredExtId {
    scope: Scope,
    ext_id: ExtId,
    user: UserId,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Tables {
    scores: Vec<StoredScore>,
    attempts: Vec<StoredAttempt>,
    profiles: Vec<StoredProfile>,
    achievements: Vec<StoredAchievement>,
    ext_ids: Vec<StoredExtId>,
    machines: Vec<Machine>,
}

/// Thread-safe store backed by plain vectors
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a snapshot written by [`MemoryStore::save_to_path`]
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)?;
        let tables: Tables = serde_json::from_str(&content)?;
        debug!(
            "Loaded store snapshot: {} scores, {} profiles",
            tables.scores.len(),
            tables.profiles.len()
        );
        Ok(Self {
            tables: RwLock::new(tables),
        })
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(&*self.read()?)?;
        fs::write(&path, content)?;
        info!("Saved store snapshot to {}", path.as_ref().display());
        Ok(())
    }

    /// Register a player: external id mapping plus profile
    pub fn register_player(
        &self,
        scope: &Scope,
        user: UserId,
        ext_id: ExtId,
        mut profile: Profile,
    ) -> Result<()> {
        profile.ext_id = Some(ext_id);
        {
            let mut tables = self.write()?;
            tables.ext_ids.retain(|e| !(e.scope == *scope && e.ext_id == ext_id));
            tables.ext_ids.push(StoredExtId {
                scope: scope.clone(),
                ext_id,
                user,
            });
        }
        self.put_profile(scope, user, &profile)
    }

    /// Remove a profile from every version, leaving its scores behind
    pub fn delete_profile(&self, user: UserId) -> Result<()> {
        self.write()?.profiles.retain(|p| p.user != user);
        Ok(())
    }

    pub fn add_machine(&self, machine: Machine) -> Result<()> {
        let mut tables = self.write()?;
        tables.machines.retain(|m| m.id != machine.id);
        tables.machines.push(machine);
        Ok(())
    }

    /// History rows in append order
    pub fn attempts(&self) -> Result<Vec<StoredAttempt>> {
        Ok(self.read()?.attempts.clone())
    }

    /// Location recorded with a user's best score, if any
    pub fn best_score_location(
        &self,
        scope: &Scope,
        user: UserId,
        key: ChartKey,
    ) -> Result<Option<u32>> {
        Ok(self
            .read()?
            .scores
            .iter()
            .find(|s| s.scope == *scope && s.user == user && s.record.key == key)
            .and_then(|s| s.location))
    }

    /// When a user's best score was last tied or improved
    pub fn best_score_time(
        &self,
        scope: &Scope,
        user: UserId,
        key: ChartKey,
    ) -> Result<Option<DateTime<Utc>>> {
        Ok(self
            .read()?
            .scores
            .iter()
            .find(|s| s.scope == *scope && s.user == user && s.record.key == key)
            .and_then(|s| s.best_at))
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| Error::Storage("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| Error::Storage("memory store lock poisoned".to_string()))
    }
}

impl Store for MemoryStore {
    fn best_score(
        &self,
        scope: &Scope,
        user: UserId,
        key: ChartKey,
    ) -> Result<Option<ScoreRecord>> {
        Ok(self
            .read()?
            .scores
            .iter()
            .find(|s| s.scope == *scope && s.user == user && s.record.key == key)
            .map(|s| s.record.clone()))
    }

    fn put_best_score(
        &self,
        scope: &Scope,
        user: UserId,
        location: Option<u32>,
        record: &ScoreRecord,
        is_best: bool,
    ) -> Result<()> {
        let mut tables = self.write()?;
        let mut best_at = None;
        tables.scores.retain(|s| {
            let same = s.scope == *scope && s.user == user && s.record.key == record.key;
            if same {
                best_at = s.best_at;
            }
            !same
        });
        if is_best {
            best_at = Some(Utc::now());
        }
        tables.scores.push(StoredScore {
            scope: scope.clone(),
            user,
            location,
            record: record.clone(),
            best_at,
        });
        Ok(())
    }

    fn put_attempt(
        &self,
        scope: &Scope,
        user: Option<UserId>,
        location: Option<u32>,
        entry: &AttemptEntry,
    ) -> Result<()> {
        self.write()?.attempts.push(StoredAttempt {
            scope: scope.clone(),
            user,
            location,
            entry: entry.clone(),
        });
        Ok(())
    }

    fn all_scores(&self, scope: &Scope, key: ChartKey) -> Result<Vec<(UserId, ScoreRecord)>> {
        Ok(self
            .read()?
            .scores
            .iter()
            .filter(|s| s.scope == *scope && s.record.key == key)
            .map(|s| (s.user, s.record.clone()))
            .collect())
    }

    fn scores_for_user(&self, scope: &Scope, user: UserId) -> Result<Vec<ScoreRecord>> {
        Ok(self
            .read()?
            .scores
            .iter()
            .filter(|s| s.scope == *scope && s.user == user)
            .map(|s| s.record.clone())
            .collect())
    }

    fn profile(&self, scope: &Scope, user: UserId) -> Result<Option<Profile>> {
        Ok(self
            .read()?
            .profiles
            .iter()
            .find(|p| p.scope == *scope && p.user == user)
            .map(|p| p.profile.clone()))
    }

    fn put_profile(&self, scope: &Scope, user: UserId, profile: &Profile) -> Result<()> {
        let mut tables = self.write()?;
        tables
            .profiles
            .retain(|p| !(p.scope == *scope && p.user == user));
        tables.profiles.push(StoredProfile {
            scope: scope.clone(),
            user,
            profile: profile.clone(),
        });
        Ok(())
    }

    fn any_profile(&self, game: &str, user: UserId) -> Result<Option<Profile>> {
        Ok(self
            .read()?
            .profiles
            .iter()
            .filter(|p| p.scope.game == game && p.user == user)
            .max_by_key(|p| p.scope.version)
            .map(|p| p.profile.clone()))
    }

    fn achievement(
        &self,
        scope: &Scope,
        user: UserId,
        rank: DanRank,
        discipline: Discipline,
    ) -> Result<Option<RankAchievement>> {
        Ok(self
            .read()?
            .achievements
            .iter()
            .find(|a| {
                a.scope == *scope && a.user == user && a.rank == rank && a.discipline == discipline
            })
            .map(|a| a.achievement))
    }

    fn put_achievement(
        &self,
        scope: &Scope,
        user: UserId,
        rank: DanRank,
        discipline: Discipline,
        achievement: &RankAchievement,
    ) -> Result<()> {
        let mut tables = self.write()?;
        tables.achievements.retain(|a| {
            !(a.scope == *scope && a.user == user && a.rank == rank && a.discipline == discipline)
        });
        tables.achievements.push(StoredAchievement {
            scope: scope.clone(),
            user,
            rank,
            discipline,
            achievement: *achievement,
        });
        Ok(())
    }

    fn achievements(
        &self,
        scope: &Scope,
        rank: DanRank,
        discipline: Discipline,
    ) -> Result<Vec<(UserId, RankAchievement)>> {
        Ok(self
            .read()?
            .achievements
            .iter()
            .filter(|a| a.scope == *scope && a.rank == rank && a.discipline == discipline)
            .map(|a| (a.user, a.achievement))
            .collect())
    }

    fn user_from_ext_id(&self, scope: &Scope, ext_id: ExtId) -> Result<Option<UserId>> {
        Ok(self
            .read()?
            .ext_ids
            .iter()
            .find(|e| e.scope == *scope && e.ext_id == ext_id)
            .map(|e| e.user))
    }

    fn machine(&self, id: u32) -> Result<Option<Machine>> {
        Ok(self.read()?.machines.iter().find(|m| m.id == id).cloned())
    }
}
