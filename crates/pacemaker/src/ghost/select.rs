use std::collections::HashSet;

use tracing::{debug, warn};

use super::average::average_ghosts;
use super::strategy::GhostStrategy;
use crate::error::Result;
use crate::game::Ghost;
use crate::player::{ExtId, Machine, Profile, UserId};
use crate::score::{ChartKey, ScoreRecord};
use crate::store::{Scope, Store};

/// Ghost handed back to the cabinet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GhostResult {
    /// EX score shown next to the ghost (population mean for averages)
    pub score: u32,
    /// Raw trace; all zeros for averages
    pub ghost: Ghost,
    pub name: Option<String>,
    pub pid: Option<u32>,
    pub ext_id: Option<ExtId>,
    /// Pace relative to a flat line, only set for averages
    pub delta: Option<Ghost>,
}

impl GhostResult {
    fn from_player(record: ScoreRecord, profile: &Profile, ext_id: Option<ExtId>) -> Self {
        Self {
            score: record.points,
            ghost: record.data.ghost.unwrap_or_default(),
            name: Some(profile.name.clone()),
            pid: Some(profile.pid),
            ext_id,
            delta: None,
        }
    }
}

/// Resolves ghost requests against a store
pub struct GhostSelector<'a, S: Store + ?Sized> {
    store: &'a S,
    game: &'a str,
    score_scope: &'a Scope,
    profile_scope: &'a Scope,
}

impl<'a, S: Store + ?Sized> GhostSelector<'a, S> {
    pub fn new(store: &'a S, score_scope: &'a Scope, profile_scope: &'a Scope) -> Self {
        Self {
            store,
            game: &profile_scope.game,
            score_scope,
            profile_scope,
        }
    }

    /// Pick the ghost `strategy` asks for on one chart.
    ///
    /// Empty candidate pools give `Ok(None)`; only store faults are errors.
    pub fn select(
        &self,
        strategy: &GhostStrategy,
        length: usize,
        key: ChartKey,
        viewer: UserId,
    ) -> Result<Option<GhostResult>> {
        let result = match strategy {
            GhostStrategy::Rival(ext_id) => self.rival(*ext_id, key)?,
            GhostStrategy::GlobalTop => self.top(self.global_pool(key)?)?,
            GhostStrategy::GlobalAverage => average(self.global_pool(key)?, length),
            GhostStrategy::LocalTop => self.top(self.local_pool(key, viewer)?)?,
            GhostStrategy::LocalAverage => average(self.local_pool(key, viewer)?, length),
            GhostStrategy::DanTop => self.top(self.dan_pool(key, viewer)?)?,
            GhostStrategy::DanAverage => average(self.dan_pool(key, viewer)?, length),
            GhostStrategy::RivalTop(rivals) => self.top(self.rival_pool(key, rivals)?)?,
            GhostStrategy::RivalAverage(rivals) => average(self.rival_pool(key, rivals)?, length),
        };

        debug!(
            "Ghost {:?} for song {} {} resolved: {}",
            strategy.kind(),
            key.song_id,
            key.chart,
            result.is_some()
        );
        Ok(result)
    }

    /// The viewer's own stored best and trace
    pub fn own(&self, user: UserId, key: ChartKey) -> Result<Option<GhostResult>> {
        Ok(self
            .store
            .best_score(self.score_scope, user, key)?
            .map(|record| GhostResult {
                score: record.points,
                ghost: record.data.ghost.unwrap_or_default(),
                name: None,
                pid: None,
                ext_id: None,
                delta: None,
            }))
    }

    fn rival(&self, ext_id: ExtId, key: ChartKey) -> Result<Option<GhostResult>> {
        let Some(user) = self.store.user_from_ext_id(self.profile_scope, ext_id)? else {
            debug!("No player registered as {}", ext_id);
            return Ok(None);
        };
        let profile = self.store.profile(self.profile_scope, user)?;
        let record = self.store.best_score(self.score_scope, user, key)?;

        Ok(match (record, profile) {
            (Some(record), Some(profile)) => Some(GhostResult::from_player(record, &profile, None)),
            _ => None,
        })
    }

    /// Every score on the chart, best first
    fn global_pool(&self, key: ChartKey) -> Result<Vec<(UserId, ScoreRecord)>> {
        let mut pool = self.store.all_scores(self.score_scope, key)?;
        pool.sort_by(|(a_user, a), (b_user, b)| {
            b.points.cmp(&a.points).then_with(|| a_user.cmp(b_user))
        });
        Ok(pool)
    }

    fn local_pool(&self, key: ChartKey, viewer: UserId) -> Result<Vec<(UserId, ScoreRecord)>> {
        let Some(home) = self.home_machine(viewer)? else {
            debug!("{} has no home arcade, local pool is empty", viewer);
            return Ok(Vec::new());
        };

        let mut pool = Vec::new();
        for (user, record) in self.global_pool(key)? {
            let profile = self.store.any_profile(self.game, user)?;
            if self.joined_arcade(&home, profile.as_ref())? {
                pool.push((user, record));
            }
        }
        debug!("Local pool for machine {}: {} scores", home.id, pool.len());
        Ok(pool)
    }

    fn home_machine(&self, viewer: UserId) -> Result<Option<Machine>> {
        let location = self
            .store
            .profile(self.profile_scope, viewer)?
            .and_then(|p| p.shop_location);
        match location {
            Some(id) => self.store.machine(id),
            None => Ok(None),
        }
    }

    /// Same machine, or both machines under the same arcade
    fn joined_arcade(&self, home: &Machine, profile: Option<&Profile>) -> Result<bool> {
        let Some(location) = profile.and_then(|p| p.shop_location) else {
            return Ok(false);
        };
        if location == home.id {
            return Ok(true);
        }

        let Some(theirs) = self.store.machine(location)? else {
            warn!("Machine {} named as a home arcade does not exist", location);
            return Ok(false);
        };
        Ok(home.arcade.is_some() && theirs.arcade == home.arcade)
    }

    fn dan_pool(&self, key: ChartKey, viewer: UserId) -> Result<Vec<(UserId, ScoreRecord)>> {
        let discipline = key.chart.discipline();
        let rank = self
            .store
            .profile(self.profile_scope, viewer)?
            .and_then(|p| p.certified_rank(discipline));
        let Some(rank) = rank else {
            debug!("{} holds no {} rank, dan pool is empty", viewer, discipline);
            return Ok(Vec::new());
        };

        let mut pool = Vec::new();
        for (user, record) in self.global_pool(key)? {
            let same_rank = self
                .store
                .profile(self.profile_scope, user)?
                .is_some_and(|p| p.certified_rank(discipline) == Some(rank));
            if same_rank {
                pool.push((user, record));
            }
        }
        debug!("Dan pool for {}: {} scores", rank, pool.len());
        Ok(pool)
    }

    fn rival_pool(&self, key: ChartKey, rivals: &[ExtId]) -> Result<Vec<(UserId, ScoreRecord)>> {
        let mut users = HashSet::new();
        for ext_id in rivals {
            match self.store.user_from_ext_id(self.profile_scope, *ext_id)? {
                Some(user) => {
                    users.insert(user);
                }
                None => debug!("Skipping unknown rival {}", ext_id),
            }
        }

        let mut pool = self.global_pool(key)?;
        pool.retain(|(user, _)| users.contains(user));
        Ok(pool)
    }

    /// First candidate whose profile still exists
    fn top(&self, pool: Vec<(UserId, ScoreRecord)>) -> Result<Option<GhostResult>> {
        for (user, record) in pool {
            match self.store.any_profile(self.game, user)? {
                Some(profile) => {
                    let ext_id = profile.ext_id;
                    return Ok(Some(GhostResult::from_player(record, &profile, ext_id)));
                }
                None => warn!("Skipping ghost candidate {} with no profile", user),
            }
        }
        Ok(None)
    }
}

fn average(pool: Vec<(UserId, ScoreRecord)>, length: usize) -> Option<GhostResult> {
    let blank = Ghost::default();
    let traces = pool
        .iter()
        .map(|(_, record)| record.data.ghost.as_ref().unwrap_or(&blank));
    let average = average_ghosts(traces, length)?;

    Some(GhostResult {
        score: u32::try_from(average.score).unwrap_or(0),
        ghost: Ghost::blank(length),
        name: None,
        pid: None,
        ext_id: None,
        delta: Some(average.delta_ghost()),
    })
}
