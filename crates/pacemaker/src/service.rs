//! Request-level orchestration over a [`Store`].
//!
//! [`ScoreService`] holds no state besides its configuration: every call
//! reads what it needs from the store and writes its results straight back.

use tracing::{debug, info, warn};

use crate::config::ServiceConfig;
use crate::dan::{RankAchievement, advance_certified};
use crate::error::{Error, Result};
use crate::game::{Chart, ClearStatus, DanRank, Discipline};
use crate::ghost::{GhostResult, GhostSelector, GhostStrategy};
use crate::player::{ExtId, UserId};
use crate::score::{
    Attempt, ChartKey, MergeOutcome, ScoreRow, merge_attempt, project_beginner, project_scores,
};
use crate::store::{Scope, Store};
use crate::title::TitleTable;

pub struct ScoreService<S: Store> {
    store: S,
    title: &'static TitleTable,
    score_scope: Scope,
    profile_scope: Scope,
}

impl<S: Store> ScoreService<S> {
    /// Bind `store` to a configuration; fails if the title table is unknown
    /// or incomplete
    pub fn new(store: S, config: &ServiceConfig) -> Result<Self> {
        let title = config.title_table()?;
        debug!(
            "Score service for {} v{} (music version {}, title {})",
            config.game,
            config.version,
            config.music_version(),
            title.name
        );
        Ok(Self {
            store,
            title,
            score_scope: config.score_scope(),
            profile_scope: config.profile_scope(),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn title(&self) -> &'static TitleTable {
        self.title
    }

    /// Merge one play into the player's best and append it to the history.
    ///
    /// Input errors abort before anything is written.
    pub fn submit_attempt(&self, attempt: &Attempt) -> Result<MergeOutcome> {
        let existing = match attempt.user {
            Some(user) => self.store.best_score(&self.score_scope, user, attempt.key)?,
            None => None,
        };
        let outcome = merge_attempt(existing.as_ref(), attempt)?;

        if let (Some(user), Some(best)) = (attempt.user, &outcome.best) {
            self.store.put_best_score(
                &self.score_scope,
                user,
                attempt.shop,
                &best.record,
                best.is_best,
            )?;
            if outcome.points_raised {
                info!(
                    "New best for {} on {} {}: {}",
                    user, attempt.key.song_id, attempt.key.chart, best.record.points
                );
            }
        }

        self.store.put_attempt(
            &self.score_scope,
            attempt.user,
            attempt.shop,
            &outcome.history,
        )?;
        Ok(outcome)
    }

    /// Record a dan course attempt.
    ///
    /// A clear raises the certified rank (never lowers it); the per-course
    /// achievement absorbs the attempt either way.
    pub fn update_rank(
        &self,
        user: UserId,
        discipline: Discipline,
        rank: DanRank,
        percent: u32,
        cleared: bool,
        stages_cleared: u32,
    ) -> Result<()> {
        if cleared {
            let mut profile = self
                .store
                .profile(&self.profile_scope, user)?
                .unwrap_or_default();
            let current = profile.certified_rank(discipline);
            let next = advance_certified(current, rank);
            if current != Some(next) {
                info!("{} certified {} {}", user, discipline, next);
            }
            profile.set_certified_rank(discipline, Some(next));
            self.store.put_profile(&self.profile_scope, user, &profile)?;
        }

        let achievement = self
            .store
            .achievement(&self.profile_scope, user, rank, discipline)?
            .unwrap_or_default()
            .absorb(percent, stages_cleared);
        self.store.put_achievement(
            &self.profile_scope,
            user,
            rank,
            discipline,
            &achievement,
        )
    }

    /// Record a course result from raw game codes and return how many
    /// players have attempted that course
    pub fn record_dan_course(
        &self,
        user: UserId,
        discipline: i32,
        rank: i32,
        percent: u32,
        stages_cleared: u32,
    ) -> Result<usize> {
        let discipline = self.title.discipline_from_game(discipline)?;
        let rank = self
            .title
            .rank_from_game(rank, discipline)?
            .ok_or(Error::InvalidDanRank(rank))?;
        let cleared = stages_cleared == self.title.dan_stages;

        self.update_rank(user, discipline, rank, percent, cleared, stages_cleared)?;

        let participants = self
            .store
            .achievements(&self.profile_scope, rank, discipline)?
            .len();
        debug!("{} {} course has {} participants", discipline, rank, participants);
        Ok(participants)
    }

    /// Achievement stored for one player and course
    pub fn achievement(
        &self,
        user: UserId,
        rank: DanRank,
        discipline: Discipline,
    ) -> Result<Option<RankAchievement>> {
        self.store
            .achievement(&self.profile_scope, user, rank, discipline)
    }

    /// Score rows for each `(tag, player)`; unknown players are skipped
    pub fn score_table(
        &self,
        players: &[(i32, ExtId)],
        discipline: Discipline,
    ) -> Result<Vec<ScoreRow>> {
        let mut rows = Vec::new();
        for &(tag, ext_id) in players {
            let Some(user) = self.store.user_from_ext_id(&self.profile_scope, ext_id)? else {
                debug!("Skipping score table for unknown player {}", ext_id);
                continue;
            };
            let scores = self.store.scores_for_user(&self.score_scope, user)?;
            rows.extend(project_scores(&scores, discipline, tag, |status| {
                self.status_to_game(status)
            }));
        }
        Ok(rows)
    }

    /// `(song id, clear status)` for the player's beginner charts
    pub fn beginner_table(&self, user: UserId) -> Result<Vec<(u32, i32)>> {
        let scores = self.store.scores_for_user(&self.score_scope, user)?;
        Ok(project_beginner(&scores, |status| {
            self.status_to_game(status)
        }))
    }

    /// Resolve a ghost request given as raw game codes.
    ///
    /// Unknown ghost type codes are not an error: the cabinet simply gets no
    /// ghost.
    pub fn select_ghost(
        &self,
        ghost_type: i32,
        parameter: &str,
        song_id: u32,
        chart: i32,
        viewer: UserId,
    ) -> Result<Option<GhostResult>> {
        let Some(kind) = self.title.ghost_kind_from_game(ghost_type) else {
            debug!("Ignoring unknown ghost type {}", ghost_type);
            return Ok(None);
        };
        let strategy = GhostStrategy::parse(kind, parameter)?;
        let chart = self.title.chart_from_game(chart)?;
        self.select_ghost_with(&strategy, ChartKey::new(song_id, chart), viewer)
    }

    pub fn select_ghost_with(
        &self,
        strategy: &GhostStrategy,
        key: ChartKey,
        viewer: UserId,
    ) -> Result<Option<GhostResult>> {
        self.selector()
            .select(strategy, self.title.ghost_length, key, viewer)
    }

    /// The player's own best and trace for one chart
    pub fn own_ghost(
        &self,
        user: UserId,
        song_id: u32,
        chart: Chart,
    ) -> Result<Option<GhostResult>> {
        self.selector().own(user, ChartKey::new(song_id, chart))
    }

    fn selector(&self) -> GhostSelector<'_, S> {
        GhostSelector::new(&self.store, &self.score_scope, &self.profile_scope)
    }

    fn status_to_game(&self, status: ClearStatus) -> i32 {
        self.title.clear_status_to_game(status).unwrap_or_else(|| {
            warn!("{} has no code for clear status {}", self.title.name, status);
            0
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Ghost, Judge};
    use crate::player::{Machine, Profile};
    use crate::score::{AttemptEntry, ScoreRecord};
    use crate::store::MemoryStore;
    use chrono::{TimeZone, Utc};

    const SONG: u32 = 25001;

    fn service() -> ScoreService<MemoryStore> {
        ScoreService::new(MemoryStore::new(), &ServiceConfig::default()).unwrap()
    }

    fn attempt(
        user: Option<u64>,
        status: ClearStatus,
        pgreat: u32,
        great: u32,
        miss: Option<u32>,
    ) -> Attempt {
        Attempt {
            user: user.map(UserId),
            key: ChartKey::new(SONG, Chart::SpA),
            clear_status: status,
            judge: Judge::new(pgreat, great, miss),
            ghost: user.map(|_| Ghost::new(vec![pgreat as i8; 64])),
            shop: Some(10),
            played_at: Utc.with_ymd_and_hms(2021, 10, 13, 12, 0, 0).unwrap(),
        }
    }

    fn scope() -> Scope {
        Scope::new("iidx", 28)
    }

    #[test]
    fn test_submit_first_attempt() {
        let service = service();
        let outcome = service
            .submit_attempt(&attempt(Some(1), ClearStatus::Clear, 100, 50, Some(5)))
            .unwrap();
        assert!(outcome.history.qualifies);

        let best = service
            .store()
            .best_score(&scope(), UserId(1), ChartKey::new(SONG, Chart::SpA))
            .unwrap()
            .unwrap();
        assert_eq!(best.points, 250);
        assert_eq!(best.data.miss_count, Some(5));

        let attempts = service.store().attempts().unwrap();
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].user, Some(UserId(1)));
        assert_eq!(attempts[0].location, Some(10));
    }

    #[test]
    fn test_best_never_regresses() {
        let service = service();
        let plays = [
            (ClearStatus::HardClear, 100, 50, Some(5)),
            (ClearStatus::Failed, 120, 20, Some(40)),
            (ClearStatus::Clear, 10, 10, Some(2)),
            (ClearStatus::EasyClear, 90, 90, None),
        ];

        let mut last_points = 0;
        let mut last_status = ClearStatus::NoPlay;
        for (status, pgreat, great, miss) in plays {
            service
                .submit_attempt(&attempt(Some(1), status, pgreat, great, miss))
                .unwrap();
            let best = service
                .store()
                .best_score(&scope(), UserId(1), ChartKey::new(SONG, Chart::SpA))
                .unwrap()
                .unwrap();
            assert!(best.points >= last_points);
            assert!(best.data.clear_status >= last_status);
            assert_eq!(best.points, 2 * best.data.pgreat + best.data.great);
            last_points = best.points;
            last_status = best.data.clear_status;
        }

        assert_eq!(last_points, 270);
        assert_eq!(last_status, ClearStatus::HardClear);
        assert_eq!(service.store().attempts().unwrap().len(), 4);
    }

    #[test]
    fn test_anonymous_attempt_only_logs() {
        let service = service();
        service
            .submit_attempt(&attempt(None, ClearStatus::Clear, 100, 50, Some(5)))
            .unwrap();

        assert!(
            service
                .store()
                .all_scores(&scope(), ChartKey::new(SONG, Chart::SpA))
                .unwrap()
                .is_empty()
        );
        let attempts = service.store().attempts().unwrap();
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].user, None);
        assert_eq!(attempts[0].entry.ghost, None);
    }

    #[test]
    fn test_ghost_mismatch_writes_nothing() {
        let service = service();
        let mut bad = attempt(Some(1), ClearStatus::Clear, 100, 50, Some(5));
        bad.ghost = None;
        assert!(matches!(service.submit_attempt(&bad), Err(Error::GhostRequired)));

        let mut bad = attempt(None, ClearStatus::Clear, 100, 50, Some(5));
        bad.ghost = Some(Ghost::blank(64));
        assert!(matches!(service.submit_attempt(&bad), Err(Error::GhostForbidden)));

        assert!(service.store().attempts().unwrap().is_empty());
    }

    #[test]
    fn test_omnimix_scores_stay_apart() {
        let config = ServiceConfig::builder().omnimix(true).build();
        let service = ScoreService::new(MemoryStore::new(), &config).unwrap();
        service
            .submit_attempt(&attempt(Some(1), ClearStatus::Clear, 100, 50, Some(5)))
            .unwrap();

        let key = ChartKey::new(SONG, Chart::SpA);
        let store = service.store();
        assert!(store.best_score(&scope(), UserId(1), key).unwrap().is_none());
        assert!(
            store
                .best_score(&Scope::new("iidx", 10028), UserId(1), key)
                .unwrap()
                .is_some()
        );
    }

    #[test]
    fn test_update_rank_is_monotonic() {
        let service = service();
        service
            .update_rank(UserId(1), Discipline::Single, DanRank::Dan5, 100, true, 4)
            .unwrap();
        service
            .update_rank(UserId(1), Discipline::Single, DanRank::Dan3, 100, true, 4)
            .unwrap();

        let profile = service.store().profile(&scope(), UserId(1)).unwrap().unwrap();
        assert_eq!(profile.sgrade, Some(DanRank::Dan5));
        assert_eq!(profile.dgrade, None);

        // The lower course keeps its own statistics even though it did not certify
        assert_eq!(
            service
                .achievement(UserId(1), DanRank::Dan3, Discipline::Single)
                .unwrap(),
            Some(RankAchievement { percent: 100, stages_cleared: 4 })
        );

        // Failing a higher course tracks progress but does not certify
        service
            .update_rank(UserId(1), Discipline::Single, DanRank::Dan8, 55, false, 2)
            .unwrap();
        service
            .update_rank(UserId(1), Discipline::Single, DanRank::Dan8, 40, false, 3)
            .unwrap();
        let profile = service.store().profile(&scope(), UserId(1)).unwrap().unwrap();
        assert_eq!(profile.sgrade, Some(DanRank::Dan5));

        let achievement = service
            .achievement(UserId(1), DanRank::Dan8, Discipline::Single)
            .unwrap()
            .unwrap();
        assert_eq!(achievement, RankAchievement { percent: 55, stages_cleared: 3 });
    }

    #[test]
    fn test_update_rank_keeps_profile_fields() {
        let service = service();
        service
            .store()
            .register_player(&scope(), UserId(1), ExtId(12345678), Profile::new("DJ TEST", 13))
            .unwrap();
        service
            .update_rank(UserId(1), Discipline::Double, DanRank::Kaiden, 100, true, 4)
            .unwrap();

        let profile = service.store().profile(&scope(), UserId(1)).unwrap().unwrap();
        assert_eq!(profile.name, "DJ TEST");
        assert_eq!(profile.ext_id, Some(ExtId(12345678)));
        assert_eq!(profile.dgrade, Some(DanRank::Kaiden));
    }

    #[test]
    fn test_record_dan_course() {
        let service = service();
        // Game code 7 is 1st dan
        assert_eq!(service.record_dan_course(UserId(1), 0, 7, 80, 3).unwrap(), 1);
        assert_eq!(service.store().profile(&scope(), UserId(1)).unwrap(), None);

        assert_eq!(service.record_dan_course(UserId(2), 0, 7, 100, 4).unwrap(), 2);
        let profile = service.store().profile(&scope(), UserId(2)).unwrap().unwrap();
        assert_eq!(profile.sgrade, Some(DanRank::Dan1));

        assert_eq!(service.record_dan_course(UserId(1), 0, 7, 90, 4).unwrap(), 2);

        assert!(matches!(
            service.record_dan_course(UserId(1), 2, 7, 90, 4),
            Err(Error::InvalidDiscipline(2))
        ));
        assert!(matches!(
            service.record_dan_course(UserId(1), 0, -1, 90, 4),
            Err(Error::InvalidDanRank(-1))
        ));
    }

    #[test]
    fn test_score_table() {
        let service = service();
        let store = service.store();
        store
            .register_player(&scope(), UserId(1), ExtId(11111111), Profile::new("ME", 1))
            .unwrap();
        store
            .register_player(&scope(), UserId(2), ExtId(22222222), Profile::new("RIVAL", 1))
            .unwrap();

        service
            .submit_attempt(&attempt(Some(1), ClearStatus::HardClear, 100, 50, Some(5)))
            .unwrap();
        let mut double = attempt(Some(1), ClearStatus::Clear, 10, 10, None);
        double.key = ChartKey::new(SONG, Chart::DpH);
        service.submit_attempt(&double).unwrap();
        service
            .submit_attempt(&attempt(Some(2), ClearStatus::FullCombo, 200, 0, Some(0)))
            .unwrap();

        let rows = service
            .score_table(
                &[(-1, ExtId(11111111)), (0, ExtId(22222222)), (1, ExtId(33333333))],
                Discipline::Single,
            )
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].to_values(),
            vec![-1, 25001, 0, 0, 0, 5, 0, 0, 0, 0, 250, 0, -1, -1, -1, 5, -1]
        );
        assert_eq!(rows[1].tag, 0);
        assert_eq!(rows[1].clear_status[3], 7);
        assert_eq!(rows[1].miss_count[3], 0);

        let rows = service
            .score_table(&[(-1, ExtId(11111111))], Discipline::Double)
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].points[2], 30);
        assert_eq!(rows[0].miss_count[2], -1);
    }

    #[test]
    fn test_beginner_table() {
        let service = service();
        let mut beginner = attempt(Some(1), ClearStatus::EasyClear, 30, 5, Some(1));
        beginner.key = ChartKey::new(1001, Chart::SpB);
        service.submit_attempt(&beginner).unwrap();
        service
            .submit_attempt(&attempt(Some(1), ClearStatus::Clear, 100, 50, Some(5)))
            .unwrap();

        assert_eq!(service.beginner_table(UserId(1)).unwrap(), vec![(1001, 3)]);
        assert!(service.beginner_table(UserId(2)).unwrap().is_empty());
    }

    #[test]
    fn test_select_ghost_from_game_codes() {
        let service = service();
        service
            .store()
            .register_player(&scope(), UserId(2), ExtId(22222222), Profile::new("RIVAL", 1))
            .unwrap();
        service
            .submit_attempt(&attempt(Some(2), ClearStatus::Clear, 100, 50, Some(5)))
            .unwrap();

        // Game code 1 is a single rival, chart 3 is SPA
        let result = service
            .select_ghost(1, "22222222", SONG, 3, UserId(1))
            .unwrap()
            .unwrap();
        assert_eq!(result.score, 250);
        assert_eq!(result.ghost.len(), 64);

        // Averages are rebuilt from the traces, not the stored points
        let result = service.select_ghost(3, "", SONG, 3, UserId(1)).unwrap().unwrap();
        assert_eq!(result.score, 6400);
        assert_eq!(result.ghost, Ghost::blank(64));

        assert_eq!(service.select_ghost(0, "", SONG, 3, UserId(1)).unwrap(), None);
        assert!(
            service
                .select_ghost(1, "nobody", SONG, 3, UserId(1))
                .unwrap_err()
                .is_invalid_input()
        );
        assert!(matches!(
            service.select_ghost(2, "", SONG, 12, UserId(1)),
            Err(Error::InvalidChart(12))
        ));
    }

    #[test]
    fn test_own_ghost() {
        let service = service();
        service
            .submit_attempt(&attempt(Some(1), ClearStatus::Clear, 100, 50, Some(5)))
            .unwrap();
        let own = service.own_ghost(UserId(1), SONG, Chart::SpA).unwrap().unwrap();
        assert_eq!(own.score, 250);
        assert_eq!(own.ghost, Ghost::new(vec![100; 64]));
        assert_eq!(service.own_ghost(UserId(1), SONG, Chart::SpH).unwrap(), None);
    }

    /// Store that fails every call
    struct Unavailable;

    impl Store for Unavailable {
        fn best_score(&self, _: &Scope, _: UserId, _: ChartKey) -> Result<Option<ScoreRecord>> {
            Err(Error::Storage("offline".into()))
        }
        fn put_best_score(
            &self,
            _: &Scope,
            _: UserId,
            _: Option<u32>,
            _: &ScoreRecord,
            _: bool,
        ) -> Result<()> {
            Err(Error::Storage("offline".into()))
        }
        fn put_attempt(
            &self,
            _: &Scope,
            _: Option<UserId>,
            _: Option<u32>,
            _: &AttemptEntry,
        ) -> Result<()> {
            Err(Error::Storage("offline".into()))
        }
        fn all_scores(&self, _: &Scope, _: ChartKey) -> Result<Vec<(UserId, ScoreRecord)>> {
            Err(Error::Storage("offline".into()))
        }
        fn scores_for_user(&self, _: &Scope, _: UserId) -> Result<Vec<ScoreRecord>> {
            Err(Error::Storage("offline".into()))
        }
        fn profile(&self, _: &Scope, _: UserId) -> Result<Option<Profile>> {
            Err(Error::Storage("offline".into()))
        }
        fn put_profile(&self, _: &Scope, _: UserId, _: &Profile) -> Result<()> {
            Err(Error::Storage("offline".into()))
        }
        fn any_profile(&self, _: &str, _: UserId) -> Result<Option<Profile>> {
            Err(Error::Storage("offline".into()))
        }
        fn achievement(
            &self,
            _: &Scope,
            _: UserId,
            _: DanRank,
            _: Discipline,
        ) -> Result<Option<RankAchievement>> {
            Err(Error::Storage("offline".into()))
        }
        fn put_achievement(
            &self,
            _: &Scope,
            _: UserId,
            _: DanRank,
            _: Discipline,
            _: &RankAchievement,
        ) -> Result<()> {
            Err(Error::Storage("offline".into()))
        }
        fn achievements(
            &self,
            _: &Scope,
            _: DanRank,
            _: Discipline,
        ) -> Result<Vec<(UserId, RankAchievement)>> {
            Err(Error::Storage("offline".into()))
        }
        fn user_from_ext_id(&self, _: &Scope, _: ExtId) -> Result<Option<UserId>> {
            Err(Error::Storage("offline".into()))
        }
        fn machine(&self, _: u32) -> Result<Option<Machine>> {
            Err(Error::Storage("offline".into()))
        }
    }

    #[test]
    fn test_storage_faults_propagate() {
        let service = ScoreService::new(Unavailable, &ServiceConfig::default()).unwrap();
        let err = service
            .submit_attempt(&attempt(Some(1), ClearStatus::Clear, 100, 50, Some(5)))
            .unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
        assert!(!err.is_invalid_input());

        assert!(matches!(
            service.submit_attempt(&attempt(None, ClearStatus::Clear, 1, 1, None)),
            Err(Error::Storage(_))
        ));
        assert!(matches!(
            service.update_rank(UserId(1), Discipline::Single, DanRank::Dan1, 1, false, 1),
            Err(Error::Storage(_))
        ));
        assert!(matches!(
            service.select_ghost_with(
                &GhostStrategy::GlobalTop,
                ChartKey::new(SONG, Chart::SpA),
                UserId(1)
            ),
            Err(Error::Storage(_))
        ));
    }

    #[test]
    fn test_unknown_title_is_rejected() {
        let config = ServiceConfig::builder().title("rootage").build();
        assert!(matches!(
            ScoreService::new(MemoryStore::new(), &config),
            Err(Error::UnknownTitle(_))
        ));
    }
}
