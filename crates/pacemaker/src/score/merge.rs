//! Best-score merge rules.
//!
//! Pure decision logic: given the stored record (if any) and one attempt,
//! compute the next best record and the verbatim history entry. Writing
//! them is left to the caller.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{Error, Result};
use crate::game::{ClearStatus, Ghost, Judge};
use crate::player::UserId;
use crate::score::{AttemptEntry, ChartKey, ScoreData, ScoreRecord};

/// One submitted play, already translated to internal enumerations
#[derive(Debug, Clone)]
pub struct Attempt {
    /// `None` for anonymous plays
    pub user: Option<UserId>,
    pub key: ChartKey,
    pub clear_status: ClearStatus,
    pub judge: Judge,
    pub ghost: Option<Ghost>,
    pub shop: Option<u32>,
    pub played_at: DateTime<Utc>,
}

impl Attempt {
    /// Build an attempt from raw protocol values
    #[allow(clippy::too_many_arguments)] // Mirrors the flat score-registration request
    pub fn from_raw(
        user: Option<UserId>,
        key: ChartKey,
        clear_status: i32,
        pgreat: u32,
        great: u32,
        miss_count: i32,
        ghost: Option<Ghost>,
        shop: Option<u32>,
        played_at: DateTime<Utc>,
    ) -> Result<Self> {
        Ok(Self {
            user,
            key,
            clear_status: ClearStatus::try_from(clear_status)?,
            judge: Judge::from_raw(pgreat, great, miss_count)?,
            ghost,
            shop,
            played_at,
        })
    }

    /// Fails when the judge counts overflow the EX score
    pub fn ex_score(&self) -> Result<u32> {
        self.judge.ex_score()
    }
}

/// New best-record value to upsert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestUpdate {
    pub record: ScoreRecord,
    /// The attempt tied or beat the stored score
    pub is_best: bool,
}

/// Result of merging one attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// `None` for anonymous attempts, which never touch best records
    pub best: Option<BestUpdate>,
    pub history: AttemptEntry,
    pub points_raised: bool,
    pub miss_reduced: bool,
}

/// Whether `new` should replace `old` as the stored miss count.
///
/// A first tracked measurement always wins; an untracked attempt never does.
pub fn miss_count_reduced(old: Option<u32>, new: Option<u32>) -> bool {
    match (old, new) {
        (Some(old), Some(new)) => new < old,
        (None, Some(_)) => true,
        (_, None) => false,
    }
}

/// Merge one attempt into the stored best record.
///
/// Fails without producing anything when the ghost presence does not match
/// the attempt's identity.
pub fn merge_attempt(existing: Option<&ScoreRecord>, attempt: &Attempt) -> Result<MergeOutcome> {
    match (attempt.user.is_some(), attempt.ghost.is_some()) {
        (true, false) => return Err(Error::GhostRequired),
        (false, true) => return Err(Error::GhostForbidden),
        _ => {}
    }

    let ex_score = attempt.ex_score()?;
    let existing = if attempt.user.is_some() {
        existing
    } else {
        None
    };

    let (points, mut data, points_raised, miss_reduced, is_best) = match existing {
        None => {
            let data = ScoreData {
                clear_status: attempt.clear_status,
                miss_count: attempt.judge.miss_count,
                pgreat: attempt.judge.pgreat,
                great: attempt.judge.great,
                ghost: attempt.ghost.clone(),
                shop: None,
            };
            (ex_score, data, true, true, true)
        }
        Some(old) => {
            let points_raised = ex_score > old.points;
            let is_best = ex_score >= old.points;
            let mut data = old.data.clone();
            data.clear_status = data.clear_status.max(attempt.clear_status);
            if points_raised {
                data.pgreat = attempt.judge.pgreat;
                data.great = attempt.judge.great;
                if let Some(ghost) = &attempt.ghost {
                    data.ghost = Some(ghost.clone());
                }
            }

            let miss_reduced = miss_count_reduced(old.data.miss_count, attempt.judge.miss_count);
            if miss_reduced {
                data.miss_count = attempt.judge.miss_count;
            }

            (
                ex_score.max(old.points),
                data,
                points_raised,
                miss_reduced,
                is_best,
            )
        }
    };

    if attempt.shop.is_some() {
        data.shop = attempt.shop;
    }

    debug!(
        "Merged {} {} ex={} -> points={} raised={} miss_reduced={}",
        attempt.key.song_id, attempt.key.chart, ex_score, points, points_raised, miss_reduced
    );

    let best = attempt.user.map(|_| BestUpdate {
        record: ScoreRecord {
            key: attempt.key,
            points,
            data,
        },
        is_best,
    });

    let history = AttemptEntry {
        key: attempt.key,
        points: ex_score,
        clear_status: attempt.clear_status,
        miss_count: attempt.judge.miss_count,
        ghost: attempt.ghost.clone(),
        shop: attempt.shop,
        played_at: attempt.played_at,
        qualifies: points_raised && miss_reduced,
    };

    Ok(MergeOutcome {
        best,
        history,
        points_raised,
        miss_reduced,
    })
}
