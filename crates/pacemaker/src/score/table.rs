//! Dense per-song score tables for leaderboard and rival views.

use std::collections::BTreeMap;

use crate::game::{Chart, ClearStatus, Discipline, miss_count_to_raw};
use crate::score::ScoreRecord;

/// Row tag for the viewer's own scores; rivals use their slot index (0..)
pub const OWN_ROW_TAG: i32 = -1;

/// One song's scores across the five charts of a play style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRow {
    pub tag: i32,
    pub song_id: u32,
    /// Title-specific clear status codes, beginner first
    pub clear_status: [i32; 5],
    pub points: [u32; 5],
    /// -1 where untracked
    pub miss_count: [i32; 5],
}

impl ScoreRow {
    fn new(tag: i32, song_id: u32) -> Self {
        Self {
            tag,
            song_id,
            clear_status: [0; 5],
            points: [0; 5],
            miss_count: [-1; 5],
        }
    }

    /// Flatten to the wire layout: tag, song, 5 clear, 5 points, 5 miss
    pub fn to_values(&self) -> Vec<i64> {
        let mut values = Vec::with_capacity(17);
        values.push(i64::from(self.tag));
        values.push(i64::from(self.song_id));
        values.extend(self.clear_status.iter().map(|&v| i64::from(v)));
        values.extend(self.points.iter().map(|&v| i64::from(v)));
        values.extend(self.miss_count.iter().map(|&v| i64::from(v)));
        values
    }
}

/// Project best records onto one row per song for the given play style.
///
/// Records for charts of the other play style are ignored. Rows come out
/// ordered by song id.
pub fn project_scores<F>(
    scores: &[ScoreRecord],
    discipline: Discipline,
    tag: i32,
    to_game_status: F,
) -> Vec<ScoreRow>
where
    F: Fn(ClearStatus) -> i32,
{
    let mut rows: BTreeMap<u32, ScoreRow> = BTreeMap::new();

    for score in scores
        .iter()
        .filter(|s| s.key.chart.discipline() == discipline)
    {
        let slot = score.key.chart.slot();
        let row = rows
            .entry(score.key.song_id)
            .or_insert_with(|| ScoreRow::new(tag, score.key.song_id));
        row.clear_status[slot] = to_game_status(score.data.clear_status);
        row.points[slot] = score.points;
        row.miss_count[slot] = miss_count_to_raw(score.data.miss_count);
    }

    rows.into_values().collect()
}

/// `(song id, clear status)` pairs for single-play beginner charts only
pub fn project_beginner<F>(scores: &[ScoreRecord], to_game_status: F) -> Vec<(u32, i32)>
where
    F: Fn(ClearStatus) -> i32,
{
    scores
        .iter()
        .filter(|s| s.key.chart == Chart::SpB)
        .map(|s| (s.key.song_id, to_game_status(s.data.clear_status)))
        .collect()
}
